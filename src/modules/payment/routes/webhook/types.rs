pub mod request {
    use axum::http::header::{HeaderName, HeaderValue};
    use bytes::Bytes;
    use headers::{Error, Header};
    use std::iter;

    pub static X_PAYSTACK_SIGNATURE: HeaderName = HeaderName::from_static("x-paystack-signature");

    #[derive(Clone, Debug)]
    pub struct PaystackSignature(pub String);

    impl Header for PaystackSignature {
        fn name() -> &'static HeaderName {
            &X_PAYSTACK_SIGNATURE
        }

        fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
        where
            Self: Sized,
            I: Iterator<Item = &'i HeaderValue>,
        {
            values
                .next()
                .and_then(|value| value.to_str().ok())
                .map(|value| Self(value.to_string()))
                .ok_or_else(Error::invalid)
        }

        fn encode<E>(&self, values: &mut E)
        where
            E: Extend<HeaderValue>,
        {
            if let Ok(value) = HeaderValue::from_str(&self.0) {
                values.extend(iter::once(value));
            }
        }
    }

    pub struct Payload {
        pub signature: PaystackSignature,
        pub body: Bytes,
    }
}

use crate::modules::payment::service::Metadata;
use serde::Deserialize;

pub const CHARGE_SUCCESS: &str = "charge.success";

#[derive(Deserialize)]
pub struct Event {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Deserialize)]
pub struct ChargeSuccess {
    pub reference: String,
    /// Minor units.
    pub amount: i64,
    /// Paystack sends `""` or foreign objects here for charges this app did not start.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ChargeSuccess {
    pub fn metadata(&self) -> Option<Metadata> {
        serde_json::from_value::<Metadata>(self.metadata.clone()).ok()
    }
}

pub mod response {
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        Processed,
        Ignored,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Processed => {
                    (StatusCode::OK, Json(json!({ "message": "Event processed" }))).into_response()
                }
                Self::Ignored => {
                    (StatusCode::OK, Json(json!({ "message": "Event ignored" }))).into_response()
                }
            }
        }
    }

    pub enum Error {
        InvalidSignature,
        InvalidPayload,
        OrderNotFound,
        WalletNotFound,
        ServerError,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::InvalidSignature => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid signature" })),
                )
                    .into_response(),
                Self::InvalidPayload => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid payload" })),
                )
                    .into_response(),
                Self::OrderNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Order not found" })),
                )
                    .into_response(),
                Self::WalletNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Wallet not found" })),
                )
                    .into_response(),
                Self::ServerError => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Sorry an error occurred" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::payment::service::TopupMetadata;
    use serde_json::json;

    fn charge(metadata: serde_json::Value) -> ChargeSuccess {
        serde_json::from_value(json!({
            "reference": "ref_1",
            "amount": 500000,
            "metadata": metadata,
        }))
        .unwrap()
    }

    #[test]
    fn reads_metadata_written_by_the_app() {
        assert_eq!(
            charge(json!({ "user_id": "user" })).metadata(),
            Some(Metadata::Topup(TopupMetadata {
                user_id: "user".to_string()
            }))
        );
    }

    #[test]
    fn foreign_metadata_decodes_as_none() {
        assert_eq!(charge(json!("")).metadata(), None);
        assert_eq!(charge(json!({ "cart_id": "c" })).metadata(), None);
    }

    #[test]
    fn missing_metadata_decodes_as_none() {
        let charge = serde_json::from_value::<ChargeSuccess>(json!({
            "reference": "ref_1",
            "amount": 500000,
        }))
        .unwrap();

        assert_eq!(charge.metadata(), None);
    }
}
