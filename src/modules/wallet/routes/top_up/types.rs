pub mod request {
    use crate::{modules::auth::middleware::Auth, utils::validation::validate_positive_money};
    use bigdecimal::BigDecimal;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(custom(code = "INVALID_AMOUNT", function = "validate_positive_money"))]
        pub amount: BigDecimal,
    }

    pub struct Payload {
        pub auth: Auth,
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    use crate::{modules::payment::service::Invoice, utils::validation};

    pub enum Success {
        TopupInvoiceLink(Invoice),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::TopupInvoiceLink(invoice) => (
                    StatusCode::OK,
                    Json(json!({
                        "url": invoice.authorization_url,
                        "reference": invoice.reference,
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        FailedToCreateTopupInvoiceLink,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::FailedToCreateTopupInvoiceLink => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create top-up invoice link" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
