pub mod request {
    use crate::modules::auth::middleware::DeliveryManAuth;

    pub struct Payload {
        pub auth: DeliveryManAuth,
        pub id: String,
    }
}

pub mod response {
    use crate::modules::order::repository::Order;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        OrderClaimed(Order),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderClaimed(order) => (StatusCode::OK, Json(json!(order))).into_response(),
            }
        }
    }

    pub enum Error {
        Unavailable,
        OrderNotFound,
        AlreadyTaken,
        FailedToClaimOrder,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Unavailable => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Set yourself as available before claiming orders" })),
                )
                    .into_response(),
                Self::OrderNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Order not found" })),
                )
                    .into_response(),
                Self::AlreadyTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Order is no longer available" })),
                )
                    .into_response(),
                Self::FailedToClaimOrder => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to claim order" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
