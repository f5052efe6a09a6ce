pub mod request {
    use crate::modules::{auth::middleware::Auth, order::repository::OrderStatus};
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Body {
        pub status: OrderStatus,
    }

    pub struct Payload {
        pub id: String,
        pub body: Body,
        pub auth: Auth,
    }
}

pub mod response {
    use crate::modules::order::repository::Order;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        OrderStatusUpdated(Order),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderStatusUpdated(order) => {
                    (StatusCode::OK, Json(json!(order))).into_response()
                }
            }
        }
    }

    pub enum Error {
        OrderNotFound,
        NotInvolved,
        InvalidStatusTransition,
        PaymentRequired,
        StatusChanged,
        FailedToUpdateOrderStatus,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Order not found" })),
                )
                    .into_response(),
                Self::NotInvolved => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You are not allowed to update this order" })),
                )
                    .into_response(),
                Self::InvalidStatusTransition => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid status transition" })),
                )
                    .into_response(),
                Self::PaymentRequired => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Order has not been paid" })),
                )
                    .into_response(),
                Self::StatusChanged => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Order status changed, please retry" })),
                )
                    .into_response(),
                Self::FailedToUpdateOrderStatus => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update order status" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
