pub mod request {
    use crate::modules::auth::middleware::AdminAuth;
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Body {
        pub delivery_man_id: String,
    }

    pub struct Payload {
        pub auth: AdminAuth,
        pub id: String,
        pub body: Body,
    }
}

pub mod response {
    use crate::modules::order::repository::Order;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        OrderAssigned(Order),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderAssigned(order) => (StatusCode::OK, Json(json!(order))).into_response(),
            }
        }
    }

    pub enum Error {
        DeliveryManNotFound,
        OrderNotFound,
        NotAwaitingDelivery,
        FailedToAssignOrder,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::DeliveryManNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Delivery man not found" })),
                )
                    .into_response(),
                Self::OrderNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Order not found" })),
                )
                    .into_response(),
                Self::NotAwaitingDelivery => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Only completed orders can be assigned" })),
                )
                    .into_response(),
                Self::FailedToAssignOrder => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to assign order" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
