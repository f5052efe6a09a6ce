pub mod request {
    use crate::modules::auth::middleware::CustomerAuth;

    pub struct Payload {
        pub auth: CustomerAuth,
        pub id: String,
    }
}

pub mod response {
    use crate::modules::payment::service::Invoice;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        InvoiceCreated { order_id: String, invoice: Invoice },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::InvoiceCreated { order_id, invoice } => (
                    StatusCode::OK,
                    Json(json!({
                        "order_id": order_id,
                        "url": invoice.authorization_url,
                        "reference": invoice.reference,
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        OrderNotFound,
        NotAnOnlineOrder,
        AlreadyPaid,
        OrderClosed,
        FailedToCreateInvoice,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Order not found" })),
                )
                    .into_response(),
                Self::NotAnOnlineOrder => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Order is not paid online" })),
                )
                    .into_response(),
                Self::AlreadyPaid => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Order has already been paid" })),
                )
                    .into_response(),
                Self::OrderClosed => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Order can no longer be paid" })),
                )
                    .into_response(),
                Self::FailedToCreateInvoice => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create payment link" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
