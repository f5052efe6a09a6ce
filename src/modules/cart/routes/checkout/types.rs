pub mod request {
    use crate::modules::{auth::middleware::CustomerAuth, order::repository::PaymentMethod};
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(length(min = 1))]
        pub address_id: String,
        pub payment_method: PaymentMethod,
        #[validate(length(max = 500))]
        pub note: Option<String>,
    }

    pub struct Payload {
        pub auth: CustomerAuth,
        pub body: Body,
    }
}

pub mod response {
    use crate::{
        modules::{
            order::repository::{Order, OrderItem},
            payment::service::Invoice,
        },
        utils::validation,
    };
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        OrderPlaced {
            order: Order,
            items: Vec<OrderItem>,
            invoice: Option<Invoice>,
        },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderPlaced {
                    order,
                    items,
                    invoice,
                } => (
                    StatusCode::CREATED,
                    Json(json!({
                        "order": order,
                        "items": items,
                        "url": invoice.as_ref().map(|invoice| invoice.authorization_url.clone()),
                        "reference": invoice.map(|invoice| invoice.reference),
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        EmptyCart,
        AddressNotFound,
        UnavailableItems(Vec<String>),
        NotAcceptingOrders,
        RestaurantUnavailable,
        BelowMinimum,
        InsufficientBalance,
        FailedToPlaceOrder,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::EmptyCart => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Cart is empty" })),
                )
                    .into_response(),
                Self::AddressNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Address not found" })),
                )
                    .into_response(),
                Self::UnavailableItems(item_ids) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Some items are no longer available",
                        "item_ids": item_ids,
                    })),
                )
                    .into_response(),
                Self::NotAcceptingOrders => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Orders are currently paused" })),
                )
                    .into_response(),
                Self::RestaurantUnavailable => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Restaurant is not accepting orders" })),
                )
                    .into_response(),
                Self::BelowMinimum => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Order is below the minimum amount" })),
                )
                    .into_response(),
                Self::InsufficientBalance => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Insufficient wallet balance" })),
                )
                    .into_response(),
                Self::FailedToPlaceOrder => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to place order" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
