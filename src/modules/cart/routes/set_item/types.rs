pub mod request {
    use crate::modules::auth::middleware::CustomerAuth;
    use serde::Deserialize;
    use validator::{Validate, ValidationError};

    #[derive(Deserialize, Validate)]
    #[validate(schema(function = "validate_target"))]
    pub struct Body {
        pub product_id: Option<String>,
        pub combo_id: Option<String>,
        #[validate(range(min = 1, max = 50))]
        pub quantity: i32,
        #[serde(default)]
        pub addon_ids: Vec<String>,
        #[validate(length(max = 500))]
        pub note: Option<String>,
        /// Empty a cart holding another restaurant's items instead of refusing.
        #[serde(default)]
        pub replace: bool,
    }

    fn validate_target(body: &Body) -> Result<(), ValidationError> {
        match (&body.product_id, &body.combo_id) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(ValidationError::new("exactly_one_of_product_or_combo")),
        }
    }

    pub struct Payload {
        pub auth: CustomerAuth,
        pub body: Body,
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        fn body(value: serde_json::Value) -> Body {
            serde_json::from_value(value).unwrap()
        }

        #[test]
        fn exactly_one_target_is_required() {
            assert!(body(json!({ "product_id": "p", "quantity": 1 }))
                .validate()
                .is_ok());
            assert!(body(json!({ "combo_id": "c", "quantity": 1 }))
                .validate()
                .is_ok());
            assert!(body(json!({ "quantity": 1 })).validate().is_err());
            assert!(body(json!({ "product_id": "p", "combo_id": "c", "quantity": 1 }))
                .validate()
                .is_err());
        }

        #[test]
        fn quantity_is_bounded() {
            assert!(body(json!({ "product_id": "p", "quantity": 0 }))
                .validate()
                .is_err());
            assert!(body(json!({ "product_id": "p", "quantity": 50 }))
                .validate()
                .is_ok());
            assert!(body(json!({ "product_id": "p", "quantity": 51 }))
                .validate()
                .is_err());
        }
    }
}

pub mod response {
    use crate::{modules::cart::service::CartView, utils::validation};
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        Cart(CartView),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Cart(cart) => (StatusCode::OK, Json(cart)).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        ItemNotFound,
        InvalidAddons,
        DifferentRestaurant,
        FailedToUpdateCart,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::ItemNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Product or combo not found" })),
                )
                    .into_response(),
                Self::InvalidAddons => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Addons are not available for this item" })),
                )
                    .into_response(),
                Self::DifferentRestaurant => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Cart holds items from another restaurant" })),
                )
                    .into_response(),
                Self::FailedToUpdateCart => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update cart" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
