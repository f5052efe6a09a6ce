pub mod request {
    use crate::utils::validation::validate_phone_number;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Account {
        #[validate(email(code = "INVALID_EMAIL", message = "Invalid email address"))]
        pub email: String,
        #[validate(custom(code = "INVALID_PHONE_NUMBER", function = "validate_phone_number"))]
        pub phone_number: String,
        #[validate(length(min = 1, max = 100))]
        pub first_name: String,
        #[validate(length(min = 1, max = 100))]
        pub last_name: String,
        #[validate(length(
            min = 8,
            code = "PASSWORD_TOO_SHORT",
            message = "Password must be at least 8 characters"
        ))]
        pub password: String,
    }

    #[derive(Deserialize, Validate)]
    pub struct CustomerPayload {
        #[serde(flatten)]
        #[validate(nested)]
        pub account: Account,
    }

    #[derive(Deserialize, Validate)]
    pub struct RestaurantPayload {
        #[serde(flatten)]
        #[validate(nested)]
        pub account: Account,
        #[validate(length(min = 1, max = 150))]
        pub restaurant_name: String,
        #[serde(default)]
        pub description: String,
        #[validate(length(min = 1))]
        pub address: String,
    }

    #[derive(Deserialize, Validate)]
    pub struct DeliveryManPayload {
        #[serde(flatten)]
        #[validate(nested)]
        pub account: Account,
        #[validate(length(min = 1, max = 100))]
        pub vehicle: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    use crate::{modules::user::repository::User, utils::validation};

    pub enum Success {
        CustomerCreated(User),
        AwaitingApproval(User),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CustomerCreated(user) => (
                    StatusCode::CREATED,
                    Json(json!({
                        "message": "Account created",
                        "user": user,
                    })),
                )
                    .into_response(),
                Self::AwaitingApproval(user) => (
                    StatusCode::CREATED,
                    Json(json!({
                        "message": "Account created and awaiting approval",
                        "user": user,
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        AccountAlreadyExists,
        SignupFailed,
        FailedToCreateWallet,
        UnexpectedError,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::AccountAlreadyExists => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Email or phone number already in use" })),
                )
                    .into_response(),
                Self::SignupFailed => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Sign up failed!" })),
                )
                    .into_response(),
                Self::FailedToCreateWallet => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create wallet" })),
                )
                    .into_response(),
                Self::UnexpectedError => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Sorry an error occurred" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
