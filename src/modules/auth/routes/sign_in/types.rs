pub mod request {
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Payload {
        /// E-mail address or phone number.
        #[serde(alias = "email", alias = "phone_number")]
        #[validate(length(min = 1))]
        pub identifier: String,
        #[validate(length(min = 1))]
        pub password: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    use crate::{
        modules::{auth::service::auth::TokenPair, user::repository::User},
        utils::validation,
    };

    pub enum Success {
        SignedIn(TokenPair, User),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::SignedIn(tokens, user) => (
                    StatusCode::OK,
                    Json(json!({
                        "access_token": tokens.access_token,
                        "refresh_token": tokens.refresh_token,
                        "access_token_expires_at": tokens.access_token_expires_at,
                        "refresh_token_expires_at": tokens.refresh_token_expires_at,
                        "user": user,
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        InvalidCredentials,
        AccountBanned,
        AccountPending,
        FailedToCreateSession,
        UnexpectedError,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Invalid credentials" })),
                )
                    .into_response(),
                Self::AccountBanned => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Account banned" })),
                )
                    .into_response(),
                Self::AccountPending => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Account pending approval" })),
                )
                    .into_response(),
                Self::FailedToCreateSession => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create session" })),
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
