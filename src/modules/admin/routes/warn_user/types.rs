pub mod request {
    use crate::modules::auth::middleware::AdminAuth;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(length(min = 1, max = 1000))]
        pub reason: String,
    }

    pub struct Payload {
        pub auth: AdminAuth,
        pub id: String,
        pub body: Body,
    }
}

pub mod response {
    use crate::{modules::warning::repository::Warning, utils::validation};
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        Warned {
            warning: Warning,
            warning_count: i64,
            banned: bool,
        },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Warned {
                    warning,
                    warning_count,
                    banned,
                } => (
                    StatusCode::CREATED,
                    Json(json!({
                        "warning": warning,
                        "warning_count": warning_count,
                        "banned": banned,
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        UserNotFound,
        FailedToWarnUser,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Self::FailedToWarnUser => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to warn user" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
