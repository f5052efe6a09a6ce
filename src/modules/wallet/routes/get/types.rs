pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::wallet::repository::Wallet;

    pub enum Success {
        Wallet(Wallet),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Wallet(wallet) => (StatusCode::OK, Json(json!(wallet))).into_response(),
            }
        }
    }

    pub enum Error {
        WalletNotFound,
        FailedToFetchWallet,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::WalletNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Wallet not found" })),
                )
                    .into_response(),
                Self::FailedToFetchWallet => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch wallet" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
