pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{
        modules::transaction::repository::Transaction, utils::pagination::Paginated,
    };

    pub enum Success {
        Transactions(Paginated<Transaction>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Transactions(transactions) => {
                    (StatusCode::OK, Json(json!(transactions))).into_response()
                }
            }
        }
    }

    pub enum Error {
        WalletNotFound,
        FailedToFetchTransactions,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::WalletNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Wallet not found" })),
                )
                    .into_response(),
                Self::FailedToFetchTransactions => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch transactions" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
