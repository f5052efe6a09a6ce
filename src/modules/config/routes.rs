use super::repository;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::{
    modules::auth::middleware::AdminAuth,
    types::Context,
    utils::validation::{self, validate_money},
};

fn validate_percentage(percentage: &BigDecimal) -> Result<(), ValidationError> {
    if *percentage < BigDecimal::from(0) || *percentage > BigDecimal::from(100) {
        return Err(ValidationError::new("percentage_out_of_range"));
    }

    Ok(())
}

async fn get_config(State(ctx): State<Arc<Context>>) -> Response {
    match repository::get(&ctx.db_conn.pool).await {
        Ok(config) => (StatusCode::OK, Json(json!(config))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch config" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateConfigPayload {
    #[validate(custom(code = "INVALID_FEE", function = "validate_money"))]
    delivery_fee: Option<BigDecimal>,
    #[validate(custom(code = "INVALID_FEE", function = "validate_money"))]
    service_fee: Option<BigDecimal>,
    #[validate(custom(code = "INVALID_PERCENTAGE", function = "validate_percentage"))]
    commission_percentage: Option<BigDecimal>,
    #[validate(custom(code = "INVALID_AMOUNT", function = "validate_money"))]
    minimum_order_amount: Option<BigDecimal>,
    #[validate(range(min = 1))]
    max_warnings: Option<i32>,
    is_accepting_orders: Option<bool>,
}

async fn update_config(
    State(ctx): State<Arc<Context>>,
    auth: AdminAuth,
    Json(payload): Json<UpdateConfigPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update(
        &ctx.db_conn.pool,
        repository::UpdateConfigPayload {
            delivery_fee: payload.delivery_fee,
            service_fee: payload.service_fee,
            commission_percentage: payload.commission_percentage,
            minimum_order_amount: payload.minimum_order_amount,
            max_warnings: payload.max_warnings,
            is_accepting_orders: payload.is_accepting_orders,
        },
    )
    .await
    {
        Ok(config) => {
            tracing::info!("Platform config updated by {}", auth.user.id);
            (StatusCode::OK, Json(json!(config))).into_response()
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to update config" })),
        )
            .into_response(),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(get_config).patch(update_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn commission_must_be_a_percentage() {
        assert!(validate_percentage(&BigDecimal::from(0)).is_ok());
        assert!(validate_percentage(&BigDecimal::from_str("12.5").unwrap()).is_ok());
        assert!(validate_percentage(&BigDecimal::from(100)).is_ok());
        assert!(validate_percentage(&BigDecimal::from_str("100.01").unwrap()).is_err());
        assert!(validate_percentage(&BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn max_warnings_has_a_floor_of_one() {
        let payload = serde_json::from_value::<UpdateConfigPayload>(json!({ "max_warnings": 0 }))
            .unwrap();
        assert!(payload.validate().is_err());

        let payload = serde_json::from_value::<UpdateConfigPayload>(json!({ "max_warnings": 1 }))
            .unwrap();
        assert!(payload.validate().is_ok());
    }
}
