use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::PgExecutor;

/// Platform settings editable at runtime. There is exactly one row.
#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Config {
    #[serde(skip_serializing)]
    pub id: i32,
    pub delivery_fee: BigDecimal,
    pub service_fee: BigDecimal,
    pub commission_percentage: BigDecimal,
    pub minimum_order_amount: BigDecimal,
    pub max_warnings: i32,
    pub is_accepting_orders: bool,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub async fn get<'e, E: PgExecutor<'e>>(e: E) -> Result<Config> {
    sqlx::query_as::<_, Config>("SELECT * FROM configs WHERE id = 1")
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching platform config: {}", err);
            Error::UnexpectedError
        })
}

#[derive(Default)]
pub struct UpdateConfigPayload {
    pub delivery_fee: Option<BigDecimal>,
    pub service_fee: Option<BigDecimal>,
    pub commission_percentage: Option<BigDecimal>,
    pub minimum_order_amount: Option<BigDecimal>,
    pub max_warnings: Option<i32>,
    pub is_accepting_orders: Option<bool>,
}

pub async fn update<'e, E: PgExecutor<'e>>(e: E, payload: UpdateConfigPayload) -> Result<Config> {
    sqlx::query_as::<_, Config>(
        "
        UPDATE configs SET
            delivery_fee = COALESCE($1, delivery_fee),
            service_fee = COALESCE($2, service_fee),
            commission_percentage = COALESCE($3, commission_percentage),
            minimum_order_amount = COALESCE($4, minimum_order_amount),
            max_warnings = COALESCE($5, max_warnings),
            is_accepting_orders = COALESCE($6, is_accepting_orders),
            updated_at = NOW()
        WHERE
            id = 1
        RETURNING *
        ",
    )
    .bind(payload.delivery_fee)
    .bind(payload.service_fee)
    .bind(payload.commission_percentage)
    .bind(payload.minimum_order_amount)
    .bind(payload.max_warnings)
    .bind(payload.is_accepting_orders)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating platform config: {}", err);
        Error::UnexpectedError
    })
}
