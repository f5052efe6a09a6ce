use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database::is_unique_violation,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Rate {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
    AlreadyRated,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateRatePayload {
    pub order_id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateRatePayload) -> Result<Rate> {
    sqlx::query_as::<_, Rate>(
        "
        INSERT INTO rates (
            id,
            order_id,
            customer_id,
            restaurant_id,
            rating,
            comment
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.order_id.clone())
    .bind(payload.customer_id)
    .bind(payload.restaurant_id)
    .bind(payload.rating)
    .bind(payload.comment)
    .fetch_one(e)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            return Error::AlreadyRated;
        }

        tracing::error!(
            "Error occurred while rating order {}: {}",
            payload.order_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_many_by_restaurant_id<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    restaurant_id: String,
    pagination: Pagination,
) -> Result<Paginated<Rate>> {
    let rates = sqlx::query_as::<_, Rate>(
        "
        SELECT * FROM rates
        WHERE restaurant_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(restaurant_id.clone())
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching rates of restaurant {}: {}",
            restaurant_id,
            err
        );
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rates WHERE restaurant_id = $1")
        .bind(restaurant_id.clone())
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while counting rates of restaurant {}: {}",
                restaurant_id,
                err
            );
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(rates, total, &pagination))
}
