use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::pagination::{Paginated, Pagination};

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct DeliveryMan {
    pub id: String,
    pub user_id: String,
    pub vehicle: String,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// A delivery man with the contact details of the owning account.
#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct DeliveryManProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub delivery_man: DeliveryMan,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
    vehicle: String,
) -> Result<DeliveryMan> {
    sqlx::query_as::<_, DeliveryMan>(
        "
        INSERT INTO delivery_men (id, user_id, vehicle)
        VALUES ($1, $2, $3)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(user_id.clone())
    .bind(vehicle)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating delivery man for user {}: {}",
            user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<DeliveryMan>> {
    sqlx::query_as::<_, DeliveryMan>("SELECT * FROM delivery_men WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching delivery man {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_by_user_id<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
) -> Result<Option<DeliveryMan>> {
    sqlx::query_as::<_, DeliveryMan>("SELECT * FROM delivery_men WHERE user_id = $1")
        .bind(user_id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching delivery man of user {}: {}",
                user_id,
                err
            );
            Error::UnexpectedError
        })
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub is_available: Option<bool>,
}

const FIND_MANY_CONDITION: &str = "
    users.is_deleted = FALSE
    AND ($1::BOOLEAN IS NULL OR delivery_men.is_available = $1)
";

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
    filters: Filters,
) -> Result<Paginated<DeliveryManProfile>> {
    let items_sql = format!(
        "
        SELECT
            delivery_men.*,
            users.first_name,
            users.last_name,
            users.phone_number
        FROM
            delivery_men
            JOIN users ON users.id = delivery_men.user_id
        WHERE {}
        ORDER BY delivery_men.created_at DESC
        LIMIT $2 OFFSET $3
        ",
        FIND_MANY_CONDITION
    );
    let count_sql = format!(
        "
        SELECT COUNT(*) FROM delivery_men
        JOIN users ON users.id = delivery_men.user_id
        WHERE {}
        ",
        FIND_MANY_CONDITION
    );

    let delivery_men = sqlx::query_as::<_, DeliveryManProfile>(&items_sql)
        .bind(filters.is_available)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching delivery men: {}", err);
            Error::UnexpectedError
        })?;

    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(filters.is_available)
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while counting delivery men: {}", err);
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(delivery_men, total, &pagination))
}

pub async fn set_availability<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    is_available: bool,
) -> Result<DeliveryMan> {
    sqlx::query_as::<_, DeliveryMan>(
        "
        UPDATE delivery_men SET
            is_available = $1,
            updated_at = NOW()
        WHERE
            id = $2
        RETURNING *
        ",
    )
    .bind(is_available)
    .bind(id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while updating availability of delivery man {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}
