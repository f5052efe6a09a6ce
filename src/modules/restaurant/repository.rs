use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::pagination::{Paginated, Pagination};

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Restaurant {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub address: String,
    pub phone_number: Option<String>,
    pub is_open: bool,
    pub is_active: bool,
    pub rating: BigDecimal,
    pub rating_count: i32,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateRestaurantPayload {
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone_number: Option<String>,
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateRestaurantPayload,
) -> Result<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        "
        INSERT INTO restaurants (
            id,
            owner_id,
            name,
            description,
            address,
            phone_number
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.owner_id.clone())
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.address)
    .bind(payload.phone_number)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating a restaurant for {}: {}",
            payload.owner_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching restaurant with id {}: {}",
                id,
                err
            );
            Error::UnexpectedError
        })
}

/// Restaurants customers are allowed to see.
pub async fn find_visible_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>(
        "SELECT * FROM restaurants WHERE id = $1 AND is_active = TRUE AND is_deleted = FALSE",
    )
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching visible restaurant with id {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: String,
) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>(
        "SELECT * FROM restaurants WHERE owner_id = $1 AND is_deleted = FALSE",
    )
    .bind(owner_id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching restaurant of owner {}: {}",
            owner_id,
            err
        );
        Error::UnexpectedError
    })
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub search: Option<String>,
    pub is_open: Option<bool>,
}

const VISIBLE_CONDITION: &str = "
    is_active = TRUE
    AND is_deleted = FALSE
    AND ($1::TEXT IS NULL OR name ILIKE CONCAT('%', $1, '%'))
    AND ($2::BOOLEAN IS NULL OR is_open = $2)
";

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
    filters: Filters,
) -> Result<Paginated<Restaurant>> {
    let items_sql = format!(
        "SELECT * FROM restaurants WHERE {} ORDER BY rating DESC, created_at DESC LIMIT $3 OFFSET $4",
        VISIBLE_CONDITION
    );
    let count_sql = format!("SELECT COUNT(*) FROM restaurants WHERE {}", VISIBLE_CONDITION);

    let restaurants = sqlx::query_as::<_, Restaurant>(&items_sql)
        .bind(filters.search.clone())
        .bind(filters.is_open)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching restaurants: {}", err);
            Error::UnexpectedError
        })?;

    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(filters.search)
        .bind(filters.is_open)
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while counting restaurants: {}", err);
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(restaurants, total, &pagination))
}

pub struct UpdateRestaurantPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub is_open: Option<bool>,
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateRestaurantPayload,
) -> Result<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        "
        UPDATE restaurants SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            logo = COALESCE($3, logo),
            address = COALESCE($4, address),
            phone_number = COALESCE($5, phone_number),
            is_open = COALESCE($6, is_open),
            updated_at = NOW()
        WHERE
            id = $7
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.logo)
    .bind(payload.address)
    .bind(payload.phone_number)
    .bind(payload.is_open)
    .bind(id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while updating restaurant {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn set_active_by_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: String,
    is_active: bool,
) -> Result<()> {
    sqlx::query("UPDATE restaurants SET is_active = $1, updated_at = NOW() WHERE owner_id = $2")
        .bind(is_active)
        .bind(owner_id.clone())
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while toggling restaurant of owner {}: {}",
                owner_id,
                err
            );
            Error::UnexpectedError
        })
}

/// Recomputes the average rating from every stored rate.
pub async fn refresh_rating<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        "
        UPDATE restaurants SET
            rating = COALESCE(
                (SELECT ROUND(AVG(rating)::NUMERIC, 2) FROM rates WHERE restaurant_id = $1),
                0
            ),
            rating_count = (SELECT COUNT(*) FROM rates WHERE restaurant_id = $1),
            updated_at = NOW()
        WHERE
            id = $1
        RETURNING *
        ",
    )
    .bind(id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while refreshing rating of restaurant {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn count<'e, E: PgExecutor<'e>>(e: E) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurants WHERE is_deleted = FALSE")
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while counting restaurants: {}", err);
            Error::UnexpectedError
        })
}

pub fn is_accepting_orders(restaurant: &Restaurant) -> bool {
    restaurant.is_active && restaurant.is_open && !restaurant.is_deleted
}
