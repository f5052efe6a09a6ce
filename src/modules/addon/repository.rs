use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Addon {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub price: BigDecimal,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateAddonPayload {
    pub restaurant_id: String,
    pub name: String,
    pub price: BigDecimal,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateAddonPayload) -> Result<Addon> {
    sqlx::query_as::<_, Addon>(
        "
        INSERT INTO addons (id, restaurant_id, name, price)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.restaurant_id.clone())
    .bind(payload.name)
    .bind(payload.price)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating an addon for restaurant {}: {}",
            payload.restaurant_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_many_by_restaurant_id<'e, E: PgExecutor<'e>>(
    e: E,
    restaurant_id: String,
) -> Result<Vec<Addon>> {
    sqlx::query_as::<_, Addon>(
        "
        SELECT * FROM addons
        WHERE
            restaurant_id = $1
            AND is_active = TRUE
            AND is_deleted = FALSE
        ORDER BY name ASC
        ",
    )
    .bind(restaurant_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching addons of restaurant {}: {}",
            restaurant_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_many_by_product_id<'e, E: PgExecutor<'e>>(
    e: E,
    product_id: String,
) -> Result<Vec<Addon>> {
    sqlx::query_as::<_, Addon>(
        "
        SELECT addons.* FROM addons
        JOIN product_addons ON product_addons.addon_id = addons.id
        WHERE
            product_addons.product_id = $1
            AND addons.is_active = TRUE
            AND addons.is_deleted = FALSE
        ORDER BY addons.name ASC
        ",
    )
    .bind(product_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching addons of product {}: {}",
            product_id,
            err
        );
        Error::UnexpectedError
    })
}

/// Addons among `ids` that are attached to the product and currently orderable.
pub async fn find_attached<'e, E: PgExecutor<'e>>(
    e: E,
    product_id: String,
    ids: Vec<String>,
) -> Result<Vec<Addon>> {
    sqlx::query_as::<_, Addon>(
        "
        SELECT addons.* FROM addons
        JOIN product_addons ON product_addons.addon_id = addons.id
        WHERE
            product_addons.product_id = $1
            AND addons.id = ANY($2)
            AND addons.is_active = TRUE
            AND addons.is_deleted = FALSE
        ",
    )
    .bind(product_id.clone())
    .bind(ids)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while resolving addons of product {}: {}",
            product_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn count_owned<'e, E: PgExecutor<'e>>(
    e: E,
    restaurant_id: String,
    ids: Vec<String>,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "
        SELECT COUNT(*) FROM addons
        WHERE
            restaurant_id = $1
            AND id = ANY($2)
            AND is_deleted = FALSE
        ",
    )
    .bind(restaurant_id.clone())
    .bind(ids)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while counting addons of restaurant {}: {}",
            restaurant_id,
            err
        );
        Error::UnexpectedError
    })
}

pub struct UpdateAddonPayload {
    pub name: Option<String>,
    pub price: Option<BigDecimal>,
    pub is_active: Option<bool>,
}

pub async fn update_owned<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    restaurant_id: String,
    payload: UpdateAddonPayload,
) -> Result<Option<Addon>> {
    sqlx::query_as::<_, Addon>(
        "
        UPDATE addons SET
            name = COALESCE($1, name),
            price = COALESCE($2, price),
            is_active = COALESCE($3, is_active),
            updated_at = NOW()
        WHERE
            id = $4
            AND restaurant_id = $5
            AND is_deleted = FALSE
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.is_active)
    .bind(id.clone())
    .bind(restaurant_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating addon {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn soft_delete_owned<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    restaurant_id: String,
) -> Result<bool> {
    sqlx::query(
        "
        UPDATE addons SET
            is_deleted = TRUE,
            updated_at = NOW()
        WHERE
            id = $1
            AND restaurant_id = $2
            AND is_deleted = FALSE
        ",
    )
    .bind(id.clone())
    .bind(restaurant_id)
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deleting addon {}: {}", id, err);
        Error::UnexpectedError
    })
}
