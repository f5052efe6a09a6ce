use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Offer {
    pub id: String,
    pub product_id: String,
    pub discount_percentage: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// A running offer together with the product it discounts.
#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct RunningOffer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub offer: Offer,
    pub restaurant_id: String,
    pub product_name: String,
    pub product_price: bigdecimal::BigDecimal,
    pub product_image: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateOfferPayload {
    pub product_id: String,
    pub discount_percentage: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateOfferPayload) -> Result<Offer> {
    sqlx::query_as::<_, Offer>(
        "
        INSERT INTO offers (
            id,
            product_id,
            discount_percentage,
            starts_at,
            ends_at
        )
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.product_id.clone())
    .bind(payload.discount_percentage)
    .bind(payload.starts_at)
    .bind(payload.ends_at)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating an offer for product {}: {}",
            payload.product_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Offer>> {
    sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching offer {}: {}", id, err);
            Error::UnexpectedError
        })
}

/// Whether an active offer on the product overlaps `[starts_at, ends_at)`.
pub async fn has_overlapping<'e, E: PgExecutor<'e>>(
    e: E,
    product_id: String,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
) -> Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "
        SELECT EXISTS (
            SELECT 1 FROM offers
            WHERE
                product_id = $1
                AND is_active = TRUE
                AND starts_at < $3
                AND ends_at > $2
        )
        ",
    )
    .bind(product_id.clone())
    .bind(starts_at)
    .bind(ends_at)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while checking offer overlap for product {}: {}",
            product_id,
            err
        );
        Error::UnexpectedError
    })
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub restaurant_id: Option<String>,
}

pub async fn find_running<'e, E: PgExecutor<'e>>(
    e: E,
    filters: Filters,
) -> Result<Vec<RunningOffer>> {
    sqlx::query_as::<_, RunningOffer>(
        "
        SELECT
            offers.*,
            products.restaurant_id,
            products.name AS product_name,
            products.price AS product_price,
            products.image AS product_image
        FROM
            offers
            JOIN products ON products.id = offers.product_id
            JOIN restaurants ON restaurants.id = products.restaurant_id
        WHERE
            offers.is_active = TRUE
            AND offers.starts_at <= (NOW() AT TIME ZONE 'UTC')
            AND offers.ends_at > (NOW() AT TIME ZONE 'UTC')
            AND products.is_active = TRUE
            AND products.is_deleted = FALSE
            AND restaurants.is_active = TRUE
            AND restaurants.is_deleted = FALSE
            AND ($1::TEXT IS NULL OR products.restaurant_id = $1)
        ORDER BY offers.discount_percentage DESC, offers.ends_at ASC
        ",
    )
    .bind(filters.restaurant_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching running offers: {}", err);
        Error::UnexpectedError
    })
}

pub async fn deactivate_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Offer>> {
    sqlx::query_as::<_, Offer>(
        "UPDATE offers SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating offer {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn deactivate_expired<'e, E: PgExecutor<'e>>(e: E) -> Result<u64> {
    sqlx::query(
        "
        UPDATE offers SET
            is_active = FALSE,
            updated_at = NOW()
        WHERE
            is_active = TRUE
            AND ends_at <= (NOW() AT TIME ZONE 'UTC')
        ",
    )
    .execute(e)
    .await
    .map(|result| result.rows_affected())
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating expired offers: {}", err);
        Error::UnexpectedError
    })
}
