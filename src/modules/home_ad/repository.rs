use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct HomeAd {
    pub id: String,
    pub image: String,
    pub link: Option<String>,
    pub sort_order: i32,
    pub expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateHomeAdPayload {
    pub image: String,
    pub link: Option<String>,
    pub sort_order: i32,
    pub expires_at: Option<NaiveDateTime>,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateHomeAdPayload) -> Result<HomeAd> {
    sqlx::query_as::<_, HomeAd>(
        "
        INSERT INTO home_ads (id, image, link, sort_order, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.image)
    .bind(payload.link)
    .bind(payload.sort_order)
    .bind(payload.expires_at)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating a home ad: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_live<'e, E: PgExecutor<'e>>(e: E) -> Result<Vec<HomeAd>> {
    sqlx::query_as::<_, HomeAd>(
        "
        SELECT * FROM home_ads
        WHERE expires_at IS NULL OR expires_at > (NOW() AT TIME ZONE 'UTC')
        ORDER BY sort_order ASC, created_at DESC
        ",
    )
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching home ads: {}", err);
        Error::UnexpectedError
    })
}

pub struct UpdateHomeAdPayload {
    pub image: Option<String>,
    pub link: Option<String>,
    pub sort_order: Option<i32>,
    pub expires_at: Option<NaiveDateTime>,
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateHomeAdPayload,
) -> Result<Option<HomeAd>> {
    sqlx::query_as::<_, HomeAd>(
        "
        UPDATE home_ads SET
            image = COALESCE($1, image),
            link = COALESCE($2, link),
            sort_order = COALESCE($3, sort_order),
            expires_at = COALESCE($4, expires_at),
            updated_at = NOW()
        WHERE
            id = $5
        RETURNING *
        ",
    )
    .bind(payload.image)
    .bind(payload.link)
    .bind(payload.sort_order)
    .bind(payload.expires_at)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating home ad {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query("DELETE FROM home_ads WHERE id = $1")
        .bind(id.clone())
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Error occurred while deleting home ad {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn delete_expired<'e, E: PgExecutor<'e>>(e: E) -> Result<u64> {
    sqlx::query("DELETE FROM home_ads WHERE expires_at <= (NOW() AT TIME ZONE 'UTC')")
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!("Error occurred while deleting expired home ads: {}", err);
            Error::UnexpectedError
        })
}
