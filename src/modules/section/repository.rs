use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{PgConnection, PgExecutor};
use ulid::Ulid;

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateSectionPayload {
    pub title: String,
    pub sort_order: i32,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateSectionPayload) -> Result<Section> {
    sqlx::query_as::<_, Section>(
        "
        INSERT INTO sections (id, title, sort_order)
        VALUES ($1, $2, $3)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.title)
    .bind(payload.sort_order)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating a section: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_active<'e, E: PgExecutor<'e>>(e: E) -> Result<Vec<Section>> {
    sqlx::query_as::<_, Section>(
        "SELECT * FROM sections WHERE is_active = TRUE ORDER BY sort_order ASC, created_at ASC",
    )
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching sections: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Section>> {
    sqlx::query_as::<_, Section>("SELECT * FROM sections WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching section {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub struct UpdateSectionPayload {
    pub title: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateSectionPayload,
) -> Result<Option<Section>> {
    sqlx::query_as::<_, Section>(
        "
        UPDATE sections SET
            title = COALESCE($1, title),
            sort_order = COALESCE($2, sort_order),
            is_active = COALESCE($3, is_active),
            updated_at = NOW()
        WHERE
            id = $4
        RETURNING *
        ",
    )
    .bind(payload.title)
    .bind(payload.sort_order)
    .bind(payload.is_active)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating section {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query("DELETE FROM sections WHERE id = $1")
        .bind(id.clone())
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Error occurred while deleting section {}: {}", id, err);
            Error::UnexpectedError
        })
}

/// Replaces the section's products; their order in `product_ids` is the display order.
pub async fn set_products(
    conn: &mut PgConnection,
    id: String,
    product_ids: Vec<String>,
) -> Result<()> {
    sqlx::query("DELETE FROM section_products WHERE section_id = $1")
        .bind(id.clone())
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while clearing products of section {}: {}",
                id,
                err
            );
            Error::UnexpectedError
        })?;

    if product_ids.is_empty() {
        return Ok(());
    }

    let positions = (0..product_ids.len() as i32).collect::<Vec<_>>();

    sqlx::query(
        "
        INSERT INTO section_products (section_id, product_id, position)
        SELECT $1, product_id, position
        FROM UNNEST($2::TEXT[], $3::INT[]) AS t (product_id, position)
        ",
    )
    .bind(id.clone())
    .bind(product_ids)
    .bind(positions)
    .execute(&mut *conn)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!(
            "Error occurred while setting products of section {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn count_existing_products<'e, E: PgExecutor<'e>>(
    e: E,
    product_ids: Vec<String>,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM products WHERE id = ANY($1) AND is_deleted = FALSE",
    )
    .bind(product_ids)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting section products: {}", err);
        Error::UnexpectedError
    })
}
