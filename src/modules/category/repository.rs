use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database::is_unique_violation,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
    DuplicateName,
}

type Result<T> = std::result::Result<T, Error>;

fn map_write_error(action: &str, err: sqlx::Error) -> Error {
    if is_unique_violation(&err) {
        return Error::DuplicateName;
    }

    tracing::error!("Error occurred while trying to {} a category: {}", action, err);
    Error::UnexpectedError
}

pub struct CreateCategoryPayload {
    pub name: String,
    pub image: Option<String>,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateCategoryPayload) -> Result<Category> {
    sqlx::query_as::<_, Category>(
        "
        INSERT INTO categories (id, name, image)
        VALUES ($1, $2, $3)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.image)
    .fetch_one(e)
    .await
    .map_err(|err| map_write_error("create", err))
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Category>> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 AND is_deleted = FALSE")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching category with id {}: {}",
                id,
                err
            );
            Error::UnexpectedError
        })
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub search: Option<String>,
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
    filters: Filters,
) -> Result<Paginated<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "
        SELECT * FROM categories
        WHERE
            is_active = TRUE
            AND is_deleted = FALSE
            AND ($1::TEXT IS NULL OR name ILIKE CONCAT('%', $1, '%'))
        ORDER BY name ASC
        LIMIT $2
        OFFSET $3
        ",
    )
    .bind(filters.search.clone())
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching categories: {}", err);
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>(
        "
        SELECT COUNT(*) FROM categories
        WHERE
            is_active = TRUE
            AND is_deleted = FALSE
            AND ($1::TEXT IS NULL OR name ILIKE CONCAT('%', $1, '%'))
        ",
    )
    .bind(filters.search)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting categories: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::from_query(categories, total, &pagination))
}

pub struct UpdateCategoryPayload {
    pub name: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateCategoryPayload,
) -> Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        "
        UPDATE categories SET
            name = COALESCE($1, name),
            image = COALESCE($2, image),
            is_active = COALESCE($3, is_active),
            updated_at = NOW()
        WHERE
            id = $4
            AND is_deleted = FALSE
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.image)
    .bind(payload.is_active)
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| map_write_error("update", err))
}

pub async fn soft_delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query(
        "UPDATE categories SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND is_deleted = FALSE",
    )
    .bind(id.clone())
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deleting category {}: {}", id, err);
        Error::UnexpectedError
    })
}
