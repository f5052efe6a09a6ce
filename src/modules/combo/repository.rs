use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};
use ulid::Ulid;

use crate::utils::pagination::{Paginated, Pagination};

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Combo {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: BigDecimal,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct ComboItem {
    pub id: String,
    pub combo_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ComboItemPayload {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateComboPayload {
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: BigDecimal,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateComboPayload) -> Result<Combo> {
    sqlx::query_as::<_, Combo>(
        "
        INSERT INTO combos (id, restaurant_id, name, description, image, price)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.restaurant_id.clone())
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.image)
    .bind(payload.price)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating a combo for restaurant {}: {}",
            payload.restaurant_id,
            err
        );
        Error::UnexpectedError
    })
}

/// Replaces the items of a combo. Run inside a transaction.
pub async fn set_items(
    conn: &mut PgConnection,
    combo_id: String,
    items: Vec<ComboItemPayload>,
) -> Result<()> {
    sqlx::query("DELETE FROM combo_items WHERE combo_id = $1")
        .bind(combo_id.clone())
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while clearing items of combo {}: {}",
                combo_id,
                err
            );
            Error::UnexpectedError
        })?;

    for item in items {
        sqlx::query(
            "
            INSERT INTO combo_items (id, combo_id, product_id, quantity)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(Ulid::new().to_string())
        .bind(combo_id.clone())
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while adding an item to combo {}: {}",
                combo_id,
                err
            );
            Error::UnexpectedError
        })?;
    }

    Ok(())
}

pub async fn find_items_by_combo_id<'e, E: PgExecutor<'e>>(
    e: E,
    combo_id: String,
) -> Result<Vec<ComboItem>> {
    sqlx::query_as::<_, ComboItem>(
        "
        SELECT
            combo_items.id,
            combo_items.combo_id,
            combo_items.product_id,
            products.name AS product_name,
            combo_items.quantity
        FROM
            combo_items
            JOIN products ON products.id = combo_items.product_id
        WHERE
            combo_items.combo_id = $1
        ORDER BY products.name ASC
        ",
    )
    .bind(combo_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching items of combo {}: {}",
            combo_id,
            err
        );
        Error::UnexpectedError
    })
}

const VISIBLE_CONDITION: &str = "
    combos.is_active = TRUE
    AND combos.is_deleted = FALSE
    AND restaurants.is_active = TRUE
    AND restaurants.is_deleted = FALSE
";

pub async fn find_visible_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Combo>> {
    let sql = format!(
        "
        SELECT combos.* FROM combos
        JOIN restaurants ON restaurants.id = combos.restaurant_id
        WHERE combos.id = $1 AND {}
        ",
        VISIBLE_CONDITION
    );

    sqlx::query_as::<_, Combo>(&sql)
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching combo {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_visible_by_ids<'e, E: PgExecutor<'e>>(
    e: E,
    ids: Vec<String>,
) -> Result<Vec<Combo>> {
    let sql = format!(
        "
        SELECT combos.* FROM combos
        JOIN restaurants ON restaurants.id = combos.restaurant_id
        WHERE combos.id = ANY($1) AND {}
        ",
        VISIBLE_CONDITION
    );

    sqlx::query_as::<_, Combo>(&sql)
        .bind(ids)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching combos by ids: {}", err);
            Error::UnexpectedError
        })
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub restaurant_id: Option<String>,
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
    filters: Filters,
) -> Result<Paginated<Combo>> {
    let condition = format!(
        "{} AND ($1::TEXT IS NULL OR combos.restaurant_id = $1)",
        VISIBLE_CONDITION
    );
    let items_sql = format!(
        "
        SELECT combos.* FROM combos
        JOIN restaurants ON restaurants.id = combos.restaurant_id
        WHERE {}
        ORDER BY combos.created_at DESC
        LIMIT $2 OFFSET $3
        ",
        condition
    );
    let count_sql = format!(
        "
        SELECT COUNT(*) FROM combos
        JOIN restaurants ON restaurants.id = combos.restaurant_id
        WHERE {}
        ",
        condition
    );

    let combos = sqlx::query_as::<_, Combo>(&items_sql)
        .bind(filters.restaurant_id.clone())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch many combos: {}", err);
            Error::UnexpectedError
        })?;

    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(filters.restaurant_id)
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to count combos: {}", err);
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(combos, total, &pagination))
}

pub struct UpdateComboPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<BigDecimal>,
    pub is_active: Option<bool>,
}

pub async fn update_owned<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    restaurant_id: String,
    payload: UpdateComboPayload,
) -> Result<Option<Combo>> {
    sqlx::query_as::<_, Combo>(
        "
        UPDATE combos SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            image = COALESCE($3, image),
            price = COALESCE($4, price),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
        WHERE
            id = $6
            AND restaurant_id = $7
            AND is_deleted = FALSE
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.image)
    .bind(payload.price)
    .bind(payload.is_active)
    .bind(id.clone())
    .bind(restaurant_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating combo {}: {}", id, err);
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
        UPDATE combos SET
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
        tracing::error!("Error occurred while deleting combo {}: {}", id, err);
        Error::UnexpectedError
    })
}
