use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{PgConnection, PgExecutor};
use ulid::Ulid;

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Cart {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct CartItem {
    pub id: String,
    pub cart_id: String,
    pub product_id: Option<String>,
    pub combo_id: Option<String>,
    pub quantity: i32,
    pub addon_ids: Vec<String>,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

/// Returns the customer's cart, creating it on first use. The row stays locked
/// until the surrounding transaction ends.
pub async fn upsert_by_customer_id<'e, E: PgExecutor<'e>>(e: E, customer_id: String) -> Result<Cart> {
    sqlx::query_as::<_, Cart>(
        "
        INSERT INTO carts (id, customer_id)
        VALUES ($1, $2)
        ON CONFLICT (customer_id) DO UPDATE SET customer_id = EXCLUDED.customer_id
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(customer_id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching cart of customer {}: {}",
            customer_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_customer_id<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: String,
) -> Result<Option<Cart>> {
    sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE customer_id = $1")
        .bind(customer_id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching cart of customer {}: {}",
                customer_id,
                err
            );
            Error::UnexpectedError
        })
}

/// Locks the cart until the surrounding transaction ends, so one cart is checked out once.
pub async fn find_by_customer_id_for_update(
    conn: &mut PgConnection,
    customer_id: String,
) -> Result<Option<Cart>> {
    sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE customer_id = $1 FOR UPDATE")
        .bind(customer_id.clone())
        .fetch_optional(conn)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while locking cart of customer {}: {}",
                customer_id,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn find_items_by_cart_id<'e, E: PgExecutor<'e>>(
    e: E,
    cart_id: String,
) -> Result<Vec<CartItem>> {
    sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE cart_id = $1 ORDER BY created_at ASC",
    )
    .bind(cart_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching items of cart {}: {}",
            cart_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn set_restaurant<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    restaurant_id: Option<String>,
) -> Result<()> {
    sqlx::query("UPDATE carts SET restaurant_id = $1, updated_at = NOW() WHERE id = $2")
        .bind(restaurant_id)
        .bind(id.clone())
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while setting restaurant of cart {}: {}",
                id,
                err
            );
            Error::UnexpectedError
        })
}

/// The line holding the same product or combo with exactly the same (sorted) addons.
pub async fn find_matching_item<'e, E: PgExecutor<'e>>(
    e: E,
    cart_id: String,
    product_id: Option<String>,
    combo_id: Option<String>,
    addon_ids: Vec<String>,
) -> Result<Option<CartItem>> {
    sqlx::query_as::<_, CartItem>(
        "
        SELECT * FROM cart_items
        WHERE
            cart_id = $1
            AND product_id IS NOT DISTINCT FROM $2
            AND combo_id IS NOT DISTINCT FROM $3
            AND addon_ids = $4
        ",
    )
    .bind(cart_id.clone())
    .bind(product_id)
    .bind(combo_id)
    .bind(addon_ids)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while matching an item in cart {}: {}",
            cart_id,
            err
        );
        Error::UnexpectedError
    })
}

pub struct CreateCartItemPayload {
    pub cart_id: String,
    pub product_id: Option<String>,
    pub combo_id: Option<String>,
    pub quantity: i32,
    pub addon_ids: Vec<String>,
    pub note: Option<String>,
}

pub async fn create_item<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateCartItemPayload,
) -> Result<CartItem> {
    sqlx::query_as::<_, CartItem>(
        "
        INSERT INTO cart_items (
            id,
            cart_id,
            product_id,
            combo_id,
            quantity,
            addon_ids,
            note
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.cart_id.clone())
    .bind(payload.product_id)
    .bind(payload.combo_id)
    .bind(payload.quantity)
    .bind(payload.addon_ids)
    .bind(payload.note)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while adding an item to cart {}: {}",
            payload.cart_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn update_item<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    quantity: i32,
    note: Option<String>,
) -> Result<CartItem> {
    sqlx::query_as::<_, CartItem>(
        "
        UPDATE cart_items SET
            quantity = $1,
            note = COALESCE($2, note),
            updated_at = NOW()
        WHERE
            id = $3
        RETURNING *
        ",
    )
    .bind(quantity)
    .bind(note)
    .bind(id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating cart item {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_item<'e, E: PgExecutor<'e>>(e: E, id: String, cart_id: String) -> Result<bool> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
        .bind(id.clone())
        .bind(cart_id)
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Error occurred while removing cart item {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn count_items<'e, E: PgExecutor<'e>>(e: E, cart_id: String) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cart_items WHERE cart_id = $1")
        .bind(cart_id.clone())
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while counting items of cart {}: {}",
                cart_id,
                err
            );
            Error::UnexpectedError
        })
}

/// Empties the cart and releases its restaurant.
pub async fn clear(conn: &mut PgConnection, id: String) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(id.clone())
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while clearing cart {}: {}", id, err);
            Error::UnexpectedError
        })?;

    set_restaurant(&mut *conn, id, None).await
}
