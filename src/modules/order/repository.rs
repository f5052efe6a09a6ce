use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgConnection, PgExecutor};
use ulid::Ulid;

use crate::utils::pagination::{Paginated, Pagination};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Denied,
    Completed,
    Shipping,
    Shipped,
    Cancelled,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Wallet,
    Online,
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub delivery_man_id: Option<String>,
    pub delivery_address: String,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub sub_total: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub service_fee: BigDecimal,
    pub total: BigDecimal,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Addon as it was priced when the order was placed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderItemAddon {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: Option<String>,
    pub combo_id: Option<String>,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub addons: Json<Vec<OrderItemAddon>>,
    pub total: BigDecimal,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateOrderPayload {
    pub customer_id: String,
    pub restaurant_id: String,
    pub delivery_address: String,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub sub_total: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub service_fee: BigDecimal,
    pub total: BigDecimal,
    pub note: Option<String>,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateOrderPayload) -> Result<Order> {
    sqlx::query_as::<_, Order>(
        "
        INSERT INTO orders (
            id,
            customer_id,
            restaurant_id,
            delivery_address,
            delivery_latitude,
            delivery_longitude,
            payment_method,
            is_paid,
            sub_total,
            delivery_fee,
            service_fee,
            total,
            note
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.customer_id.clone())
    .bind(payload.restaurant_id)
    .bind(payload.delivery_address)
    .bind(payload.delivery_latitude)
    .bind(payload.delivery_longitude)
    .bind(payload.payment_method)
    .bind(payload.is_paid)
    .bind(payload.sub_total)
    .bind(payload.delivery_fee)
    .bind(payload.service_fee)
    .bind(payload.total)
    .bind(payload.note)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating an order for customer {}: {}",
            payload.customer_id,
            err
        );
        Error::UnexpectedError
    })
}

pub struct CreateOrderItemPayload {
    pub product_id: Option<String>,
    pub combo_id: Option<String>,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub addons: Vec<OrderItemAddon>,
    pub total: BigDecimal,
}

pub async fn create_items(
    conn: &mut PgConnection,
    order_id: String,
    items: Vec<CreateOrderItemPayload>,
) -> Result<()> {
    for item in items {
        sqlx::query(
            "
            INSERT INTO order_items (
                id,
                order_id,
                product_id,
                combo_id,
                name,
                unit_price,
                quantity,
                addons,
                total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(Ulid::new().to_string())
        .bind(order_id.clone())
        .bind(item.product_id)
        .bind(item.combo_id)
        .bind(item.name)
        .bind(item.unit_price)
        .bind(item.quantity)
        .bind(Json(item.addons))
        .bind(item.total)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while adding an item to order {}: {}",
                order_id,
                err
            );
            Error::UnexpectedError
        })?;
    }

    Ok(())
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching order {}: {}", id, err);
            Error::UnexpectedError
        })
}

/// Same as [`find_by_id`] but holds the row lock until the transaction ends.
pub async fn find_by_id_for_update(conn: &mut PgConnection, id: String) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id.clone())
        .fetch_optional(conn)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while locking order {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_items_by_order_id<'e, E: PgExecutor<'e>>(
    e: E,
    order_id: String,
) -> Result<Vec<OrderItem>> {
    sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id.clone())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching items of order {}: {}",
                order_id,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn mark_as_paid<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "
        UPDATE orders SET
            is_paid = TRUE,
            updated_at = NOW()
        WHERE
            id = $1
            AND is_paid = FALSE
        RETURNING *
        ",
    )
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while marking order {} as paid: {}", id, err);
        Error::UnexpectedError
    })
}

/// Moves the order from `from` to `to`. `None` means the order was no longer in `from`.
pub async fn transition_status<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "
        UPDATE orders SET
            status = $1,
            updated_at = NOW()
        WHERE
            id = $2
            AND status = $3
        RETURNING *
        ",
    )
    .bind(to)
    .bind(id.clone())
    .bind(from)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while moving order {} from {:?} to {:?}: {}",
            id,
            from,
            to,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn claim<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    delivery_man_id: String,
) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "
        UPDATE orders SET
            delivery_man_id = $1,
            updated_at = NOW()
        WHERE
            id = $2
            AND status = 'COMPLETED'
            AND delivery_man_id IS NULL
        RETURNING *
        ",
    )
    .bind(delivery_man_id)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while claiming order {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn assign<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    delivery_man_id: String,
) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "
        UPDATE orders SET
            delivery_man_id = $1,
            updated_at = NOW()
        WHERE
            id = $2
            AND status = 'COMPLETED'
        RETURNING *
        ",
    )
    .bind(delivery_man_id)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while assigning order {}: {}", id, err);
        Error::UnexpectedError
    })
}

/// Whose orders a listing covers.
#[derive(Clone, Debug, PartialEq)]
pub enum Scope {
    All,
    Customer(String),
    Restaurant(String),
    DeliveryMan(String),
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub status: Option<OrderStatus>,
}

const FIND_MANY_CONDITION: &str = "
    ($1::TEXT IS NULL OR customer_id = $1)
    AND ($2::TEXT IS NULL OR restaurant_id = $2)
    AND ($3::TEXT IS NULL OR delivery_man_id = $3)
    AND ($4::order_status IS NULL OR status = $4)
";

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
    scope: Scope,
    filters: Filters,
) -> Result<Paginated<Order>> {
    let (customer_id, restaurant_id, delivery_man_id) = match scope {
        Scope::All => (None, None, None),
        Scope::Customer(id) => (Some(id), None, None),
        Scope::Restaurant(id) => (None, Some(id), None),
        Scope::DeliveryMan(id) => (None, None, Some(id)),
    };

    let items_sql = format!(
        "SELECT * FROM orders WHERE {} ORDER BY created_at DESC LIMIT $5 OFFSET $6",
        FIND_MANY_CONDITION
    );
    let count_sql = format!("SELECT COUNT(*) FROM orders WHERE {}", FIND_MANY_CONDITION);

    let orders = sqlx::query_as::<_, Order>(&items_sql)
        .bind(customer_id.clone())
        .bind(restaurant_id.clone())
        .bind(delivery_man_id.clone())
        .bind(filters.status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch many orders: {}", err);
            Error::UnexpectedError
        })?;

    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(customer_id)
        .bind(restaurant_id)
        .bind(delivery_man_id)
        .bind(filters.status)
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to count orders: {}", err);
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(orders, total, &pagination))
}

pub async fn find_available<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
) -> Result<Paginated<Order>> {
    let condition = "status = 'COMPLETED' AND delivery_man_id IS NULL";

    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT * FROM orders WHERE {} ORDER BY created_at ASC LIMIT $1 OFFSET $2",
        condition
    ))
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching available orders: {}", err);
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM orders WHERE {}",
        condition
    ))
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting available orders: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::from_query(orders, total, &pagination))
}

#[derive(Serialize, Debug, sqlx::FromRow)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

pub async fn count_by_status<'e, E: PgExecutor<'e>>(e: E) -> Result<Vec<StatusCount>> {
    sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status",
    )
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting orders by status: {}", err);
        Error::UnexpectedError
    })
}

pub async fn shipped_revenue<'e, E: PgExecutor<'e>>(e: E) -> Result<BigDecimal> {
    sqlx::query_scalar::<_, BigDecimal>(
        "SELECT COALESCE(SUM(total), 0) FROM orders WHERE status = 'SHIPPED'",
    )
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while summing shipped revenue: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_shipped_by_customer<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    customer_id: String,
) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE id = $1 AND customer_id = $2 AND status = 'SHIPPED'",
    )
    .bind(id.clone())
    .bind(customer_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching shipped order {}: {}", id, err);
        Error::UnexpectedError
    })
}
