use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{PgConnection, PgExecutor};
use ulid::Ulid;

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Address {
    pub id: String,
    pub customer_id: String,
    pub label: String,
    pub street: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Address {
    /// The single line snapshotted onto orders.
    pub fn one_line(&self) -> String {
        format!("{}, {}", self.street, self.city)
    }
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub struct CreateAddressPayload {
    pub customer_id: String,
    pub label: String,
    pub street: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// The customer's first address becomes their default one.
pub async fn create(conn: &mut PgConnection, payload: CreateAddressPayload) -> Result<Address> {
    let has_default = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM addresses WHERE customer_id = $1 AND is_default = TRUE)",
    )
    .bind(payload.customer_id.clone())
    .fetch_one(&mut *conn)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while checking default address of {}: {}",
            payload.customer_id,
            err
        );
        Error::UnexpectedError
    })?;

    sqlx::query_as::<_, Address>(
        "
        INSERT INTO addresses (
            id,
            customer_id,
            label,
            street,
            city,
            latitude,
            longitude,
            is_default
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.customer_id.clone())
    .bind(payload.label)
    .bind(payload.street)
    .bind(payload.city)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(!has_default)
    .fetch_one(&mut *conn)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating an address for {}: {}",
            payload.customer_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_many_by_customer_id<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: String,
) -> Result<Vec<Address>> {
    sqlx::query_as::<_, Address>(
        "
        SELECT * FROM addresses
        WHERE customer_id = $1
        ORDER BY is_default DESC, created_at DESC
        ",
    )
    .bind(customer_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching addresses of {}: {}",
            customer_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_owned<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    customer_id: String,
) -> Result<Option<Address>> {
    sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1 AND customer_id = $2")
        .bind(id.clone())
        .bind(customer_id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching address {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub struct UpdateAddressPayload {
    pub label: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub async fn update_owned<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    customer_id: String,
    payload: UpdateAddressPayload,
) -> Result<Option<Address>> {
    sqlx::query_as::<_, Address>(
        "
        UPDATE addresses SET
            label = COALESCE($1, label),
            street = COALESCE($2, street),
            city = COALESCE($3, city),
            latitude = COALESCE($4, latitude),
            longitude = COALESCE($5, longitude),
            updated_at = NOW()
        WHERE
            id = $6
            AND customer_id = $7
        RETURNING *
        ",
    )
    .bind(payload.label)
    .bind(payload.street)
    .bind(payload.city)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(id.clone())
    .bind(customer_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating address {}: {}", id, err);
        Error::UnexpectedError
    })
}

/// Clears the current default before marking the new one so the
/// one-default-per-customer index holds at every step.
pub async fn set_default(
    conn: &mut PgConnection,
    id: String,
    customer_id: String,
) -> Result<Option<Address>> {
    sqlx::query(
        "
        UPDATE addresses SET
            is_default = FALSE,
            updated_at = NOW()
        WHERE
            customer_id = $1
            AND is_default = TRUE
            AND id <> $2
        ",
    )
    .bind(customer_id.clone())
    .bind(id.clone())
    .execute(&mut *conn)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while clearing default address of {}: {}",
            customer_id,
            err
        );
        Error::UnexpectedError
    })?;

    sqlx::query_as::<_, Address>(
        "
        UPDATE addresses SET
            is_default = TRUE,
            updated_at = NOW()
        WHERE
            id = $1
            AND customer_id = $2
        RETURNING *
        ",
    )
    .bind(id.clone())
    .bind(customer_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while setting default address {}: {}", id, err);
        Error::UnexpectedError
    })
}

/// Deletes the address and, when it was the default, promotes the most recent
/// remaining one. Returns `None` when the customer has no such address.
pub async fn delete_owned(
    conn: &mut PgConnection,
    id: String,
    customer_id: String,
) -> Result<Option<Address>> {
    let deleted = sqlx::query_as::<_, Address>(
        "DELETE FROM addresses WHERE id = $1 AND customer_id = $2 RETURNING *",
    )
    .bind(id.clone())
    .bind(customer_id.clone())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while deleting address {}: {}", id, err);
        Error::UnexpectedError
    })?;

    let Some(deleted) = deleted else {
        return Ok(None);
    };

    if deleted.is_default {
        sqlx::query(
            "
            UPDATE addresses SET
                is_default = TRUE,
                updated_at = NOW()
            WHERE id = (
                SELECT id FROM addresses
                WHERE customer_id = $1
                ORDER BY created_at DESC
                LIMIT 1
            )
            ",
        )
        .bind(customer_id.clone())
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while promoting a default address for {}: {}",
                customer_id,
                err
            );
            Error::UnexpectedError
        })?;
    }

    Ok(Some(deleted))
}
