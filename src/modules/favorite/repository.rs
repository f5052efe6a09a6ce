use sqlx::PgExecutor;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

/// Marking an already favorited product is a no-op.
pub async fn add<'e, E: PgExecutor<'e>>(e: E, customer_id: String, product_id: String) -> Result<()> {
    sqlx::query(
        "
        INSERT INTO favorites (customer_id, product_id)
        VALUES ($1, $2)
        ON CONFLICT (customer_id, product_id) DO NOTHING
        ",
    )
    .bind(customer_id.clone())
    .bind(product_id.clone())
    .execute(e)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!(
            "Error occurred while adding product {} to favorites of {}: {}",
            product_id,
            customer_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn remove<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: String,
    product_id: String,
) -> Result<bool> {
    sqlx::query("DELETE FROM favorites WHERE customer_id = $1 AND product_id = $2")
        .bind(customer_id.clone())
        .bind(product_id.clone())
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!(
                "Error occurred while removing product {} from favorites of {}: {}",
                product_id,
                customer_id,
                err
            );
            Error::UnexpectedError
        })
}
