use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};
use ulid::Ulid;

use crate::{
    modules::offer,
    utils::pagination::{Paginated, Pagination},
};

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub restaurant_id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: BigDecimal,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// A product row joined with the best offer running on it right now.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ProductListing {
    #[sqlx(flatten)]
    pub product: Product,
    pub offer_id: Option<String>,
    pub offer_discount_percentage: Option<i32>,
    pub offer_ends_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RunningOfferSummary {
    pub id: String,
    pub discount_percentage: i32,
    pub ends_at: NaiveDateTime,
}

#[derive(Serialize, Clone, Debug)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub offer: Option<RunningOfferSummary>,
    pub effective_price: BigDecimal,
}

impl From<ProductListing> for ProductView {
    fn from(listing: ProductListing) -> Self {
        let offer = match (
            listing.offer_id,
            listing.offer_discount_percentage,
            listing.offer_ends_at,
        ) {
            (Some(id), Some(discount_percentage), Some(ends_at)) => Some(RunningOfferSummary {
                id,
                discount_percentage,
                ends_at,
            }),
            _ => None,
        };

        let effective_price = offer::service::effective_price(
            &listing.product.price,
            offer.as_ref().map(|offer| offer.discount_percentage),
        );

        Self {
            product: listing.product,
            offer,
            effective_price,
        }
    }
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

const LISTING_SELECT: &str = "
    SELECT
        products.*,
        running.id AS offer_id,
        running.discount_percentage AS offer_discount_percentage,
        running.ends_at AS offer_ends_at
    FROM
        products
        JOIN restaurants ON restaurants.id = products.restaurant_id
        LEFT JOIN LATERAL (
            SELECT id, discount_percentage, ends_at FROM offers
            WHERE
                offers.product_id = products.id
                AND offers.is_active = TRUE
                AND offers.starts_at <= (NOW() AT TIME ZONE 'UTC')
                AND offers.ends_at > (NOW() AT TIME ZONE 'UTC')
            ORDER BY offers.discount_percentage DESC
            LIMIT 1
        ) running ON TRUE
";

const VISIBLE_CONDITION: &str = "
    products.is_active = TRUE
    AND products.is_deleted = FALSE
    AND restaurants.is_active = TRUE
    AND restaurants.is_deleted = FALSE
";

pub struct CreateProductPayload {
    pub restaurant_id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: BigDecimal,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateProductPayload) -> Result<Product> {
    sqlx::query_as::<_, Product>(
        "
        INSERT INTO products (
            id,
            restaurant_id,
            category_id,
            name,
            description,
            image,
            price
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.restaurant_id.clone())
    .bind(payload.category_id)
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.image)
    .bind(payload.price)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating a product for restaurant {}: {}",
            payload.restaurant_id,
            err
        );
        Error::UnexpectedError
    })
}

/// A non-deleted product of the given restaurant.
pub async fn find_owned<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    restaurant_id: String,
) -> Result<Option<Product>> {
    sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = $1 AND restaurant_id = $2 AND is_deleted = FALSE",
    )
    .bind(id.clone())
    .bind(restaurant_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching product {}: {}", id, err);
        Error::UnexpectedError
    })
}

/// Locks the product row for the rest of the transaction.
pub async fn lock_by_id(conn: &mut PgConnection, id: String) -> Result<()> {
    sqlx::query("SELECT id FROM products WHERE id = $1 FOR UPDATE")
        .bind(id.clone())
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while locking product {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_listing_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
) -> Result<Option<ProductListing>> {
    let sql = format!(
        "{} WHERE products.id = $1 AND {}",
        LISTING_SELECT, VISIBLE_CONDITION
    );

    sqlx::query_as::<_, ProductListing>(&sql)
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching product {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_listings_by_ids<'e, E: PgExecutor<'e>>(
    e: E,
    ids: Vec<String>,
) -> Result<Vec<ProductListing>> {
    let sql = format!(
        "{} WHERE products.id = ANY($1) AND {}",
        LISTING_SELECT, VISIBLE_CONDITION
    );

    sqlx::query_as::<_, ProductListing>(&sql)
        .bind(ids)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching products by ids: {}", err);
            Error::UnexpectedError
        })
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub restaurant_id: Option<String>,
    pub category_id: Option<String>,
    pub search: Option<String>,
}

const FILTER_CONDITION: &str = "
    ($1::TEXT IS NULL OR products.restaurant_id = $1)
    AND ($2::TEXT IS NULL OR products.category_id = $2)
    AND ($3::TEXT IS NULL OR products.name ILIKE CONCAT('%', $3, '%'))
";

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
    filters: Filters,
) -> Result<Paginated<ProductListing>> {
    let items_sql = format!(
        "{} WHERE {} AND {} ORDER BY products.created_at DESC LIMIT $4 OFFSET $5",
        LISTING_SELECT, VISIBLE_CONDITION, FILTER_CONDITION
    );
    let count_sql = format!(
        "
        SELECT COUNT(*) FROM products
        JOIN restaurants ON restaurants.id = products.restaurant_id
        WHERE {} AND {}
        ",
        VISIBLE_CONDITION, FILTER_CONDITION
    );

    let products = sqlx::query_as::<_, ProductListing>(&items_sql)
        .bind(filters.restaurant_id.clone())
        .bind(filters.category_id.clone())
        .bind(filters.search.clone())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch many products: {}", err);
            Error::UnexpectedError
        })?;

    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(filters.restaurant_id)
        .bind(filters.category_id)
        .bind(filters.search)
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to count products: {}", err);
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(products, total, &pagination))
}

pub async fn find_favorites<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    customer_id: String,
    pagination: Pagination,
) -> Result<Paginated<ProductListing>> {
    let items_sql = format!(
        "
        {}
        JOIN favorites ON favorites.product_id = products.id
        WHERE favorites.customer_id = $1 AND {}
        ORDER BY favorites.created_at DESC
        LIMIT $2 OFFSET $3
        ",
        LISTING_SELECT, VISIBLE_CONDITION
    );
    let count_sql = format!(
        "
        SELECT COUNT(*) FROM products
        JOIN restaurants ON restaurants.id = products.restaurant_id
        JOIN favorites ON favorites.product_id = products.id
        WHERE favorites.customer_id = $1 AND {}
        ",
        VISIBLE_CONDITION
    );

    let products = sqlx::query_as::<_, ProductListing>(&items_sql)
        .bind(customer_id.clone())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching favorites of {}: {}",
                customer_id,
                err
            );
            Error::UnexpectedError
        })?;

    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(customer_id.clone())
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while counting favorites of {}: {}",
                customer_id,
                err
            );
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(products, total, &pagination))
}

pub async fn find_many_by_section_id<'e, E: PgExecutor<'e>>(
    e: E,
    section_id: String,
) -> Result<Vec<ProductListing>> {
    let sql = format!(
        "
        {}
        JOIN section_products ON section_products.product_id = products.id
        WHERE section_products.section_id = $1 AND {}
        ORDER BY section_products.position ASC
        ",
        LISTING_SELECT, VISIBLE_CONDITION
    );

    sqlx::query_as::<_, ProductListing>(&sql)
        .bind(section_id.clone())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching products of section {}: {}",
                section_id,
                err
            );
            Error::UnexpectedError
        })
}

pub struct UpdateProductPayload {
    pub category_id: Option<String>,
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
    payload: UpdateProductPayload,
) -> Result<Option<Product>> {
    sqlx::query_as::<_, Product>(
        "
        UPDATE products SET
            category_id = COALESCE($1, category_id),
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            image = COALESCE($4, image),
            price = COALESCE($5, price),
            is_active = COALESCE($6, is_active),
            updated_at = NOW()
        WHERE
            id = $7
            AND restaurant_id = $8
            AND is_deleted = FALSE
        RETURNING *
        ",
    )
    .bind(payload.category_id)
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
        tracing::error!("Error occurred while updating product {}: {}", id, err);
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
        UPDATE products SET
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
        tracing::error!("Error occurred while deleting product {}: {}", id, err);
        Error::UnexpectedError
    })
}

/// Replaces the addon set of a product. Run inside a transaction.
pub async fn set_addons(
    conn: &mut PgConnection,
    product_id: String,
    addon_ids: Vec<String>,
) -> Result<()> {
    sqlx::query("DELETE FROM product_addons WHERE product_id = $1")
        .bind(product_id.clone())
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while clearing addons of product {}: {}",
                product_id,
                err
            );
            Error::UnexpectedError
        })?;

    sqlx::query(
        "
        INSERT INTO product_addons (product_id, addon_id)
        SELECT $1, UNNEST($2::TEXT[])
        ",
    )
    .bind(product_id.clone())
    .bind(addon_ids)
    .execute(&mut *conn)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!(
            "Error occurred while attaching addons to product {}: {}",
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
        SELECT COUNT(*) FROM products
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
            "Error occurred while counting products of restaurant {}: {}",
            restaurant_id,
            err
        );
        Error::UnexpectedError
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn listing(discount: Option<i32>) -> ProductListing {
        let now = Utc::now().naive_utc();
        ProductListing {
            product: Product {
                id: "product".to_string(),
                restaurant_id: "restaurant".to_string(),
                category_id: None,
                name: "Jollof rice".to_string(),
                description: String::new(),
                image: None,
                price: BigDecimal::from_str("2500").unwrap(),
                is_active: true,
                is_deleted: false,
                created_at: now,
                updated_at: None,
            },
            offer_id: discount.map(|_| "offer".to_string()),
            offer_discount_percentage: discount,
            offer_ends_at: discount.map(|_| now),
        }
    }

    #[test]
    fn view_without_offer_keeps_the_listed_price() {
        let view = ProductView::from(listing(None));

        assert!(view.offer.is_none());
        assert_eq!(view.effective_price, BigDecimal::from_str("2500.00").unwrap());
    }

    #[test]
    fn view_with_running_offer_is_discounted() {
        let view = ProductView::from(listing(Some(20)));

        assert_eq!(view.offer.map(|offer| offer.discount_percentage), Some(20));
        assert_eq!(view.effective_price, BigDecimal::from_str("2000.00").unwrap());
    }

    #[test]
    fn view_flattens_the_product_fields() {
        let value = serde_json::to_value(ProductView::from(listing(Some(10)))).unwrap();

        assert_eq!(value["name"], "Jollof rice");
        assert_eq!(value["offer"]["discount_percentage"], 10);
        assert!(value.get("product").is_none());
    }
}
