use super::repository::{self, CartItem};
use crate::{
    modules::{
        addon, combo, config,
        config::repository::Config,
        order::repository::OrderItemAddon,
        product::repository::ProductView,
        product,
        restaurant::{self, repository::Restaurant},
    },
    types::Context,
    utils::money,
};
use bigdecimal::BigDecimal;
use itertools::Itertools;
use serde::Serialize;
use sqlx::PgConnection;
use std::collections::HashMap;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[derive(Serialize, Clone, Debug)]
pub struct PricedLine {
    pub item_id: String,
    pub product_id: Option<String>,
    pub combo_id: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub addons: Vec<OrderItemAddon>,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
    pub note: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Quote {
    pub sub_total: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub service_fee: BigDecimal,
    pub total: BigDecimal,
}

impl Quote {
    pub fn empty() -> Self {
        let zero = money::round(&BigDecimal::from(0));
        Self {
            sub_total: zero.clone(),
            delivery_fee: zero.clone(),
            service_fee: zero.clone(),
            total: zero,
        }
    }
}

/// Cart lines priced against the current catalogue.
#[derive(Serialize, Clone, Debug)]
pub struct Resolved {
    pub lines: Vec<PricedLine>,
    /// Items whose product, combo or addons can no longer be ordered.
    pub unavailable_item_ids: Vec<String>,
}

pub fn normalize_addon_ids(addon_ids: Vec<String>) -> Vec<String> {
    addon_ids.into_iter().sorted().dedup().collect()
}

pub fn unit_price(base: &BigDecimal, addons: &[OrderItemAddon]) -> BigDecimal {
    let addons_total = addons
        .iter()
        .fold(BigDecimal::from(0), |acc, addon| acc + &addon.price);

    money::round(&(base + addons_total))
}

pub fn line_total(unit_price: &BigDecimal, quantity: i32) -> BigDecimal {
    money::round(&(unit_price * BigDecimal::from(quantity)))
}

pub fn quote(lines: &[PricedLine], config: &Config) -> Quote {
    if lines.is_empty() {
        return Quote::empty();
    }

    let sub_total = money::round(
        &lines
            .iter()
            .fold(BigDecimal::from(0), |acc, line| acc + &line.line_total),
    );
    let delivery_fee = money::round(&config.delivery_fee);
    let service_fee = money::round(&config.service_fee);
    let total = money::round(&(&sub_total + &delivery_fee + &service_fee));

    Quote {
        sub_total,
        delivery_fee,
        service_fee,
        total,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CheckoutError {
    EmptyCart,
    NotAcceptingOrders,
    RestaurantUnavailable,
    BelowMinimum,
}

pub fn check_checkout(
    quote: &Quote,
    line_count: usize,
    restaurant: &Restaurant,
    config: &Config,
) -> Result<(), CheckoutError> {
    if line_count == 0 {
        return Err(CheckoutError::EmptyCart);
    }

    if !config.is_accepting_orders {
        return Err(CheckoutError::NotAcceptingOrders);
    }

    if !restaurant::repository::is_accepting_orders(restaurant) {
        return Err(CheckoutError::RestaurantUnavailable);
    }

    if quote.sub_total < config.minimum_order_amount {
        return Err(CheckoutError::BelowMinimum);
    }

    Ok(())
}

pub async fn resolve(conn: &mut PgConnection, items: Vec<CartItem>) -> Result<Resolved, Error> {
    let product_ids = items
        .iter()
        .filter_map(|item| item.product_id.clone())
        .unique()
        .collect::<Vec<_>>();
    let combo_ids = items
        .iter()
        .filter_map(|item| item.combo_id.clone())
        .unique()
        .collect::<Vec<_>>();

    let products = product::repository::find_listings_by_ids(&mut *conn, product_ids)
        .await
        .map_err(|_| Error::UnexpectedError)?
        .into_iter()
        .map(|listing| (listing.product.id.clone(), ProductView::from(listing)))
        .collect::<HashMap<_, _>>();

    let combos = combo::repository::find_visible_by_ids(&mut *conn, combo_ids)
        .await
        .map_err(|_| Error::UnexpectedError)?
        .into_iter()
        .map(|combo| (combo.id.clone(), combo))
        .collect::<HashMap<_, _>>();

    let mut resolved = Resolved {
        lines: vec![],
        unavailable_item_ids: vec![],
    };

    for item in items {
        let line = match (&item.product_id, &item.combo_id) {
            (Some(product_id), None) => {
                let Some(view) = products.get(product_id) else {
                    resolved.unavailable_item_ids.push(item.id);
                    continue;
                };

                let addons = addon::repository::find_attached(
                    &mut *conn,
                    product_id.clone(),
                    item.addon_ids.clone(),
                )
                .await
                .map_err(|_| Error::UnexpectedError)?;

                if addons.len() != item.addon_ids.len() {
                    resolved.unavailable_item_ids.push(item.id);
                    continue;
                }

                let addons = addons
                    .into_iter()
                    .sorted_by(|a, b| a.id.cmp(&b.id))
                    .map(|addon| OrderItemAddon {
                        id: addon.id,
                        name: addon.name,
                        price: addon.price,
                    })
                    .collect::<Vec<_>>();

                let unit_price = unit_price(&view.effective_price, &addons);

                PricedLine {
                    item_id: item.id,
                    product_id: Some(product_id.clone()),
                    combo_id: None,
                    name: view.product.name.clone(),
                    image: view.product.image.clone(),
                    quantity: item.quantity,
                    line_total: line_total(&unit_price, item.quantity),
                    unit_price,
                    addons,
                    note: item.note,
                }
            }
            (None, Some(combo_id)) => {
                let Some(combo) = combos.get(combo_id) else {
                    resolved.unavailable_item_ids.push(item.id);
                    continue;
                };

                let unit_price = unit_price(&combo.price, &[]);

                PricedLine {
                    item_id: item.id,
                    product_id: None,
                    combo_id: Some(combo_id.clone()),
                    name: combo.name.clone(),
                    image: combo.image.clone(),
                    quantity: item.quantity,
                    line_total: line_total(&unit_price, item.quantity),
                    unit_price,
                    addons: vec![],
                    note: item.note,
                }
            }
            _ => {
                tracing::error!("Cart item {} has neither or both of product and combo", item.id);
                resolved.unavailable_item_ids.push(item.id);
                continue;
            }
        };

        resolved.lines.push(line);
    }

    Ok(resolved)
}

#[derive(Serialize, Clone, Debug)]
pub struct CartView {
    pub restaurant_id: Option<String>,
    pub items: Vec<PricedLine>,
    pub unavailable_item_ids: Vec<String>,
    pub quote: Quote,
}

/// The customer's cart as shown to them, priced with today's fees.
pub async fn view(ctx: &Context, customer_id: String) -> Result<CartView, Error> {
    let Some(cart) = repository::find_by_customer_id(&ctx.db_conn.pool, customer_id)
        .await
        .map_err(|_| Error::UnexpectedError)?
    else {
        return Ok(CartView {
            restaurant_id: None,
            items: vec![],
            unavailable_item_ids: vec![],
            quote: Quote::empty(),
        });
    };

    let items = repository::find_items_by_cart_id(&ctx.db_conn.pool, cart.id)
        .await
        .map_err(|_| Error::UnexpectedError)?;

    let config = config::repository::get(&ctx.db_conn.pool)
        .await
        .map_err(|_| Error::UnexpectedError)?;

    let mut conn = ctx.db_conn.pool.acquire().await.map_err(|err| {
        tracing::error!("Failed to acquire a database connection: {}", err);
        Error::UnexpectedError
    })?;

    let resolved = resolve(&mut conn, items).await?;

    Ok(CartView {
        restaurant_id: cart.restaurant_id,
        quote: quote(&resolved.lines, &config),
        items: resolved.lines,
        unavailable_item_ids: resolved.unavailable_item_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    fn config() -> Config {
        Config {
            id: 1,
            delivery_fee: dec("500"),
            service_fee: dec("100"),
            commission_percentage: dec("10"),
            minimum_order_amount: dec("1500"),
            max_warnings: 3,
            is_accepting_orders: true,
            updated_at: None,
        }
    }

    fn restaurant(is_open: bool, is_active: bool) -> Restaurant {
        Restaurant {
            id: "restaurant".to_string(),
            owner_id: "owner".to_string(),
            name: "Mama Put".to_string(),
            description: String::new(),
            logo: None,
            address: "4 Allen Avenue".to_string(),
            phone_number: None,
            is_open,
            is_active,
            rating: dec("0"),
            rating_count: 0,
            is_deleted: false,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    fn line(unit: &str, quantity: i32) -> PricedLine {
        let unit_price = dec(unit);
        PricedLine {
            item_id: "item".to_string(),
            product_id: Some("product".to_string()),
            combo_id: None,
            name: "Suya".to_string(),
            image: None,
            quantity,
            line_total: line_total(&unit_price, quantity),
            unit_price,
            addons: vec![],
            note: None,
        }
    }

    fn addon(price: &str) -> OrderItemAddon {
        OrderItemAddon {
            id: "addon".to_string(),
            name: "Extra pepper".to_string(),
            price: dec(price),
        }
    }

    #[test]
    fn addon_sets_are_sorted_and_deduplicated() {
        let ids = vec!["c", "a", "b", "a"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        assert_eq!(normalize_addon_ids(ids), vec!["a", "b", "c"]);
        assert!(normalize_addon_ids(vec![]).is_empty());
    }

    #[test]
    fn unit_price_includes_every_addon() {
        assert_eq!(
            unit_price(&dec("1200"), &[addon("150"), addon("49.99")]),
            dec("1399.99")
        );
        assert_eq!(unit_price(&dec("1200"), &[]), dec("1200.00"));
    }

    #[test]
    fn quote_adds_flat_fees_to_the_sub_total() {
        let quote = quote(&[line("1000", 2), line("250.50", 1)], &config());

        assert_eq!(quote.sub_total, dec("2250.50"));
        assert_eq!(quote.delivery_fee, dec("500.00"));
        assert_eq!(quote.service_fee, dec("100.00"));
        assert_eq!(quote.total, dec("2850.50"));
    }

    #[test]
    fn empty_cart_quotes_nothing() {
        let quote = quote(&[], &config());

        assert_eq!(quote.total, dec("0"));
        assert_eq!(quote.delivery_fee, dec("0"));
    }

    #[test]
    fn checkout_guards() {
        let config = config();
        let enough = quote(&[line("2000", 1)], &config);
        let too_little = quote(&[line("1000", 1)], &config);

        assert_eq!(
            check_checkout(&enough, 0, &restaurant(true, true), &config),
            Err(CheckoutError::EmptyCart)
        );
        assert_eq!(
            check_checkout(&enough, 1, &restaurant(false, true), &config),
            Err(CheckoutError::RestaurantUnavailable)
        );
        assert_eq!(
            check_checkout(&enough, 1, &restaurant(true, false), &config),
            Err(CheckoutError::RestaurantUnavailable)
        );
        assert_eq!(
            check_checkout(&too_little, 1, &restaurant(true, true), &config),
            Err(CheckoutError::BelowMinimum)
        );
        assert_eq!(
            check_checkout(&enough, 1, &restaurant(true, true), &config),
            Ok(())
        );
    }

    #[test]
    fn paused_platform_refuses_checkout() {
        let config = Config {
            is_accepting_orders: false,
            ..config()
        };
        let quote = quote(&[line("2000", 1)], &config);

        assert_eq!(
            check_checkout(&quote, 1, &restaurant(true, true), &config),
            Err(CheckoutError::NotAcceptingOrders)
        );
    }
}
