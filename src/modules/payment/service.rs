use crate::{
    modules::{order::repository::Order, user::repository::User},
    types::Context,
    utils::{money, payment},
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderInvoiceMetadata {
    pub order_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TopupMetadata {
    pub user_id: String,
}

/// Attached to every gateway transaction so the webhook knows what was paid for.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Metadata {
    Order(OrderInvoiceMetadata),
    Topup(TopupMetadata),
}

#[derive(Debug)]
pub enum Error {
    InvalidAmount,
    UnexpectedError,
}

pub type Invoice = payment::InitializedTransaction;

fn reference(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new().to_string().to_lowercase())
}

async fn create_invoice(
    ctx: Arc<Context>,
    email: String,
    amount: &BigDecimal,
    reference: String,
    metadata: Metadata,
) -> Result<Invoice, Error> {
    let amount = money::to_minor_units(amount).ok_or(Error::InvalidAmount)?;

    payment::initialize_transaction(
        &ctx.payment,
        payment::InitializeTransactionPayload {
            email,
            amount,
            reference,
            metadata,
            callback_url: ctx.payment.callback_url.clone(),
        },
    )
    .await
    .map_err(|err| {
        tracing::error!("Failed to create payment invoice: {:?}", err);
        Error::UnexpectedError
    })
}

pub async fn create_order_invoice(
    ctx: Arc<Context>,
    order: &Order,
    customer: &User,
) -> Result<Invoice, Error> {
    create_invoice(
        ctx,
        customer.email.clone(),
        &order.total,
        reference("order"),
        Metadata::Order(OrderInvoiceMetadata {
            order_id: order.id.clone(),
        }),
    )
    .await
}

pub async fn create_topup_invoice(
    ctx: Arc<Context>,
    user: &User,
    amount: &BigDecimal,
) -> Result<Invoice, Error> {
    create_invoice(
        ctx,
        user.email.clone(),
        amount,
        reference("topup"),
        Metadata::Topup(TopupMetadata {
            user_id: user.id.clone(),
        }),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_is_told_apart_by_its_keys() {
        assert_eq!(
            serde_json::from_value::<Metadata>(json!({ "order_id": "o1" })).unwrap(),
            Metadata::Order(OrderInvoiceMetadata {
                order_id: "o1".to_string()
            })
        );
        assert_eq!(
            serde_json::from_value::<Metadata>(json!({ "user_id": "u1", "referrer": "x" }))
                .unwrap(),
            Metadata::Topup(TopupMetadata {
                user_id: "u1".to_string()
            })
        );
        assert!(serde_json::from_value::<Metadata>(json!({ "cart_id": "c1" })).is_err());
    }

    #[test]
    fn references_are_prefixed_and_unique() {
        let first = reference("order");
        assert!(first.starts_with("order_"));
        assert_ne!(first, reference("order"));
    }
}
