use super::repository::{Order, OrderStatus, PaymentMethod};
use crate::{
    modules::{
        delivery_man, restaurant,
        user::repository::{Role, User},
    },
    utils::money,
};
use bigdecimal::BigDecimal;
use sqlx::PgExecutor;

/// How the acting user relates to an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Customer,
    Restaurant,
    DeliveryMan,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

/// `None` when the user has nothing to do with the order.
pub async fn resolve_actor<'e, E: PgExecutor<'e>>(
    e: E,
    user: &User,
    order: &Order,
) -> Result<Option<Actor>, Error> {
    match user.role {
        Role::Admin => Ok(Some(Actor::Admin)),
        Role::Customer => Ok((order.customer_id == user.id).then_some(Actor::Customer)),
        Role::Restaurant => {
            let restaurant = restaurant::repository::find_by_owner_id(e, user.id.clone())
                .await
                .map_err(|_| Error::UnexpectedError)?;

            Ok(restaurant
                .filter(|restaurant| restaurant.id == order.restaurant_id)
                .map(|_| Actor::Restaurant))
        }
        Role::DeliveryMan => {
            let delivery_man = delivery_man::repository::find_by_user_id(e, user.id.clone())
                .await
                .map_err(|_| Error::UnexpectedError)?;

            Ok(delivery_man
                .filter(|delivery_man| order.delivery_man_id.as_ref() == Some(&delivery_man.id))
                .map(|_| Actor::DeliveryMan))
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TransitionError {
    NotAllowed,
    PaymentRequired,
}

pub fn transition(actor: Actor, order: &Order, to: OrderStatus) -> Result<(), TransitionError> {
    use Actor::*;
    use OrderStatus::*;

    match (actor, order.status, to) {
        (Restaurant | Admin, Pending, Accepted) => {
            if order.payment_method == PaymentMethod::Online && !order.is_paid {
                return Err(TransitionError::PaymentRequired);
            }
            Ok(())
        }
        (Restaurant | Admin, Pending, Denied)
        | (Restaurant | Admin, Accepted, Completed)
        | (Customer | Admin, Pending, Cancelled)
        | (DeliveryMan, Completed, Shipping)
        | (DeliveryMan, Shipping, Shipped) => Ok(()),
        _ => Err(TransitionError::NotAllowed),
    }
}

/// Closing statuses that give a paid order's money back to the customer.
pub fn refunds(to: OrderStatus) -> bool {
    matches!(to, OrderStatus::Denied | OrderStatus::Cancelled)
}

/// What the restaurant keeps of the sub-total once the platform commission is taken.
pub fn restaurant_share(sub_total: &BigDecimal, commission_percentage: &BigDecimal) -> BigDecimal {
    money::percentage_of(sub_total, &(BigDecimal::from(100) - commission_percentage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn order(status: OrderStatus, payment_method: PaymentMethod, is_paid: bool) -> Order {
        Order {
            id: "order".to_string(),
            customer_id: "customer".to_string(),
            restaurant_id: "restaurant".to_string(),
            delivery_man_id: None,
            delivery_address: "12 Marina Road".to_string(),
            delivery_latitude: None,
            delivery_longitude: None,
            status,
            payment_method,
            is_paid,
            sub_total: BigDecimal::from(2000),
            delivery_fee: BigDecimal::from(500),
            service_fee: BigDecimal::from(100),
            total: BigDecimal::from(2600),
            note: None,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn restaurant_drives_the_kitchen_side() {
        let pending = order(OrderStatus::Pending, PaymentMethod::Cash, false);
        let accepted = order(OrderStatus::Accepted, PaymentMethod::Cash, false);

        assert_eq!(transition(Actor::Restaurant, &pending, OrderStatus::Accepted), Ok(()));
        assert_eq!(transition(Actor::Restaurant, &pending, OrderStatus::Denied), Ok(()));
        assert_eq!(transition(Actor::Restaurant, &accepted, OrderStatus::Completed), Ok(()));
        assert_eq!(
            transition(Actor::Restaurant, &pending, OrderStatus::Cancelled),
            Err(TransitionError::NotAllowed)
        );
        assert_eq!(
            transition(Actor::Restaurant, &accepted, OrderStatus::Shipping),
            Err(TransitionError::NotAllowed)
        );
    }

    #[test]
    fn unpaid_online_orders_cannot_be_accepted() {
        let unpaid = order(OrderStatus::Pending, PaymentMethod::Online, false);
        let paid = order(OrderStatus::Pending, PaymentMethod::Online, true);

        assert_eq!(
            transition(Actor::Restaurant, &unpaid, OrderStatus::Accepted),
            Err(TransitionError::PaymentRequired)
        );
        assert_eq!(transition(Actor::Admin, &paid, OrderStatus::Accepted), Ok(()));
    }

    #[test]
    fn customers_only_cancel_pending_orders() {
        let pending = order(OrderStatus::Pending, PaymentMethod::Wallet, true);
        let accepted = order(OrderStatus::Accepted, PaymentMethod::Wallet, true);

        assert_eq!(transition(Actor::Customer, &pending, OrderStatus::Cancelled), Ok(()));
        assert_eq!(
            transition(Actor::Customer, &accepted, OrderStatus::Cancelled),
            Err(TransitionError::NotAllowed)
        );
        assert_eq!(
            transition(Actor::Customer, &pending, OrderStatus::Accepted),
            Err(TransitionError::NotAllowed)
        );
    }

    #[test]
    fn delivery_men_move_orders_out_the_door() {
        let completed = order(OrderStatus::Completed, PaymentMethod::Cash, false);
        let shipping = order(OrderStatus::Shipping, PaymentMethod::Cash, false);

        assert_eq!(transition(Actor::DeliveryMan, &completed, OrderStatus::Shipping), Ok(()));
        assert_eq!(transition(Actor::DeliveryMan, &shipping, OrderStatus::Shipped), Ok(()));
        assert_eq!(
            transition(Actor::DeliveryMan, &completed, OrderStatus::Shipped),
            Err(TransitionError::NotAllowed)
        );
        assert_eq!(
            transition(Actor::Admin, &shipping, OrderStatus::Shipped),
            Err(TransitionError::NotAllowed)
        );
    }

    #[test]
    fn shipped_orders_are_final() {
        let shipped = order(OrderStatus::Shipped, PaymentMethod::Cash, true);

        for to in [
            OrderStatus::Pending,
            OrderStatus::Cancelled,
            OrderStatus::Denied,
            OrderStatus::Shipping,
        ] {
            for actor in [Actor::Admin, Actor::Customer, Actor::Restaurant, Actor::DeliveryMan] {
                assert_eq!(
                    transition(actor, &shipped, to),
                    Err(TransitionError::NotAllowed)
                );
            }
        }
    }

    #[test]
    fn commission_is_taken_from_the_sub_total() {
        assert_eq!(
            restaurant_share(&BigDecimal::from(2000), &BigDecimal::from(10)),
            BigDecimal::from_str("1800.00").unwrap()
        );
        assert_eq!(
            restaurant_share(
                &BigDecimal::from_str("1234.56").unwrap(),
                &BigDecimal::from_str("12.5").unwrap()
            ),
            BigDecimal::from_str("1080.24").unwrap()
        );
    }

    #[test]
    fn only_closing_statuses_refund() {
        assert!(refunds(OrderStatus::Denied));
        assert!(refunds(OrderStatus::Cancelled));
        assert!(!refunds(OrderStatus::Shipped));
    }
}
