use crate::utils::money;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

/// `price × (100 − discount) / 100`, rounded to two places.
pub fn effective_price(price: &BigDecimal, discount_percentage: Option<i32>) -> BigDecimal {
    match discount_percentage {
        Some(discount) => money::discounted(price, discount),
        None => money::round(price),
    }
}

#[derive(Debug, PartialEq)]
pub enum WindowError {
    EndsBeforeStart,
    AlreadyEnded,
}

pub fn validate_window(
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), WindowError> {
    if ends_at <= starts_at {
        return Err(WindowError::EndsBeforeStart);
    }

    if ends_at <= now {
        return Err(WindowError::AlreadyEnded);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::str::FromStr;

    #[test]
    fn effective_price_applies_the_discount() {
        let price = BigDecimal::from_str("2500").unwrap();

        assert_eq!(
            effective_price(&price, Some(20)),
            BigDecimal::from_str("2000.00").unwrap()
        );
        assert_eq!(
            effective_price(&price, None),
            BigDecimal::from_str("2500.00").unwrap()
        );
        assert_eq!(
            effective_price(&BigDecimal::from_str("999.99").unwrap(), Some(15)),
            BigDecimal::from_str("849.99").unwrap()
        );
    }

    #[test]
    fn windows_must_end_after_they_start_and_in_the_future() {
        let now = Utc::now().naive_utc();

        assert_eq!(
            validate_window(now + Duration::hours(2), now + Duration::hours(1), now),
            Err(WindowError::EndsBeforeStart)
        );
        assert_eq!(
            validate_window(now - Duration::hours(2), now - Duration::hours(1), now),
            Err(WindowError::AlreadyEnded)
        );
        assert!(validate_window(now - Duration::hours(1), now + Duration::hours(1), now).is_ok());
    }
}
