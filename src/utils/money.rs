use bigdecimal::{BigDecimal, ToPrimitive};

/// Rounds to two decimal places, halves away from zero.
pub fn round(amount: &BigDecimal) -> BigDecimal {
    let half = BigDecimal::new(5.into(), 1);
    let hundred = BigDecimal::from(100);
    let scaled = amount * &hundred;

    let rounded = if scaled < BigDecimal::from(0) {
        (scaled - half).with_scale(0)
    } else {
        (scaled + half).with_scale(0)
    };

    (rounded / hundred).with_scale(2)
}

/// `amount × percentage / 100`, rounded.
pub fn percentage_of(amount: &BigDecimal, percentage: &BigDecimal) -> BigDecimal {
    round(&(amount * percentage / BigDecimal::from(100)))
}

/// `amount` reduced by `percentage` percent, rounded.
pub fn discounted(amount: &BigDecimal, percentage: i32) -> BigDecimal {
    let remaining = BigDecimal::from(100 - percentage.clamp(0, 100));
    percentage_of(amount, &remaining)
}

/// Minor currency units (kobo, cents) as the payment gateway expects them.
pub fn to_minor_units(amount: &BigDecimal) -> Option<i64> {
    (round(amount) * BigDecimal::from(100))
        .with_scale(0)
        .to_i64()
}

pub fn from_minor_units(amount: i64) -> BigDecimal {
    BigDecimal::new(amount.into(), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round(&dec("10.005")), dec("10.01"));
        assert_eq!(round(&dec("10.004")), dec("10.00"));
        assert_eq!(round(&dec("-3.335")), dec("-3.34"));
        assert_eq!(round(&dec("7")), dec("7.00"));
    }

    #[test]
    fn discounts_apply_to_the_listed_price() {
        assert_eq!(discounted(&dec("1000"), 15), dec("850.00"));
        assert_eq!(discounted(&dec("19.99"), 33), dec("13.39"));
        assert_eq!(discounted(&dec("19.99"), 100), dec("0.00"));
        assert_eq!(discounted(&dec("19.99"), 0), dec("19.99"));
    }

    #[test]
    fn commission_share() {
        assert_eq!(percentage_of(&dec("2500"), &dec("90")), dec("2250.00"));
        assert_eq!(percentage_of(&dec("33.33"), &dec("12.5")), dec("4.17"));
    }

    #[test]
    fn minor_units_round_trip_through_the_gateway() {
        assert_eq!(to_minor_units(&dec("1520.5")), Some(152050));
        assert_eq!(from_minor_units(152050), dec("1520.50"));
    }
}
