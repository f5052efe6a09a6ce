use axum::{http::StatusCode, Json};
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;
use validator::{Validate, ValidationError, ValidationErrors};

pub fn into_response(errors: ValidationErrors) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"errors": errors})))
}

pub fn validate<T: Validate>(payload: &T) -> Result<(), (StatusCode, Json<serde_json::Value>)> {
    payload.validate().map_err(into_response)
}

fn phone_number_regex() -> &'static Regex {
    static PHONE_NUMBER: OnceLock<Regex> = OnceLock::new();
    PHONE_NUMBER.get_or_init(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"))
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if phone_number_regex().is_match(phone_number) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone_number"))
    }
}

pub fn validate_money(amount: &bigdecimal::BigDecimal) -> Result<(), ValidationError> {
    if *amount < bigdecimal::BigDecimal::from(0) {
        return Err(ValidationError::new("negative_amount"));
    }

    Ok(())
}

pub fn validate_positive_money(amount: &bigdecimal::BigDecimal) -> Result<(), ValidationError> {
    if *amount <= bigdecimal::BigDecimal::from(0) {
        return Err(ValidationError::new("non_positive_amount"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn phone_numbers_accept_optional_plus_and_digits_only() {
        assert!(validate_phone_number("+2348012345678").is_ok());
        assert!(validate_phone_number("08012345678").is_ok());
        assert!(validate_phone_number("0801-234-5678").is_err());
        assert!(validate_phone_number("123").is_err());
        assert!(validate_phone_number("").is_err());
    }

    #[test]
    fn money_signs() {
        let zero = BigDecimal::from(0);
        let negative = BigDecimal::from_str("-0.01").unwrap();
        let positive = BigDecimal::from_str("12.50").unwrap();

        assert!(validate_money(&zero).is_ok());
        assert!(validate_money(&negative).is_err());
        assert!(validate_positive_money(&zero).is_err());
        assert!(validate_positive_money(&positive).is_ok());
    }
}
