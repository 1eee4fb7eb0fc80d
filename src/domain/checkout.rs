use crate::domain::draft::PaymentForm;
use crate::error::{CoreError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ISO 4217 currency code: exactly 3 letters, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_uppercase()))
        } else {
            Err(CoreError::Validation(
                "currency code must be 3 letters (e.g. NGN)".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated request for the external checkout.
///
/// Construction is the only validation point: once a request exists its
/// email is non-empty, its amount positive, its currency well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    email: String,
    amount_major: Decimal,
    currency: CurrencyCode,
    reference: Option<String>,
}

impl CheckoutRequest {
    pub fn new(
        email: &str,
        amount_major: Decimal,
        currency: &str,
        reference: Option<String>,
    ) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CoreError::Validation(
                "email is required for online payment".to_string(),
            ));
        }
        if amount_major <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "payment amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            email: email.to_string(),
            amount_major,
            currency: CurrencyCode::new(currency)?,
            reference,
        })
    }

    /// Builds a request from the draft's payment form. Rejected input never
    /// reaches the network.
    pub fn from_form(form: &PaymentForm) -> Result<Self> {
        let amount = form
            .amount
            .trim()
            .parse::<Decimal>()
            .map_err(|_| CoreError::Validation("enter a valid payment amount".to_string()))?;
        Self::new(&form.email, amount, &form.currency, None)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn amount_major(&self) -> Decimal {
        self.amount_major
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// The processor takes integer minor units (kobo, cents).
    pub fn amount_minor(&self) -> i64 {
        (self.amount_major * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Callers needing strict uniqueness supply their own reference.
    pub fn reference_or_generate(&self) -> String {
        self.reference
            .clone()
            .unwrap_or_else(|| format!("ORD-{}", Uuid::new_v4().simple()))
    }

    pub fn prepare(&self) -> PreparedCheckout {
        PreparedCheckout {
            email: self.email.clone(),
            amount_minor: self.amount_minor(),
            currency: self.currency.as_str().to_string(),
            reference: self.reference_or_generate(),
        }
    }
}

/// What actually crosses the wire to the payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedCheckout {
    pub email: String,
    pub amount_minor: i64,
    pub currency: String,
    pub reference: String,
}

/// Terminal outcome of one checkout invocation. All three return control
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Success { transaction_ref: String },
    Cancelled,
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_validation() {
        assert_eq!(CurrencyCode::new("ngn").unwrap().as_str(), "NGN");
        assert!(CurrencyCode::new("US").is_err());
        assert!(CurrencyCode::new("NGNN").is_err());
        assert!(CurrencyCode::new("N1N").is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(CheckoutRequest::new("a@b.com", dec!(10.00), "NGN", None).is_ok());
        assert!(matches!(
            CheckoutRequest::new("", dec!(10.00), "NGN", None),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            CheckoutRequest::new("a@b.com", dec!(0), "NGN", None),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            CheckoutRequest::new("a@b.com", dec!(-5), "NGN", None),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_minor_unit_conversion() {
        let request = CheckoutRequest::new("a@b.com", dec!(19.99), "NGN", None).unwrap();
        assert_eq!(request.amount_minor(), 1999);

        let request = CheckoutRequest::new("a@b.com", dec!(0.005), "NGN", None).unwrap();
        assert_eq!(request.amount_minor(), 1);
    }

    #[test]
    fn test_reference_handling() {
        let supplied =
            CheckoutRequest::new("a@b.com", dec!(1), "NGN", Some("MY-REF".to_string())).unwrap();
        assert_eq!(supplied.reference_or_generate(), "MY-REF");

        let generated = CheckoutRequest::new("a@b.com", dec!(1), "NGN", None).unwrap();
        assert!(generated.reference_or_generate().starts_with("ORD-"));
    }

    #[test]
    fn test_from_form() {
        let form = PaymentForm {
            email: "a@b.com".to_string(),
            amount: "19.99".to_string(),
            currency: "NGN".to_string(),
        };
        let request = CheckoutRequest::from_form(&form).unwrap();
        assert_eq!(request.amount_minor(), 1999);

        let bad_amount = PaymentForm {
            amount: "abc".to_string(),
            ..form.clone()
        };
        assert!(CheckoutRequest::from_form(&bad_amount).is_err());

        let zero = PaymentForm {
            amount: "0".to_string(),
            ..form
        };
        assert!(CheckoutRequest::from_form(&zero).is_err());
    }
}
