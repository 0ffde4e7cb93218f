use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use thiserror::Error;

const CENTS_PER_UNIT: i64 = 100;
const DECIMAL_PLACES: usize = 2;

/// Store a currency amount.
/// It is using internally an i64 count of cents in order to avoid floating point rounding error.
/// The Amount precision is two places past the decimal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    store: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount parsing error: {0}")]
    Parse(String),

    #[error("Overflow error while creating Amount")]
    Overflow,

    #[error("Underflow error while creating Amount")]
    Underflow,
}

impl Amount {
    pub fn new() -> Self {
        Amount { store: 0 }
    }

    pub fn from_cents(cents: i64) -> Self {
        Amount { store: cents }
    }

    pub fn cents(&self) -> i64 {
        self.store
    }

    pub fn is_zero(&self) -> bool {
        self.store == 0
    }

    pub fn is_positive(&self) -> bool {
        self.store > 0
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.store.checked_add(other.store) {
            Some(total) => Ok(Amount { store: total }),
            None => Err(AmountError::Overflow)?,
        }
    }

    pub fn sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.store.checked_sub(other.store) {
            Some(total) => Ok(Amount { store: total }),
            None => Err(AmountError::Underflow)?,
        }
    }
}

fn parse_i64(s: &str, original: &str) -> Result<i64, AmountError> {
    s.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => AmountError::Overflow,
        _ => AmountError::Parse(original.into()),
    })
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(AmountError::Parse(s.into()))?
        }

        let (left_part, decimal_part) = match s.split_once('.') {
            Some((left, dec)) => (left, Some(dec)),
            None => (s, None),
        };

        // Checking if integer part is empty (ex: ".05")
        let left_str = match left_part {
            "" => "0",
            "-" => "-0",
            other => other,
        };

        let total: i64 = match decimal_part {
            None => parse_i64(left_part, s)?
                .checked_mul(CENTS_PER_UNIT)
                .ok_or(AmountError::Overflow)?,
            Some(dec_str) => {
                // Sub-cent precision and extra '.' are both refused
                if dec_str.len() > DECIMAL_PLACES || !dec_str.chars().all(|c| c.is_ascii_digit()) {
                    Err(AmountError::Parse(s.into()))?
                }

                let combined = format!("{left_str}{dec_str:0<width$}", width = DECIMAL_PLACES);
                parse_i64(&combined, s)?
            }
        };

        Ok(Self { store: total })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.store;
        let negative = value < 0;
        let abs_val = value.unsigned_abs();

        let left_part = abs_val / CENTS_PER_UNIT as u64;
        let decimal_part = abs_val % CENTS_PER_UNIT as u64;

        if negative {
            write!(f, "-{}.{:02}", left_part, decimal_part)
        } else {
            write!(f, "{}.{:02}", left_part, decimal_part)
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Amount::from_str(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Amount, AmountError};
    use std::str::FromStr;

    #[test]
    fn test_that_valid_string_can_be_parsed() {
        let cases = [
            ("0", 0),
            ("0.", 0),
            (".0", 0),
            ("5", 500),
            ("5.1", 510),
            ("5.10", 510),
            (".05", 5),
            ("-.05", -5),
            ("-1.50", -150),
            ("05.05", 505),
            (" 2.00 ", 200),
        ];

        for (input, cents) in cases {
            let amount = Amount::from_str(input);
            assert_eq!(amount, Ok(Amount::from_cents(cents)), "input {input:?}");
        }
    }

    #[test]
    fn test_that_invalid_string_parsing_returns_error() {
        for input in ["test", "123.12test", "12test.12", "1 .1 2", "", "1.2.3", "0.005", "-"] {
            let amount = Amount::from_str(input);
            assert!(
                matches!(amount, Err(AmountError::Parse(_))),
                "input {input:?} gave {amount:?}"
            );
        }

        // Max i64, will be * 100
        let amount = Amount::from_str("9223372036854775807");
        assert_eq!(amount, Err(AmountError::Overflow));

        let amount = Amount::from_str("9223372036854775808.00");
        assert_eq!(amount, Err(AmountError::Overflow));
    }

    #[test]
    fn test_that_amount_is_displayed_with_two_decimals() {
        assert_eq!(Amount::new().to_string(), "0.00");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_cents(350).to_string(), "3.50");
        assert_eq!(Amount::from_cents(-150).to_string(), "-1.50");
        assert_eq!(Amount::from_cents(i64::MIN).to_string(), "-92233720368547758.08");
    }

    #[test]
    fn test_that_amount_can_be_added_and_substracted() {
        let a = Amount::from_str("200.12").unwrap();
        let b = Amount::from_str("100.03").unwrap();

        assert_eq!(a.add(&b).unwrap().to_string(), "300.15");
        assert_eq!(a.sub(&b).unwrap().to_string(), "100.09");
        assert_eq!(b.sub(&a).unwrap().to_string(), "-100.09");
    }

    #[test]
    fn test_that_overflow_and_underflow_return_error() {
        let max = Amount::from_cents(i64::MAX);
        let min = Amount::from_cents(i64::MIN);
        let one = Amount::from_cents(1);

        assert_eq!(max.add(&one), Err(AmountError::Overflow));
        assert_eq!(min.sub(&one), Err(AmountError::Underflow));
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Amount::from_cents(1).is_positive());
        assert!(!Amount::new().is_positive());
        assert!(Amount::new().is_zero());
        assert!(!Amount::from_cents(-1).is_positive());
    }
}
