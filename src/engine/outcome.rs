use crate::engine::Amount;
use std::fmt;
use thiserror::Error;

/// Why an operation was refused. The machine is left untouched in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Please insert money first")]
    NoFunds,

    #[error("Please select a product first")]
    NoSelection,

    #[error("Please wait, dispensing product")]
    DispenseInProgress,

    #[error("Cannot refund during dispensing")]
    RefundUnavailable,

    #[error("No money to refund")]
    NothingToRefund,

    #[error("Invalid product: {0}")]
    UnknownItem(String),

    #[error("Insufficient funds. Need ${shortfall} more")]
    InsufficientFunds { shortfall: Amount },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid product identifier")]
    InvalidItemId,

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("Balance limit exceeded")]
    BalanceOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    InvalidOperationForState,
    UnknownItem,
    InsufficientFunds,
    InvalidInput,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::InvalidOperationForState => "invalid_operation_for_state",
            RejectionKind::UnknownItem => "unknown_item",
            RejectionKind::InsufficientFunds => "insufficient_funds",
            RejectionKind::InvalidInput => "invalid_input",
        }
    }
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::NoFunds
            | Rejection::NoSelection
            | Rejection::DispenseInProgress
            | Rejection::RefundUnavailable
            | Rejection::NothingToRefund => RejectionKind::InvalidOperationForState,
            Rejection::UnknownItem(_) => RejectionKind::UnknownItem,
            Rejection::InsufficientFunds { .. } => RejectionKind::InsufficientFunds,
            Rejection::InvalidAmount(_)
            | Rejection::InvalidItemId
            | Rejection::MissingArgument(_)
            | Rejection::BalanceOverflow => RejectionKind::InvalidInput,
        }
    }
}

/// Result of one machine operation.
/// `Display` renders the human-readable outcome text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted { amount: Amount, total: Amount },
    Selected { item: String, price: Amount },
    Dispensed { item: String, change: Amount },
    Refunded { amount: Amount },
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(r) => Some(r),
            _ => None,
        }
    }

    /// "ok" or the rejection kind
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Rejected(r) => r.kind().as_str(),
            _ => "ok",
        }
    }
}

impl From<Rejection> for Outcome {
    fn from(rejection: Rejection) -> Self {
        Outcome::Rejected(rejection)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted { amount, total } => {
                write!(f, "${amount} inserted. Total: ${total}")
            }
            Outcome::Selected { item, price } => write!(f, "Selected {item}. Price: ${price}"),
            Outcome::Dispensed { item, change } => {
                write!(f, "Dispensing {item}")?;
                if change.is_positive() {
                    write!(f, "\nReturning change: ${change}")?;
                }
                Ok(())
            }
            Outcome::Refunded { amount } => write!(f, "Refunded ${amount}"),
            Outcome::Rejected(rejection) => write!(f, "{rejection}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_outcomes_render_text() {
        let inserted = Outcome::Inserted {
            amount: Amount::from_cents(50),
            total: Amount::from_cents(150),
        };
        assert_eq!(inserted.to_string(), "$0.50 inserted. Total: $1.50");

        let selected = Outcome::Selected {
            item: "cola".into(),
            price: Amount::from_cents(200),
        };
        assert_eq!(selected.to_string(), "Selected cola. Price: $2.00");

        let refunded = Outcome::Refunded {
            amount: Amount::from_cents(150),
        };
        assert_eq!(refunded.to_string(), "Refunded $1.50");
        assert_eq!(refunded.status(), "ok");
        assert!(refunded.rejection().is_none());
    }

    #[test]
    fn change_line_only_when_positive() {
        let exact = Outcome::Dispensed {
            item: "candy".into(),
            change: Amount::new(),
        };
        assert_eq!(exact.to_string(), "Dispensing candy");

        let with_change = Outcome::Dispensed {
            item: "cola".into(),
            change: Amount::from_cents(50),
        };
        assert_eq!(with_change.to_string(), "Dispensing cola\nReturning change: $0.50");
    }

    #[test]
    fn rejections_map_to_kinds() {
        let shortfall = Outcome::from(Rejection::InsufficientFunds {
            shortfall: Amount::from_cents(50),
        });
        assert!(!shortfall.is_accepted());
        assert_eq!(shortfall.to_string(), "Insufficient funds. Need $0.50 more");
        assert_eq!(shortfall.status(), "insufficient_funds");

        assert_eq!(Rejection::NoFunds.kind(), RejectionKind::InvalidOperationForState);
        assert_eq!(Rejection::NothingToRefund.kind(), RejectionKind::InvalidOperationForState);
        assert_eq!(Rejection::UnknownItem("water".into()).kind(), RejectionKind::UnknownItem);
        assert_eq!(Rejection::InvalidItemId.kind(), RejectionKind::InvalidInput);
        assert_eq!(Rejection::BalanceOverflow.kind(), RejectionKind::InvalidInput);
        assert_eq!(
            Rejection::MissingArgument("insert").to_string(),
            "Missing argument for insert"
        );
    }
}
