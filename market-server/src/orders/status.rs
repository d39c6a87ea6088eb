//! Order State Machine
//!
//! `pending` is the initial state; `paid` is the checkpoint between payment
//! and fulfilment; `completed` and `cancelled` are terminal.
//!
//! ```text
//! pending ──► paid ──► completed
//!    │          │
//!    └──────────┴────► cancelled
//! ```
//!
//! (`pending -> completed` directly is also allowed for counter sales that
//! settle out of band.)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::AppError;

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid | Completed | Cancelled) | (Paid, Completed | Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(AppError::Validation(format!("Invalid status: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Completed));
        assert!(Paid.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        use OrderStatus::*;
        for next in [Pending, Paid, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_self_or_backward_transitions() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Paid.can_transition_to(Paid));
    }

    #[test]
    fn test_parse() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("paid".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
    }
}
