//! Status enums.

use serde::{Deserialize, Serialize};

/// Where a checkout session is in its lifecycle.
///
/// `Editing -> Submitting -> Complete`, with `Submitting -> Editing` when a
/// submission fails or is abandoned. `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    #[default]
    Editing,
    Submitting,
    Complete,
}

impl CheckoutStatus {
    /// Whether the submit action should be offered.
    #[must_use]
    pub const fn accepts_submit(self) -> bool {
        matches!(self, Self::Editing)
    }
}

impl std::fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editing => write!(f, "editing"),
            Self::Submitting => write!(f, "submitting"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for CheckoutStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editing" => Ok(Self::Editing),
            "submitting" => Ok(Self::Submitting),
            "complete" => Ok(Self::Complete),
            _ => Err(format!("invalid checkout status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for status in [
            CheckoutStatus::Editing,
            CheckoutStatus::Submitting,
            CheckoutStatus::Complete,
        ] {
            let json = serde_json::to_string(&status).unwrap_or_default();
            assert_eq!(json, format!("\"{status}\""));
            assert_eq!(status.to_string().parse::<CheckoutStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_only_editing_accepts_submit() {
        assert!(CheckoutStatus::Editing.accepts_submit());
        assert!(!CheckoutStatus::Submitting.accepts_submit());
        assert!(!CheckoutStatus::Complete.accepts_submit());
    }
}
