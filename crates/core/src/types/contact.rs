//! Checkout contact and shipping details.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not `local@domain`.
    #[error("email must look like name@domain")]
    Malformed,
}

/// A structurally valid email address.
///
/// Only the shape is checked: one `@`, a non-empty local part and a domain
/// containing a dot. Deliverability is the mail server's problem.
///
/// ```
/// use pbs_core::Email;
///
/// assert!(Email::parse("maria@example.com").is_ok());
/// assert!(Email::parse("maria@localhost").is_err());
/// assert!(Email::parse("@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or not `local@domain.tld`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::Malformed)?;
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok || s.contains(char::is_whitespace) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Reasons checkout details are rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DetailsError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The email address is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Contact information, shipping address and notes entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default = "default_country")]
    pub country: String,
    /// Print notes, artwork details or other special requests.
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Country pre-filled on the checkout form.
pub const DEFAULT_COUNTRY: &str = "United States";

fn default_country() -> String {
    DEFAULT_COUNTRY.to_owned()
}

impl CheckoutDetails {
    /// Check required fields and the email address.
    ///
    /// # Errors
    ///
    /// Returns [`DetailsError::MissingField`] naming the first blank required
    /// field, or [`DetailsError::InvalidEmail`].
    pub fn validate(&self) -> Result<Email, DetailsError> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("address line 1", &self.address1),
            ("city", &self.city),
            ("state", &self.state),
            ("ZIP code", &self.zip),
            ("country", &self.country),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(DetailsError::MissingField(*field));
        }

        Ok(Email::parse(&self.email)?)
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}
