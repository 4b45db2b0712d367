//! Newsletter signup validation.
//!
//! The signup form only validates and normalises the address. Delivery is an
//! external service; nothing is sent or stored here.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)+$")
        .expect("email regex is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("please enter your email")]
    Empty,
    #[error("'{0}' is not a valid email address")]
    Invalid(String),
}

/// A validated newsletter signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    email: String,
}

impl Subscription {
    /// Trim and validate `input`. The domain part is lowercased.
    pub fn parse(input: &str) -> Result<Self, SubscriptionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SubscriptionError::Empty);
        }
        if !EMAIL_RE.is_match(trimmed) {
            return Err(SubscriptionError::Invalid(trimmed.to_string()));
        }
        let email = match trimmed.rsplit_once('@') {
            Some((local, domain)) => format!("{local}@{}", domain.to_ascii_lowercase()),
            None => trimmed.to_string(),
        };
        Ok(Self { email })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address_is_normalised() {
        let sub = Subscription::parse("  Reader.One+blog@Example.COM ").unwrap();
        assert_eq!(sub.email(), "Reader.One+blog@example.com");
    }

    #[test]
    fn test_empty_address() {
        assert_eq!(Subscription::parse("   "), Err(SubscriptionError::Empty));
    }

    #[test]
    fn test_invalid_addresses() {
        for bad in ["reader", "reader@", "@example.com", "reader@localhost", "a b@example.com", "reader@-x.com"] {
            assert!(
                matches!(Subscription::parse(bad), Err(SubscriptionError::Invalid(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SubscriptionError::Empty.to_string(), "please enter your email");
        assert!(SubscriptionError::Invalid("x".into()).to_string().contains("'x'"));
    }
}
