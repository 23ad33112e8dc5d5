//! Contact, shipping and payment sections of the checkout form.

use serde::{Deserialize, Serialize};

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Loose well-formedness check: one `@` with non-empty sides and no
/// whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Step 1: contact information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub email: String,
}

impl ContactDetails {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }

    /// Names of invalid fields.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        if is_valid_email(&self.email) {
            Vec::new()
        } else {
            vec!["email"]
        }
    }
}

/// Step 2: shipping address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Full name of the recipient.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Names of blank fields, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Step 3: card details. Only presence is checked; no payment is taken.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub card_name: String,
}

impl PaymentDetails {
    /// Names of blank fields, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("cardNumber", &self.card_number),
            ("expiryDate", &self.expiry_date),
            ("cvv", &self.cvv),
            ("cardName", &self.card_name),
        ]
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| name)
        .collect()
    }

    /// Last four digits of the card number, for display.
    pub fn masked_card_number(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("**** {tail}")
    }
}
