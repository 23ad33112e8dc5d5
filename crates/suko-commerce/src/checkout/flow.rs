//! Checkout step state machine.

use crate::checkout::{ContactDetails, PaymentDetails, ShippingAddress};
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Contact information.
    Contact,
    /// Shipping address.
    Shipping,
    /// Payment details.
    Payment,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 3] = [
        CheckoutStep::Contact,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Contact => "contact",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Contact => "Contact",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Contact => 1,
            CheckoutStep::Shipping => 2,
            CheckoutStep::Payment => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(CheckoutStep::Contact),
            2 => Some(CheckoutStep::Shipping),
            3 => Some(CheckoutStep::Payment),
            _ => None,
        }
    }

    /// The following step; `None` after payment.
    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step; `None` before contact.
    pub fn prev(&self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }
}

/// All fields collected during checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub contact: ContactDetails,
    pub shipping: ShippingAddress,
    pub payment: PaymentDetails,
}

impl CheckoutForm {
    /// Names of invalid fields in one step.
    pub fn missing_fields(&self, step: CheckoutStep) -> Vec<&'static str> {
        match step {
            CheckoutStep::Contact => self.contact.missing_fields(),
            CheckoutStep::Shipping => self.shipping.missing_fields(),
            CheckoutStep::Payment => self.payment.missing_fields(),
        }
    }

    pub fn is_step_valid(&self, step: CheckoutStep) -> bool {
        self.missing_fields(step).is_empty()
    }

    /// Invalid fields across every step.
    pub fn all_missing_fields(&self) -> Vec<&'static str> {
        CheckoutStep::ALL
            .iter()
            .flat_map(|step| self.missing_fields(*step))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        CheckoutStep::ALL.iter().all(|step| self.is_step_valid(*step))
    }

    /// Fail with the list of invalid fields unless every step is valid.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing = self.all_missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::CheckoutIncomplete(missing.join(", ")))
        }
    }
}

/// Checkout flow state: the current step plus the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutFlow {
    /// Current step.
    pub step: CheckoutStep,
    /// Collected fields.
    pub form: CheckoutForm,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    /// Start at the contact step with an empty form.
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Contact,
            form: CheckoutForm::default(),
        }
    }

    /// Check whether a step number is valid for the current form.
    ///
    /// Unknown step numbers are never valid.
    pub fn is_step_valid(&self, number: u8) -> bool {
        CheckoutStep::from_number(number)
            .map(|step| self.form.is_step_valid(step))
            .unwrap_or(false)
    }

    pub fn is_current_step_valid(&self) -> bool {
        self.form.is_step_valid(self.step)
    }

    /// Advance one step if the current step is valid.
    ///
    /// Stays on payment when already there.
    pub fn next_step(&mut self) -> Result<CheckoutStep, CommerceError> {
        let missing = self.form.missing_fields(self.step);
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step, never before contact.
    pub fn prev_step(&mut self) -> CheckoutStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Jump to a step. Going back is always allowed; going forward requires
    /// every earlier step to be valid.
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CommerceError> {
        let blocked = CheckoutStep::ALL
            .iter()
            .take_while(|s| **s < step)
            .any(|s| !self.form.is_step_valid(*s));
        if step > self.step && blocked {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            });
        }
        self.step = step;
        Ok(())
    }
}
