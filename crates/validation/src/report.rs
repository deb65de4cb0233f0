//! Aggregate validation result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Customer form fields checked at checkout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Name,
    Address,
    City,
    PostalCode,
    Phone,
}

impl core::fmt::Display for CustomerField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            CustomerField::Name => "name",
            CustomerField::Address => "address",
            CustomerField::City => "city",
            CustomerField::PostalCode => "postal_code",
            CustomerField::Phone => "phone",
        };
        f.write_str(label)
    }
}

/// Per-field outcome of the aggregate validator.
///
/// Every field is checked (validation never short-circuits) so the UI can
/// mark all offending inputs in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: BTreeMap<CustomerField, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add(&mut self, field: CustomerField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn error_for(&self, field: CustomerField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<CustomerField, String> {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
