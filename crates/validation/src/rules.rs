//! Validation rule set: length bounds + compiled patterns.

use std::sync::LazyLock;

use regex::Regex;

use crate::report::{CustomerField, ValidationReport};

/// Letters (including accented), spaces, apostrophes, hyphens.
static NAME_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s'-]+$").expect("invalid name pattern"));

/// Exactly five digits (French postal codes).
static FR_POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("invalid postal pattern"));

/// French mobile/landline numbers.
///
/// Accepted: `0123456789`, `01 23 45 67 89`, `01.23.45.67.89`,
/// `01-23-45-67-89`, and international `+33`/`0033` prefixes.
static FR_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\+|00)33|0)\s*[1-9](?:[\s.-]*\d{2}){4}$").expect("invalid phone pattern")
});

/// Borrowed view over the customer fields submitted at checkout.
#[derive(Debug, Copy, Clone)]
pub struct CustomerFields<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub postal_code: &'a str,
    pub phone: &'a str,
}

/// Field formats and length bounds for one target locale.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    country: String,
    name_len: (usize, usize),
    address_len: (usize, usize),
    city_len: (usize, usize),
    postal_code: Regex,
    phone: Regex,
}

impl ValidationRules {
    /// French locale rules (the store's default market).
    pub fn french() -> Self {
        Self {
            country: "FR".to_string(),
            name_len: (2, 100),
            address_len: (5, 200),
            city_len: (2, 100),
            postal_code: FR_POSTAL_RE.clone(),
            phone: FR_PHONE_RE.clone(),
        }
    }

    /// Swap in another country's postal/phone formats.
    pub fn for_country(
        country: impl Into<String>,
        postal_pattern: &str,
        phone_pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            country: country.into(),
            postal_code: Regex::new(postal_pattern)?,
            phone: Regex::new(phone_pattern)?,
            ..Self::french()
        })
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Shared shape of every field check: trim, bound the length, match the
    /// pattern if one applies.
    fn check(value: &str, pattern: Option<&Regex>, min: usize, max: usize) -> bool {
        let trimmed = value.trim();
        let chars = trimmed.chars().count();
        if chars < min || chars > max {
            return false;
        }
        pattern.is_none_or(|p| p.is_match(trimmed))
    }

    pub fn is_valid_name(&self, name: &str) -> bool {
        Self::check(name, Some(&NAME_CHARS_RE), self.name_len.0, self.name_len.1)
    }

    pub fn is_valid_address(&self, address: &str) -> bool {
        Self::check(address, None, self.address_len.0, self.address_len.1)
    }

    pub fn is_valid_city(&self, city: &str) -> bool {
        Self::check(city, Some(&NAME_CHARS_RE), self.city_len.0, self.city_len.1)
    }

    pub fn is_valid_postal_code(&self, postal_code: &str) -> bool {
        Self::check(postal_code, Some(&self.postal_code), 1, usize::MAX)
    }

    pub fn is_valid_phone(&self, phone: &str) -> bool {
        Self::check(phone, Some(&self.phone), 1, usize::MAX)
    }

    /// Run all five field checks; never short-circuits.
    pub fn validate_customer(&self, fields: CustomerFields<'_>) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !self.is_valid_name(fields.name) {
            report.add(
                CustomerField::Name,
                format!(
                    "name must be {}-{} letters",
                    self.name_len.0, self.name_len.1
                ),
            );
        }
        if !self.is_valid_address(fields.address) {
            report.add(
                CustomerField::Address,
                format!(
                    "address must be {}-{} characters",
                    self.address_len.0, self.address_len.1
                ),
            );
        }
        if !self.is_valid_city(fields.city) {
            report.add(
                CustomerField::City,
                format!(
                    "city must be {}-{} letters",
                    self.city_len.0, self.city_len.1
                ),
            );
        }
        if !self.is_valid_postal_code(fields.postal_code) {
            report.add(CustomerField::PostalCode, "postal code must be 5 digits");
        }
        if !self.is_valid_phone(fields.phone) {
            report.add(CustomerField::Phone, "phone number is not valid");
        }

        report
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::french()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ValidationRules {
        ValidationRules::french()
    }

    #[test]
    fn names_allow_accents_apostrophes_hyphens() {
        let r = rules();
        assert!(r.is_valid_name("Jean-Pierre"));
        assert!(r.is_valid_name("Éloïse d'Arcy"));
        assert!(r.is_valid_name("  Anne  "));

        assert!(!r.is_valid_name("X"));
        assert!(!r.is_valid_name("R2D2"));
        assert!(!r.is_valid_name(""));
        assert!(!r.is_valid_name(&"a".repeat(101)));
    }

    #[test]
    fn addresses_only_bound_length() {
        let r = rules();
        assert!(r.is_valid_address("12 rue de la Paix"));
        assert!(r.is_valid_address("5, Apt #3"));

        assert!(!r.is_valid_address("1 rue"));
        assert!(!r.is_valid_address(&"a".repeat(201)));
    }

    #[test]
    fn cities_use_the_name_character_class() {
        let r = rules();
        assert!(r.is_valid_city("Aix-en-Provence"));
        assert!(r.is_valid_city("Orléans"));
        assert!(!r.is_valid_city("Paris75"));
    }

    #[test]
    fn postal_codes_are_exactly_five_digits() {
        let r = rules();
        assert!(r.is_valid_postal_code("75001"));
        assert!(r.is_valid_postal_code(" 13006 "));

        assert!(!r.is_valid_postal_code("7500"));
        assert!(!r.is_valid_postal_code("750011"));
        assert!(!r.is_valid_postal_code("7500A"));
    }

    #[test]
    fn phone_formats() {
        let r = rules();
        assert!(r.is_valid_phone("0123456789"));
        assert!(r.is_valid_phone("01 23 45 67 89"));
        assert!(r.is_valid_phone("01.23.45.67.89"));
        assert!(r.is_valid_phone("01-23-45-67-89"));
        assert!(r.is_valid_phone("+33 123456789"));
        assert!(r.is_valid_phone("0033 123456789"));

        assert!(!r.is_valid_phone("00234567")); // second digit must be 1-9
        assert!(!r.is_valid_phone("123456789"));
        assert!(!r.is_valid_phone("01234"));
    }

    #[test]
    fn aggregate_validator_reports_every_failing_field() {
        let report = rules().validate_customer(CustomerFields {
            name: "X",
            address: "ok address",
            city: "Paris",
            postal_code: "750",
            phone: "nope",
        });

        assert!(!report.is_valid());
        assert_eq!(report.len(), 3);
        assert!(report.error_for(CustomerField::Name).is_some());
        assert!(report.error_for(CustomerField::PostalCode).is_some());
        assert!(report.error_for(CustomerField::Phone).is_some());
        assert!(report.error_for(CustomerField::Address).is_none());
        assert!(report.error_for(CustomerField::City).is_none());
    }

    #[test]
    fn valid_customer_passes() {
        let report = rules().validate_customer(CustomerFields {
            name: "Marie Dupont",
            address: "12 rue de la Paix",
            city: "Paris",
            postal_code: "75001",
            phone: "06 12 34 56 78",
        });
        assert!(report.is_valid());
    }

    #[test]
    fn country_override_swaps_postal_format() {
        let r = ValidationRules::for_country("DE", r"^\d{5}$", r"^(?:\+49|0)\d{6,11}$")
            .expect("patterns compile");
        assert_eq!(r.country(), "DE");
        assert!(r.is_valid_phone("+49301234567"));
        assert!(!r.is_valid_phone("06 12 34 56 78"));
    }
}
