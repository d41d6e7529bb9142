use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PriceList, Zone};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerKind {
    Kiosk,
    Bar,
    Restaurant,
    Club,
    Supermarket,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatCondition {
    RegisteredPayer,
    SimplifiedRegime,
    FinalConsumer,
    Exempt,
}

/// A business receiving deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub kind: CustomerKind,
    pub zone: Zone,
    pub price_list: PriceList,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub business_name: Option<String>,
    pub cuit: Option<String>,
    pub vat_condition: Option<VatCondition>,
    /// Outstanding current-account debt.
    pub balance: Decimal,
}

/// Payload for registering a customer.
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub name: String,
    pub kind: CustomerKind,
    pub zone: Zone,
    pub price_list: PriceList,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub business_name: Option<String>,
    pub cuit: Option<String>,
    pub vat_condition: Option<VatCondition>,
}

/// Payload for updating contact or fiscal data.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub price_list: Option<PriceList>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub business_name: Option<String>,
    pub cuit: Option<String>,
    pub vat_condition: Option<VatCondition>,
}

impl Customer {
    /// Business name, CUIT, VAT condition and address are all present.
    /// Blank text fields count as missing.
    pub fn has_complete_fiscal_data(&self) -> bool {
        self.missing_fiscal_fields().is_empty()
    }

    /// Names of the fiscal fields still missing.
    pub fn missing_fiscal_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.business_name) {
            missing.push("business_name");
        }
        if is_blank(&self.cuit) {
            missing.push("cuit");
        }
        if self.vat_condition.is_none() {
            missing.push("vat_condition");
        }
        if is_blank(&self.address) {
            missing.push("address");
        }
        missing
    }
}

impl CustomerCreate {
    pub fn new(name: impl Into<String>, kind: CustomerKind, zone: Zone, price_list: PriceList) -> Self {
        Self {
            name: name.into(),
            kind,
            zone,
            price_list,
            phone: None,
            email: None,
            address: None,
            business_name: None,
            cuit: None,
            vat_condition: None,
        }
    }

    pub fn with_contact(mut self, phone: impl Into<String>, email: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self.email = Some(email.into());
        self
    }

    pub fn with_fiscal_data(
        mut self,
        business_name: impl Into<String>,
        cuit: impl Into<String>,
        vat_condition: VatCondition,
        address: impl Into<String>,
    ) -> Self {
        self.business_name = Some(business_name.into());
        self.cuit = Some(cuit.into());
        self.vat_condition = Some(vat_condition);
        self.address = Some(address.into());
        self
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |value| value.trim().is_empty())
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least ten digits once separators are stripped.
pub fn validate_phone(phone: &str) -> bool {
    digits(phone).len() >= 10
}

/// Exactly eleven digits once separators are stripped.
pub fn validate_cuit(cuit: &str) -> bool {
    digits(cuit).len() == 11
}

/// Formats a CUIT as `XX-XXXXXXXX-X`. Invalid input is returned unchanged.
pub fn format_cuit(cuit: &str) -> String {
    let cleaned = digits(cuit);
    if cleaned.len() != 11 {
        return cuit.to_string();
    }
    format!("{}-{}-{}", &cleaned[..2], &cleaned[2..10], &cleaned[10..])
}

/// Returns the first field that fails validation, if any.
pub fn invalid_contact_field(
    email: Option<&str>,
    phone: Option<&str>,
    cuit: Option<&str>,
) -> Option<String> {
    if let Some(email) = email.filter(|e| !validate_email(e)) {
        return Some(format!("invalid email: {}", email));
    }
    if let Some(phone) = phone.filter(|p| !validate_phone(p)) {
        return Some(format!("invalid phone: {}", phone));
    }
    if let Some(cuit) = cuit.filter(|c| !validate_cuit(c)) {
        return Some(format!("invalid CUIT: {}", cuit));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_validation() {
        assert!(validate_email("kiosco@example.com"));
        assert!(!validate_email("kiosco@example"));
        assert!(!validate_email("ki osco@example.com"));
        assert!(validate_phone("11-4567-8901"));
        assert!(!validate_phone("4567-8901"));
        assert!(validate_cuit("20-12345678-9"));
        assert!(!validate_cuit("20-1234567-9"));
    }

    #[test]
    fn test_format_cuit() {
        assert_eq!(format_cuit("20123456789"), "20-12345678-9");
        assert_eq!(format_cuit("20.12345678.9"), "20-12345678-9");
        assert_eq!(format_cuit("123"), "123");
    }

    #[test]
    fn test_invalid_contact_field_reports_first_failure() {
        assert_eq!(invalid_contact_field(Some("a@b.co"), Some("1145678901"), None), None);
        assert_eq!(
            invalid_contact_field(Some("a@b.co"), Some("123"), Some("1")),
            Some("invalid phone: 123".to_string())
        );
    }

    #[test]
    fn test_fiscal_data_completeness() {
        let create = CustomerCreate::new("Bar El Tano", CustomerKind::Bar, Zone::SanTelmo, PriceList::B);
        let mut customer = Customer {
            id: "customer_1".to_string(),
            name: create.name,
            kind: create.kind,
            zone: create.zone,
            price_list: create.price_list,
            phone: None,
            email: None,
            address: Some("Defensa 1200".to_string()),
            business_name: Some("El Tano SRL".to_string()),
            cuit: None,
            vat_condition: Some(VatCondition::RegisteredPayer),
            balance: Decimal::ZERO,
        };
        assert!(!customer.has_complete_fiscal_data());
        assert_eq!(customer.missing_fiscal_fields(), vec!["cuit"]);

        customer.cuit = Some("30-71234567-1".to_string());
        assert!(customer.has_complete_fiscal_data());

        customer.business_name = Some(String::new());
        customer.address = Some("   ".to_string());
        assert!(!customer.has_complete_fiscal_data());
        assert_eq!(customer.missing_fiscal_fields(), vec!["business_name", "address"]);
    }
}
