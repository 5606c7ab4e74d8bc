//! Form field validation shared by the data-entry screens.

use once_cell::sync::Lazy;
use regex::Regex;

static NIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{7}$").unwrap());
static DPI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13}$").unwrap());
static PLACA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]\d{3}[A-Z]{3}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static TELEFONO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-?\d{4}$").unwrap());

/// NIT: exactly 7 digits.
pub fn valid_nit(nit: &str) -> bool {
    NIT_RE.is_match(nit)
}

/// DPI: exactly 13 digits.
pub fn valid_dpi(dpi: &str) -> bool {
    DPI_RE.is_match(dpi)
}

/// Plate: one letter, three digits, three letters (e.g. P075LOK).
/// Case-insensitive; storage normalizes to uppercase.
pub fn valid_placa(placa: &str) -> bool {
    PLACA_RE.is_match(&placa.to_uppercase())
}

pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Local phone format: 8 digits, optional dash (5555-1234).
pub fn valid_telefono(telefono: &str) -> bool {
    TELEFONO_RE.is_match(telefono)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nit() {
        assert!(valid_nit("1234567"));
        assert!(!valid_nit("123456"));
        assert!(!valid_nit("12345678"));
        assert!(!valid_nit("123456K"));
    }

    #[test]
    fn test_dpi() {
        assert!(valid_dpi("1234567890123"));
        assert!(!valid_dpi("123456789012"));
        assert!(!valid_dpi("1234567890123x"));
    }

    #[test]
    fn test_placa() {
        assert!(valid_placa("P075LOK"));
        assert!(valid_placa("p075lok"));
        assert!(!valid_placa("PP75LOK"));
        assert!(!valid_placa("P075LO"));
        assert!(!valid_placa("075PLOK"));
    }

    #[test]
    fn test_email() {
        assert!(valid_email("admin@taller.com"));
        assert!(!valid_email("admin@taller"));
        assert!(!valid_email("admin taller.com"));
    }

    #[test]
    fn test_telefono() {
        assert!(valid_telefono("5555-1234"));
        assert!(valid_telefono("55551234"));
        assert!(!valid_telefono("555-1234"));
    }
}
