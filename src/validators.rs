use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Ukraine,
    Belarus,
    Russia,
    Unknown,
}

impl Country {
    pub fn label(&self) -> &'static str {
        match self {
            Country::Ukraine => "🇺🇦 Украина",
            Country::Belarus => "🇧🇾 Беларусь",
            Country::Russia => "🇷🇺 Россия",
            Country::Unknown => "🌍 Неизвестно",
        }
    }
}

// Более длинные префиксы идут первыми
const COUNTRY_PREFIXES: &[(&str, Country)] = &[
    ("+380", Country::Ukraine),
    ("+375", Country::Belarus),
    ("+7", Country::Russia),
    ("0", Country::Ukraine),
    ("8", Country::Russia),
];

lazy_static! {
    static ref PHONE_FORMAT: Regex =
        Regex::new(r"^(\+380[0-9]{9}|0[0-9]{9}|\+375[0-9]{9}|\+7[0-9]{10}|8[0-9]{10})$").unwrap();
}

pub const PHONE_FORMAT_HINT: &str = "❗ Введите корректный номер телефона:\n\
    - 🇺🇦 +380XXXXXXXXX или 0XXXXXXXXX\n\
    - 🇧🇾 +375XXXXXXXXX\n\
    - 🇷🇺 +7XXXXXXXXXX или 8XXXXXXXXXX";

pub fn classify_country(phone: &str) -> Country {
    let phone = phone.trim();
    COUNTRY_PREFIXES
        .iter()
        .find(|(prefix, _)| phone.starts_with(prefix))
        .map(|(_, country)| *country)
        .unwrap_or(Country::Unknown)
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE_FORMAT.is_match(phone.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_supported_prefixes() {
        assert_eq!(classify_country("+380501234567"), Country::Ukraine);
        assert_eq!(classify_country("0501234567"), Country::Ukraine);
        assert_eq!(classify_country("+375291234567"), Country::Belarus);
        assert_eq!(classify_country("+79161234567"), Country::Russia);
        assert_eq!(classify_country("89161234567"), Country::Russia);
    }

    #[test]
    fn unsupported_prefixes_are_unknown() {
        for phone in ["+48123456789", "+1 555 0100", "12345", "", "abc"] {
            assert_eq!(classify_country(phone), Country::Unknown, "{phone}");
        }
        assert_eq!(Country::Unknown.label(), "🌍 Неизвестно");
    }

    #[test]
    fn accepts_one_example_per_format() {
        for phone in [
            "+380501234567",
            "0501234567",
            "+375291234567",
            "+79161234567",
            "89161234567",
        ] {
            assert!(validate_phone(phone), "{phone} should be accepted");
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(validate_phone("  +380501234567\n"));
    }

    #[test]
    fn rejects_malformed_numbers() {
        for phone in [
            "",
            "+38050123456",
            "+3805012345678",
            "050123456",
            "+37529123456",
            "+7916123456",
            "8916123456789",
            "+380 50 123 4567",
            "+38050123456a",
            "+48123456789",
            "380501234567",
            "+380５01234567",
        ] {
            assert!(!validate_phone(phone), "{phone} should be rejected");
        }
    }
}
