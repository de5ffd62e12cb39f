//! User-facing locale selection.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language used for user-facing messages and labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// Korean.
    #[default]
    Ko,
    /// English.
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" | "ko_kr" => Ok(Self::Ko),
            "en" | "en-us" | "en_us" => Ok(Self::En),
            other => Err(format!("unsupported locale `{other}`; expected ko|en")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Locale;

    #[test]
    fn parses_region_variants() {
        assert_eq!("ko-KR".parse::<Locale>().unwrap(), Locale::Ko);
        assert_eq!(" EN ".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }
}
