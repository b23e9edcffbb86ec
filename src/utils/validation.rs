use crate::utils::error::{EtlError, Result};
use regex::Regex;
use scraper::Selector;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Accepts the schemes the storage adapters know how to open.
pub fn validate_database_url(field_name: &str, url_str: &str) -> Result<()> {
    let scheme = url_str.split(':').next().unwrap_or_default();
    match scheme {
        "postgres" | "postgresql" | "sqlite" => Ok(()),
        _ => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            // credentials live in the URL, keep them out of the error
            value: format!("{}:...", scheme),
            reason: "Expected a postgres://, postgresql:// or sqlite: URL".to_string(),
        }),
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap())
}

/// Table names are spliced into DDL, so only bare SQL identifiers pass.
pub fn validate_identifier(field_name: &str, value: &str) -> Result<()> {
    if identifier_pattern().is_match(value) {
        Ok(())
    } else {
        Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Must be a plain SQL identifier (letters, digits, underscore)".to_string(),
        })
    }
}

pub fn validate_selector(field_name: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        selector: format!("{} = {}", field_name, selector),
        message: e.to_string(),
    })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
