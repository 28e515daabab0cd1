use crate::utils::error::{LibraryError, Result};
use std::str::FromStr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LibraryError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::InvalidConfigValueError {
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
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses a number typed at a prompt.
pub fn parse_number<T: FromStr>(field_name: &str, input: &str) -> Result<T> {
    input
        .trim()
        .parse::<T>()
        .map_err(|_| LibraryError::ValidationError {
            message: format!("{} must be a whole number, got '{}'", field_name, input.trim()),
        })
}

/// Text typed at a prompt, trimmed. Must not be blank.
pub fn parse_text(field_name: &str, input: &str) -> Result<String> {
    let value = input.trim();
    if value.is_empty() {
        return Err(LibraryError::ValidationError {
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.books_file", "books.txt").is_ok());
        assert!(matches!(
            validate_path("storage.books_file", ""),
            Err(LibraryError::MissingConfigError { field }) if field == "storage.books_file"
        ));
        assert!(validate_path("storage.books_file", "bad\0name").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("lending.loan_period_days", 14u32, 1, 365).is_ok());
        assert!(validate_range("lending.loan_period_days", 0u32, 1, 365).is_err());
        assert!(validate_range("lending.loan_period_days", 366u32, 1, 365).is_err());
    }

    #[test]
    fn test_parse_prompt_input() {
        assert_eq!(parse_number::<i64>("Book ID", " 42\n").unwrap(), 42);
        assert!(matches!(
            parse_number::<i32>("Year", "nineteen"),
            Err(LibraryError::ValidationError { .. })
        ));
        assert_eq!(parse_text("Title", "  Dune \n").unwrap(), "Dune");
        assert!(parse_text("Title", "   ").is_err());
    }
}
