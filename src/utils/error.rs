use crate::domain::model::{BookId, BookStatus, MemberId};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Book {id} not found")]
    BookNotFound { id: BookId },

    #[error("Member {id} not found")]
    MemberNotFound { id: MemberId },

    #[error("Book {id} is not available (status: {status})")]
    BookUnavailable { id: BookId, status: BookStatus },

    #[error("No open loan of book {book_id} for member {member_id}")]
    TransactionNotFound {
        member_id: MemberId,
        book_id: BookId,
        /// Set when the pair has a closed loan, i.e. the book was already returned.
        last_returned: Option<NaiveDate>,
    },

    #[error("Book id {id} already exists")]
    DuplicateBookId { id: BookId },

    #[error("Member id {id} already exists")]
    DuplicateMemberId { id: MemberId },

    #[error("Book {id} is on loan and cannot be removed")]
    BookOnLoan { id: BookId },

    #[error("Date {date} plus {days} days is out of range")]
    DateOutOfRange { date: NaiveDate, days: u32 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lending,
    Catalog,
    Persistence,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LibraryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BookUnavailable { .. }
            | Self::TransactionNotFound { .. }
            | Self::BookOnLoan { .. }
            | Self::DateOutOfRange { .. } => ErrorCategory::Lending,
            Self::BookNotFound { .. }
            | Self::MemberNotFound { .. }
            | Self::DuplicateBookId { .. }
            | Self::DuplicateMemberId { .. } => ErrorCategory::Catalog,
            Self::CsvError(_) | Self::IoError(_) | Self::MalformedRecord { .. } => {
                ErrorCategory::Persistence
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    /// Lending and catalog refusals never end the session.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lending | ErrorCategory::Catalog | ErrorCategory::Input => {
                ErrorSeverity::Low
            }
            ErrorCategory::Persistence => match self {
                Self::MalformedRecord { .. } | Self::CsvError(_) => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::High
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::BookNotFound { .. } => "Book not found.".to_string(),
            Self::MemberNotFound { .. } => "Member not found.".to_string(),
            Self::BookUnavailable { .. } => "Book is not available.".to_string(),
            Self::TransactionNotFound {
                last_returned: Some(date),
                ..
            } => format!("Book already returned on {}.", date),
            Self::TransactionNotFound { .. } => "Transaction not found.".to_string(),
            Self::DuplicateBookId { id } => format!("A book with ID {} already exists.", id),
            Self::DuplicateMemberId { id } => format!("A member with ID {} already exists.", id),
            Self::BookOnLoan { .. } => "Book is currently borrowed and cannot be removed.".to_string(),
            Self::DateOutOfRange { .. } => "Due date cannot be computed.".to_string(),
            Self::MalformedRecord { line, .. } => {
                format!("The data file is damaged at line {}.", line)
            }
            Self::CsvError(_) | Self::IoError(_) => "Could not read or write the data file.".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            Self::ValidationError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::BookNotFound { .. } => "Check the book ID with 'Display Books'",
            Self::MemberNotFound { .. } => "Register the member first with 'Add Member'",
            Self::BookUnavailable { .. } => "Wait until the current loan is returned",
            Self::TransactionNotFound { .. } => "Check the member and book IDs of the loan",
            Self::DuplicateBookId { .. } | Self::DuplicateMemberId { .. } => {
                "Choose an ID that is not in use"
            }
            Self::BookOnLoan { .. } => "Return the book before removing it",
            Self::DateOutOfRange { .. } => "Use a shorter loan period",
            Self::MalformedRecord { .. } | Self::CsvError(_) => {
                "Fix or remove the offending line in the data file"
            }
            Self::IoError(_) => "Check that the data directory exists and is writable",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file and command-line flags",
            Self::ValidationError { .. } => "Re-enter the value",
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lending_errors_are_low_severity() {
        let err = LibraryError::BookUnavailable {
            id: BookId(1),
            status: BookStatus::Borrowed,
        };
        assert_eq!(err.category(), ErrorCategory::Lending);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_already_returned_message() {
        let err = LibraryError::TransactionNotFound {
            member_id: MemberId(1),
            book_id: BookId(2),
            last_returned: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(err.user_friendly_message(), "Book already returned on 2024-03-01.");
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = LibraryError::MissingConfigError {
            field: "storage.books_file".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_recoverable());
    }
}
