use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Availability of a single copy.
///
/// ```text
/// available → borrowed → available → ...
/// ```
///
/// `Reserved` exists for file compatibility; no operation enters or leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Available,
    Borrowed,
    Reserved,
}

impl BookStatus {
    /// Ordinal used by the persisted catalog file.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Available => 0,
            Self::Borrowed => 1,
            Self::Reserved => 2,
        }
    }

    #[must_use]
    pub const fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Available),
            1 => Some(Self::Borrowed),
            2 => Some(Self::Reserved),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Borrowed => "Borrowed",
            Self::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub edition: i32,
    pub year: i32,
    pub status: BookStatus,
}

/// Caller-supplied fields for a catalog insertion. Status is always
/// `Available` on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub edition: i32,
    pub year: i32,
}

impl NewBook {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        edition: i32,
        year: i32,
    ) -> Self {
        Self {
            id: BookId(id),
            title: title.into(),
            author: author.into(),
            edition,
            year,
        }
    }
}

impl From<NewBook> for Book {
    fn from(book: NewBook) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            edition: book.edition,
            year: book.year,
            status: BookStatus::Available,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Edition: {}, Year: {}, Status: {}",
            self.id, self.title, self.author, self.edition, self.year, self.status
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Books recorded as held. Not pruned on return unless the loan policy
    /// says so.
    pub holdings: Vec<BookId>,
    /// Inert: nothing enqueues or drains reservations yet.
    pub reservations: VecDeque<BookId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub id: MemberId,
    pub name: String,
}

impl NewMember {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: MemberId(id),
            name: name.into(),
        }
    }
}

impl From<NewMember> for Member {
    fn from(member: NewMember) -> Self {
        Self {
            id: member.id,
            name: member.name,
            holdings: Vec::new(),
            reservations: VecDeque::new(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Name: {}", self.id, self.name)
    }
}

/// One loan. Open while `returned_on` is `None`; closing it is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub member_id: MemberId,
    pub book_id: BookId,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
}

impl Transaction {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }

    #[must_use]
    pub fn matches(&self, member_id: MemberId, book_id: BookId) -> bool {
        self.member_id == member_id && self.book_id == book_id
    }
}

pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

/// Lending rules. The two switches default to the legacy behavior: stale
/// holdings after a return, and unconditional removal of borrowed books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPolicy {
    pub loan_period_days: u32,
    pub release_holdings_on_return: bool,
    pub block_removal_while_borrowed: bool,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            release_holdings_on_return: false,
            block_removal_while_borrowed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordinals_match_file_format() {
        assert_eq!(BookStatus::Available.ordinal(), 0);
        assert_eq!(BookStatus::Borrowed.ordinal(), 1);
        assert_eq!(BookStatus::Reserved.ordinal(), 2);
        assert_eq!(BookStatus::from_ordinal(1), Some(BookStatus::Borrowed));
        assert_eq!(BookStatus::from_ordinal(3), None);
    }

    #[test]
    fn test_new_book_starts_available() {
        let book = Book::from(NewBook::new(7, "Dune", "Herbert", 1, 1965));
        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(
            book.to_string(),
            "ID: 7, Title: Dune, Author: Herbert, Edition: 1, Year: 1965, Status: Available"
        );
    }

    #[test]
    fn test_transaction_json_shape() {
        let tx = Transaction {
            member_id: MemberId(3),
            book_id: BookId(9),
            borrowed_on: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            returned_on: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["member_id"], 3);
        assert_eq!(json["due_on"], "2024-03-05");
        assert!(json["returned_on"].is_null());
        assert_eq!(serde_json::to_value(BookStatus::Borrowed).unwrap(), "borrowed");
    }

    #[test]
    fn test_new_member_has_no_holdings() {
        let member = Member::from(NewMember::new(1, "Ada"));
        assert!(member.holdings.is_empty());
        assert!(member.reservations.is_empty());
        assert_eq!(member.to_string(), "ID: 1, Name: Ada");
    }
}
