use crate::domain::model::{BookId, MemberId, Transaction};
use chrono::NaiveDate;

/// Append-only loan history. Entries are never removed; the only mutation is
/// closing an open entry.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    entries: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new open loan.
    pub(crate) fn append(
        &mut self,
        member_id: MemberId,
        book_id: BookId,
        borrowed_on: NaiveDate,
        due_on: NaiveDate,
    ) -> &Transaction {
        self.entries.push(Transaction {
            member_id,
            book_id,
            borrowed_on,
            due_on,
            returned_on: None,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Most recently appended open loan for the pair.
    pub fn find_open(&self, member_id: MemberId, book_id: BookId) -> Option<&Transaction> {
        self.entries
            .iter()
            .rev()
            .find(|tx| tx.is_open() && tx.matches(member_id, book_id))
    }

    /// Most recently closed loan for the pair, used to tell "already returned"
    /// apart from "never borrowed".
    pub fn find_last_closed(&self, member_id: MemberId, book_id: BookId) -> Option<&Transaction> {
        self.entries
            .iter()
            .rev()
            .find(|tx| !tx.is_open() && tx.matches(member_id, book_id))
    }

    /// Closes the most recent open loan for the pair. Returns `None` when
    /// there is nothing to close; a closed entry is never reopened.
    pub(crate) fn close(
        &mut self,
        member_id: MemberId,
        book_id: BookId,
        returned_on: NaiveDate,
    ) -> Option<&Transaction> {
        let tx = self
            .entries
            .iter_mut()
            .rev()
            .find(|tx| tx.is_open() && tx.matches(member_id, book_id))?;
        tx.returned_on = Some(returned_on);
        Some(tx)
    }

    pub fn open_for_book(&self, book_id: BookId) -> Option<&Transaction> {
        self.entries
            .iter()
            .rev()
            .find(|tx| tx.is_open() && tx.book_id == book_id)
    }

    pub fn history_for_member(&self, member_id: MemberId) -> impl Iterator<Item = &Transaction> + '_ {
        self.entries.iter().filter(move |tx| tx.member_id == member_id)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.entries.iter()
    }

    pub fn open_loans(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.entries.iter().filter(|tx| tx.is_open())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_find_open_returns_most_recent() {
        let mut ledger = Ledger::new();
        ledger.append(MemberId(1), BookId(10), date(2024, 1, 1), date(2024, 1, 15));
        ledger.close(MemberId(1), BookId(10), date(2024, 1, 5)).unwrap();
        ledger.append(MemberId(1), BookId(10), date(2024, 2, 1), date(2024, 2, 15));

        let open = ledger.find_open(MemberId(1), BookId(10)).unwrap();
        assert_eq!(open.borrowed_on, date(2024, 2, 1));
        assert!(ledger.find_open(MemberId(2), BookId(10)).is_none());
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_close_is_final() {
        let mut ledger = Ledger::new();
        ledger.append(MemberId(1), BookId(10), date(2024, 1, 1), date(2024, 1, 15));

        let closed = ledger.close(MemberId(1), BookId(10), date(2024, 1, 3)).unwrap();
        assert_eq!(closed.returned_on, Some(date(2024, 1, 3)));

        assert!(ledger.close(MemberId(1), BookId(10), date(2024, 1, 9)).is_none());
        let last = ledger.find_last_closed(MemberId(1), BookId(10)).unwrap();
        assert_eq!(last.returned_on, Some(date(2024, 1, 3)));
        assert!(ledger.find_open(MemberId(1), BookId(10)).is_none());
    }

    #[test]
    fn test_history_queries() {
        let mut ledger = Ledger::new();
        ledger.append(MemberId(1), BookId(10), date(2024, 1, 1), date(2024, 1, 15));
        ledger.append(MemberId(2), BookId(11), date(2024, 1, 2), date(2024, 1, 16));
        ledger.append(MemberId(1), BookId(12), date(2024, 1, 3), date(2024, 1, 17));
        ledger.close(MemberId(2), BookId(11), date(2024, 1, 4));

        assert_eq!(ledger.history_for_member(MemberId(1)).count(), 2);
        assert_eq!(ledger.open_loans().count(), 2);
        assert!(ledger.open_for_book(BookId(11)).is_none());
        assert_eq!(ledger.open_for_book(BookId(12)).unwrap().member_id, MemberId(1));
    }
}
