use crate::core::catalog::Catalog;
use crate::core::directory::Directory;
use crate::core::ledger::Ledger;
use crate::domain::model::{Book, BookId, BookStatus, LoanPolicy, MemberId};
use crate::domain::ports::DateProvider;
use crate::utils::error::{LibraryError, Result};
use chrono::{Days, Local, NaiveDate};

/// Wall-clock dates in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDates;

impl DateProvider for SystemDates {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always answers the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedDate(pub NaiveDate);

impl DateProvider for FixedDate {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanReceipt {
    pub member_id: MemberId,
    pub book_id: BookId,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub member_id: MemberId,
    pub book_id: BookId,
    pub returned_on: NaiveDate,
    pub due_on: NaiveDate,
}

impl ReturnReceipt {
    pub fn is_late(&self) -> bool {
        self.returned_on > self.due_on
    }
}

pub fn due_date(borrowed_on: NaiveDate, loan_period_days: u32) -> Result<NaiveDate> {
    borrowed_on
        .checked_add_days(Days::new(u64::from(loan_period_days)))
        .ok_or(LibraryError::DateOutOfRange {
            date: borrowed_on,
            days: loan_period_days,
        })
}

/// Owns the catalog, directory and ledger of one session and is the only
/// place that changes a book's status or writes to the ledger.
///
/// A book is `Borrowed` exactly when the ledger holds an open loan for it.
#[derive(Debug)]
pub struct LendingService<D: DateProvider> {
    catalog: Catalog,
    directory: Directory,
    ledger: Ledger,
    dates: D,
    policy: LoanPolicy,
}

impl<D: DateProvider> LendingService<D> {
    pub fn new(dates: D, policy: LoanPolicy) -> Self {
        Self::with_parts(Catalog::new(), Directory::new(), dates, policy)
    }

    pub fn with_parts(catalog: Catalog, directory: Directory, dates: D, policy: LoanPolicy) -> Self {
        Self {
            catalog,
            directory,
            ledger: Ledger::new(),
            dates,
            policy,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    pub fn borrow(&mut self, member_id: MemberId, book_id: BookId) -> Result<LoanReceipt> {
        let book = self.catalog.find(book_id)?;
        if book.status != BookStatus::Available {
            tracing::warn!("Book {} requested by member {} is {}", book_id, member_id, book.status);
            return Err(LibraryError::BookUnavailable {
                id: book_id,
                status: book.status,
            });
        }
        // The ledger wins over a status reset by a reload or a re-added record.
        if let Some(open) = self.ledger.open_for_book(book_id) {
            tracing::warn!(
                "Book {} requested by member {} is still on loan to member {}",
                book_id,
                member_id,
                open.member_id
            );
            return Err(LibraryError::BookUnavailable {
                id: book_id,
                status: BookStatus::Borrowed,
            });
        }
        let borrowed_on = self.dates.today();
        let due_on = due_date(borrowed_on, self.policy.loan_period_days)?;
        let member = self.directory.find_mut(member_id)?;

        // Everything is validated; mutate.
        member.holdings.push(book_id);
        self.catalog.set_status(book_id, BookStatus::Borrowed);
        self.ledger.append(member_id, book_id, borrowed_on, due_on);

        tracing::debug!("Member {} borrowed book {}, due {}", member_id, book_id, due_on);
        Ok(LoanReceipt {
            member_id,
            book_id,
            borrowed_on,
            due_on,
        })
    }

    pub fn return_book(&mut self, member_id: MemberId, book_id: BookId) -> Result<ReturnReceipt> {
        let returned_on = self.dates.today();
        let closed = self
            .ledger
            .close(member_id, book_id, returned_on)
            .map(|tx| tx.due_on);
        let due_on = match closed {
            Some(due_on) => due_on,
            None => {
                let last_returned = self
                    .ledger
                    .find_last_closed(member_id, book_id)
                    .and_then(|tx| tx.returned_on);
                tracing::warn!("No open loan of book {} for member {}", book_id, member_id);
                return Err(LibraryError::TransactionNotFound {
                    member_id,
                    book_id,
                    last_returned,
                });
            }
        };

        if !self.catalog.set_status(book_id, BookStatus::Available) {
            tracing::warn!("Returned book {} is no longer in the catalog", book_id);
        }

        if self.policy.release_holdings_on_return {
            if let Ok(member) = self.directory.find_mut(member_id) {
                if let Some(pos) = member.holdings.iter().position(|held| *held == book_id) {
                    member.holdings.remove(pos);
                }
            }
        }

        tracing::debug!("Member {} returned book {} on {}", member_id, book_id, returned_on);
        Ok(ReturnReceipt {
            member_id,
            book_id,
            returned_on,
            due_on,
        })
    }

    /// Catalog removal that honors `block_removal_while_borrowed`.
    pub fn withdraw_book(&mut self, book_id: BookId) -> Result<Book> {
        if self.policy.block_removal_while_borrowed && self.ledger.open_for_book(book_id).is_some() {
            tracing::warn!("Refusing to remove book {} while on loan", book_id);
            return Err(LibraryError::BookOnLoan { id: book_id });
        }
        self.catalog.remove_book(book_id)
    }

    /// Returns the ids of books whose status disagrees with the ledger.
    pub fn status_mismatches(&self) -> Vec<BookId> {
        self.catalog
            .list()
            .filter(|book| {
                let on_loan = self.ledger.open_for_book(book.id).is_some();
                (book.status == BookStatus::Borrowed) != on_loan
            })
            .map(|book| book.id)
            .collect()
    }

    /// Marks every `Borrowed` book without an open loan as `Available`.
    /// Used after loading a catalog file, since loans are not persisted.
    pub fn release_orphaned_loans(&mut self) -> usize {
        let orphaned: Vec<BookId> = self
            .catalog
            .list()
            .filter(|book| book.status == BookStatus::Borrowed)
            .filter(|book| self.ledger.open_for_book(book.id).is_none())
            .map(|book| book.id)
            .collect();
        for id in &orphaned {
            self.catalog.set_status(*id, BookStatus::Available);
        }
        orphaned.len()
    }

    /// Marks every catalog book with an open loan as `Borrowed`. Returns how
    /// many records changed.
    pub fn restore_open_loans(&mut self) -> usize {
        let on_loan: Vec<BookId> = self
            .catalog
            .list()
            .filter(|book| book.status != BookStatus::Borrowed)
            .filter(|book| self.ledger.open_for_book(book.id).is_some())
            .map(|book| book.id)
            .collect();
        for id in &on_loan {
            self.catalog.set_status(*id, BookStatus::Borrowed);
        }
        on_loan.len()
    }
}
