use crate::adapters::BookRepository;
use crate::core::lending::LendingService;
use crate::domain::ports::{ConfigProvider, DateProvider, Storage};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No catalog file; the in-memory catalog was left as it was.
    Missing,
    Loaded { books: usize, released: usize },
}

/// One run of the program: the lending service plus the catalog file it
/// loads from and saves to.
pub struct Session<S: Storage, C: ConfigProvider, D: DateProvider> {
    service: LendingService<D>,
    repository: BookRepository<S, C>,
}

impl<S: Storage, C: ConfigProvider, D: DateProvider> Session<S, C, D> {
    pub fn new(repository: BookRepository<S, C>, dates: D) -> Self {
        let policy = repository.config().loan_policy();
        Self {
            service: LendingService::new(dates, policy),
            repository,
        }
    }

    pub fn service(&self) -> &LendingService<D> {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut LendingService<D> {
        &mut self.service
    }

    pub fn location(&self) -> String {
        self.repository.location()
    }

    /// Replaces the catalog with the file contents. Members and loans are
    /// kept, and books with an open loan stay `Borrowed` whatever the file
    /// says. A book the file marks borrowed has no loan behind it unless
    /// this session made one.
    pub async fn load(&mut self) -> Result<LoadOutcome> {
        if !self.repository.exists().await? {
            tracing::info!("No catalog file at {}", self.repository.location());
            return Ok(LoadOutcome::Missing);
        }

        let books = self.repository.load().await?;
        let count = books.len();
        self.service.catalog_mut().replace_all(books)?;

        let restored = self.service.restore_open_loans();
        if restored > 0 {
            tracing::info!("Kept {} books on loan that the file marks otherwise", restored);
        }

        let released = if self.repository.config().reset_borrowed_on_load() {
            self.service.release_orphaned_loans()
        } else {
            0
        };
        if released > 0 {
            tracing::info!("Made {} borrowed books without a loan available", released);
        }

        let mismatched = self.service.status_mismatches();
        if !mismatched.is_empty() {
            tracing::warn!(
                "{} books disagree with the loan ledger after load: {:?}",
                mismatched.len(),
                mismatched
            );
        }

        Ok(LoadOutcome::Loaded {
            books: count,
            released,
        })
    }

    pub async fn save(&self) -> Result<usize> {
        self.repository.save(self.service.catalog().list()).await
    }
}
