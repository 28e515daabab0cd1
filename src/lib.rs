pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, LibraryConfig};

pub use adapters::BookRepository;
pub use app::{Menu, Session};
pub use self::core::{
    catalog::Catalog,
    directory::Directory,
    ledger::Ledger,
    lending::{FixedDate, LendingService, LoanReceipt, ReturnReceipt, SystemDates},
};
pub use domain::model::{
    Book, BookId, BookStatus, LoanPolicy, Member, MemberId, NewBook, NewMember, Transaction,
};
pub use utils::error::{LibraryError, Result};
