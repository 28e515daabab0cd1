pub mod catalog;
pub mod directory;
pub mod ledger;
pub mod lending;

pub use crate::domain::model::{Book, BookId, BookStatus, LoanPolicy, Member, MemberId, Transaction};
pub use crate::domain::ports::{ConfigProvider, DateProvider, Storage};
pub use crate::utils::error::Result;
