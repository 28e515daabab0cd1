use crate::domain::model::LoanPolicy;
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Source of "today" for borrow, due and return dates.
pub trait DateProvider {
    fn today(&self) -> NaiveDate;
}

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn books_file(&self) -> &str;
    fn loan_policy(&self) -> LoanPolicy;
    fn reset_borrowed_on_load(&self) -> bool;
}
