//! The catalog file: one book per line, `id,title,author,status,edition,year`,
//! no header, status as its ordinal. Only books are persisted; members and
//! loans live for one session.
//!
//! Fields are written with minimal quoting, so any record without commas or
//! quotes is byte-for-byte the plain legacy line.
//!
//! Reading follows the same quoting rules: a field that starts with `"` is
//! a quoted field. A hand-written legacy line whose title opens with an
//! unescaped quote is therefore not read as written; an unbalanced quote
//! swallows the rest of the file and fails as a malformed record.

use crate::domain::model::{Book, BookId, BookStatus};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{LibraryError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::Path;

const FIELD_COUNT: usize = 6;

pub fn encode_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for book in books {
        writer.write_record([
            book.id.0.to_string().as_str(),
            book.title.as_str(),
            book.author.as_str(),
            book.status.ordinal().to_string().as_str(),
            book.edition.to_string().as_str(),
            book.year.to_string().as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| LibraryError::IoError(e.into_error()))
}

/// Parses a catalog file. Blank lines are skipped; anything else that does
/// not parse fails with the 1-based line number.
pub fn decode_books(data: &[u8]) -> Result<Vec<Book>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut books = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());
        books.push(parse_record(&record, line)?);
    }
    Ok(books)
}

fn parse_record(record: &StringRecord, line: u64) -> Result<Book> {
    if record.len() != FIELD_COUNT {
        return Err(LibraryError::MalformedRecord {
            line,
            reason: format!("expected {} fields, found {}", FIELD_COUNT, record.len()),
        });
    }

    let field = |index: usize| record.get(index).unwrap_or_default();
    let number = |index: usize, name: &str| -> Result<i64> {
        field(index)
            .trim()
            .parse::<i64>()
            .map_err(|e| LibraryError::MalformedRecord {
                line,
                reason: format!("{} '{}' is not a number: {}", name, field(index), e),
            })
    };
    let small = |index: usize, name: &str| -> Result<i32> {
        let value = number(index, name)?;
        i32::try_from(value).map_err(|_| LibraryError::MalformedRecord {
            line,
            reason: format!("{} {} is out of range", name, value),
        })
    };

    let ordinal = number(3, "status")?;
    let status = u8::try_from(ordinal)
        .ok()
        .and_then(BookStatus::from_ordinal)
        .ok_or_else(|| LibraryError::MalformedRecord {
            line,
            reason: format!("unknown status {}", ordinal),
        })?;

    Ok(Book {
        id: BookId(number(0, "id")?),
        title: field(1).to_string(),
        author: field(2).to_string(),
        status,
        edition: small(4, "edition")?,
        year: small(5, "year")?,
    })
}

/// Bulk load/save of the catalog file through a [`Storage`] backend.
pub struct BookRepository<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BookRepository<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn location(&self) -> String {
        Path::new(self.config.data_dir())
            .join(self.config.books_file())
            .display()
            .to_string()
    }

    pub async fn exists(&self) -> Result<bool> {
        self.storage.exists(self.config.books_file()).await
    }

    /// Books in file order. A missing file yields an empty catalog.
    pub async fn load(&self) -> Result<Vec<Book>> {
        let path = self.config.books_file();
        if !self.storage.exists(path).await? {
            tracing::info!("No catalog file at {}, starting empty", self.location());
            return Ok(Vec::new());
        }
        let data = self.storage.read_file(path).await?;
        let books = decode_books(&data)?;
        tracing::info!("Loaded {} books from {}", books.len(), self.location());
        Ok(books)
    }

    pub async fn save<'a>(&self, books: impl IntoIterator<Item = &'a Book>) -> Result<usize> {
        let books: Vec<&Book> = books.into_iter().collect();
        let count = books.len();
        let data = encode_books(books)?;
        self.storage.write_file(self.config.books_file(), &data).await?;
        tracing::info!("Saved {} books to {}", count, self.location());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str, status: BookStatus) -> Book {
        Book {
            id: BookId(id),
            title: title.to_string(),
            author: "Author".to_string(),
            edition: 2,
            year: 1999,
            status,
        }
    }

    #[test]
    fn test_encode_matches_legacy_lines() {
        let books = vec![
            book(2, "Dune", BookStatus::Borrowed),
            book(1, "Emma", BookStatus::Available),
        ];
        let data = encode_books(&books).unwrap();
        assert_eq!(
            String::from_utf8(data).unwrap(),
            "2,Dune,Author,1,2,1999\n1,Emma,Author,0,2,1999\n"
        );
    }

    #[test]
    fn test_leading_quote_in_title() {
        let books = vec![book(4, "\"Quoted\" Title", BookStatus::Available)];
        let data = encode_books(&books).unwrap();
        assert_eq!(
            String::from_utf8(data.clone()).unwrap(),
            "4,\"\"\"Quoted\"\" Title\",Author,0,2,1999\n"
        );
        assert_eq!(decode_books(&data).unwrap(), books);

        let hand_written = b"4,\"Quoted Title,Author,0,2,1999\n5,Emma,Austen,0,3,1815\n";
        let err = decode_books(hand_written).unwrap_err();
        assert!(matches!(err, LibraryError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_decode_legacy_file() {
        let data = b"7,The Hobbit,Tolkien,2,1,1937\n\n3,Emma,Austen,0,3,1815\n";
        let books = decode_books(data).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, BookId(7));
        assert_eq!(books[0].status, BookStatus::Reserved);
        assert_eq!(books[1].title, "Emma");
        assert_eq!(books[1].year, 1815);
    }

    #[test]
    fn test_commas_in_title_survive() {
        let books = vec![book(1, "Eats, Shoots & Leaves", BookStatus::Available)];
        let data = encode_books(&books).unwrap();
        assert_eq!(decode_books(&data).unwrap(), books);
    }

    #[test]
    fn test_malformed_lines_report_position() {
        let err = decode_books(b"1,Dune,Herbert,0,1,1965\n2,Emma,Austen,9,1,1815\n").unwrap_err();
        assert!(matches!(err, LibraryError::MalformedRecord { line: 2, .. }));

        let err = decode_books(b"1,Dune,Herbert,0,1\n").unwrap_err();
        assert!(matches!(err, LibraryError::MalformedRecord { line: 1, .. }));

        let err = decode_books(b"x,Dune,Herbert,0,1,1965\n").unwrap_err();
        assert!(matches!(err, LibraryError::MalformedRecord { .. }));
    }
}
