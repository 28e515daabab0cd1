use crate::domain::model::{Book, BookId, BookStatus, NewBook};
use crate::utils::error::{LibraryError, Result};
use std::collections::{HashMap, VecDeque};

/// Book records keyed by id, plus the listing order (newest first).
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    books: HashMap<BookId, Book>,
    order: VecDeque<BookId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_book(&mut self, book: NewBook) -> Result<&Book> {
        let id = book.id;
        if self.books.contains_key(&id) {
            tracing::warn!("Refusing duplicate book id {}", id);
            return Err(LibraryError::DuplicateBookId { id });
        }
        self.order.push_front(id);
        tracing::debug!("Added book {}", id);
        Ok(&*self.books.entry(id).or_insert_with(|| Book::from(book)))
    }

    /// Removes the record only. Open loans and member holdings that refer to
    /// the book are left untouched.
    pub fn remove_book(&mut self, id: BookId) -> Result<Book> {
        let book = self
            .books
            .remove(&id)
            .ok_or(LibraryError::BookNotFound { id })?;
        self.order.retain(|other| *other != id);
        tracing::debug!("Removed book {}", id);
        Ok(book)
    }

    pub fn find(&self, id: BookId) -> Result<&Book> {
        self.books.get(&id).ok_or(LibraryError::BookNotFound { id })
    }

    pub fn contains(&self, id: BookId) -> bool {
        self.books.contains_key(&id)
    }

    /// Newest first, or ascending year after [`Catalog::sort_by_year`].
    pub fn list(&self) -> impl Iterator<Item = &Book> + '_ {
        self.order.iter().filter_map(move |id| self.books.get(id))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Stable: books of the same year keep their current relative order.
    pub fn sort_by_year(&mut self) {
        let books = &self.books;
        self.order
            .make_contiguous()
            .sort_by_key(|id| books.get(id).map_or(i32::MAX, |book| book.year));
    }

    /// Case-sensitive substring match on the title, in listing order.
    pub fn search_by_title<'a>(&'a self, fragment: &'a str) -> impl Iterator<Item = &'a Book> + 'a {
        self.list().filter(move |book| book.title.contains(fragment))
    }

    /// Swaps in a whole catalog, listed in the order given.
    pub fn replace_all(&mut self, books: Vec<Book>) -> Result<()> {
        let mut loaded = HashMap::with_capacity(books.len());
        let mut order = VecDeque::with_capacity(books.len());
        for book in books {
            let id = book.id;
            if loaded.insert(id, book).is_some() {
                return Err(LibraryError::DuplicateBookId { id });
            }
            order.push_back(id);
        }
        self.books = loaded;
        self.order = order;
        Ok(())
    }

    pub(crate) fn set_status(&mut self, id: BookId, status: BookStatus) -> bool {
        match self.books.get_mut(&id) {
            Some(book) => {
                book.status = status;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_years(years: &[i32]) -> Catalog {
        let mut catalog = Catalog::new();
        for (i, year) in years.iter().enumerate() {
            let id = i as i64 + 1;
            catalog
                .add_book(NewBook::new(id, format!("Book {}", id), "Author", 1, *year))
                .unwrap();
        }
        catalog
    }

    fn ids(catalog: &Catalog) -> Vec<i64> {
        catalog.list().map(|book| book.id.0).collect()
    }

    #[test]
    fn test_list_is_newest_first() {
        let catalog = catalog_with_years(&[2000, 2001, 2002]);
        assert_eq!(ids(&catalog), vec![3, 2, 1]);
        assert!(catalog.list().all(|book| book.status == BookStatus::Available));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut catalog = catalog_with_years(&[2000]);
        let err = catalog
            .add_book(NewBook::new(1, "Other", "Someone", 2, 2010))
            .unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateBookId { id } if id == BookId(1)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find(BookId(1)).unwrap().title, "Book 1");
    }

    #[test]
    fn test_remove_missing_book_leaves_catalog_unchanged() {
        let mut catalog = catalog_with_years(&[2000, 2001]);
        let before: Vec<Book> = catalog.list().cloned().collect();

        let err = catalog.remove_book(BookId(99)).unwrap_err();

        assert!(matches!(err, LibraryError::BookNotFound { .. }));
        let after: Vec<Book> = catalog.list().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_book() {
        let mut catalog = catalog_with_years(&[2000, 2001, 2002]);
        let removed = catalog.remove_book(BookId(2)).unwrap();
        assert_eq!(removed.year, 2001);
        assert_eq!(ids(&catalog), vec![3, 1]);
        assert!(catalog.find(BookId(2)).is_err());
    }

    #[test]
    fn test_sort_by_year_is_stable() {
        // Inserted as ids 1..=4; listed newest first: 4(1980), 3(2001), 2(1999), 1(2001).
        let mut catalog = catalog_with_years(&[2001, 1999, 2001, 1980]);
        catalog.sort_by_year();

        let years: Vec<i32> = catalog.list().map(|book| book.year).collect();
        assert_eq!(years, vec![1980, 1999, 2001, 2001]);
        // The two 2001 entries keep their pre-sort relative order.
        assert_eq!(ids(&catalog), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_sort_does_not_touch_status() {
        let mut catalog = catalog_with_years(&[2005, 1990]);
        catalog.set_status(BookId(1), BookStatus::Borrowed);
        catalog.sort_by_year();
        assert_eq!(catalog.find(BookId(1)).unwrap().status, BookStatus::Borrowed);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_search_by_title() {
        let mut catalog = Catalog::new();
        catalog.add_book(NewBook::new(1, "The Rust Book", "Klabnik", 2, 2023)).unwrap();
        catalog.add_book(NewBook::new(2, "Dune", "Herbert", 1, 1965)).unwrap();
        catalog.add_book(NewBook::new(3, "Rust Atomics", "Bos", 1, 2023)).unwrap();

        let found: Vec<i64> = catalog.search_by_title("Rust").map(|b| b.id.0).collect();
        assert_eq!(found, vec![3, 1]);
        assert_eq!(catalog.search_by_title("rust").count(), 0);
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let mut catalog = catalog_with_years(&[2000]);
        let book = catalog.find(BookId(1)).unwrap().clone();
        let err = catalog.replace_all(vec![book.clone(), book]).unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateBookId { .. }));
        assert_eq!(catalog.len(), 1);
    }
}
