// Adapters layer: concrete implementations of the domain ports.

pub mod book_file;

pub use book_file::{decode_books, encode_books, BookRepository};
