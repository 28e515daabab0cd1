use crate::app::session::{LoadOutcome, Session};
use crate::domain::model::{BookId, MemberId, NewBook, NewMember};
use crate::domain::ports::{ConfigProvider, DateProvider, Storage};
use crate::utils::error::{LibraryError, Result};
use crate::utils::validation::{parse_number, parse_text};
use std::io::{BufRead, Write};
use std::str::FromStr;

const MENU: &str = "\nLibrary Management System\n\
1. Add Book\n2. Display Books\n3. Remove Book\n4. Add Member\n5. Display Members\n\
6. Borrow Book\n7. Return Book\n8. Save Data\n9. Load Data\n10. Sort Books\n11. Search Books\n12. Exit\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Numbered text menu over any line source and sink. Ends on "12" or at end
/// of input.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run<S, C, D>(&mut self, session: &mut Session<S, C, D>) -> Result<()>
    where
        S: Storage,
        C: ConfigProvider,
        D: DateProvider,
    {
        loop {
            write!(self.output, "{}", MENU)?;
            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let flow = match line.trim() {
                "1" => self.add_book(session)?,
                "2" => self.display_books(&*session)?,
                "3" => self.remove_book(session)?,
                "4" => self.add_member(session)?,
                "5" => self.display_members(&*session)?,
                "6" => self.borrow_book(session)?,
                "7" => self.return_book(session)?,
                "8" => self.save(&*session).await?,
                "9" => self.load(session).await?,
                "10" => {
                    session.service_mut().catalog_mut().sort_by_year();
                    writeln!(self.output, "Books sorted by year.")?;
                    Flow::Continue
                }
                "11" => self.search_books(&*session)?,
                "12" => {
                    writeln!(self.output, "Exiting...")?;
                    Flow::Exit
                }
                other => {
                    tracing::debug!("Unknown menu choice '{}'", other);
                    writeln!(self.output, "Invalid choice. Try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn add_book<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &mut Session<S, C, D>,
    ) -> Result<Flow> {
        let Some(id) = self.prompt_number::<i64>("Enter Book ID: ", "Book ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(title) = self.prompt_text("Enter Title: ", "Title")? else {
            return Ok(Flow::Exit);
        };
        let Some(author) = self.prompt_text("Enter Author: ", "Author")? else {
            return Ok(Flow::Exit);
        };
        let Some(edition) = self.prompt_number::<i32>("Enter Edition: ", "Edition")? else {
            return Ok(Flow::Exit);
        };
        let Some(year) = self.prompt_number::<i32>("Enter Year: ", "Year")? else {
            return Ok(Flow::Exit);
        };

        let book = NewBook::new(id, title, author, edition, year);
        match session.service_mut().catalog_mut().add_book(book) {
            Ok(_) => writeln!(self.output, "Book added successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn display_books<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &Session<S, C, D>,
    ) -> Result<Flow> {
        let catalog = session.service().catalog();
        if catalog.is_empty() {
            writeln!(self.output, "No books available.")?;
        }
        for book in catalog.list() {
            writeln!(self.output, "{}", book)?;
        }
        Ok(Flow::Continue)
    }

    fn remove_book<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &mut Session<S, C, D>,
    ) -> Result<Flow> {
        let Some(id) = self.prompt_number::<i64>("Enter Book ID to remove: ", "Book ID")? else {
            return Ok(Flow::Exit);
        };
        match session.service_mut().withdraw_book(BookId(id)) {
            Ok(_) => writeln!(self.output, "Book removed successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn add_member<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &mut Session<S, C, D>,
    ) -> Result<Flow> {
        let Some(id) = self.prompt_number::<i64>("Enter Member ID: ", "Member ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = self.prompt_text("Enter Member Name: ", "Member name")? else {
            return Ok(Flow::Exit);
        };
        match session
            .service_mut()
            .directory_mut()
            .add_member(NewMember::new(id, name))
        {
            Ok(_) => writeln!(self.output, "Member added successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn display_members<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &Session<S, C, D>,
    ) -> Result<Flow> {
        let directory = session.service().directory();
        if directory.is_empty() {
            writeln!(self.output, "No members available.")?;
        }
        for member in directory.list() {
            writeln!(self.output, "{}", member)?;
        }
        Ok(Flow::Continue)
    }

    fn borrow_book<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &mut Session<S, C, D>,
    ) -> Result<Flow> {
        let Some((member_id, book_id)) = self.prompt_loan()? else {
            return Ok(Flow::Exit);
        };
        match session.service_mut().borrow(member_id, book_id) {
            Ok(receipt) => writeln!(
                self.output,
                "Book borrowed successfully! Due date: {}",
                receipt.due_on
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn return_book<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &mut Session<S, C, D>,
    ) -> Result<Flow> {
        let Some((member_id, book_id)) = self.prompt_loan()? else {
            return Ok(Flow::Exit);
        };
        match session.service_mut().return_book(member_id, book_id) {
            Ok(receipt) => {
                writeln!(
                    self.output,
                    "Book returned successfully on {}",
                    receipt.returned_on
                )?;
                if receipt.is_late() {
                    writeln!(self.output, "Note: the book was due on {}.", receipt.due_on)?;
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    async fn save<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &Session<S, C, D>,
    ) -> Result<Flow> {
        match session.save().await {
            Ok(_) => writeln!(self.output, "Data saved to {}", session.location())?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    async fn load<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &mut Session<S, C, D>,
    ) -> Result<Flow> {
        match session.load().await {
            Ok(LoadOutcome::Missing) => {
                writeln!(self.output, "File not found. Starting with empty data.")?
            }
            Ok(LoadOutcome::Loaded { .. }) => {
                writeln!(self.output, "Data loaded from {}", session.location())?
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn search_books<S: Storage, C: ConfigProvider, D: DateProvider>(
        &mut self,
        session: &Session<S, C, D>,
    ) -> Result<Flow> {
        let Some(line) = self.prompt("Enter book title to search: ")? else {
            return Ok(Flow::Exit);
        };
        let fragment = line.trim_end_matches(['\r', '\n']);

        let mut found = false;
        for book in session.service().catalog().search_by_title(fragment) {
            writeln!(self.output, "{}", book)?;
            found = true;
        }
        if !found {
            writeln!(self.output, "No books found with the title \"{}\".", fragment)?;
        }
        Ok(Flow::Continue)
    }

    fn prompt_loan(&mut self) -> Result<Option<(MemberId, BookId)>> {
        let Some(member_id) = self.prompt_number::<i64>("Enter Member ID: ", "Member ID")? else {
            return Ok(None);
        };
        let Some(book_id) = self.prompt_number::<i64>("Enter Book ID: ", "Book ID")? else {
            return Ok(None);
        };
        Ok(Some((MemberId(member_id), BookId(book_id))))
    }

    fn report(&mut self, error: &LibraryError) -> Result<()> {
        tracing::debug!("Operation refused: {} ({:?})", error, error.category());
        writeln!(self.output, "{}", error.user_friendly_message())?;
        Ok(())
    }

    /// Reads one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Re-asks until the parser accepts the line.
    fn prompt_parsed<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "{}", e.user_friendly_message())?,
            }
        }
    }

    fn prompt_number<T: FromStr>(&mut self, label: &str, field: &str) -> Result<Option<T>> {
        self.prompt_parsed(label, |line| parse_number::<T>(field, line))
    }

    fn prompt_text(&mut self, label: &str, field: &str) -> Result<Option<String>> {
        self.prompt_parsed(label, |line| parse_text(field, line))
    }
}
