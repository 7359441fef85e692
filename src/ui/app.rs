use std::cmp::min;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{
    create_author, create_book, create_genre, create_reader, delete_author, delete_book,
    delete_genre, delete_reader, fetch_authors, fetch_books, fetch_genres, fetch_reader_loans,
    fetch_readers, record_loan, release_loan, transfer_loan, update_author, update_book,
    update_genre, update_reader,
};
use crate::models::{Author, BookRow, Genre, Reader};

use super::forms::{
    AuthorField, AuthorForm, BookField, BookForm, ConfirmDelete, ConfirmReturn, EntityKind,
    GenreForm, LoanField, LoanForm, ReaderField, ReaderForm, TransferPicker,
};
use super::helpers::{centered_rect, surface_error};
use super::screens::{ListScreen, LoanScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per entity card in list-style views.
const CARD_HEIGHT: u16 = 5;
/// Launcher entries in the order the original main window listed them.
const MENU_ITEMS: [&str; 5] = [
    "Manage Books",
    "Manage Authors",
    "Manage Genres",
    "Manage Readers",
    "Register Loans",
];

/// High-level navigation states. Keeping this explicit makes it easy to
/// reason about which rendering path runs and what keyboard shortcuts do.
enum Screen {
    Launcher,
    Books(ListScreen<BookRow>),
    Authors(ListScreen<Author>),
    Genres(ListScreen<Genre>),
    Readers(ListScreen<Reader>),
    Loans(LoanScreen),
}

/// Fine-grained modes scoped to the current screen. Add and edit share a
/// variant per entity, distinguished by the optional row id.
enum Mode {
    Normal,
    BookForm {
        id: Option<i64>,
        form: BookForm,
    },
    AuthorForm {
        id: Option<i64>,
        form: AuthorForm,
    },
    GenreForm {
        id: Option<i64>,
        form: GenreForm,
    },
    ReaderForm {
        id: Option<i64>,
        form: ReaderForm,
    },
    ConfirmDelete(ConfirmDelete),
    RecordingLoan(LoanForm),
    TransferringLoan(TransferPicker),
    ConfirmReturn(ConfirmReturn),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. The connection lives
/// here for the process lifetime; every store call goes through it, so all
/// mutations naturally serialize.
pub struct App {
    conn: Connection,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    menu_selected: usize,
}

impl App {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            screen: Screen::Launcher,
            mode: Mode::Normal,
            status: None,
            menu_selected: 0,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::BookForm { id, form } => self.handle_book_form(code, id, form)?,
            Mode::AuthorForm { id, form } => self.handle_author_form(code, id, form)?,
            Mode::GenreForm { id, form } => self.handle_genre_form(code, id, form)?,
            Mode::ReaderForm { id, form } => self.handle_reader_form(code, id, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::RecordingLoan(form) => self.handle_loan_form(code, form)?,
            Mode::TransferringLoan(picker) => self.handle_transfer(code, picker)?,
            Mode::ConfirmReturn(confirm) => self.handle_confirm_return(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Launcher => self.handle_launcher_key(code, exit),
            Screen::Books(_) => self.handle_books_key(code, exit),
            Screen::Authors(_) => self.handle_authors_key(code, exit),
            Screen::Genres(_) => self.handle_genres_key(code, exit),
            Screen::Readers(_) => self.handle_readers_key(code, exit),
            Screen::Loans(_) => self.handle_loans_key(code, exit),
        }
    }

    fn handle_launcher_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => {
                if self.menu_selected > 0 {
                    self.menu_selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.menu_selected + 1 < MENU_ITEMS.len() {
                    self.menu_selected += 1;
                }
            }
            KeyCode::Enter => {
                self.clear_status();
                match self.menu_selected {
                    0 => self.open_books()?,
                    1 => self.open_authors()?,
                    2 => self.open_genres()?,
                    3 => self.open_readers()?,
                    _ => self.open_loans()?,
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_books_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Home
            | KeyCode::End => {
                if let Screen::Books(books) = &mut self.screen {
                    apply_movement(books, code);
                }
            }
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Launcher;
            }
            KeyCode::Char('+') => {
                self.clear_status();
                let authors = fetch_authors(&self.conn)?;
                let genres = fetch_genres(&self.conn)?;
                return Ok(Mode::BookForm {
                    id: None,
                    form: BookForm::new(&authors, &genres),
                });
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let row = self.current_book();
                if let Some(row) = row {
                    self.clear_status();
                    let authors = fetch_authors(&self.conn)?;
                    let genres = fetch_genres(&self.conn)?;
                    return Ok(Mode::BookForm {
                        id: Some(row.book.id),
                        form: BookForm::from_book(&row, &authors, &genres),
                    });
                }
                self.set_status("No book selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') => {
                let row = self.current_book();
                if let Some(row) = row {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        entity: EntityKind::Book,
                        id: row.book.id,
                        summary: format!("{} ({})", row.book.title, row.book.isbn),
                    }));
                }
                self.set_status("No book selected to remove.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_authors_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Home
            | KeyCode::End => {
                if let Screen::Authors(authors) = &mut self.screen {
                    apply_movement(authors, code);
                }
            }
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Launcher;
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AuthorForm {
                    id: None,
                    form: AuthorForm::default(),
                });
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let author = self.current_author();
                if let Some(author) = author {
                    self.clear_status();
                    return Ok(Mode::AuthorForm {
                        id: Some(author.id),
                        form: AuthorForm::from_author(&author),
                    });
                }
                self.set_status("No author selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') => {
                let author = self.current_author();
                if let Some(author) = author {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        entity: EntityKind::Author,
                        id: author.id,
                        summary: author.name,
                    }));
                }
                self.set_status("No author selected to remove.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_genres_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Home
            | KeyCode::End => {
                if let Screen::Genres(genres) = &mut self.screen {
                    apply_movement(genres, code);
                }
            }
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Launcher;
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::GenreForm {
                    id: None,
                    form: GenreForm::default(),
                });
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let genre = self.current_genre();
                if let Some(genre) = genre {
                    self.clear_status();
                    return Ok(Mode::GenreForm {
                        id: Some(genre.id),
                        form: GenreForm::from_genre(&genre),
                    });
                }
                self.set_status("No genre selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') => {
                let genre = self.current_genre();
                if let Some(genre) = genre {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        entity: EntityKind::Genre,
                        id: genre.id,
                        summary: genre.name,
                    }));
                }
                self.set_status("No genre selected to remove.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_readers_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Home
            | KeyCode::End => {
                if let Screen::Readers(readers) = &mut self.screen {
                    apply_movement(readers, code);
                }
            }
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Launcher;
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::ReaderForm {
                    id: None,
                    form: ReaderForm::default(),
                });
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let reader = self.current_reader_row();
                if let Some(reader) = reader {
                    self.clear_status();
                    return Ok(Mode::ReaderForm {
                        id: Some(reader.id),
                        form: ReaderForm::from_reader(&reader),
                    });
                }
                self.set_status("No reader selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') => {
                let reader = self.current_reader_row();
                if let Some(reader) = reader {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        entity: EntityKind::Reader,
                        id: reader.id,
                        summary: format!("{} <{}>", reader.name, reader.email),
                    }));
                }
                self.set_status("No reader selected to remove.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_loans_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown | KeyCode::Home
            | KeyCode::End | KeyCode::Left | KeyCode::Right => {
                if let Screen::Loans(loans) = &mut self.screen {
                    match code {
                        KeyCode::Up => loans.move_selection(-1),
                        KeyCode::Down => loans.move_selection(1),
                        KeyCode::PageUp => loans.move_selection(-5),
                        KeyCode::PageDown => loans.move_selection(5),
                        KeyCode::Home => loans.select_first(),
                        KeyCode::End => loans.select_last(),
                        KeyCode::Left => loans.move_book_cursor(-1),
                        KeyCode::Right => loans.move_book_cursor(1),
                        _ => {}
                    }
                }
            }
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Launcher;
            }
            KeyCode::Char('+') => {
                let readers = fetch_readers(&self.conn)?;
                if readers.is_empty() {
                    self.set_status("Add a reader before recording a loan.", StatusKind::Error);
                    return Ok(Mode::Normal);
                }
                let books = fetch_books(&self.conn)?;
                if books.is_empty() {
                    self.set_status("Add a book before recording a loan.", StatusKind::Error);
                    return Ok(Mode::Normal);
                }
                self.clear_status();
                return Ok(Mode::RecordingLoan(LoanForm::new(&readers, &books)));
            }
            KeyCode::Char('-') => {
                if let Some(confirm) = self.current_loan_target() {
                    self.clear_status();
                    return Ok(Mode::ConfirmReturn(confirm));
                }
                self.set_status("No loan selected to return.", StatusKind::Error);
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                if let Some(target) = self.current_loan_target() {
                    let readers = fetch_readers(&self.conn)?;
                    let picker = TransferPicker::new(
                        target.reader_id,
                        target.book_id,
                        target.book_title,
                        &readers,
                    );
                    if picker.choices.is_empty() {
                        self.set_status(
                            "No other reader to transfer the loan to.",
                            StatusKind::Error,
                        );
                        return Ok(Mode::Normal);
                    }
                    self.clear_status();
                    return Ok(Mode::TransferringLoan(picker));
                }
                self.set_status("No loan selected to transfer.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_book_form(
        &mut self,
        code: KeyCode,
        id: Option<i64>,
        mut form: BookForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Left => form.cycle(-1),
            KeyCode::Right => form.cycle(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_book(id, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::BookForm { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_author_form(
        &mut self,
        code: KeyCode,
        id: Option<i64>,
        mut form: AuthorForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_author(id, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AuthorForm { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_genre_form(
        &mut self,
        code: KeyCode,
        id: Option<i64>,
        mut form: GenreForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_genre(id, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::GenreForm { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_reader_form(
        &mut self,
        code: KeyCode,
        id: Option<i64>,
        mut form: ReaderForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_reader(id, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::ReaderForm { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(_) => {
                        self.set_status(
                            format!("Deleted {}.", confirm.summary),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_loan_form(&mut self, code: KeyCode, mut form: LoanForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Left | KeyCode::Up => form.cycle(-1),
            KeyCode::Right | KeyCode::Down => form.cycle(1),
            KeyCode::Enter => {
                let (book_id, reader_id) = form.selection();
                match record_loan(&self.conn, book_id, reader_id) {
                    Ok(_) => {
                        self.refresh_loans()?;
                        self.set_status("Loan recorded.", StatusKind::Info);
                        keep_open = false;
                    }
                    Err(err) => {
                        let message = surface_error(&err.into());
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::RecordingLoan(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_transfer(&mut self, code: KeyCode, mut picker: TransferPicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Transfer cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Up => {
                picker.move_selection(-1);
                Ok(Mode::TransferringLoan(picker))
            }
            KeyCode::Down => {
                picker.move_selection(1);
                Ok(Mode::TransferringLoan(picker))
            }
            KeyCode::Enter => {
                let Some((new_reader_id, label)) = picker.current().cloned() else {
                    return Ok(Mode::Normal);
                };
                match transfer_loan(&self.conn, picker.reader_id, new_reader_id, picker.book_id) {
                    Ok(_) => {
                        self.refresh_loans()?;
                        self.set_status(
                            format!("Transferred \"{}\" to {label}.", picker.book_title),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err.into());
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::TransferringLoan(picker))
                    }
                }
            }
            _ => Ok(Mode::TransferringLoan(picker)),
        }
    }

    fn handle_confirm_return(&mut self, code: KeyCode, confirm: ConfirmReturn) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Return cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match release_loan(&self.conn, confirm.reader_id, confirm.book_id) {
                    Ok(_) => {
                        self.refresh_loans()?;
                        self.set_status(
                            format!("Returned \"{}\".", confirm.book_title),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err.into());
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmReturn(confirm)),
        }
    }

    // Persistence glue: one save per entity, shared by add and edit.

    fn save_book(&mut self, id: Option<i64>, form: &BookForm) -> Result<()> {
        let (title, isbn, author_id, genre_id) = form.parse_inputs()?;
        match id {
            Some(id) => {
                update_book(&self.conn, id, &title, &isbn, author_id, genre_id)?;
                self.refresh_books(Some(id))?;
                self.set_status(format!("Updated \"{title}\"."), StatusKind::Info);
            }
            None => {
                let book = create_book(&self.conn, &title, &isbn, author_id, genre_id)?;
                self.refresh_books(Some(book.id))?;
                self.set_status(format!("Added \"{title}\"."), StatusKind::Info);
            }
        }
        Ok(())
    }

    fn save_author(&mut self, id: Option<i64>, form: &AuthorForm) -> Result<()> {
        let (name, biography) = form.parse_inputs()?;
        match id {
            Some(id) => {
                update_author(&self.conn, id, &name, &biography)?;
                self.set_status(format!("Updated {name}."), StatusKind::Info);
            }
            None => {
                create_author(&self.conn, &name, &biography)?;
                self.set_status(format!("Added {name}."), StatusKind::Info);
            }
        }
        self.refresh_authors()?;
        Ok(())
    }

    fn save_genre(&mut self, id: Option<i64>, form: &GenreForm) -> Result<()> {
        let name = form.parse_inputs()?;
        match id {
            Some(id) => {
                update_genre(&self.conn, id, &name)?;
                self.set_status(format!("Updated {name}."), StatusKind::Info);
            }
            None => {
                create_genre(&self.conn, &name)?;
                self.set_status(format!("Added {name}."), StatusKind::Info);
            }
        }
        self.refresh_genres()?;
        Ok(())
    }

    fn save_reader(&mut self, id: Option<i64>, form: &ReaderForm) -> Result<()> {
        let (name, email) = form.parse_inputs()?;
        match id {
            Some(id) => {
                update_reader(&self.conn, id, &name, &email)?;
                self.set_status(format!("Updated {name}."), StatusKind::Info);
            }
            None => {
                create_reader(&self.conn, &name, &email)?;
                self.set_status(format!("Added {name}."), StatusKind::Info);
            }
        }
        self.refresh_readers()?;
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        match confirm.entity {
            EntityKind::Book => {
                delete_book(&self.conn, confirm.id)?;
                self.refresh_books(None)?;
            }
            EntityKind::Author => {
                delete_author(&self.conn, confirm.id)?;
                self.refresh_authors()?;
            }
            EntityKind::Genre => {
                delete_genre(&self.conn, confirm.id)?;
                self.refresh_genres()?;
            }
            EntityKind::Reader => {
                delete_reader(&self.conn, confirm.id)?;
                self.refresh_readers()?;
            }
        }
        Ok(())
    }

    // Screen lifecycle: open fetches the full list, refresh re-fetches it
    // after every successful mutation.

    fn open_books(&mut self) -> Result<()> {
        let rows = fetch_books(&self.conn)?;
        self.screen = Screen::Books(ListScreen::new(rows));
        Ok(())
    }

    fn open_authors(&mut self) -> Result<()> {
        let rows = fetch_authors(&self.conn)?;
        self.screen = Screen::Authors(ListScreen::new(rows));
        Ok(())
    }

    fn open_genres(&mut self) -> Result<()> {
        let rows = fetch_genres(&self.conn)?;
        self.screen = Screen::Genres(ListScreen::new(rows));
        Ok(())
    }

    fn open_readers(&mut self) -> Result<()> {
        let rows = fetch_readers(&self.conn)?;
        self.screen = Screen::Readers(ListScreen::new(rows));
        Ok(())
    }

    fn open_loans(&mut self) -> Result<()> {
        let readers = fetch_reader_loans(&self.conn)?;
        self.screen = Screen::Loans(LoanScreen::new(readers));
        Ok(())
    }

    fn refresh_books(&mut self, focus_id: Option<i64>) -> Result<()> {
        if let Screen::Books(books) = &mut self.screen {
            let rows = fetch_books(&self.conn)?;
            let focus = focus_id
                .and_then(|id| rows.iter().position(|row| row.book.id == id));
            books.set_rows(rows);
            if let Some(idx) = focus {
                books.focus(idx);
            }
        }
        Ok(())
    }

    fn refresh_authors(&mut self) -> Result<()> {
        if let Screen::Authors(authors) = &mut self.screen {
            authors.set_rows(fetch_authors(&self.conn)?);
        }
        Ok(())
    }

    fn refresh_genres(&mut self) -> Result<()> {
        if let Screen::Genres(genres) = &mut self.screen {
            genres.set_rows(fetch_genres(&self.conn)?);
        }
        Ok(())
    }

    fn refresh_readers(&mut self) -> Result<()> {
        if let Screen::Readers(readers) = &mut self.screen {
            readers.set_rows(fetch_readers(&self.conn)?);
        }
        Ok(())
    }

    fn refresh_loans(&mut self) -> Result<()> {
        if let Screen::Loans(loans) = &mut self.screen {
            loans.set_readers(fetch_reader_loans(&self.conn)?);
        }
        Ok(())
    }

    // Cloned accessors so action handlers can borrow `self` freely.

    fn current_book(&self) -> Option<BookRow> {
        match &self.screen {
            Screen::Books(books) => books.current().cloned(),
            _ => None,
        }
    }

    fn current_author(&self) -> Option<Author> {
        match &self.screen {
            Screen::Authors(authors) => authors.current().cloned(),
            _ => None,
        }
    }

    fn current_genre(&self) -> Option<Genre> {
        match &self.screen {
            Screen::Genres(genres) => genres.current().cloned(),
            _ => None,
        }
    }

    fn current_reader_row(&self) -> Option<Reader> {
        match &self.screen {
            Screen::Readers(readers) => readers.current().cloned(),
            _ => None,
        }
    }

    /// The exact loan the cursor pair is resting on, packaged for the
    /// return/transfer dialogs.
    fn current_loan_target(&self) -> Option<ConfirmReturn> {
        let Screen::Loans(loans) = &self.screen else {
            return None;
        };
        let entry = loans.current_reader()?;
        let loan = loans.current_loan()?;
        Some(ConfirmReturn {
            reader_id: entry.reader.id,
            book_id: loan.book_id,
            reader_name: entry.reader.name.clone(),
            book_title: loan.title.clone(),
        })
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

impl App {
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Launcher => self.draw_launcher(frame, content_area),
            Screen::Books(books) => self.draw_books(frame, content_area, books),
            Screen::Authors(authors) => self.draw_authors(frame, content_area, authors),
            Screen::Genres(genres) => self.draw_genres(frame, content_area, genres),
            Screen::Readers(readers) => self.draw_readers(frame, content_area, readers),
            Screen::Loans(loans) => self.draw_loans(frame, content_area, loans),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::BookForm { id, form } => {
                let title = if id.is_some() { "Edit Book" } else { "Add Book" };
                self.draw_book_form(frame, area, title, form);
            }
            Mode::AuthorForm { id, form } => {
                let title = if id.is_some() { "Edit Author" } else { "Add Author" };
                self.draw_author_form(frame, area, title, form);
            }
            Mode::GenreForm { id, form } => {
                let title = if id.is_some() { "Edit Genre" } else { "Add Genre" };
                self.draw_genre_form(frame, area, title, form);
            }
            Mode::ReaderForm { id, form } => {
                let title = if id.is_some() { "Edit Reader" } else { "Add Reader" };
                self.draw_reader_form(frame, area, title, form);
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::RecordingLoan(form) => self.draw_loan_form(frame, area, form),
            Mode::TransferringLoan(picker) => self.draw_transfer(frame, area, picker),
            Mode::ConfirmReturn(confirm) => self.draw_confirm_return(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_launcher(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(Span::styled(
            "Library Catalog",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = MENU_ITEMS.iter().map(|label| ListItem::new(*label)).collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.menu_selected));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_books(&self, frame: &mut Frame, area: Rect, books: &ListScreen<BookRow>) {
        if books.rows.is_empty() {
            let message = Paragraph::new("No books yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Books"));
            frame.render_widget(message, area);
            return;
        }

        self.render_cards(frame, area, books.rows.len(), books.selected, |idx, selected| {
            let row = &books.rows[idx];
            let title = if selected {
                format!("> {}", row.book.title)
            } else {
                row.book.title.clone()
            };
            vec![
                Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("ISBN {}", row.book.isbn),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    format!("{} / {}", row.author_display(), row.genre_display()),
                    Style::default().fg(Color::Gray),
                )),
            ]
        });
    }

    fn draw_authors(&self, frame: &mut Frame, area: Rect, authors: &ListScreen<Author>) {
        if authors.rows.is_empty() {
            let message = Paragraph::new("No authors yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Authors"));
            frame.render_widget(message, area);
            return;
        }

        self.render_cards(
            frame,
            area,
            authors.rows.len(),
            authors.selected,
            |idx, selected| {
                let author = &authors.rows[idx];
                let name = if selected {
                    format!("> {}", author.name)
                } else {
                    author.name.clone()
                };
                let biography = if author.biography.trim().is_empty() {
                    "No biography.".to_string()
                } else {
                    author.biography.clone()
                };
                vec![
                    Line::from(Span::styled(
                        name,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(biography, Style::default().fg(Color::Gray))),
                ]
            },
        );
    }

    fn draw_genres(&self, frame: &mut Frame, area: Rect, genres: &ListScreen<Genre>) {
        if genres.rows.is_empty() {
            let message = Paragraph::new("No genres yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Genres"));
            frame.render_widget(message, area);
            return;
        }

        self.render_cards(
            frame,
            area,
            genres.rows.len(),
            genres.selected,
            |idx, selected| {
                let genre = &genres.rows[idx];
                let name = if selected {
                    format!("> {}", genre.name)
                } else {
                    genre.name.clone()
                };
                vec![Line::from(Span::styled(
                    name,
                    Style::default().add_modifier(Modifier::BOLD),
                ))]
            },
        );
    }

    fn draw_readers(&self, frame: &mut Frame, area: Rect, readers: &ListScreen<Reader>) {
        if readers.rows.is_empty() {
            let message = Paragraph::new("No readers yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Readers"));
            frame.render_widget(message, area);
            return;
        }

        self.render_cards(
            frame,
            area,
            readers.rows.len(),
            readers.selected,
            |idx, selected| {
                let reader = &readers.rows[idx];
                let name = if selected {
                    format!("> {}", reader.name)
                } else {
                    reader.name.clone()
                };
                vec![
                    Line::from(Span::styled(
                        name,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        reader.email.clone(),
                        Style::default().fg(Color::Cyan),
                    )),
                ]
            },
        );
    }

    fn draw_loans(&self, frame: &mut Frame, area: Rect, loans: &LoanScreen) {
        if loans.readers.is_empty() {
            let message = Paragraph::new("No readers yet. Add readers to register loans.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Loans"));
            frame.render_widget(message, area);
            return;
        }

        let book_cursor = loans.book_cursor;
        self.render_cards(
            frame,
            area,
            loans.readers.len(),
            loans.selected,
            |idx, selected| {
                let entry = &loans.readers[idx];
                let name = if selected {
                    format!("> {}", entry.reader.name)
                } else {
                    entry.reader.name.clone()
                };

                let mut loan_spans = vec![Span::raw("On loan: ")];
                if entry.loans.is_empty() {
                    loan_spans.push(Span::styled(
                        "nothing",
                        Style::default().fg(Color::DarkGray),
                    ));
                } else {
                    for (loan_idx, loan) in entry.loans.iter().enumerate() {
                        if loan_idx > 0 {
                            loan_spans.push(Span::raw(", "));
                        }
                        let text = format!("{} ({})", loan.title, loan.loaned_on);
                        let style = if selected && loan_idx == book_cursor {
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        loan_spans.push(Span::styled(text, style));
                    }
                }

                vec![
                    Line::from(Span::styled(
                        name,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        entry.reader.email.clone(),
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(loan_spans),
                ]
            },
        );
    }

    /// Shared card renderer for the list screens: fixed-height bordered
    /// cards, scrolled so the selection stays visible.
    fn render_cards<F>(
        &self,
        frame: &mut Frame,
        area: Rect,
        count: usize,
        selected: usize,
        build: F,
    ) where
        F: Fn(usize, bool) -> Vec<Line<'static>>,
    {
        if count == 0 || area.height == 0 {
            return;
        }

        let card_height = CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > count {
            start = count.saturating_sub(capacity);
        }
        let end = min(start + capacity, count);
        let visible = end.saturating_sub(start);
        if visible == 0 {
            return;
        }

        let constraints: Vec<Constraint> =
            (0..visible).map(|_| Constraint::Length(CARD_HEIGHT)).collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let row_index = start + idx;
            if row_index >= count {
                break;
            }

            let is_selected = row_index == selected;
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let paragraph = Paragraph::new(build(row_index, is_selected))
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::TransferringLoan(_)) => Line::from(vec![
                Span::styled("[Up/Down]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Transfer   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Loans(_), _) => Line::from(vec![
                Span::styled("[Up/Down]", key_style),
                Span::raw(" Reader   "),
                Span::styled("[Left/Right]", key_style),
                Span::raw(" Loan   "),
                Span::styled("[+]", key_style),
                Span::raw(" Record   "),
                Span::styled("[t]", key_style),
                Span::raw(" Transfer   "),
                Span::styled("[-]", key_style),
                Span::raw(" Return   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Launcher, _) => Line::from(vec![
                Span::styled("[Up/Down]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Open   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            _ => Line::from(vec![
                Span::styled("[Up/Down]", key_style),
                Span::raw(" Select   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(BookField::Title),
            form.build_line(BookField::Isbn),
            form.build_line(BookField::Author),
            form.build_line(BookField::Genre),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save / Tab to switch / Left-Right to choose / Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        // The pickers are driven with arrows, so the text cursor only shows
        // on the two text fields.
        let cursor = match form.active {
            BookField::Title => Some((
                "Title: ".len() as u16 + form.value_len(BookField::Title) as u16,
                0,
            )),
            BookField::Isbn => Some((
                "ISBN: ".len() as u16 + form.value_len(BookField::Isbn) as u16,
                1,
            )),
            BookField::Author | BookField::Genre => None,
        };
        if let Some((x, y)) = cursor {
            frame.set_cursor_position((inner.x + x, inner.y + y));
        }
    }

    fn draw_author_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &AuthorForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(AuthorField::Name),
            form.build_line(AuthorField::Biography),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save / Tab to switch / Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (cursor_x, cursor_y) = match form.active {
            AuthorField::Name => (
                "Name: ".len() as u16 + form.value_len(AuthorField::Name) as u16,
                0,
            ),
            AuthorField::Biography => (
                "Biography: ".len() as u16 + form.value_len(AuthorField::Biography) as u16,
                1,
            ),
        };
        frame.set_cursor_position((inner.x + cursor_x, inner.y + cursor_y));
    }

    fn draw_genre_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &GenreForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save / Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = "Name: ".len() as u16 + form.value_len() as u16;
        frame.set_cursor_position((inner.x + cursor_x, inner.y));
    }

    fn draw_reader_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &ReaderForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(ReaderField::Name),
            form.build_line(ReaderField::Email),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save / Tab to switch / Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (cursor_x, cursor_y) = match form.active {
            ReaderField::Name => (
                "Name: ".len() as u16 + form.value_len(ReaderField::Name) as u16,
                0,
            ),
            ReaderField::Email => (
                "Email: ".len() as u16 + form.value_len(ReaderField::Email) as u16,
                1,
            ),
        };
        frame.set_cursor_position((inner.x + cursor_x, inner.y + cursor_y));
    }

    fn draw_loan_form(&self, frame: &mut Frame, area: Rect, form: &LoanForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Record Loan").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(LoanField::Reader),
            form.build_line(LoanField::Book),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to record / Tab to switch / Left-Right to choose / Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_transfer(&self, frame: &mut Frame, area: Rect, picker: &TransferPicker) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Transfer Loan").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(1)])
            .split(inner);

        let header = Paragraph::new(vec![
            Line::from(format!("Move \"{}\" to:", picker.book_title)),
            Line::from(""),
        ]);
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = picker
            .choices
            .iter()
            .map(|(_, label)| ListItem::new(label.clone()))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::NONE))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.selected));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete {} {}?",
                confirm.entity.noun(),
                confirm.summary
            )),
            Line::from("Rows referencing it are left in place."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_return(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmReturn) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Return Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Return \"{}\" from {}?",
                confirm.book_title, confirm.reader_name
            )),
            Line::from("The loan record is removed outright; no history is kept."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Translate the shared movement keys onto a list screen.
fn apply_movement<T>(screen: &mut ListScreen<T>, code: KeyCode) {
    match code {
        KeyCode::Up => screen.move_selection(-1),
        KeyCode::Down => screen.move_selection(1),
        KeyCode::PageUp => screen.move_selection(-5),
        KeyCode::PageDown => screen.move_selection(5),
        KeyCode::Home => screen.select_first(),
        KeyCode::End => screen.select_last(),
        _ => {}
    }
}
