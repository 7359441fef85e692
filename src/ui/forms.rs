use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Author, Book, BookRow, Genre, Reader};

/// Which entity a shared dialog is operating on. The mode variant carries
/// this so one confirm handler can route to the right delete call.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum EntityKind {
    Book,
    Author,
    Genre,
    Reader,
}

impl EntityKind {
    pub(crate) fn noun(self) -> &'static str {
        match self {
            EntityKind::Book => "book",
            EntityKind::Author => "author",
            EntityKind::Genre => "genre",
            EntityKind::Reader => "reader",
        }
    }
}

/// State for the delete confirmation shared by the four entity screens.
pub(crate) struct ConfirmDelete {
    pub(crate) entity: EntityKind,
    pub(crate) id: i64,
    /// Human description of the row, e.g. `Tales (ISBN-1)`.
    pub(crate) summary: String,
}

/// State for confirming the return of one loan association.
pub(crate) struct ConfirmReturn {
    pub(crate) reader_id: i64,
    pub(crate) book_id: i64,
    pub(crate) reader_name: String,
    pub(crate) book_title: String,
}

/// Render a styled form line in the `Label: value` format, highlighting the
/// active field and ghosting placeholders.
fn field_line(
    field_name: &str,
    value: &str,
    placeholder: &str,
    is_active: bool,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Render a picker line as `Label: < choice >`, with arrows only while the
/// field is focused so the affordance is discoverable but quiet.
fn picker_line(field_name: &str, choice: &str, is_active: bool) -> Line<'static> {
    let (display, style) = if is_active {
        (
            format!("< {choice} >"),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (choice.to_string(), Style::default())
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Fields available within the author form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum AuthorField {
    #[default]
    Name,
    Biography,
}

/// Form state for creating or editing an author.
#[derive(Default, Clone)]
pub(crate) struct AuthorForm {
    pub(crate) name: String,
    pub(crate) biography: String,
    pub(crate) active: AuthorField,
    pub(crate) error: Option<String>,
}

impl AuthorForm {
    pub(crate) fn from_author(author: &Author) -> Self {
        Self {
            name: author.name.clone(),
            biography: author.biography.clone(),
            active: AuthorField::Name,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            AuthorField::Name => AuthorField::Biography,
            AuthorField::Biography => AuthorField::Name,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            AuthorField::Name => self.name.push(ch),
            AuthorField::Biography => self.biography.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            AuthorField::Name => {
                self.name.pop();
            }
            AuthorField::Biography => {
                self.biography.pop();
            }
        }
    }

    /// Validate the inputs: the name is required, the biography is not.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Author name is required."));
        }
        Ok((name.to_string(), self.biography.trim().to_string()))
    }

    pub(crate) fn build_line(&self, field: AuthorField) -> Line<'static> {
        match field {
            AuthorField::Name => field_line(
                "Name",
                &self.name,
                "<required>",
                self.active == AuthorField::Name,
            ),
            AuthorField::Biography => field_line(
                "Biography",
                &self.biography,
                "<optional>",
                self.active == AuthorField::Biography,
            ),
        }
    }

    pub(crate) fn value_len(&self, field: AuthorField) -> usize {
        match field {
            AuthorField::Name => self.name.chars().count(),
            AuthorField::Biography => self.biography.chars().count(),
        }
    }
}

/// Form state for creating or renaming a genre. One field, so no focus
/// tracking is needed.
#[derive(Default, Clone)]
pub(crate) struct GenreForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl GenreForm {
    pub(crate) fn from_genre(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    pub(crate) fn parse_inputs(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Genre name is required."));
        }
        Ok(name.to_string())
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line("Name", &self.name, "<required>", true)
    }

    pub(crate) fn value_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Fields available within the reader form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum ReaderField {
    #[default]
    Name,
    Email,
}

/// Form state for creating or editing a reader.
#[derive(Default, Clone)]
pub(crate) struct ReaderForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) active: ReaderField,
    pub(crate) error: Option<String>,
}

impl ReaderForm {
    pub(crate) fn from_reader(reader: &Reader) -> Self {
        Self {
            name: reader.name.clone(),
            email: reader.email.clone(),
            active: ReaderField::Name,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ReaderField::Name => ReaderField::Email,
            ReaderField::Email => ReaderField::Name,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            ReaderField::Name => self.name.push(ch),
            ReaderField::Email => self.email.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            ReaderField::Name => {
                self.name.pop();
            }
            ReaderField::Email => {
                self.email.pop();
            }
        }
    }

    /// Validate the inputs: both fields are required. Anything non-blank
    /// passes for the email; the catalog only enforces presence and
    /// uniqueness, not address shape.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Reader name is required."));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(anyhow!("Reader email is required."));
        }
        Ok((name.to_string(), email.to_string()))
    }

    pub(crate) fn build_line(&self, field: ReaderField) -> Line<'static> {
        match field {
            ReaderField::Name => field_line(
                "Name",
                &self.name,
                "<required>",
                self.active == ReaderField::Name,
            ),
            ReaderField::Email => field_line(
                "Email",
                &self.email,
                "<required>",
                self.active == ReaderField::Email,
            ),
        }
    }

    pub(crate) fn value_len(&self, field: ReaderField) -> usize {
        match field {
            ReaderField::Name => self.name.chars().count(),
            ReaderField::Email => self.email.chars().count(),
        }
    }
}

/// Fields available within the book form: two text inputs and two pickers.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Isbn,
    Author,
    Genre,
}

/// One selectable picker entry: the id to store (None for "no reference")
/// plus its display label. Holding the id next to the label is what keeps
/// the form from ever parsing ids back out of rendered text.
type Choice = (Option<i64>, String);

/// Form state for creating or editing a book. The author and genre pickers
/// are seeded from the store when the form opens and cycled with Left/Right.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) isbn: String,
    pub(crate) author_choices: Vec<Choice>,
    pub(crate) genre_choices: Vec<Choice>,
    pub(crate) author_idx: usize,
    pub(crate) genre_idx: usize,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl BookForm {
    pub(crate) fn new(authors: &[Author], genres: &[Genre]) -> Self {
        Self {
            title: String::new(),
            isbn: String::new(),
            author_choices: author_choices(authors, None),
            genre_choices: genre_choices(genres, None),
            author_idx: 0,
            genre_idx: 0,
            active: BookField::Title,
            error: None,
        }
    }

    /// Populate the form from an existing book when editing. A dangling
    /// reference becomes a visible "(missing #N)" choice that keeps the id,
    /// so saving without touching the picker never rewrites it.
    pub(crate) fn from_book(row: &BookRow, authors: &[Author], genres: &[Genre]) -> Self {
        let book: &Book = &row.book;
        let author_choices = author_choices(authors, book.author_id);
        let genre_choices = genre_choices(genres, book.genre_id);
        let author_idx = position_of(&author_choices, book.author_id);
        let genre_idx = position_of(&genre_choices, book.genre_id);

        Self {
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            author_choices,
            genre_choices,
            author_idx,
            genre_idx,
            active: BookField::Title,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Isbn,
            BookField::Isbn => BookField::Author,
            BookField::Author => BookField::Genre,
            BookField::Genre => BookField::Title,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Isbn => self.isbn.push(ch),
            // picker fields take arrows, not text
            BookField::Author | BookField::Genre => return false,
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Isbn => {
                self.isbn.pop();
            }
            BookField::Author | BookField::Genre => {}
        }
    }

    /// Cycle the focused picker. Does nothing while a text field is active.
    pub(crate) fn cycle(&mut self, offset: isize) {
        match self.active {
            BookField::Author => {
                self.author_idx = cycle_index(self.author_idx, self.author_choices.len(), offset);
            }
            BookField::Genre => {
                self.genre_idx = cycle_index(self.genre_idx, self.genre_choices.len(), offset);
            }
            BookField::Title | BookField::Isbn => {}
        }
    }

    /// Validate and return typed values ready for persistence.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, Option<i64>, Option<i64>)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Book title is required."));
        }
        let isbn = self.isbn.trim();
        if isbn.is_empty() {
            return Err(anyhow!("Book ISBN is required."));
        }
        let author_id = self.author_choices[self.author_idx].0;
        let genre_id = self.genre_choices[self.genre_idx].0;
        Ok((title.to_string(), isbn.to_string(), author_id, genre_id))
    }

    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        match field {
            BookField::Title => field_line(
                "Title",
                &self.title,
                "<required>",
                self.active == BookField::Title,
            ),
            BookField::Isbn => field_line(
                "ISBN",
                &self.isbn,
                "<required>",
                self.active == BookField::Isbn,
            ),
            BookField::Author => picker_line(
                "Author",
                &self.author_choices[self.author_idx].1,
                self.active == BookField::Author,
            ),
            BookField::Genre => picker_line(
                "Genre",
                &self.genre_choices[self.genre_idx].1,
                self.active == BookField::Genre,
            ),
        }
    }

    pub(crate) fn value_len(&self, field: BookField) -> usize {
        match field {
            BookField::Title => self.title.chars().count(),
            BookField::Isbn => self.isbn.chars().count(),
            BookField::Author | BookField::Genre => 0,
        }
    }
}

fn author_choices(authors: &[Author], current: Option<i64>) -> Vec<Choice> {
    let mut choices: Vec<Choice> = vec![(None, "(none)".to_string())];
    choices.extend(
        authors
            .iter()
            .map(|author| (Some(author.id), format!("#{} {}", author.id, author.name))),
    );
    append_missing(&mut choices, current, "author");
    choices
}

fn genre_choices(genres: &[Genre], current: Option<i64>) -> Vec<Choice> {
    let mut choices: Vec<Choice> = vec![(None, "(none)".to_string())];
    choices.extend(
        genres
            .iter()
            .map(|genre| (Some(genre.id), format!("#{} {}", genre.id, genre.name))),
    );
    append_missing(&mut choices, current, "genre");
    choices
}

/// If the book currently references an id that no longer exists, keep it
/// selectable under an explicit "(missing ...)" label instead of silently
/// coercing the reference away.
fn append_missing(choices: &mut Vec<Choice>, current: Option<i64>, noun: &str) {
    if let Some(id) = current {
        if !choices.iter().any(|(choice_id, _)| *choice_id == Some(id)) {
            choices.push((Some(id), format!("(missing {noun} #{id})")));
        }
    }
}

fn position_of(choices: &[Choice], current: Option<i64>) -> usize {
    choices
        .iter()
        .position(|(id, _)| *id == current)
        .unwrap_or(0)
}

fn cycle_index(current: usize, len: usize, offset: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + offset).rem_euclid(len as isize) as usize
}

/// Fields on the record-loan form: two pickers, no free text.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum LoanField {
    #[default]
    Reader,
    Book,
}

/// Form state for recording a loan. Both pickers are guaranteed non-empty by
/// the caller; the screen refuses to open the form otherwise.
#[derive(Clone)]
pub(crate) struct LoanForm {
    pub(crate) reader_choices: Vec<(i64, String)>,
    pub(crate) book_choices: Vec<(i64, String)>,
    pub(crate) reader_idx: usize,
    pub(crate) book_idx: usize,
    pub(crate) active: LoanField,
    pub(crate) error: Option<String>,
}

impl LoanForm {
    pub(crate) fn new(readers: &[Reader], books: &[BookRow]) -> Self {
        Self {
            reader_choices: readers
                .iter()
                .map(|reader| (reader.id, format!("#{} {}", reader.id, reader.name)))
                .collect(),
            book_choices: books
                .iter()
                .map(|row| (row.book.id, format!("#{} {}", row.book.id, row.book.title)))
                .collect(),
            reader_idx: 0,
            book_idx: 0,
            active: LoanField::Reader,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            LoanField::Reader => LoanField::Book,
            LoanField::Book => LoanField::Reader,
        };
    }

    pub(crate) fn cycle(&mut self, offset: isize) {
        match self.active {
            LoanField::Reader => {
                self.reader_idx = cycle_index(self.reader_idx, self.reader_choices.len(), offset);
            }
            LoanField::Book => {
                self.book_idx = cycle_index(self.book_idx, self.book_choices.len(), offset);
            }
        }
    }

    /// The ids behind the current picker positions: `(book_id, reader_id)`.
    pub(crate) fn selection(&self) -> (i64, i64) {
        (
            self.book_choices[self.book_idx].0,
            self.reader_choices[self.reader_idx].0,
        )
    }

    pub(crate) fn build_line(&self, field: LoanField) -> Line<'static> {
        match field {
            LoanField::Reader => picker_line(
                "Reader",
                &self.reader_choices[self.reader_idx].1,
                self.active == LoanField::Reader,
            ),
            LoanField::Book => picker_line(
                "Book",
                &self.book_choices[self.book_idx].1,
                self.active == LoanField::Book,
            ),
        }
    }
}

/// State for the transfer flow: the loan being moved plus a list picker over
/// the eligible destination readers (everyone but the current holder).
pub(crate) struct TransferPicker {
    pub(crate) reader_id: i64,
    pub(crate) book_id: i64,
    pub(crate) book_title: String,
    pub(crate) choices: Vec<(i64, String)>,
    pub(crate) selected: usize,
}

impl TransferPicker {
    pub(crate) fn new(
        reader_id: i64,
        book_id: i64,
        book_title: String,
        readers: &[Reader],
    ) -> Self {
        let choices = readers
            .iter()
            .filter(|reader| reader.id != reader_id)
            .map(|reader| (reader.id, format!("#{} {}", reader.id, reader.name)))
            .collect();
        Self {
            reader_id,
            book_id,
            book_title,
            choices,
            selected: 0,
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.choices.is_empty() {
            return;
        }
        let len = self.choices.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn current(&self) -> Option<&(i64, String)> {
        self.choices.get(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_form_requires_a_name() {
        let mut form = AuthorForm::default();
        assert!(form.parse_inputs().is_err());
        form.name = "  ".to_string();
        assert!(form.parse_inputs().is_err());
        form.name = "A.Poe".to_string();
        form.biography = " Boston ".to_string();
        let (name, bio) = form.parse_inputs().unwrap();
        assert_eq!(name, "A.Poe");
        assert_eq!(bio, "Boston");
    }

    #[test]
    fn reader_form_requires_both_fields() {
        let mut form = ReaderForm {
            name: "Ada".to_string(),
            ..ReaderForm::default()
        };
        assert!(form.parse_inputs().is_err());
        form.email = "ada@example.com".to_string();
        assert!(form.parse_inputs().is_ok());
    }

    #[test]
    fn book_form_keeps_a_dangling_reference_selectable() {
        let row = BookRow {
            book: Book {
                id: 1,
                title: "Tales".to_string(),
                isbn: "ISBN-1".to_string(),
                author_id: Some(7),
                genre_id: None,
            },
            author_name: None,
            genre_name: None,
        };
        let form = BookForm::from_book(&row, &[], &[]);

        let (_, _, author_id, genre_id) = form.parse_inputs().unwrap();
        assert_eq!(author_id, Some(7));
        assert_eq!(genre_id, None);
        assert!(form.author_choices[form.author_idx].1.contains("missing"));
    }

    #[test]
    fn book_form_picker_cycles_through_typed_ids() {
        let authors = vec![
            Author {
                id: 3,
                name: "A.Poe".to_string(),
                biography: String::new(),
            },
            Author {
                id: 5,
                name: "M.Shelley".to_string(),
                biography: String::new(),
            },
        ];
        let mut form = BookForm::new(&authors, &[]);
        form.title = "Tales".to_string();
        form.isbn = "ISBN-1".to_string();
        form.active = BookField::Author;

        form.cycle(1);
        let (_, _, author_id, _) = form.parse_inputs().unwrap();
        assert_eq!(author_id, Some(3));

        // wraps around past the end back to "(none)"
        form.cycle(2);
        let (_, _, author_id, _) = form.parse_inputs().unwrap();
        assert_eq!(author_id, None);
    }

    #[test]
    fn transfer_picker_excludes_the_current_holder() {
        let readers = vec![
            Reader {
                id: 1,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            Reader {
                id: 2,
                name: "Grace".to_string(),
                email: "grace@example.com".to_string(),
            },
        ];
        let picker = TransferPicker::new(1, 10, "Tales".to_string(), &readers);
        assert_eq!(picker.choices.len(), 1);
        assert_eq!(picker.current().unwrap().0, 2);
    }
}
