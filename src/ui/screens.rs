use crate::models::{LoanedBook, ReaderLoans};

/// Shared state for the four entity screens: a fetched list plus a cursor.
/// The Books, Authors, Genres, and Readers views only differ in the row type
/// and how a row is rendered, so the selection mechanics live here once.
pub(crate) struct ListScreen<T> {
    pub(crate) rows: Vec<T>,
    pub(crate) selected: usize,
}

impl<T> ListScreen<T> {
    pub(crate) fn new(rows: Vec<T>) -> Self {
        Self { rows, selected: 0 }
    }

    /// Replace the rows after a refresh, keeping the cursor in bounds.
    pub(crate) fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.ensure_in_bounds();
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.selected = self.rows.len() - 1;
        }
    }

    /// Keep a previously focused row selected across a refresh when the
    /// caller knows its position, e.g. after an in-place edit.
    pub(crate) fn focus(&mut self, index: usize) {
        self.selected = index;
        self.ensure_in_bounds();
    }

    fn ensure_in_bounds(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }
}

/// State for the loans screen: one card per reader, with a second cursor
/// picking which of the selected reader's loans is targeted. Acting on an
/// exact `(reader, book)` pair is what keeps return/transfer unambiguous even
/// when two books share a title.
pub(crate) struct LoanScreen {
    pub(crate) readers: Vec<ReaderLoans>,
    pub(crate) selected: usize,
    pub(crate) book_cursor: usize,
}

impl LoanScreen {
    pub(crate) fn new(readers: Vec<ReaderLoans>) -> Self {
        Self {
            readers,
            selected: 0,
            book_cursor: 0,
        }
    }

    /// Replace the roster after a refresh, clamping both cursors.
    pub(crate) fn set_readers(&mut self, readers: Vec<ReaderLoans>) {
        self.readers = readers;
        if self.readers.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.readers.len() {
            self.selected = self.readers.len() - 1;
        }
        self.clamp_book_cursor();
    }

    pub(crate) fn current_reader(&self) -> Option<&ReaderLoans> {
        self.readers.get(self.selected)
    }

    /// The loan the second cursor is resting on, if the selected reader holds
    /// anything at all.
    pub(crate) fn current_loan(&self) -> Option<&LoanedBook> {
        self.current_reader()
            .and_then(|entry| entry.loans.get(self.book_cursor))
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.readers.is_empty() {
            return;
        }
        let len = self.readers.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
        self.book_cursor = 0;
    }

    pub(crate) fn move_book_cursor(&mut self, offset: isize) {
        let loan_count = self
            .current_reader()
            .map(|entry| entry.loans.len())
            .unwrap_or(0);
        if loan_count == 0 {
            self.book_cursor = 0;
            return;
        }
        let len = loan_count as isize;
        let mut new = self.book_cursor as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.book_cursor = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.readers.is_empty() {
            self.selected = 0;
            self.book_cursor = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.readers.is_empty() {
            self.selected = self.readers.len() - 1;
            self.book_cursor = 0;
        }
    }

    fn clamp_book_cursor(&mut self) {
        let loan_count = self
            .current_reader()
            .map(|entry| entry.loans.len())
            .unwrap_or(0);
        if loan_count == 0 {
            self.book_cursor = 0;
        } else if self.book_cursor >= loan_count {
            self.book_cursor = loan_count - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reader;

    fn roster() -> Vec<ReaderLoans> {
        vec![
            ReaderLoans {
                reader: Reader {
                    id: 1,
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                },
                loans: vec![
                    LoanedBook {
                        book_id: 10,
                        title: "Tales".into(),
                        loaned_on: "2026-08-24".into(),
                    },
                    LoanedBook {
                        book_id: 11,
                        title: "Tales".into(),
                        loaned_on: "2026-08-24".into(),
                    },
                ],
            },
            ReaderLoans {
                reader: Reader {
                    id: 2,
                    name: "Grace".into(),
                    email: "grace@example.com".into(),
                },
                loans: Vec::new(),
            },
        ]
    }

    #[test]
    fn book_cursor_distinguishes_same_titled_books() {
        let mut screen = LoanScreen::new(roster());
        assert_eq!(screen.current_loan().unwrap().book_id, 10);
        screen.move_book_cursor(1);
        assert_eq!(screen.current_loan().unwrap().book_id, 11);
        // cursor clamps at the last loan
        screen.move_book_cursor(5);
        assert_eq!(screen.current_loan().unwrap().book_id, 11);
    }

    #[test]
    fn moving_readers_resets_the_book_cursor() {
        let mut screen = LoanScreen::new(roster());
        screen.move_book_cursor(1);
        screen.move_selection(1);
        assert_eq!(screen.book_cursor, 0);
        assert!(screen.current_loan().is_none());
    }

    #[test]
    fn refresh_keeps_selection_in_bounds() {
        let mut screen = ListScreen::new(vec![1, 2, 3]);
        screen.select_last();
        screen.set_rows(vec![1]);
        assert_eq!(screen.selected, 0);
        assert_eq!(screen.current(), Some(&1));
    }
}
