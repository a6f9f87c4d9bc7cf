use crate::models::{Collection, Professor, Record, Registration, Student, Subject};

use super::forms::FormRecord;

/// Local, non-authoritative copy of one collection plus the table cursor.
pub(crate) struct EntityPage<T> {
    pub(crate) records: Vec<T>,
    pub(crate) selected: usize,
    /// Set once the first list request has finished, successfully or not.
    pub(crate) loaded: bool,
}

impl<T> Default for EntityPage<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            selected: 0,
            loaded: false,
        }
    }
}

impl<T: Record> EntityPage<T> {
    /// Replace the rows with a fresh server listing, keeping the cursor on the
    /// same id when it still exists.
    pub(crate) fn set_records(&mut self, records: Vec<T>) {
        let focused = self.current().map(|record| record.id().to_string());
        self.records = records;
        self.loaded = true;
        if let Some(id) = focused {
            if let Some(idx) = self.records.iter().position(|record| record.id() == id) {
                self.selected = idx;
            }
        }
        self.ensure_in_bounds();
    }

    /// Drop the row with `id` locally. Returns whether anything was removed.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id() != id);
        self.ensure_in_bounds();
        self.records.len() != before
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.records.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.records.is_empty() {
            return;
        }
        let len = self.records.len() as isize;
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
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        if !self.records.is_empty() {
            self.selected = self.records.len() - 1;
        }
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.records.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.records.len() {
            self.selected = self.records.len() - 1;
        }
    }

    fn view(&self) -> TableView {
        TableView {
            columns: T::columns(),
            rows: self.records.iter().map(|record| record.cells()).collect(),
            selected: self.selected,
            loaded: self.loaded,
        }
    }
}

/// Everything the draw path needs to render one page's table.
pub(crate) struct TableView {
    pub(crate) columns: &'static [&'static str],
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) selected: usize,
    pub(crate) loaded: bool,
}

/// One page per collection.
#[derive(Default)]
pub(crate) struct Pages {
    pub(crate) students: EntityPage<Student>,
    pub(crate) professors: EntityPage<Professor>,
    pub(crate) subjects: EntityPage<Subject>,
    pub(crate) registrations: EntityPage<Registration>,
}

impl Pages {
    pub(crate) fn view(&self, collection: Collection) -> TableView {
        match collection {
            Collection::Students => self.students.view(),
            Collection::Professors => self.professors.view(),
            Collection::Subjects => self.subjects.view(),
            Collection::Registrations => self.registrations.view(),
        }
    }

    pub(crate) fn is_loaded(&self, collection: Collection) -> bool {
        match collection {
            Collection::Students => self.students.loaded,
            Collection::Professors => self.professors.loaded,
            Collection::Subjects => self.subjects.loaded,
            Collection::Registrations => self.registrations.loaded,
        }
    }
}

/// Ties each record type to its page so page actions can be written once,
/// generically.
pub(crate) trait PagedRecord: FormRecord {
    fn page(pages: &Pages) -> &EntityPage<Self>;
    fn page_mut(pages: &mut Pages) -> &mut EntityPage<Self>;
}

impl PagedRecord for Student {
    fn page(pages: &Pages) -> &EntityPage<Self> {
        &pages.students
    }

    fn page_mut(pages: &mut Pages) -> &mut EntityPage<Self> {
        &mut pages.students
    }
}

impl PagedRecord for Professor {
    fn page(pages: &Pages) -> &EntityPage<Self> {
        &pages.professors
    }

    fn page_mut(pages: &mut Pages) -> &mut EntityPage<Self> {
        &mut pages.professors
    }
}

impl PagedRecord for Subject {
    fn page(pages: &Pages) -> &EntityPage<Self> {
        &pages.subjects
    }

    fn page_mut(pages: &mut Pages) -> &mut EntityPage<Self> {
        &mut pages.subjects
    }
}

impl PagedRecord for Registration {
    fn page(pages: &Pages) -> &EntityPage<Self> {
        &pages.registrations
    }

    fn page_mut(pages: &mut Pages) -> &mut EntityPage<Self> {
        &mut pages.registrations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str) -> Student {
        Student {
            id: id.into(),
            first_name: Some(format!("name {id}")),
            ..Default::default()
        }
    }

    #[test]
    fn refresh_keeps_cursor_on_the_same_row() {
        let mut page = EntityPage::default();
        page.set_records(vec![student("a"), student("b"), student("c")]);
        page.move_selection(2);
        assert_eq!(page.current().unwrap().id, "c");

        page.set_records(vec![student("new"), student("a"), student("b"), student("c")]);
        assert_eq!(page.current().unwrap().id, "c");
        assert!(page.loaded);
    }

    #[test]
    fn removing_the_last_row_clamps_the_cursor() {
        let mut page = EntityPage::default();
        page.set_records(vec![student("a"), student("b")]);
        page.select_last();

        assert!(page.remove("b"));
        assert_eq!(page.selected, 0);
        assert!(!page.remove("b"));
        assert!(page.records.iter().all(|record| record.id != "b"));
    }

    #[test]
    fn selection_saturates_at_both_ends() {
        let mut page = EntityPage::default();
        page.set_records(vec![student("a"), student("b"), student("c")]);
        page.move_selection(-5);
        assert_eq!(page.selected, 0);
        page.move_selection(10);
        assert_eq!(page.selected, 2);
    }

    #[test]
    fn view_exposes_cells_in_column_order() {
        let mut pages = Pages::default();
        pages.students.set_records(vec![student("a")]);
        let view = pages.view(Collection::Students);
        assert_eq!(view.columns.len(), view.rows[0].len());
        assert_eq!(view.rows[0][0], "a");
        assert!(!pages.is_loaded(Collection::Subjects));
    }
}
