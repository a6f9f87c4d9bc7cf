use std::mem;
use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap};
use ratatui::Frame;
use tracing::{error, info, warn};

use crate::api::{create_record, delete_record, fetch_all, fetch_one, update_record, Backend};
use crate::models::{Collection, Professor, Registration, Student, Subject};

use super::forms::{ConfirmDelete, EntityForm, FormRecord, SearchForm};
use super::helpers::{centered_rect, cursor_in, hint_line};
use super::nav::{nav_labels, page_for_digit};
use super::notification::{NotificationKind, Notifier};
use super::screens::{PagedRecord, Pages};

/// Height of the navigation bar at the top.
const NAV_HEIGHT: u16 = 3;
/// Footer space reserved for notifications and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Run `$body` with `$ty` aliased to the record type of `$collection`.
macro_rules! with_record {
    ($collection:expr, $ty:ident => $body:expr) => {
        match $collection {
            Collection::Students => {
                type $ty = Student;
                $body
            }
            Collection::Professors => {
                type $ty = Professor;
                $body
            }
            Collection::Subjects => {
                type $ty = Subject;
                $body
            }
            Collection::Registrations => {
                type $ty = Registration;
                $body
            }
        }
    };
}

/// Which modal, if any, is open on the active page.
enum Mode {
    Normal,
    Adding(EntityForm),
    Editing(EntityForm),
    ConfirmDelete(ConfirmDelete),
    Searching(SearchForm),
}

/// Central application state shared across the TUI.
pub struct App {
    backend: Box<dyn Backend>,
    pages: Pages,
    active: Collection,
    mode: Mode,
    notifier: Notifier,
}

impl App {
    pub fn new(backend: Box<dyn Backend>, start: Collection) -> Self {
        Self {
            backend,
            pages: Pages::default(),
            active: start,
            mode: Mode::Normal,
            notifier: Notifier::default(),
        }
    }

    pub fn active_page(&self) -> Collection {
        self.active
    }

    /// Switch to `collection` and fetch its list. Every visit asks the server
    /// again; the page only shows "Loading..." until its first answer.
    pub fn open_page(&mut self, collection: Collection) {
        self.active = collection;
        self.refresh_page(collection);
    }

    /// Advance timers. Called by the event loop on every iteration.
    pub fn tick(&mut self, now: Instant) {
        self.notifier.expire(now);
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) | Mode::Editing(form) => self.handle_form(code, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Searching(search) => self.handle_search(code, search),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let noun = self.active.singular();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab => self.open_page(self.active.next()),
            KeyCode::BackTab => self.open_page(self.active.previous()),
            KeyCode::Char(ch @ '1'..='9') => {
                if let Some(collection) = page_for_digit(ch) {
                    self.open_page(collection);
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-5),
            KeyCode::PageDown => self.move_selection(5),
            KeyCode::Home => self.select_edge(false),
            KeyCode::End => self.select_edge(true),
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh_page(self.active),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                return Mode::Adding(EntityForm::blank(self.active));
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                match self.edit_form_for_selection() {
                    Some(form) => return Mode::Editing(form),
                    None => self.notify(
                        format!("No {} selected to edit.", noun.to_lowercase()),
                        NotificationKind::Error,
                    ),
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') | KeyCode::Delete => {
                match self.confirm_for_selection() {
                    Some(confirm) => return Mode::ConfirmDelete(confirm),
                    None => self.notify(
                        format!("No {} selected to delete.", noun.to_lowercase()),
                        NotificationKind::Error,
                    ),
                }
            }
            KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Char('/') => {
                return Mode::Searching(SearchForm::new(self.active));
            }
            _ => {}
        }
        Mode::Normal
    }

    /// Shared key handling for the add and edit modals.
    fn handle_form(&mut self, code: KeyCode, mut form: EntityForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => keep_open = false,
            KeyCode::Tab | KeyCode::Down => form.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => {
                form.backspace();
                form.clear_active_error();
            }
            KeyCode::Enter => {
                let errors = form.validate(self.backend.as_ref());
                if let Some(first) = errors.first() {
                    warn!(
                        collection = form.collection.path(),
                        errors = errors.len(),
                        "form rejected"
                    );
                    self.notify(first.message.clone(), NotificationKind::Error);
                    form.errors = errors;
                } else {
                    keep_open = false;
                    self.submit(&form);
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.clear_active_error();
                }
            }
            _ => {}
        }

        if !keep_open {
            Mode::Normal
        } else if form.is_edit() {
            Mode::Editing(form)
        } else {
            Mode::Adding(form)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Mode::Normal,
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                with_record!(confirm.collection, T => self.delete::<T>(&confirm.id));
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut search: SearchForm) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => {
                search.query.pop();
                search.error = None;
            }
            KeyCode::Enter => {
                let id = search.query.trim().to_string();
                if id.is_empty() {
                    search.error = Some("Enter an id to search for.".to_string());
                } else {
                    return with_record!(search.collection, T => self.search::<T>(&id));
                }
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                search.query.push(ch);
                search.error = None;
            }
            _ => {}
        }
        Mode::Searching(search)
    }

    fn submit(&mut self, form: &EntityForm) {
        with_record!(form.collection, T => {
            if form.is_edit() {
                self.update::<T>(form)
            } else {
                self.create::<T>(form)
            }
        })
    }

    fn create<T: PagedRecord>(&mut self, form: &EntityForm) {
        let noun = T::COLLECTION.singular();
        let draft = T::from_form(form);
        match create_record(self.backend.as_ref(), &draft) {
            Ok(()) => {
                info!(collection = T::COLLECTION.path(), "record created");
                self.notify(
                    format!("{noun} added successfully."),
                    NotificationKind::Success,
                );
                self.refresh::<T>();
            }
            Err(err) => {
                error!(collection = T::COLLECTION.path(), error = %err, "create failed");
                self.notify(
                    format!("Failed to add {}: {err}", noun.to_lowercase()),
                    NotificationKind::Error,
                );
            }
        }
    }

    fn update<T: PagedRecord>(&mut self, form: &EntityForm) {
        let noun = T::COLLECTION.singular();
        let record = T::from_form(form);
        match update_record(self.backend.as_ref(), &record) {
            Ok(()) => {
                info!(collection = T::COLLECTION.path(), id = record.id(), "record updated");
                self.notify(
                    format!("{noun} updated successfully."),
                    NotificationKind::Success,
                );
                self.refresh::<T>();
            }
            Err(err) => {
                error!(collection = T::COLLECTION.path(), id = record.id(), error = %err, "update failed");
                self.notify(
                    format!("Failed to update {}: {err}", noun.to_lowercase()),
                    NotificationKind::Error,
                );
            }
        }
    }

    /// Delete on the server, then drop the row locally without a re-fetch.
    fn delete<T: PagedRecord>(&mut self, id: &str) {
        let noun = T::COLLECTION.singular();
        match delete_record::<T>(self.backend.as_ref(), id) {
            Ok(()) => {
                T::page_mut(&mut self.pages).remove(id);
                info!(collection = T::COLLECTION.path(), id, "record deleted");
                self.notify(
                    format!("{noun} deleted successfully."),
                    NotificationKind::Success,
                );
            }
            Err(err) => {
                error!(collection = T::COLLECTION.path(), id, error = %err, "delete failed");
                self.notify(
                    format!("Failed to delete {}: {err}", noun.to_lowercase()),
                    NotificationKind::Error,
                );
            }
        }
    }

    /// Look up one id. A hit opens the edit modal pre-filled; anything the
    /// server rejects reads as "not found".
    fn search<T: PagedRecord>(&mut self, id: &str) -> Mode {
        let noun = T::COLLECTION.singular();
        match fetch_one::<T>(self.backend.as_ref(), id) {
            Ok(Some(record)) => Mode::Editing(record.to_form()),
            Ok(None) => {
                self.notify(format!("{noun} not found."), NotificationKind::Error);
                Mode::Normal
            }
            Err(err) if err.is_rejection() => {
                warn!(collection = T::COLLECTION.path(), id, error = %err, "search rejected");
                self.notify(format!("{noun} not found."), NotificationKind::Error);
                Mode::Normal
            }
            Err(err) => {
                error!(collection = T::COLLECTION.path(), id, error = %err, "search failed");
                self.notify(
                    format!("Failed to search {}: {err}", noun.to_lowercase()),
                    NotificationKind::Error,
                );
                Mode::Normal
            }
        }
    }

    /// Replace the page's rows with the server's current listing. On failure
    /// the previous rows stay and the page stops showing "Loading...".
    fn refresh<T: PagedRecord>(&mut self) {
        match fetch_all::<T>(self.backend.as_ref()) {
            Ok(records) => T::page_mut(&mut self.pages).set_records(records),
            Err(err) => {
                error!(collection = T::COLLECTION.path(), error = %err, "list failed");
                T::page_mut(&mut self.pages).loaded = true;
                self.notify(
                    format!(
                        "Failed to load {}: {err}",
                        T::COLLECTION.title().to_lowercase()
                    ),
                    NotificationKind::Error,
                );
            }
        }
    }

    fn refresh_page(&mut self, collection: Collection) {
        with_record!(collection, T => self.refresh::<T>())
    }

    fn move_selection(&mut self, offset: isize) {
        with_record!(self.active, T => T::page_mut(&mut self.pages).move_selection(offset))
    }

    fn select_edge(&mut self, last: bool) {
        with_record!(self.active, T => {
            let page = T::page_mut(&mut self.pages);
            if last {
                page.select_last();
            } else {
                page.select_first();
            }
        })
    }

    fn edit_form_for_selection(&self) -> Option<EntityForm> {
        with_record!(self.active, T => T::page(&self.pages).current().map(|record| record.to_form()))
    }

    fn confirm_for_selection(&self) -> Option<ConfirmDelete> {
        with_record!(self.active, T => T::page(&self.pages).current().map(|record| ConfirmDelete::from_record(record)))
    }

    fn notify<S: Into<String>>(&mut self, text: S, kind: NotificationKind) {
        self.notifier.show(text, kind, Instant::now());
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(NAV_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_nav(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Adding(form) => {
                let title = format!("Add {}", form.collection.singular());
                self.draw_form(frame, area, &title, form);
            }
            Mode::Editing(form) => {
                let title = format!("Edit {}", form.collection.singular());
                self.draw_form(frame, area, &title, form);
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(search) => self.draw_search(frame, area, search),
            Mode::Normal => {}
        }
    }

    /// Page tabs. Narrow terminals get the compact labels.
    fn draw_nav(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(nav_labels(area.width))
            .select(self.active.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("School Records"),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let view = self.pages.view(self.active);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.active.title());

        if !view.loaded {
            let message = Paragraph::new("Loading...")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        if view.rows.is_empty() {
            let message = Paragraph::new(format!(
                "No {} yet. Press 'a' to add one.",
                self.active.title().to_lowercase()
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(view.columns.iter().map(|column| Cell::from(*column)))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let widths = vec![Constraint::Fill(1); view.columns.len()];
        let rows = view.rows.into_iter().map(Row::new);

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(view.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(note) = self.notifier.current() {
            Line::from(vec![Span::styled(note.text.clone(), note.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match &self.mode {
            Mode::Adding(_) | Mode::Editing(_) => hint_line(&[
                ("[Tab/↑↓]", "Switch Field"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ]),
            Mode::ConfirmDelete(_) => hint_line(&[("[y]", "Delete"), ("[n/Esc]", "Cancel")]),
            Mode::Searching(_) => hint_line(&[("[Enter]", "Search"), ("[Esc]", "Cancel")]),
            Mode::Normal => hint_line(&[
                ("[↑↓]", "Select"),
                ("[a]", "Add"),
                ("[e]", "Edit"),
                ("[d]", "Delete"),
                ("[f]", "Search"),
                ("[r]", "Refresh"),
                ("[Tab/1-4]", "Page"),
                ("[q]", "Quit"),
            ]),
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &EntityForm) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields.len())
            .map(|index| form.build_line(index))
            .collect();
        lines.push(Line::from(""));

        if form.errors.is_empty() {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        } else {
            for err in &form.errors {
                lines.push(Line::from(Span::styled(
                    err.message.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        frame.set_cursor_position(cursor_in(inner, form.cursor_offset(), form.active));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Delete {}", confirm.collection.singular()))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete {} {}?",
                confirm.collection.singular().to_lowercase(),
                confirm.summary
            )),
            Line::from(format!("ID: {}", confirm.id)),
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

    fn draw_search(&self, frame: &mut Frame, area: Rect, search: &SearchForm) {
        let popup_area = centered_rect(60, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Search {}", search.collection.singular()))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(format!("ID: {}", search.query)), Line::from("")];
        if let Some(error) = &search.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let column = "ID: ".len() + search.query.chars().count();
        frame.set_cursor_position(cursor_in(inner, column, 0));
    }
}
