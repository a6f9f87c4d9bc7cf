use std::fmt;

use chrono::{DateTime, NaiveDate};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::api::{reference_exists, Backend};
use crate::models::{Collection, Professor, Record, Registration, Student, Subject};

/// How a form field is entered and checked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    /// `YYYY-MM-DD` or RFC 3339.
    Date,
    /// Digits only.
    Integer,
    /// Id of a row in another collection.
    Reference(Collection),
}

#[derive(Clone, Debug)]
pub(crate) struct FormField {
    pub(crate) key: &'static str,
    pub(crate) label: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) value: String,
}

/// A validation failure tied to one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldError {
    pub(crate) field: &'static str,
    pub(crate) message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Draft state behind the add and edit modals. `id` is `Some` when editing.
#[derive(Clone, Debug)]
pub(crate) struct EntityForm {
    pub(crate) collection: Collection,
    pub(crate) id: Option<String>,
    pub(crate) fields: Vec<FormField>,
    pub(crate) active: usize,
    pub(crate) errors: Vec<FieldError>,
}

fn field_specs(collection: Collection) -> &'static [(&'static str, &'static str, FieldKind)] {
    match collection {
        Collection::Students => &[
            ("firstName", "First Name", FieldKind::Text),
            ("lastName", "Last Name", FieldKind::Text),
            ("birthDate", "Birth Date", FieldKind::Date),
            ("address", "Address", FieldKind::Text),
            ("email", "Email", FieldKind::Text),
            ("phone", "Phone", FieldKind::Text),
        ],
        Collection::Professors => &[
            ("firstName", "First Name", FieldKind::Text),
            ("lastName", "Last Name", FieldKind::Text),
            ("email", "Email", FieldKind::Text),
        ],
        Collection::Subjects => &[
            ("subjectName", "Subject Name", FieldKind::Text),
            ("subjectDescription", "Description", FieldKind::Text),
            (
                "professorId",
                "Professor ID",
                FieldKind::Reference(Collection::Professors),
            ),
        ],
        Collection::Registrations => &[
            (
                "studentId",
                "Student ID",
                FieldKind::Reference(Collection::Students),
            ),
            (
                "subjectId",
                "Subject ID",
                FieldKind::Reference(Collection::Subjects),
            ),
            ("grade", "Grade", FieldKind::Integer),
            ("dateRegistered", "Date Registered", FieldKind::Date),
        ],
    }
}

impl EntityForm {
    /// Empty draft for the add modal.
    pub(crate) fn blank(collection: Collection) -> Self {
        Self::with_values(collection, None, Vec::new())
    }

    fn with_values(collection: Collection, id: Option<String>, values: Vec<Option<String>>) -> Self {
        let mut values = values.into_iter();
        let fields = field_specs(collection)
            .iter()
            .map(|&(key, label, kind)| FormField {
                key,
                label,
                kind,
                value: values.next().flatten().unwrap_or_default(),
            })
            .collect();
        Self {
            collection,
            id,
            fields,
            active: 0,
            errors: Vec::new(),
        }
    }

    pub(crate) fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Move focus to the next field, wrapping at the end.
    pub(crate) fn toggle_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub(crate) fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Append a character to the focused field, filtering what the field kind
    /// cannot hold.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let Some(field) = self.fields.get_mut(self.active) else {
            return false;
        };
        let accepted = match field.kind {
            FieldKind::Integer => ch.is_ascii_digit(),
            _ => !ch.is_control(),
        };
        if accepted {
            field.value.push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    /// Trimmed value of `key`, `None` when blank.
    pub(crate) fn text(&self, key: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| field.value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn integer(&self, key: &str) -> Option<i64> {
        self.text(key).and_then(|value| value.parse().ok())
    }

    /// Presence and format checks that need no network access.
    pub(crate) fn check_fields(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for field in &self.fields {
            let value = field.value.trim();
            if value.is_empty() {
                errors.push(FieldError {
                    field: field.key,
                    message: format!("{} is required.", field.label),
                });
                continue;
            }
            match field.kind {
                FieldKind::Date if !is_date(value) => errors.push(FieldError {
                    field: field.key,
                    message: format!("{} must be a date (YYYY-MM-DD).", field.label),
                }),
                FieldKind::Integer if value.parse::<i64>().is_err() => errors.push(FieldError {
                    field: field.key,
                    message: format!("{} must be a whole number.", field.label),
                }),
                _ => {}
            }
        }
        errors
    }

    /// Full submit-time validation: local checks first, then one
    /// `GET /{collection}/{id}` per filled-in reference field.
    pub(crate) fn validate(&self, backend: &dyn Backend) -> Vec<FieldError> {
        let mut errors = self.check_fields();
        for field in &self.fields {
            let FieldKind::Reference(target) = field.kind else {
                continue;
            };
            if errors.iter().any(|err| err.field == field.key) {
                continue;
            }
            match reference_exists(backend, target, field.value.trim()) {
                Ok(true) => {}
                Ok(false) => errors.push(FieldError {
                    field: field.key,
                    message: format!("{} not found.", field.label),
                }),
                Err(err) => errors.push(FieldError {
                    field: field.key,
                    message: format!("Could not verify {}: {err}", field.label),
                }),
            }
        }
        errors
    }

    /// Forget the error of the focused field once the user edits it.
    pub(crate) fn clear_active_error(&mut self) {
        if let Some(field) = self.fields.get(self.active) {
            let key = field.key;
            self.errors.retain(|err| err.field != key);
        }
    }

    pub(crate) fn has_error(&self, key: &str) -> bool {
        self.errors.iter().any(|err| err.field == key)
    }

    /// Render one field row for the modal.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let Some(field) = self.fields.get(index) else {
            return Line::from("");
        };
        let is_active = index == self.active;

        let display = if field.value.is_empty() {
            "<required>".to_string()
        } else {
            field.value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if self.has_error(field.key) {
            Style::default().fg(Color::Red)
        } else if field.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Width of the `Label: ` prefix plus the value, for cursor placement.
    pub(crate) fn cursor_offset(&self) -> usize {
        self.fields
            .get(self.active)
            .map(|field| field.label.chars().count() + 2 + field.value.chars().count())
            .unwrap_or(0)
    }
}

fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(value).is_ok()
}

/// Conversion between a record and the modal draft that edits it.
pub(crate) trait FormRecord: Record {
    /// Field values in the order of the collection's form layout.
    fn form_values(&self) -> Vec<Option<String>>;

    /// Build the record a validated form describes.
    fn from_form(form: &EntityForm) -> Self;

    fn to_form(&self) -> EntityForm {
        EntityForm::with_values(
            Self::COLLECTION,
            Some(self.id().to_string()),
            self.form_values(),
        )
    }
}

impl FormRecord for Student {
    fn form_values(&self) -> Vec<Option<String>> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.birth_date.clone(),
            self.address.clone(),
            self.email.clone(),
            self.phone.clone(),
        ]
    }

    fn from_form(form: &EntityForm) -> Self {
        Student {
            id: form.id.clone().unwrap_or_default(),
            first_name: form.text("firstName"),
            last_name: form.text("lastName"),
            birth_date: form.text("birthDate"),
            address: form.text("address"),
            email: form.text("email"),
            phone: form.text("phone"),
            created_at: None,
        }
    }
}

impl FormRecord for Professor {
    fn form_values(&self) -> Vec<Option<String>> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
        ]
    }

    fn from_form(form: &EntityForm) -> Self {
        Professor {
            id: form.id.clone().unwrap_or_default(),
            first_name: form.text("firstName"),
            last_name: form.text("lastName"),
            email: form.text("email"),
            created_at: None,
        }
    }
}

impl FormRecord for Subject {
    fn form_values(&self) -> Vec<Option<String>> {
        vec![
            self.subject_name.clone(),
            self.subject_description.clone(),
            self.professor_id.clone(),
        ]
    }

    fn from_form(form: &EntityForm) -> Self {
        Subject {
            id: form.id.clone().unwrap_or_default(),
            subject_name: form.text("subjectName"),
            subject_description: form.text("subjectDescription"),
            professor_id: form.text("professorId"),
            created_at: None,
        }
    }
}

impl FormRecord for Registration {
    fn form_values(&self) -> Vec<Option<String>> {
        vec![
            self.student_id.clone(),
            self.subject_id.clone(),
            self.grade.map(|grade| grade.to_string()),
            self.date_registered.clone(),
        ]
    }

    fn from_form(form: &EntityForm) -> Self {
        Registration {
            id: form.id.clone().unwrap_or_default(),
            student_id: form.text("studentId"),
            subject_id: form.text("subjectId"),
            grade: form.integer("grade"),
            date_registered: form.text("dateRegistered"),
            created_at: None,
        }
    }
}

/// State for the delete confirmation dialog.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) collection: Collection,
    pub(crate) id: String,
    pub(crate) summary: String,
}

impl ConfirmDelete {
    pub(crate) fn from_record<T: Record>(record: &T) -> Self {
        Self {
            collection: T::COLLECTION,
            id: record.id().to_string(),
            summary: record.to_string(),
        }
    }
}

/// State for the search-by-id dialog.
#[derive(Clone, Debug)]
pub(crate) struct SearchForm {
    pub(crate) collection: Collection,
    pub(crate) query: String,
    pub(crate) error: Option<String>,
}

impl SearchForm {
    pub(crate) fn new(collection: Collection) -> Self {
        Self {
            collection,
            query: String::new(),
            error: None,
        }
    }
}
