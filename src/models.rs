//! Domain records exchanged with the school-records REST API. The structs stay
//! plain data holders whose serde attributes pin the JSON wire shape; the UI
//! and API layers lean on the [`Record`] trait to treat all four collections
//! uniformly.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The REST collections exposed by the backend, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Professors,
    Subjects,
    Registrations,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Students,
        Collection::Professors,
        Collection::Subjects,
        Collection::Registrations,
    ];

    /// Path segment used by the REST API.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Professors => "professors",
            Collection::Subjects => "subjects",
            Collection::Registrations => "registerStudentSubjects",
        }
    }

    /// Page heading and full navigation label.
    pub fn title(self) -> &'static str {
        match self {
            Collection::Students => "Students",
            Collection::Professors => "Professors",
            Collection::Subjects => "Subjects",
            Collection::Registrations => "Registrations",
        }
    }

    /// Navigation label used when the terminal is too narrow for full titles.
    pub fn short_title(self) -> &'static str {
        match self {
            Collection::Students => "Stu",
            Collection::Professors => "Prof",
            Collection::Subjects => "Subj",
            Collection::Registrations => "Reg",
        }
    }

    /// Name of a single row, used in notifications and dialog titles.
    pub fn singular(self) -> &'static str {
        match self {
            Collection::Students => "Student",
            Collection::Professors => "Professor",
            Collection::Subjects => "Subject",
            Collection::Registrations => "Registration",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0)
    }

    /// The page after this one, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The page before this one, wrapping around.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Behaviour shared by every row type the dashboard manages.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Display {
    /// Collection the record lives in.
    const COLLECTION: Collection;

    /// Server-assigned identifier. Empty for drafts that were never saved.
    fn id(&self) -> &str;

    /// Table headers, matching the order of [`Record::cells`].
    fn columns() -> &'static [&'static str];

    /// Display strings for one table row.
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Teaching staff. Subjects point at professors through `professorId`.
pub struct Professor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Stamped by the server; never sent back.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A course taught by one professor.
pub struct Subject {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_description: Option<String>,
    /// Reference to [`Professor::id`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// An enrolled student.
pub struct Student {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Kept as the raw wire string; the backend answers with RFC 3339 while
    /// forms submit whatever date the user typed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Links a student to a subject together with the grade obtained.
pub struct Registration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Reference to [`Student::id`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Reference to [`Subject::id`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_registered: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

impl Record for Professor {
    const COLLECTION: Collection = Collection::Professors;

    fn id(&self) -> &str {
        &self.id
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "First Name", "Last Name", "Email", "Created At"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            text(&self.first_name),
            text(&self.last_name),
            text(&self.email),
            timestamp(&self.created_at),
        ]
    }
}

impl Record for Subject {
    const COLLECTION: Collection = Collection::Subjects;

    fn id(&self) -> &str {
        &self.id
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Professor ID", "Created At"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            text(&self.subject_name),
            text(&self.subject_description),
            text(&self.professor_id),
            timestamp(&self.created_at),
        ]
    }
}

impl Record for Student {
    const COLLECTION: Collection = Collection::Students;

    fn id(&self) -> &str {
        &self.id
    }

    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "First Name",
            "Last Name",
            "Birth Date",
            "Address",
            "Email",
            "Phone",
            "Created At",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            text(&self.first_name),
            text(&self.last_name),
            date(&self.birth_date),
            text(&self.address),
            text(&self.email),
            text(&self.phone),
            timestamp(&self.created_at),
        ]
    }
}

impl Record for Registration {
    const COLLECTION: Collection = Collection::Registrations;

    fn id(&self) -> &str {
        &self.id
    }

    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "Student ID",
            "Subject ID",
            "Grade",
            "Date Registered",
            "Created At",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            text(&self.student_id),
            text(&self.subject_id),
            self.grade.map(|grade| grade.to_string()).unwrap_or_default(),
            date(&self.date_registered),
            timestamp(&self.created_at),
        ]
    }
}

impl fmt::Display for Professor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", full_name(&self.first_name, &self.last_name, &self.id))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subject_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => write!(f, "{name}"),
            _ => write!(f, "{}", self.id),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", full_name(&self.first_name, &self.last_name, &self.id))
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "student {} in subject {}",
            self.student_id.as_deref().unwrap_or("?"),
            self.subject_id.as_deref().unwrap_or("?")
        )
    }
}

/// `First Last`, falling back to the id when both names are blank.
fn full_name(first: &Option<String>, last: &Option<String>, id: &str) -> String {
    let name = [first, last]
        .iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        id.to_string()
    } else {
        name
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Calendar day for date columns. Unparseable values are shown verbatim so
/// nothing the server sends is hidden.
fn date(value: &Option<String>) -> String {
    let Some(raw) = value.as_deref() else {
        return String::new();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn timestamp(value: &Option<String>) -> String {
    let Some(raw) = value.as_deref() else {
        return String::new();
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
