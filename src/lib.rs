//! Core library surface for the school records dashboard.
//!
//! The binary only parses arguments and wires these pieces together; the
//! integration tests drive the REST layer through the same exports.
pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod ui;

/// REST access used by the dashboard.
pub use api::{ApiError, Backend, RestClient};

pub use config::Args;
pub use logging::init_logging;

/// The four record types the dashboard manages.
pub use models::{Collection, Professor, Registration, Student, Subject};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
