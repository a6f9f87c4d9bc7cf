//! Ratatui front-end for the school records dashboard: one table page per
//! collection, plus the add, edit, delete and search dialogs.

mod app;
mod forms;
mod helpers;
pub mod nav;
mod notification;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
