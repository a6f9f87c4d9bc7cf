//! REST access split across logical submodules.

mod backend;
mod client;
mod error;
#[cfg(test)]
pub(crate) mod memory;
mod records;

pub use backend::Backend;
pub use client::RestClient;
pub use error::ApiError;
pub use records::{
    create_record, delete_record, fetch_all, fetch_one, reference_exists, update_record,
};
