//! Library crate for crud-table.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - Error and result types (`error`)
//! - Pagination over the filtered view (`paging`)
//! - Name search (`search`)
//! - Seed data and the remote fetch adapter (`source`)
//! - Records and the add/edit form (`table`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `crud-table` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod error;
pub mod paging;
pub mod search;
pub mod source;
pub mod table;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
pub use table::{Age, FormState, Record, TableStore};
