//! Editor Core Module
//!
//! The buffer data model. This module contains:
//! - Rows with their tab-expanded render string and highlight classes
//! - The document: ordered rows, filename, syntax and dirty counter
//! - The buffer-space cursor
//!
//! Nothing in here touches the terminal; given the same sequence of
//! operations the model always ends up in the same state.

mod cursor;
mod document;
mod row;

pub use cursor::Cursor;
pub use document::{Document, DocumentError};
pub use row::{expand_tabs, Row, TAB_STOP};
