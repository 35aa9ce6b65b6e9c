//! Mochi Editor Library
//!
//! A small terminal text editor driven by raw escape sequences. The crate
//! is split into:
//!
//! - `input`: key decoding from a timed byte stream
//! - `term`: raw mode, stdin polling and window size discovery
//! - `syntax`: syntax definitions and the per-row highlighter
//! - `core`: rows, the document and the cursor
//! - `viewport`: scrolling
//! - `search`: incremental search
//! - `renderer`: frame composition into a single output buffer
//! - `editor`: the key dispatch loop
//! - `app`: configuration and logging

pub mod app;
pub mod core;
pub mod editor;
pub mod input;
pub mod renderer;
pub mod search;
pub mod syntax;
pub mod term;
pub mod viewport;
