//! # Cafe Dashboard Loader
//!
//! This crate is the adapter between the two CSV input files and the rest of
//! the application.
//!
//! ## Architectural Principles
//!
//! - **Boundary Adapter:** All file and CSV handling lives here. Analyses only ever see
//!   the validated, immutable `Dataset` from `core-types`.
//! - **Fail Fast:** A missing column or an invalid record aborts the load with an
//!   error naming the file, line and reason. Nothing is silently corrected.
//!
//! ## Public API
//!
//! - `load_dataset`: Reads both files from disk and returns a `Dataset`.
//! - `read_transactions` / `read_events`: Decode from any `Read` source.
//! - `LoaderError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod dates;
pub mod error;
pub mod reader;

// Re-export the key components to create a clean, public-facing API.
pub use error::LoaderError;
pub use reader::{EVENT_COLUMNS, TRANSACTION_COLUMNS, load_dataset, read_events, read_transactions};
