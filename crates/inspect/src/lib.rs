//! Quick looks at the shape of MTGJSON documents.
//!
//! - [`print_tree`] outlines nested objects, following only the first
//!   element of each array.
//! - [`summarize`] lists the top-level keys with their type and length.
//! - [`empty_value_summary`] counts null, missing and blank values per
//!   column over a list of row objects.

mod empty;
pub mod error;
mod structure;
mod table;

pub use crate::empty::{EmptyCounts, empty_value_summary, write_empty_summary};
pub use crate::structure::{KeySummary, print_tree, summarize, type_name, write_summary};
