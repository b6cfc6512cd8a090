//! Data-driven content for the tile flow engines.
//!
//! Items, liquids, and block descriptors are read from a single RON, TOML,
//! or JSON file, cross-referenced by name, and frozen into a
//! [`tileflow_core::content::Content`] together with the flow tunables.

pub mod loader;
pub mod schema;

pub use loader::{load_content_file, load_content_str, DataLoadError, Format, LoadedContent};
