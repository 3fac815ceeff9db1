//! JSON parser implementation for the config-table pipeline.
//!
//! This crate is the JSON binding of the pluggable [`DataParser`] boundary:
//! the surrounding loader framework hands it the full text of one table file
//! and receives back the typed, ordered batch plus the diagnostics collector
//! from `dataconfig-core`.

pub mod parser;

pub use parser::{DataParser, JsonDataParser, ParseError};
