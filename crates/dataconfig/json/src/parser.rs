//! JSON table parser: text in, typed record batch out.

use dataconfig_core::{ConfigRecord, DecodedBatch, decode_batch};

/// A pluggable table parser for one interchange format.
///
/// The loader framework routes each data file to the parser whose
/// [`file_extension`](DataParser::file_extension) matches.
pub trait DataParser {
    /// Decodes the full text of one table file.
    ///
    /// Fails only when the input is not a well-formed record array; every
    /// record- and field-level problem is reported through the returned
    /// batch's diagnostics instead.
    fn parse<T: ConfigRecord>(&self, text: &str) -> Result<DecodedBatch<T>, ParseError>;

    /// File extension handled by this parser, including the leading dot.
    fn file_extension(&self) -> &'static str;
}

/// Fatal parse failure: the input is not a well-formed array of records.
///
/// No partial batch is returned for these.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("input is not well-formed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level JSON value is not an array of records")]
    NotAnArray,
}

/// Parses JSON table files: a top-level array with one object per record.
///
/// Blank input decodes to an empty batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDataParser;

impl JsonDataParser {
    pub const FILE_EXTENSION: &'static str = ".json";
}

impl DataParser for JsonDataParser {
    fn parse<T: ConfigRecord>(&self, text: &str) -> Result<DecodedBatch<T>, ParseError> {
        if text.trim().is_empty() {
            return Ok(DecodedBatch::default());
        }
        let root: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Array(elements) = root else {
            return Err(ParseError::NotAnArray);
        };
        let schema = T::schema();
        Ok(decode_batch(&elements, &schema))
    }

    fn file_extension(&self) -> &'static str {
        Self::FILE_EXTENSION
    }
}
