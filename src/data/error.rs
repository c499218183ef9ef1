use thiserror::Error;

/// Failures while turning a file into [`AqiRecord`](super::model::AqiRecord)s.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("no recognised AQI columns in header (found: {found})")]
    NoKnownColumns { found: String },

    #[error("expected a top-level JSON array of objects")]
    NotAnArray,

    #[error("row {0} is not a JSON object")]
    RowNotObject(usize),
}
