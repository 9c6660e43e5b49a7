//! Error types for convention compilation

use thiserror::Error;

/// A convention text that cannot be compiled. The whole text is rejected.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A range that is not `min-max`, `min+` or (where allowed) a bare number
    #[error("line {line}: invalid range `{text}` for {field}")]
    InvalidRange {
        line: usize,
        field: &'static str,
        text: String,
    },

    /// A call token outside `PASS`, `X`, `XX` and `<1-7><C|D|H|S|NT>`
    #[error("line {line}: invalid call `{text}`")]
    InvalidCall { line: usize, text: String },

    #[error("line {line}: unknown suit `{text}`")]
    UnknownSuit { line: usize, text: String },

    #[error("line {line}: unknown shape `{text}` (expected BALANCED or UNBALANCED)")]
    UnknownShape { line: usize, text: String },

    #[error("line {line}: unknown ace topology `{text}`")]
    UnknownAceTopology { line: usize, text: String },

    #[error("line {line}: invalid ace count `{text}`")]
    InvalidAceCount { line: usize, text: String },

    #[error("line {line}: malformed rule header `{text}`")]
    MalformedHeader { line: usize, text: String },

    #[error("line {line}: unknown attribute `{text}`")]
    UnknownAttribute { line: usize, text: String },

    /// An attribute line before the first rule header
    #[error("line {line}: attribute `{text}` outside of a rule")]
    AttributeOutsideRule { line: usize, text: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convention compilation
pub type CompileResult<T> = Result<T, CompileError>;
