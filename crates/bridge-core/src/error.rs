use thiserror::Error;

/// Failure to read a call, seat or auction from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid call `{0}`")]
    InvalidCall(String),

    #[error("invalid seat `{0}`")]
    InvalidSeat(String),
}
