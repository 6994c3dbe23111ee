//! Error types for the enigma library.

use thiserror::Error;

/// Errors produced by the enigma library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// An alphabet was built from a symbol set containing `symbol` twice.
    #[error("duplicate symbol '{symbol}' in alphabet")]
    DuplicateSymbol { symbol: char },
    /// Invalid machine, rotor or permutation configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// A symbol-typed operation was given a symbol outside the alphabet.
    #[error("symbol '{symbol}' is not in the alphabet")]
    AlphabetMismatch { symbol: char },
    /// Malformed configuration or settings text.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl EnigmaError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        EnigmaError::Config(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        EnigmaError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Attaches a line number to a `Parse` error raised without one.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            EnigmaError::Parse { line: 0, message } => EnigmaError::Parse { line, message },
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;
