//! Core error types for molecule layout
//!
//! The layout engine itself never fails; these errors come from the edges of
//! the pipeline: reading recipes, decoding JSON and validating options.

use thiserror::Error;

/// Core error types
#[derive(Error, Debug)]
pub enum MoleculeError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid layout options: {message}")]
    InvalidOptions { message: String },

    #[error("Input error: {message}")]
    InputError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

impl MoleculeError {
    /// Create a new parse error
    pub fn parse_error(message: String, line: usize, column: usize) -> Self {
        Self::ParseError {
            message,
            line,
            column,
        }
    }

    /// Create a new invalid-options error
    pub fn invalid_options(message: String) -> Self {
        Self::InvalidOptions { message }
    }

    /// Create a new input error
    pub fn input_error(message: String) -> Self {
        Self::InputError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let error = MoleculeError::parse_error("expected ':'".to_string(), 3, 7);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Parse error"));
        assert!(error_msg.contains("expected ':'"));
        assert!(error_msg.contains("line 3"));
        assert!(error_msg.contains("column 7"));
    }

    #[test]
    fn test_invalid_options() {
        let error = MoleculeError::invalid_options("width too small".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid layout options"));
        assert!(error_msg.contains("width too small"));
    }

    #[test]
    fn test_input_error() {
        let error = MoleculeError::input_error("empty recipe".to_string());
        assert!(format!("{}", error).contains("empty recipe"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: MoleculeError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let error: MoleculeError = json_err.into();
        assert!(format!("{}", error).contains("Serialization error"));
    }
}
