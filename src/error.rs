//! Error type for the editing core.
//!
//! Every variant is recoverable at the controller boundary: the app reports
//! it on the status line and keeps running with document state unchanged.

use std::fmt;

#[derive(Debug)]
pub enum EditError {
    /// A command was executed while no image is loaded.
    NoImage,
    /// A file dialog was cancelled without choosing a path.
    NoFileSelected,
    /// A command is missing required parameters, or a value is out of range.
    InvalidParameter(String),
    /// The codec failed to read or decode an image file.
    Load(String),
    /// The codec failed to encode or write an image file.
    Save(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NoImage => write!(f, "No image is loaded"),
            EditError::NoFileSelected => write!(f, "No file was selected"),
            EditError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            EditError::Load(msg) => write!(f, "Could not load image: {}", msg),
            EditError::Save(msg) => write!(f, "Could not save image: {}", msg),
        }
    }
}
