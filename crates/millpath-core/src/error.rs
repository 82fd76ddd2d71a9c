//! Error handling for Millpath
//!
//! Provides the error types raised while turning shape descriptors into a
//! program:
//! - Shape errors (missing, unparsable, or out-of-domain parameters)
//! - Glyph outline errors (font lookup and outline extraction)
//! - I/O errors
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Shape parameter error type
///
/// Raised by a shape's extract step when the descriptor it was handed does not
/// describe a valid shape. Any of these aborts the generation pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A required child or attribute is absent
    #[error("Missing parameter '{parameter}' on {shape}")]
    MissingParameter {
        /// The shape (or scope) being extracted.
        shape: String,
        /// The name of the missing child or attribute.
        parameter: String,
    },

    /// Text present where a number is required does not parse
    #[error("Invalid number '{text}' for '{parameter}' on {shape}")]
    InvalidNumber {
        /// The shape (or scope) being extracted.
        shape: String,
        /// The parameter holding the text.
        parameter: String,
        /// The offending text.
        text: String,
    },

    /// A value parses but violates a domain invariant
    #[error("Invalid argument '{parameter}' on {shape}: {reason}")]
    InvalidArgument {
        /// The shape (or scope) being extracted.
        shape: String,
        /// The parameter holding the value.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ShapeError {
    /// Create a missing-parameter error
    pub fn missing(shape: impl Into<String>, parameter: impl Into<String>) -> Self {
        ShapeError::MissingParameter {
            shape: shape.into(),
            parameter: parameter.into(),
        }
    }

    /// Create an invalid-number error
    pub fn invalid_number(
        shape: impl Into<String>,
        parameter: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        ShapeError::InvalidNumber {
            shape: shape.into(),
            parameter: parameter.into(),
            text: text.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(
        shape: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ShapeError::InvalidArgument {
            shape: shape.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Re-labels the error with the shape that was being extracted.
    ///
    /// Value types such as [`crate::DepthRange`] validate themselves without
    /// knowing which shape owns them; the extract step attaches that context.
    pub fn with_shape(self, shape: impl Into<String>) -> Self {
        let shape = shape.into();
        match self {
            ShapeError::MissingParameter { parameter, .. } => {
                ShapeError::MissingParameter { shape, parameter }
            }
            ShapeError::InvalidNumber {
                parameter, text, ..
            } => ShapeError::InvalidNumber {
                shape,
                parameter,
                text,
            },
            ShapeError::InvalidArgument {
                parameter, reason, ..
            } => ShapeError::InvalidArgument {
                shape,
                parameter,
                reason,
            },
        }
    }

    /// The shape this error was raised for
    pub fn shape(&self) -> &str {
        match self {
            ShapeError::MissingParameter { shape, .. }
            | ShapeError::InvalidNumber { shape, .. }
            | ShapeError::InvalidArgument { shape, .. } => shape,
        }
    }
}

/// Main error type for Millpath
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Shape parameter error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Glyph outline could not be produced
    #[error("Glyph outline error: {reason}")]
    Outline {
        /// Why the outline could not be produced.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a glyph outline error
    pub fn outline(reason: impl Into<String>) -> Self {
        Error::Outline {
            reason: reason.into(),
        }
    }

    /// Check if this is a shape parameter error
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Error::Shape(_))
    }

    /// The shape error, if this is one
    pub fn as_shape_error(&self) -> Option<&ShapeError> {
        match self {
            Error::Shape(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for shape parameter extraction
pub type ShapeResult<T> = std::result::Result<T, ShapeError>;
