//! Error types for the topo engine.

use std::fmt;
use thiserror::Error;

/// Result type alias for topo operations.
pub type Result<T> = std::result::Result<T, TopoError>;

/// Errors raised while building images or deriving invariants.
///
/// Shape and value errors are fatal for the image they describe.
/// [`TopoError::EmptyContour`] is recovered locally by the chain coder: the
/// offending contour is skipped and the rest of the image is still analysed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopoError {
    /// Input is not a rectangular 2-D grid, or has a zero dimension.
    #[error("Invalid image shape: {reason}")]
    InvalidImageShape { reason: String },

    /// A pixel value could not be reduced to material/pore.
    #[error("Invalid pixel value {value} at ({x}, {y}): expected a binary value")]
    InvalidImageValues { x: u32, y: u32, value: String },

    /// The ingest adapter could not decode the raster bytes.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// A traced contour is too short to produce a chain code.
    #[error("Contour {index} has {points} point(s); at least 2 are required")]
    EmptyContour { index: usize, points: usize },

    /// A code string contains a symbol outside its alphabet.
    #[error("Invalid symbol {symbol:?} at position {position} in {kind} code")]
    InvalidCodeSymbol {
        kind: CodeKind,
        symbol: char,
        position: usize,
    },
}

impl TopoError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::InvalidImageShape {
            reason: reason.into(),
        }
    }
}

/// The chain-code alphabets understood by the code transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    F8,
    F4,
    Vcc,
    Ot3,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::F8 => "F8",
            Self::F4 => "F4",
            Self::Vcc => "VCC",
            Self::Ot3 => "3OT",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TopoError::InvalidCodeSymbol {
            kind: CodeKind::Ot3,
            symbol: 'x',
            position: 4,
        };
        assert_eq!(err.to_string(), "Invalid symbol 'x' at position 4 in 3OT code");

        let err = TopoError::shape("image has zero width");
        assert_eq!(err.to_string(), "Invalid image shape: image has zero width");
    }

    #[test]
    fn test_empty_contour_message() {
        let err = TopoError::EmptyContour { index: 3, points: 1 };
        assert_eq!(err.to_string(), "Contour 3 has 1 point(s); at least 2 are required");
    }
}
