//! Error types shared by every component of the layout core.
//!
//! Geometry and scaling failures are recoverable: the caller gets an error and
//! the previously computed state stays in effect. The reflow lifecycle variants
//! signal caller misuse.

use serde::Serialize;
use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Page index outside `0..page_count`.
    #[error("page index {index} out of range (page count {page_count})")]
    InvalidIndex { index: usize, page_count: usize },

    /// Paper size and margins leave no usable content area.
    #[error("unusable page setup: {0}")]
    DegenerateGeometry(String),

    /// Scale factor outside the configured zoom bounds.
    #[error("scale factor {factor} outside [{min}, {max}]")]
    OutOfRange { factor: f32, min: f32, max: f32 },

    /// Zoom bounds or step that no scale factor can satisfy.
    #[error("invalid zoom configuration: {0}")]
    InvalidZoom(String),

    /// The text layout engine cannot be reconfigured for the requested orientation.
    #[error("text layout engine does not support {0:?} layout")]
    UnsupportedOrientation(crate::layout::Orientation),

    /// Orientation sections have a gap, an overlap or do not cover the document.
    #[error("invalid layout orientation sections: {0}")]
    InvalidSectionList(String),

    /// `begin_reflow` called while a reflow is outstanding.
    #[error("a print reflow is already in progress")]
    AlreadyReflowing,

    /// `end_reflow` called while idle.
    #[error("no print reflow is in progress")]
    NotReflowing,

    /// `end_reflow` called with a snapshot from a different reflow.
    #[error("reflow snapshot does not belong to the outstanding reflow")]
    SnapshotMismatch,

    /// Configuration JSON failed to parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl LayoutError {
    /// Lifecycle errors indicate a defect in the caller rather than bad input.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            LayoutError::AlreadyReflowing
                | LayoutError::NotReflowing
                | LayoutError::SnapshotMismatch
        )
    }
}

impl Serialize for LayoutError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LayoutError::InvalidIndex { index: 7, page_count: 5 };
        assert_eq!(err.to_string(), "page index 7 out of range (page count 5)");

        let err = LayoutError::OutOfRange { factor: 15.0, min: 0.1, max: 10.0 };
        assert_eq!(err.to_string(), "scale factor 15 outside [0.1, 10]");
    }

    #[test]
    fn test_lifecycle_classification() {
        assert!(LayoutError::AlreadyReflowing.is_lifecycle());
        assert!(LayoutError::SnapshotMismatch.is_lifecycle());
        assert!(!LayoutError::DegenerateGeometry("x".into()).is_lifecycle());
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&LayoutError::NotReflowing).unwrap();
        assert_eq!(json, "\"no print reflow is in progress\"");
    }

    #[test]
    fn test_config_error_from_json() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("{");
        let err: LayoutError = parse.unwrap_err().into();
        assert!(matches!(err, LayoutError::Config(_)));
    }
}
