//! Application error types.

use thiserror::Error;

use crate::models::LayerId;

/// Application-level errors for Strata.
///
/// The graph and navigation variants are local, recoverable rejections: the
/// operation is refused, the model is left unchanged and the caller decides
/// how to surface the message.
#[derive(Error, Debug)]
pub enum AppError {
    // Graph errors
    #[error("Node '{id}' already exists in layer {layer}")]
    DuplicateId { layer: LayerId, id: String },

    #[error("Node '{id}' not found in layer {layer}")]
    UnknownNode { layer: LayerId, id: String },

    #[error("Layer not found: {0}")]
    UnknownLayer(LayerId),

    // Navigation errors
    #[error("Cannot drill deeper than {max} nested layers")]
    MaxDepthExceeded { max: usize },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    // Scene file errors
    #[error("Invalid scene file: {0}")]
    SceneFile(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the error is a rejected user action rather than a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::DuplicateId { .. }
                | AppError::UnknownNode { .. }
                | AppError::MaxDepthExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_recoverable() {
        let err = AppError::MaxDepthExceeded { max: 12 };
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "Cannot drill deeper than 12 nested layers");

        let err = AppError::UnknownLayer(LayerId(7));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_duplicate_id_message() {
        let err = AppError::DuplicateId {
            layer: LayerId::ROOT,
            id: "n1".to_string(),
        };
        assert_eq!(err.to_string(), "Node 'n1' already exists in layer L0");
    }
}
