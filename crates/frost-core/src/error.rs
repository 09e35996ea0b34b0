use thiserror::Error;

/// Errors raised while building or drawing an effect.
///
/// Only [`EffectError::UnsupportedRadius`] is expected during normal operation: it
/// means the device cannot blur by that much, and the owning effect falls back to
/// the scrim delegate.
#[derive(Error, Debug)]
pub enum EffectError {
    #[error("Unsupported blur radius: {radius}px")]
    UnsupportedRadius { radius: f32 },
    #[error("Invalid style: {0}")]
    InvalidStyle(String),
    #[error("Failed to allocate graphics layer: {0}")]
    LayerAllocation(String),
    #[error("Graphics error in {stage} stage: {message}")]
    Backend {
        stage: &'static str,
        message: String,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EffectError {
    pub fn backend(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            stage,
            message: message.into(),
        }
    }

    /// Whether this error should demote the effect to its scrim delegate.
    pub fn is_unsupported_radius(&self) -> bool {
        matches!(self, Self::UnsupportedRadius { .. })
    }
}
