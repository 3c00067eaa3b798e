use thiserror::Error;

/// Rejected loop configuration.
///
/// Only raised when a loop is built. Once mounted, nothing in the loop
/// returns errors; bad runtime input degrades to "no update this frame".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("speed must be a finite number of pixels per second, got {0}")]
    NonFiniteSpeed(f32),

    #[error("gap must be finite and non-negative, got {0}")]
    InvalidGap(f32),

    #[error("item height must be finite and positive, got {0}")]
    InvalidItemHeight(f32),

    #[error("hover speed must be finite, got {0}")]
    NonFiniteHoverSpeed(f32),
}
