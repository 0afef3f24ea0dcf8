//! Error types for driftfield.
//!
//! Configuration problems are reported when the field starts; GPU and
//! window errors only come from the native backend.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    /// The adapter cannot present to the window surface.
    #[error("GPU adapter cannot present to this surface")]
    UnsupportedSurface,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors raised by the particle field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The color palette is empty, so particles would have no color.
    #[error("color palette must contain at least one color")]
    EmptyPalette,

    /// A color string could not be parsed.
    #[error("invalid color {0:?}: expected #RGB or #RRGGBB")]
    InvalidColor(String),

    /// A numeric parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed JSON configuration.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Failed to read a configuration file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to create the event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = FieldError::InvalidParam("speed must be finite and > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("speed"));
    }

    #[test]
    fn invalid_color_mentions_input() {
        let msg = FieldError::InvalidColor("#12".into()).to_string();
        assert!(msg.contains("#12"));
    }

    #[test]
    fn gpu_error_converts() {
        let e: FieldError = GpuError::NoAdapter.into();
        assert!(matches!(e, FieldError::Gpu(GpuError::NoAdapter)));
    }
}
