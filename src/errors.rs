//! Error Types
//!
//! The main error type [`VitrineError`] covers the failure modes of widget
//! initialization: GPU setup, surface creation, and the windowing backend.
//!
//! All public APIs that can fail return [`Result<T>`], an alias for
//! `std::result::Result<T, VitrineError>`. Precondition violations (such as
//! cross-fading to a clip name that was never bound) are programming errors
//! and panic instead of returning an error.

use thiserror::Error;

/// The main error type for the vitrine widget.
#[derive(Error, Debug)]
pub enum VitrineError {
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create the window surface.
    #[error("Failed to create surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// The surface is not supported by the selected adapter.
    #[error("Surface not supported by adapter: {0}")]
    SurfaceUnsupported(String),

    /// Window system error.
    #[error("Window system error: {0}")]
    WindowError(#[from] raw_window_handle::HandleError),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// Window creation error (winit).
    #[error("Window creation error: {0}")]
    WindowCreateError(#[from] winit::error::OsError),
}

/// Alias for `Result<T, VitrineError>`.
pub type Result<T> = std::result::Result<T, VitrineError>;
