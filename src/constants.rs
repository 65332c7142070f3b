//! Global constants for the ROI viewer

/// Multiplicative zoom step applied by one click of the zoom tool.
pub const ZOOM_STEP: f32 = 1.2;

/// Smallest scale factor the viewport accepts.
pub const MIN_SCALE: f32 = 1e-4;

/// Side length of a resize handle in device pixels.
pub const HANDLE_SIZE: f32 = 8.0;

/// Lower bound for the zoom used when scaling handle hit areas.
pub const MIN_HANDLE_ZOOM: f32 = 0.1;

/// Default view size used before the host reports a real one.
pub const DEFAULT_VIEW_SIZE: (f32, f32) = (400.0, 300.0);

/// Default text label color (RGB).
pub const DEFAULT_TEXT_COLOR: [u8; 3] = [0, 0, 0];

/// Current configuration file format version.
pub const CONFIG_VERSION: u32 = 1;
