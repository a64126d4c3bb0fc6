//! Fixed application settings: window layout and history limits.

/// Main window size in logical pixels.
pub const WINDOW_WIDTH: f32 = 1500.0;
pub const WINDOW_HEIGHT: f32 = 950.0;

/// Backdrop color behind the letterboxed canvas image.
pub const CANVAS_BACKDROP: [u8; 3] = [100, 100, 100];

/// Upper bound on stored history snapshots. Once exceeded, the oldest
/// entries are dropped so memory stays proportional to the image size.
pub const MAX_HISTORY_ENTRIES: usize = 100;
