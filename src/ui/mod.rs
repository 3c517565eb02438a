//! Terminal rendering.
//!
//! Reads the chart handles and detail index owned by the app and draws
//! them each frame. Rendering never creates or replaces chart state; the
//! reconciler in [`crate::chart`] is the only write path.

pub mod charts;
pub mod common;
pub mod detail;
pub mod theme;

pub use theme::Theme;
