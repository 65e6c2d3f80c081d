//! Candidate view geometry and window placement.
//!
//! Geometry (`view`) is a pure function of session state plus layout/theme
//! settings — memoizable, with no window-system dependency. Placement
//! (`window`) takes that geometry and a caret rectangle and produces a
//! clamped on-screen position. [`caret`] supplies the caret rectangle via a
//! per-platform strategy cascade.

pub mod caret;
pub mod view;
pub mod window;

pub use crate::config::LayoutType;
pub use caret::{CaretLocator, CaretRect, CaretStrategy, SessionCaretStrategy};
pub use view::CandidateLayout;
pub use window::{place_window, Rect, ScreenGeometry};
