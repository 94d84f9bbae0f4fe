//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

/// Where a raw keypad press came from. Both sources are interchangeable
/// once mapped to an action; the source is only kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Pointer,
}

impl InputSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InputSource::Keyboard => "keyboard",
            InputSource::Pointer => "pointer",
        }
    }
}
