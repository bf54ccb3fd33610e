//! Menu option implementations.

pub mod generate;
pub mod switch;

/// What the menu loop does after an option finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Input ran out mid-prompt.
    Quit,
}
