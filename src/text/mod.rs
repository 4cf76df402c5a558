//! Text measurement, wrapping and editing

mod clipboard;
mod font;
mod input;
mod lines;
mod wrap;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use font::{FixedWidthFont, FontProvider, DEFAULT_LINE_HEIGHT};
pub use input::{Key, Modifiers, SelectionColors, SelectionMode, TextInput, TextInputMode};
pub use lines::{is_breaking_char, Direction, LineLayout, LinePosition, TextualLine, VisualLine};
pub use wrap::{TrailingSpace, WordWrap};
