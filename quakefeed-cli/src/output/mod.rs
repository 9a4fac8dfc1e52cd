//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, LinkOutput};
pub use text::TextFormatter;
