//! Built-in output formatters

mod json;
mod stylish;

pub use json::JsonFormatter;
pub use stylish::StylishFormatter;
