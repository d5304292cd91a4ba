//! Built-in tool adapters

mod exec;
mod grep;

pub use exec::ExecAdapter;
pub use grep::GrepAdapter;
