pub mod context;
pub mod formatter;

pub use context::*;
pub use formatter::*;
