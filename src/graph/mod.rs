pub mod conversion;
pub mod document;
pub mod factory;
pub mod patch;

pub use conversion::*;
pub use document::*;
pub use factory::*;
pub use patch::*;
