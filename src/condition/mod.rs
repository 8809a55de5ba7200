pub mod edit;
pub mod model;

pub use edit::*;
pub use model::*;
