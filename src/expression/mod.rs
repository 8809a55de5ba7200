pub mod defaults;
pub mod id;
pub mod model;

pub use defaults::*;
pub use id::*;
pub use model::*;
