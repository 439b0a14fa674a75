pub mod constants;
pub mod environment;
pub mod ids;

pub use constants::*;
pub use environment::*;
pub use ids::*;
