pub mod calculation;
pub mod resolution;
pub mod validation;

pub use calculation::*;
pub use validation::*;
