pub mod performance_model;
pub mod return_calculator;

pub use performance_model::*;
pub use return_calculator::*;
