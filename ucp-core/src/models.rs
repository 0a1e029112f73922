mod scenario;
mod unit;

pub use scenario::{Scenario, ValidationError};
pub use unit::Unit;
