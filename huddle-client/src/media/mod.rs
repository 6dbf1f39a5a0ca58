mod constraints;
mod controller;

pub use constraints::*;
pub use controller::*;
