//! Pipeline module - loading, cleaning, encoding, fitting and summarizing

pub mod catalog;
pub mod choice;
pub mod columns;
pub mod encoder;
pub mod fitter;
pub mod importance;
pub mod loader;
pub mod missing;
pub mod partworth;
pub mod simulate;

pub use catalog::*;
pub use choice::*;
pub use encoder::*;
pub use fitter::{Coefficient, FitConfig, FittedModel, LogisticFitter, NewtonRaphsonFitter};
pub use importance::*;
pub use loader::*;
pub use missing::*;
pub use partworth::*;
pub use simulate::*;
