//! Application module: the control-thread model and the controller that
//! drives the engine from it.

mod controller;
mod model;

pub use controller::{ControlCmd, Controller, Flow};
pub use model::*;
