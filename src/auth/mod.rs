pub mod csrf;
pub mod gate;
pub mod middleware;
pub mod session;

pub use gate::{AccessGate, AccessState, GateError};
