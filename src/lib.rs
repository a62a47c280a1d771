pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod handler;
pub mod k8s;

pub use config::{GateConfig, PresentAction};
pub use error::{GateError, Result};
pub use gate::{ErrorResponse, Gate};
pub use handler::{handler_fn, Handler, Reply};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
