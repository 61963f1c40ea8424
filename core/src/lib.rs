pub mod config;
pub mod errors;
pub mod event;
pub mod handler;
pub mod telemetry;

pub use config::GreeterConfig;
pub use errors::{GreeterError, Result};
pub use event::{IncomingEvent, OutgoingResponse};
pub use handler::handle;
