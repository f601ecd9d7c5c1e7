pub mod errors;

pub use errors::TelemetryError;
