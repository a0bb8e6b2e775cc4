// inim-api: Async Rust client for the INIM Cloud alarm panel API

mod commands;
pub mod error;
pub mod models;
pub mod protocol;
pub mod session;
pub mod transport;

pub use error::Error;
pub use models::{RawArea, RawDevice, RawPeripheral, RawScenario, RawZone};
pub use session::{Credentials, Session};
pub use transport::{ClientConfig, DEFAULT_BASE_URL, Transport};

// Re-exported so callers can build credentials without a direct dependency.
pub use secrecy::SecretString;
