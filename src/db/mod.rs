pub mod client;
pub mod connection;
pub mod executor;
pub mod queries;
pub mod session;
pub mod types;

pub use session::{TdsConnector, TdsSession};
