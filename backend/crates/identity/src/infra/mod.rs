//! Infrastructure Layer
//!
//! Repository implementations and external service integrations.

pub mod memory;
pub mod smtp_probe;

pub use memory::InMemoryUserStore;
pub use smtp_probe::{FormatOnlyProbe, SmtpMailboxProbe};
