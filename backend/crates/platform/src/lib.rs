//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the domain crates:
//! - Cryptographic utilities (CSPRNG bytes, hex/base64 codecs)
//! - Password hashing (Argon2id) for stored credentials

pub mod crypto;
pub mod password;
