//! Client SDK for the netdiag API.

pub mod client;
pub mod types;

pub use client::{ClientError, DiagClient};
pub use types::*;
