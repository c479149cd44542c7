#![doc = include_str!("../README.md")]

pub mod codec;
pub mod error;
pub mod flow;
pub mod middleware;
pub mod sso;
pub mod types;

// Re-exports for convenient access
pub use codec::TokenCodec;
pub use error::Error;
pub use flow::{FlowTicket, generate_state};
pub use sso::{Profile, SsoClient, SsoConfig, TokenResponse};
pub use types::{ActId, NationalId, UserId};
