//! JSON-RPC API Layer
//!
//! Exposes the waitlist (list / join / leave) and admin stats as JSON-RPC 2.0
//! methods over TCP on localhost.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
