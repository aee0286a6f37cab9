//! Execute handlers for the bridge controller.
//!
//! This module contains all execute message handlers, organized by category:
//! - `transfer` - Send, resend, deliver and execute value transfers
//! - `message` - Send, resend, deliver, execute and cancel messages
//! - `receive` - Entry point for channel adapters
//! - `config` - Routing, collaborators, rate limits and destination pauses
//! - `admin` - Pause, roles, yield strategy and recovery operations

mod admin;
mod config;
mod message;
mod receive;
mod transfer;

pub use admin::*;
pub use config::*;
pub use message::*;
pub use receive::*;
pub use transfer::*;
