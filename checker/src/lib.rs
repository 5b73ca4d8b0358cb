#![deny(clippy::dbg_macro)]

pub mod config;
pub mod dispatch;
pub mod format;
pub mod session;

pub use config::{Config, ConfigError};
pub use dispatch::{Dispatcher, Limits, Outcome};
pub use format::format_balance;
pub use providers::{self, validate, AssetKind};
pub use session::{MemorySessionStore, SessionStore, UserId};
