//! Client facade for an embedded Takara ledger: configuration plus a
//! [`Client`](client::Client) that submits transactions and runs
//! queries on behalf of one configured authority.

pub mod client;
pub mod config;

pub use config::Configuration;

/// The prelude re-exports most commonly used items from this crate.
pub mod prelude {
    pub use super::{client::Client, config::Configuration};
}
