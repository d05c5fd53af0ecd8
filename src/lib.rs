#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod allowlist;
pub mod batch;
pub mod config;
pub mod error;
pub mod proxy;
pub mod rewrite;
pub mod store;

pub use allowlist::HostAllowList;
pub use batch::{RevertStats, RewriteStats};
pub use config::Config;
pub use error::{RelayError, Result};
pub use proxy::{LinkBuilder, QueryLinkBuilder};
pub use rewrite::{RevertOutcome, RewriteOutcome, proxify, revert};
pub use store::{MessageStore, TicketMessage};
