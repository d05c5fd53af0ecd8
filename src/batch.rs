//! Batch forward/backward passes over stored messages.
//!
//! Thin orchestration: the caller supplies an iterator of `(id, text)` pairs
//! and a persist callback; the core never touches storage itself. A persist
//! failure for one message is logged and skipped — it never aborts the rest
//! of the batch.

use crate::allowlist::HostAllowList;
use crate::proxy::LinkBuilder;
use crate::rewrite;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

/// Persist callback future, borrowing whatever the callback captured.
pub type PersistFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + 'a>>;

/// Counters for one forward migration pass. Field names mirror the admin
/// API payload (`processed`, `updated`, `images_found`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub processed: usize,
    pub updated: usize,
    pub images_found: usize,
}

/// Counters for one reversion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RevertStats {
    pub processed: usize,
    pub reverted: usize,
}

/// Run the forward rewrite over every `(id, text)` pair, handing changed
/// texts to `persist`. Unchanged texts are never persisted.
pub async fn rewrite_all<'a, Id, I, F>(
    items: I,
    allow: &HostAllowList,
    builder: &dyn LinkBuilder,
    mut persist: F,
) -> RewriteStats
where
    Id: fmt::Display + Copy,
    I: IntoIterator<Item = (Id, String)>,
    F: FnMut(Id, String) -> PersistFuture<'a>,
{
    let mut stats = RewriteStats::default();

    for (id, text) in items {
        stats.processed += 1;
        let outcome = rewrite::proxify(&text, allow, builder);
        stats.images_found += outcome.images_found;
        if outcome.text == text {
            continue;
        }
        match persist(id, outcome.text).await {
            Ok(()) => stats.updated += 1,
            Err(err) => warn!(message_id = %id, error = %err, "failed to persist rewritten message"),
        }
    }

    info!(
        processed = stats.processed,
        updated = stats.updated,
        images_found = stats.images_found,
        "migration pass complete"
    );
    stats
}

/// Run the reverse transform over every `(id, text)` pair, handing changed
/// texts to `persist`.
pub async fn revert_all<'a, Id, I, F>(
    items: I,
    builder: &dyn LinkBuilder,
    mut persist: F,
) -> RevertStats
where
    Id: fmt::Display + Copy,
    I: IntoIterator<Item = (Id, String)>,
    F: FnMut(Id, String) -> PersistFuture<'a>,
{
    let mut stats = RevertStats::default();

    for (id, text) in items {
        stats.processed += 1;
        let outcome = rewrite::revert(&text, builder);
        if outcome.text == text {
            continue;
        }
        match persist(id, outcome.text).await {
            Ok(()) => stats.reverted += 1,
            Err(err) => warn!(message_id = %id, error = %err, "failed to persist reverted message"),
        }
    }

    info!(
        processed = stats.processed,
        reverted = stats.reverted,
        "reversion pass complete"
    );
    stats
}
