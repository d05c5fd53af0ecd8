//! Image reference rewriting: proxy external image URLs in Markdown/HTML
//! text and revert them back.
//!
//! Both transforms are pure functions of their inputs — no I/O, no shared
//! state — so they are safe to call concurrently over independent texts.

pub mod scanner;

use crate::allowlist::HostAllowList;
use crate::proxy::LinkBuilder;
use tracing::debug;
use url::Url;

pub use scanner::{Dialect, ImageRef};

/// Result of one forward pass over a single text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    /// Image references discovered, rewritten or not.
    pub images_found: usize,
    /// References newly routed through the proxy.
    pub rewritten: usize,
}

/// Result of one reverse pass over a single text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertOutcome {
    pub text: String,
    /// Proxy references restored to their original URLs.
    pub reverted: usize,
}

/// Why a discovered reference was left untouched. Never an error: the
/// reference degrades to a no-op and scanning continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    AlreadyProxied,
    MalformedUrl,
    NoHost,
    AllowListed,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyProxied => "already-proxied",
            Self::MalformedUrl => "malformed-url",
            Self::NoHost => "no-host",
            Self::AllowListed => "allow-listed",
        }
    }
}

enum Decision {
    Proxy,
    Skip(SkipReason),
}

/// Rewrite every external image URL in `text` into a proxy link, leaving
/// allow-listed hosts, already-proxied links, and unparsable URLs untouched.
/// Everything outside the rewritten URL spans is returned byte-identical.
pub fn proxify(text: &str, allow: &HostAllowList, builder: &dyn LinkBuilder) -> RewriteOutcome {
    let refs = scanner::scan(text);
    let images_found = refs.len();

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut rewritten = 0;

    for r in &refs {
        let url = r.url(text);
        match decide(url, allow, builder) {
            Decision::Proxy => {
                out.push_str(&text[cursor..r.url_span.start]);
                out.push_str(&builder.proxy_url(url));
                cursor = r.url_span.end;
                rewritten += 1;
                debug!(url, dialect = ?r.dialect, "proxied image reference");
            }
            Decision::Skip(reason) => {
                debug!(url, reason = reason.as_str(), "left image reference untouched");
            }
        }
    }
    out.push_str(&text[cursor..]);

    RewriteOutcome {
        text: out,
        images_found,
        rewritten,
    }
}

/// Restore original URLs in place of proxy links. Text with no proxy
/// references is returned unchanged.
pub fn revert(text: &str, builder: &dyn LinkBuilder) -> RevertOutcome {
    let refs = scanner::scan(text);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut reverted = 0;

    for r in &refs {
        let url = r.url(text);
        if let Some(original) = builder.original_url(url) {
            out.push_str(&text[cursor..r.url_span.start]);
            out.push_str(&original);
            cursor = r.url_span.end;
            reverted += 1;
            debug!(url, original = %original, "restored original image URL");
        }
    }
    out.push_str(&text[cursor..]);

    RevertOutcome {
        text: out,
        reverted,
    }
}

fn decide(url: &str, allow: &HostAllowList, builder: &dyn LinkBuilder) -> Decision {
    if builder.is_proxy_url(url) {
        return Decision::Skip(SkipReason::AlreadyProxied);
    }
    // Proxying requires an absolute, fetchable origin; anything else
    // (relative path, malformed URL, schemes without a host) stays as-is.
    let Ok(parsed) = Url::parse(url) else {
        return Decision::Skip(SkipReason::MalformedUrl);
    };
    let Some(host) = parsed.host_str() else {
        return Decision::Skip(SkipReason::NoHost);
    };
    if allow.matches(host) {
        Decision::Skip(SkipReason::AllowListed)
    } else {
        Decision::Proxy
    }
}
