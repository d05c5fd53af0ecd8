//! Host allow-list with exact and wildcard (`*.domain`) entries.
//!
//! Pure string matching — no DNS resolution, so this is an operator
//! convenience list, not origin validation.

/// Ordered set of host patterns exempted from proxying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAllowList {
    entries: Vec<AllowEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowEntry {
    Exact(String),
    /// Base domain without the `*.` prefix. Matches any subdomain and the
    /// bare base domain itself.
    Wildcard(String),
}

impl HostAllowList {
    /// Parse a newline-separated pattern list. Blank lines and surrounding
    /// whitespace on each line are discarded; entries are lowercased.
    pub fn parse(raw: &str) -> Self {
        let mut entries = Vec::new();
        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let lowered = trimmed.to_ascii_lowercase();
            let entry = match lowered.strip_prefix("*.") {
                Some(base) => AllowEntry::Wildcard(base.to_string()),
                None => AllowEntry::Exact(lowered),
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when `host` is exempted from proxying. Comparison is
    /// case-insensitive; an empty list exempts nothing.
    pub fn matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.entries.iter().any(|entry| match entry {
            AllowEntry::Exact(exact) => host == *exact,
            AllowEntry::Wildcard(base) => host == *base || is_subdomain_of(&host, base),
        })
    }
}

fn is_subdomain_of(host: &str, base: &str) -> bool {
    host.len() > base.len() + 1
        && host.ends_with(base)
        && host.as_bytes()[host.len() - base.len() - 1] == b'.'
}
