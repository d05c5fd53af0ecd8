//! Proxy link construction, recognition, and round-trip decoding.

use url::Url;

/// Route the proxy serves images from.
pub const PROXY_ROUTE: &str = "/imageproxy/image";

/// Query parameter carrying the original URL.
pub const PROXY_PARAM: &str = "u";

/// Builds and decodes proxy links on behalf of the rewriter.
///
/// The rewriter treats proxy URLs as opaque beyond two needs: recognizing
/// them (so it never double-wraps) and recovering the original URL on
/// reversion.
pub trait LinkBuilder {
    /// Build a proxy URL embedding `original` as an encoded parameter.
    fn proxy_url(&self, original: &str) -> String;

    /// True when `candidate` already points at the proxy route.
    fn is_proxy_url(&self, candidate: &str) -> bool;

    /// Recover the original URL from a proxy URL, if `candidate` is one.
    fn original_url(&self, candidate: &str) -> Option<String>;
}

/// Default [`LinkBuilder`]: `<base>/imageproxy/image?u=<urlencoded>`.
#[derive(Debug, Clone)]
pub struct QueryLinkBuilder {
    base: Url,
}

impl QueryLinkBuilder {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn from_base(base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(base)?,
        })
    }
}

impl LinkBuilder for QueryLinkBuilder {
    fn proxy_url(&self, original: &str) -> String {
        let mut url = self.base.clone();
        url.set_path(PROXY_ROUTE);
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair(PROXY_PARAM, original);
        url.to_string()
    }

    fn is_proxy_url(&self, candidate: &str) -> bool {
        // Recognition is by route, not by base host, so links written under
        // an earlier base URL are still detected after a config change.
        candidate.contains(PROXY_ROUTE)
    }

    fn original_url(&self, candidate: &str) -> Option<String> {
        let parsed = Url::parse(candidate).ok()?;
        if parsed.path() != PROXY_ROUTE {
            return None;
        }
        parsed
            .query_pairs()
            .find(|(key, _)| key == PROXY_PARAM)
            .map(|(_, value)| value.into_owned())
    }
}
