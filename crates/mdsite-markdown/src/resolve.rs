//! Link and asset target resolution used during HTML generation.

use std::convert::Infallible;

/// Scheme marking a link target as a reference into an asset folder.
pub const ASSET_SCHEME: &str = "asset://";

/// Supplies output paths for asset references while generating HTML.
///
/// The site builder implements this for its per-directory rendering context;
/// resolution may copy files, so it can fail with the implementor's error.
pub trait LinkResolver {
    /// Error raised when resolving an asset fails outright.
    type Error;

    /// Map an asset path (relative to an asset folder) to its output URL.
    ///
    /// Returns `Ok(None)` when no asset with that path exists.
    fn resolve_asset(&self, path: &str) -> Result<Option<String>, Self::Error>;
}

/// Resolver that knows no assets. Every asset reference is unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl LinkResolver for NoAssets {
    type Error = Infallible;

    fn resolve_asset(&self, _path: &str) -> Result<Option<String>, Infallible> {
        Ok(None)
    }
}

fn is_external(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Resolve an anchor `href`.
///
/// - Absolute URLs and targets ending in `/` pass through.
/// - `asset://<path>` resolves through the resolver.
/// - A `.md` suffix is rewritten to `.html`.
/// - Anything else (fragments, `mailto:`, links to non-markdown files) passes
///   through unchanged rather than gaining an `.html` suffix.
pub fn resolve_href<R: LinkResolver>(href: &str, resolver: &R) -> Result<Option<String>, R::Error> {
    if is_external(href) || href.ends_with('/') {
        return Ok(Some(href.to_owned()));
    }
    if let Some(asset) = href.strip_prefix(ASSET_SCHEME) {
        return resolver.resolve_asset(asset);
    }
    match href.strip_suffix(".md") {
        Some(stem) => Ok(Some(format!("{stem}.html"))),
        None => Ok(Some(href.to_owned())),
    }
}

/// Resolve an image `src`.
///
/// Image sources name assets directly (the `asset://` scheme is optional);
/// absolute URLs pass through.
pub fn resolve_src<R: LinkResolver>(src: &str, resolver: &R) -> Result<Option<String>, R::Error> {
    if is_external(src) {
        return Ok(Some(src.to_owned()));
    }
    resolver.resolve_asset(src.strip_prefix(ASSET_SCHEME).unwrap_or(src))
}
