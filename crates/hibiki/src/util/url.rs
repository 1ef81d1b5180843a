use url::Url;

use crate::error::HibikiResult;

pub(crate) fn is_absolute_url(s: &str) -> bool {
    s.starts_with("http://")
        || s.starts_with("https://")
        || s.starts_with("file://")
        || s.starts_with("ftp://")
}

/// Resolves `new` against `current`, keeping the query portion of
/// `current` (usually the manifest URL, which may carry auth tokens)
/// unless `new` carries a query of its own.
///
/// ```text
/// merge_baseurls(https://example.com/manifest.mpd?auth=secret, /video42.mp4) =>
///   https://example.com/video42.mp4?auth=secret
///
/// merge_baseurls(https://example.com/manifest.mpd?auth=old, /video42.mp4?auth=new) =>
///   https://example.com/video42.mp4?auth=new
/// ```
pub(crate) fn merge_baseurls(current: &Url, new: &str) -> HibikiResult<Url> {
    if is_absolute_url(new) {
        Ok(Url::parse(new)?)
    } else {
        let mut merged = current.join(new)?;
        if merged.query().is_none() {
            merged.set_query(current.query());
        }
        Ok(merged)
    }
}
