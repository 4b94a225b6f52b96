//! Link and bare-id resolution

use std::sync::LazyLock;

use regex::Regex;

use super::{ResolveError, ResolveResult, SourceInfo, SourceResolver};
use crate::types::Seconds;

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
        .expect("link pattern is valid")
});
static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("bare id pattern is valid"));
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("duration pattern is valid")
});

/// Resolves watch, short and embed links plus bare 11-character ids
///
/// Anything else is `NotFound`; free-text search belongs to an external
/// catalog resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkResolver;

impl LinkResolver {
    pub fn new() -> Self {
        Self
    }

    /// Extract the stream id from a link or bare id
    pub fn extract_id<'a>(&self, input: &'a str) -> Option<&'a str> {
        if let Some(caps) = LINK.captures(input) {
            return caps.get(1).map(|m| m.as_str());
        }
        BARE_ID.is_match(input).then_some(input)
    }
}

impl SourceResolver for LinkResolver {
    fn resolve(&self, input: &str) -> ResolveResult<SourceInfo> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ResolveError::EmptyInput);
        }

        let id = self
            .extract_id(input)
            .ok_or_else(|| ResolveError::NotFound(input.to_string()))?;
        let offset = parse_start_offset(input);

        log::debug!("LinkResolver: {} -> id={} offset={:?}", input, id, offset);
        Ok(SourceInfo::from_id(id).with_start_offset(offset))
    }
}

/// Read a start offset from a link's `t=` or `start=` query parameter
///
/// Accepts plain seconds (`90`) and unit form (`1h2m3s`, `4m`, `30s`).
/// `t` takes precedence over `start`. Unparseable values are ignored.
pub fn parse_start_offset(link: &str) -> Option<Seconds> {
    let (_, query) = link.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    let param = |name: &str| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, value)| *key == name && !value.is_empty())
            .map(|(_, value)| value)
    };

    let value = param("t").or_else(|| param("start"))?;
    parse_duration(value)
}

/// Seconds for `90` or `1h2m3s`; `None` when malformed or out of range
fn parse_duration(value: &str) -> Option<Seconds> {
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds as Seconds);
    }

    let caps = DURATION.captures(value)?;
    if caps.iter().skip(1).all(|m| m.is_none()) {
        return None;
    }

    let mut total: u64 = 0;
    for (idx, scale) in [(1, 3600), (2, 60), (3, 1)] {
        if let Some(m) = caps.get(idx) {
            let part = m.as_str().parse::<u64>().ok()?.checked_mul(scale)?;
            total = total.checked_add(part)?;
        }
    }
    Some(total as Seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_link_forms() {
        let resolver = LinkResolver::new();
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1",
            "dQw4w9WgXcQ",
        ] {
            let source = resolver.resolve(input).unwrap();
            assert_eq!(source.source_id, "dQw4w9WgXcQ", "input: {}", input);
        }
    }

    #[test]
    fn test_thumbnail_derived_from_id() {
        let source = LinkResolver::new().resolve("https://youtu.be/y6120QOlsfU").unwrap();
        assert_eq!(source.thumbnail_url, "https://img.youtube.com/vi/y6120QOlsfU/mqdefault.jpg");
    }

    #[test]
    fn test_free_text_not_found() {
        let resolver = LinkResolver::new();
        assert!(matches!(resolver.resolve("darude sandstorm"), Err(ResolveError::NotFound(_))));
        assert!(matches!(resolver.resolve("   "), Err(ResolveError::EmptyInput)));
    }

    #[test]
    fn test_start_offset_forms() {
        assert_eq!(parse_start_offset("https://youtu.be/dQw4w9WgXcQ?t=90"), Some(90.0));
        assert_eq!(
            parse_start_offset("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1h2m3s"),
            Some(3723.0)
        );
        assert_eq!(
            parse_start_offset("https://www.youtube.com/embed/dQw4w9WgXcQ?start=45"),
            Some(45.0)
        );
        assert_eq!(parse_start_offset("https://youtu.be/dQw4w9WgXcQ?t=4m"), Some(240.0));
        assert_eq!(parse_start_offset("https://youtu.be/dQw4w9WgXcQ"), None);
        assert_eq!(parse_start_offset("https://youtu.be/dQw4w9WgXcQ?t=soon"), None);
    }

    #[test]
    fn test_oversized_offset_ignored() {
        assert_eq!(parse_start_offset("https://youtu.be/dQw4w9WgXcQ?t=9999999999999999h"), None);
        assert_eq!(parse_start_offset("https://youtu.be/dQw4w9WgXcQ?t=5124095576030431h16s"), None);
        assert_eq!(
            parse_start_offset("https://youtu.be/dQw4w9WgXcQ?t=99999999999999999999999m"),
            None
        );
        // Still resolves, just without an offset
        let source = LinkResolver::new()
            .resolve("https://youtu.be/dQw4w9WgXcQ?t=9999999999999999h")
            .unwrap();
        assert_eq!(source.start_offset_seconds, None);
    }

    #[test]
    fn test_offset_carried_into_source() {
        let source = LinkResolver::new()
            .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=30s")
            .unwrap();
        assert_eq!(source.source_id, "dQw4w9WgXcQ");
        assert_eq!(source.start_offset_seconds, Some(30.0));
    }
}
