//! Slash-safe joining of a base endpoint and path segments

/// A value that can appear as one piece of a request path.
///
/// Returning `None` skips the segment entirely.
pub trait UrlSegment {
    fn segment(&self) -> Option<String>;
}

impl UrlSegment for str {
    fn segment(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl UrlSegment for String {
    fn segment(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: UrlSegment + ?Sized> UrlSegment for &T {
    fn segment(&self) -> Option<String> {
        (**self).segment()
    }
}

impl<T: UrlSegment> UrlSegment for Option<T> {
    fn segment(&self) -> Option<String> {
        self.as_ref().and_then(UrlSegment::segment)
    }
}

macro_rules! numeric_segment {
    ($($ty:ty),*) => {
        $(
            impl UrlSegment for $ty {
                fn segment(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

numeric_segment!(u8, u16, u32, u64, usize, i32, i64);

/// Join `base` and `segments` with exactly one slash between pieces.
///
/// Leading and trailing slashes are stripped from every piece, and pieces
/// that end up empty are dropped, so callers may pre-format segments any way
/// they like.
pub fn build_url(base: &str, segments: &[&dyn UrlSegment]) -> String {
    let mut pieces: Vec<String> = Vec::with_capacity(segments.len() + 1);

    let base = base.trim_matches('/');
    if !base.is_empty() {
        pieces.push(base.to_string());
    }

    for segment in segments {
        if let Some(raw) = segment.segment() {
            let trimmed = raw.trim_matches('/');
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
        }
    }

    pieces.join("/")
}

/// Relative path from segments alone, e.g. `site/42/energy`
pub fn join_path(segments: &[&dyn UrlSegment]) -> String {
    build_url("", segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://monitoringapi.solaredge.com";

    #[test]
    fn test_plain_join() {
        assert_eq!(
            build_url(BASE, &[&"site", &42u64, &"details"]),
            "https://monitoringapi.solaredge.com/site/42/details"
        );
    }

    #[test]
    fn test_strips_redundant_slashes() {
        let base = format!("{}/", BASE);
        assert_eq!(
            build_url(&base, &[&"/site/", &"//42", &"details/"]),
            "https://monitoringapi.solaredge.com/site/42/details"
        );
    }

    #[test]
    fn test_skips_absent_and_empty_segments() {
        let missing: Option<&str> = None;
        assert_eq!(
            build_url(BASE, &[&"sites", &missing, &"", &"/", &Some("list")]),
            "https://monitoringapi.solaredge.com/sites/list"
        );
    }

    #[test]
    fn test_base_only() {
        assert_eq!(build_url(BASE, &[]), BASE);
        assert_eq!(build_url("https://example.com///", &[]), "https://example.com");
    }

    #[test]
    fn test_multi_piece_segment_is_kept_whole() {
        assert_eq!(
            build_url(BASE, &[&"/site/7/overview/"]),
            "https://monitoringapi.solaredge.com/site/7/overview"
        );
    }

    #[test]
    fn test_join_path() {
        let id: u64 = 123;
        assert_eq!(join_path(&[&"site", &id, &"energy"]), "site/123/energy");
        assert_eq!(join_path(&[]), "");
    }

    #[test]
    fn test_never_produces_double_slash_after_scheme() {
        let segments = ["a/", "/b", "/c/", "d"];
        for first in &segments {
            for second in &segments {
                let url = build_url(BASE, &[first, second]);
                let path = url.trim_start_matches("https://");
                assert!(!path.contains("//"), "double slash in {url}");
                assert!(!url.ends_with('/'), "trailing slash in {url}");
            }
        }
    }
}
