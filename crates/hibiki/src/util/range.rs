use crate::error::{HibikiError, HibikiResult};

/// Inclusive byte range of a remote resource.
///
/// `end` of `None` means everything up to the end of the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl ByteRange {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    /// The byte range shall be expressed and formatted as a byte-range-spec
    /// as defined in IETF RFC 7233:2014, subclause 2.1. It is restricted to
    /// a single expression identifying a contiguous range of bytes.
    pub fn parse<S>(s: S) -> HibikiResult<Self>
    where
        S: AsRef<str>,
    {
        let s = s.as_ref();
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| HibikiError::InvalidMediaRange(s.to_string()))?;

        let start = start
            .parse::<u64>()
            .map_err(|_| HibikiError::InvalidMediaRange(s.to_string()))?;
        let end = if end.is_empty() {
            None
        } else {
            let end = end
                .parse::<u64>()
                .map_err(|_| HibikiError::InvalidMediaRange(s.to_string()))?;
            if end < start {
                return Err(HibikiError::InvalidMediaRange(s.to_string()));
            }
            Some(end)
        };

        Ok(Self { start, end })
    }

    /// Whether the range covers the whole resource, in which case no
    /// `Range` header needs to be sent at all.
    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end.is_none()
    }

    pub fn to_http_range(&self) -> String {
        if let Some(end) = self.end {
            format!("bytes={}-{}", self.start, end)
        } else {
            format!("bytes={}-", self.start)
        }
    }
}

impl Default for ByteRange {
    fn default() -> Self {
        Self {
            start: 0,
            end: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_http_range() {
        let range = ByteRange::new(10, Some(19));
        assert_eq!(range.to_http_range(), "bytes=10-19");

        let range = ByteRange::new(10, None);
        assert_eq!(range.to_http_range(), "bytes=10-");
    }

    #[test]
    fn test_parse_media_range() {
        // 0 - 500 means 501 bytes
        let range = ByteRange::parse("0-500").unwrap();
        assert_eq!(range, ByteRange::new(0, Some(500)));

        let range = ByteRange::parse("100-").unwrap();
        assert_eq!(range, ByteRange::new(100, None));

        ByteRange::parse("abc").unwrap_err();
        ByteRange::parse("100-10").unwrap_err();
    }

    #[test]
    fn test_is_full() {
        assert!(ByteRange::default().is_full());
        assert!(!ByteRange::new(1, None).is_full());
        assert!(!ByteRange::new(0, Some(10)).is_full());
    }
}
