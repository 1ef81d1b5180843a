//! Read-only manifest model.
//!
//! This is the already-parsed form of a manifest snapshot: XML decoding
//! happens elsewhere, and segment index sources only borrow these values
//! (via [`Arc`](std::sync::Arc)) without ever mutating them.

use chrono::{DateTime, Utc};
use url::Url;

use crate::{error::HibikiResult, util::range::ByteRange};

/// Whether the presentation is fully described up front or refreshed
/// over time with a sliding availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MpdType {
    #[default]
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Default)]
pub struct Mpd {
    pub mpd_type: MpdType,
    /// Wall-clock zero point of a dynamic presentation.
    pub availability_start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct Period {
    /// Offset from the presentation start, in seconds.
    pub start: Option<f64>,
    /// Duration in seconds, if known.
    pub duration: Option<f64>,
}

/// One encoded variant of a media track within a period.
#[derive(Debug, Clone, Default)]
pub struct Representation {
    pub id: Option<String>,
    pub bandwidth: Option<u64>,
    /// Mirrors a relative media URL template resolves against.
    pub base_urls: Vec<Url>,
    pub segment_list: Option<SegmentList>,
    pub segment_template: Option<SegmentTemplate>,
}

/// Explicit per-segment URL addressing.
#[derive(Debug, Clone)]
pub struct SegmentList {
    /// Ticks per second for all tick-valued fields below.
    pub timescale: u64,
    /// Fixed per-segment duration in ticks.
    pub segment_duration: Option<u64>,
    pub start_number: Option<u64>,
    pub timeline: Option<TimelineDescriptor>,
    pub segment_urls: Vec<SegmentUrl>,
}

impl Default for SegmentList {
    fn default() -> Self {
        Self {
            timescale: 1,
            segment_duration: None,
            start_number: None,
            timeline: None,
            segment_urls: Vec::new(),
        }
    }
}

/// URL template addressing with an explicit timeline.
#[derive(Debug, Clone)]
pub struct SegmentTemplate {
    pub timescale: u64,
    pub start_number: u64,
    /// Media URL template with `$Number$` / `$Time$` style placeholders.
    pub media_url_template: Option<String>,
    pub timeline: Option<TimelineDescriptor>,
}

impl Default for SegmentTemplate {
    fn default() -> Self {
        Self {
            timescale: 1,
            start_number: 1,
            media_url_template: None,
            timeline: None,
        }
    }
}

/// One entry of an explicit segment list: equivalent mirror URLs plus an
/// optional sub-range of the resource.
#[derive(Debug, Clone)]
pub struct SegmentUrl {
    pub media_urls: Vec<Url>,
    pub media_range: Option<ByteRange>,
}

impl SegmentUrl {
    pub fn new(media_urls: Vec<Url>) -> Self {
        Self {
            media_urls,
            media_range: None,
        }
    }

    /// Attaches the `@mediaRange` byte-range-spec of the manifest entry.
    pub fn with_media_range<S>(mut self, range: S) -> HibikiResult<Self>
    where
        S: AsRef<str>,
    {
        self.media_range = Some(ByteRange::parse(range)?);
        Ok(self)
    }
}

/// Raw timeline descriptor, before expansion into per-segment intervals.
#[derive(Debug, Clone, Default)]
pub struct TimelineDescriptor {
    pub points: Vec<TimelinePoint>,
}

#[derive(Debug, Clone)]
pub struct TimelinePoint {
    /// Explicit start tick; re-anchors the timeline cursor when present.
    pub time: Option<u64>,
    /// Duration in ticks.
    pub duration: u64,
    /// Number of additional consecutive segments with the same duration.
    pub repeat: u64,
}

impl TimelinePoint {
    pub fn new(time: Option<u64>, duration: u64, repeat: u64) -> Self {
        Self {
            time,
            duration,
            repeat,
        }
    }
}
