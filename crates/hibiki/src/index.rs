//! Ordered segment reference containers produced by the index sources.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    locator::Locator,
    mpd::{Mpd, Period},
};

/// One fetchable, time-bounded media segment.
///
/// Times are in seconds; the segment spans the half-open interval
/// `[start_time, end_time)`.
#[derive(Debug, Clone)]
pub struct SegmentReference {
    start_time: f64,
    end_time: f64,
    locator: Locator,
}

impl SegmentReference {
    pub fn new(start_time: f64, end_time: f64, locator: Locator) -> Self {
        assert!(
            start_time < end_time,
            "segment reference must span a non-empty interval"
        );

        Self {
            start_time,
            end_time,
            locator,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

/// Static, fully described segment index: an ordered, non-overlapping
/// sequence of segment references.
#[derive(Debug, Default)]
pub struct SegmentIndex {
    references: Vec<SegmentReference>,
}

impl SegmentIndex {
    pub fn new(references: Vec<SegmentReference>) -> Self {
        debug_assert!(
            references
                .windows(2)
                .all(|w| w[0].end_time() <= w[1].start_time()),
            "segment references must be ordered and non-overlapping"
        );

        Self { references }
    }

    pub fn references(&self) -> &[SegmentReference] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// The reference containing `time`, if any. Timeline gaps between
    /// references yield `None`.
    pub fn find(&self, time: f64) -> Option<&SegmentReference> {
        let i = self.references.partition_point(|r| r.end_time() <= time);
        self.references.get(i).filter(|r| r.start_time() <= time)
    }
}

/// Segment index of a dynamic presentation.
///
/// Holds the references as published plus the wall-clock anchors needed
/// to compute the availability window later; pruning entries that fall
/// out of the time-shift window happens as playback time advances, not
/// at construction.
#[derive(Debug)]
pub struct LiveSegmentIndex {
    index: SegmentIndex,
    mpd: Arc<Mpd>,
    period: Arc<Period>,
    /// Wall-clock seconds at which the manifest snapshot was created.
    manifest_creation_time: f64,
}

impl LiveSegmentIndex {
    pub fn new(
        references: Vec<SegmentReference>,
        mpd: Arc<Mpd>,
        period: Arc<Period>,
        manifest_creation_time: f64,
    ) -> Self {
        Self {
            index: SegmentIndex::new(references),
            mpd,
            period,
            manifest_creation_time,
        }
    }

    pub fn references(&self) -> &[SegmentReference] {
        self.index.references()
    }

    pub fn availability_start_time(&self) -> Option<DateTime<Utc>> {
        self.mpd.availability_start_time
    }

    pub fn period_start(&self) -> Option<f64> {
        self.period.start
    }

    pub fn manifest_creation_time(&self) -> f64 {
        self.manifest_creation_time
    }
}

/// Product of a segment index source: a static container for fully
/// described presentations, or a live index for dynamic ones.
#[derive(Debug)]
pub enum Index {
    Static(SegmentIndex),
    Live(LiveSegmentIndex),
}

impl Index {
    pub fn references(&self) -> &[SegmentReference] {
        match self {
            Self::Static(index) => index.references(),
            Self::Live(index) => index.references(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(start: f64, end: f64) -> SegmentReference {
        let locator = Locator::new(vec!["https://example.com/seg.m4s".parse().unwrap()]);
        SegmentReference::new(start, end, locator)
    }

    #[test]
    fn test_find_contained_time() {
        let index = SegmentIndex::new(vec![
            reference(0.0, 2.0),
            reference(2.0, 4.0),
            reference(4.0, 6.0),
        ]);

        assert_eq!(index.find(0.0).unwrap().start_time(), 0.0);
        assert_eq!(index.find(1.9).unwrap().start_time(), 0.0);
        assert_eq!(index.find(2.0).unwrap().start_time(), 2.0);
        assert_eq!(index.find(5.5).unwrap().start_time(), 4.0);
        assert!(index.find(6.0).is_none());
    }

    #[test]
    fn test_find_in_gap() {
        let index = SegmentIndex::new(vec![reference(0.0, 2.0), reference(5.0, 7.0)]);

        assert!(index.find(3.0).is_none());
        assert_eq!(index.find(5.0).unwrap().start_time(), 5.0);
    }

    #[test]
    #[should_panic]
    fn test_empty_reference_interval_is_rejected() {
        reference(1.0, 1.0);
    }
}
