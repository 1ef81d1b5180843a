//! Expansion of timeline descriptors into concrete per-segment intervals.

use crate::mpd::TimelineDescriptor;

/// One segment's time span in unscaled ticks of the timescale the
/// descriptor was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineInterval {
    pub start: u64,
    pub end: u64,
}

/// Expands timeline points into one interval per segment.
///
/// A point with an explicit start tick re-anchors the cursor, which
/// permits gaps; points without one continue from the previous
/// interval's end. A repeat count of `r` emits `r + 1` intervals.
///
/// The returned intervals are ordered ascending and expressed in ticks
/// of `timescale`, which must be positive.
pub fn expand_timeline(descriptor: &TimelineDescriptor, timescale: u64) -> Vec<TimelineInterval> {
    assert!(timescale > 0, "timescale must be positive");

    let mut intervals = Vec::new();
    let mut cursor = 0u64;
    for point in &descriptor.points {
        if let Some(time) = point.time {
            cursor = time;
        }

        for _ in 0..=point.repeat {
            let start = cursor;
            cursor += point.duration;
            intervals.push(TimelineInterval { start, end: cursor });
        }
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpd::TimelinePoint;

    fn descriptor(points: Vec<TimelinePoint>) -> TimelineDescriptor {
        TimelineDescriptor { points }
    }

    #[test]
    fn test_contiguous_chain() {
        let timeline = descriptor(vec![
            TimelinePoint::new(Some(0), 10, 0),
            TimelinePoint::new(None, 10, 0),
            TimelinePoint::new(None, 5, 0),
        ]);

        let intervals = expand_timeline(&timeline, 1);
        assert_eq!(
            intervals,
            vec![
                TimelineInterval { start: 0, end: 10 },
                TimelineInterval { start: 10, end: 20 },
                TimelineInterval { start: 20, end: 25 },
            ]
        );
    }

    #[test]
    fn test_repeat_emits_additional_intervals() {
        let timeline = descriptor(vec![TimelinePoint::new(Some(100), 10, 2)]);

        let intervals = expand_timeline(&timeline, 90000);
        assert_eq!(
            intervals,
            vec![
                TimelineInterval {
                    start: 100,
                    end: 110
                },
                TimelineInterval {
                    start: 110,
                    end: 120
                },
                TimelineInterval {
                    start: 120,
                    end: 130
                },
            ]
        );
    }

    #[test]
    fn test_explicit_time_creates_gap() {
        let timeline = descriptor(vec![
            TimelinePoint::new(Some(0), 10, 0),
            TimelinePoint::new(Some(30), 10, 0),
        ]);

        let intervals = expand_timeline(&timeline, 1);
        assert_eq!(
            intervals,
            vec![
                TimelineInterval { start: 0, end: 10 },
                TimelineInterval { start: 30, end: 40 },
            ]
        );
    }

    #[test]
    fn test_empty_descriptor() {
        let intervals = expand_timeline(&descriptor(vec![]), 1);
        assert!(intervals.is_empty());
    }
}
