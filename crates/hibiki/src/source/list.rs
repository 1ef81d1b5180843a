use std::sync::Arc;

use crate::{
    error::HibikiResult,
    index::{Index, LiveSegmentIndex, SegmentIndex, SegmentReference},
    locator::Locator,
    mpd::{Mpd, MpdType, Period, Representation, SegmentList},
    timeline::expand_timeline,
};

use super::SegmentIndexSource;

/// Emitted when a segment list's timeline and URL list disagree in
/// length. Non-fatal; the shorter length wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationDiagnostic {
    pub timeline_count: usize,
    pub url_count: usize,
    pub emitted: usize,
}

/// Builds a segment index from an explicit per-segment URL list.
///
/// Segment timing comes from a fixed per-segment duration, a timeline,
/// or, for a single-segment representation, the period duration.
pub struct ListSegmentIndexSource {
    mpd: Option<Arc<Mpd>>,
    period: Option<Arc<Period>>,
    representation: Option<Arc<Representation>>,
    /// Wall-clock seconds at which the manifest snapshot was created.
    manifest_creation_time: f64,

    index: Option<Arc<Index>>,
    truncation: Option<TruncationDiagnostic>,
}

impl ListSegmentIndexSource {
    /// # Panics
    ///
    /// Panics when the representation declares no segment list, when the
    /// list has neither a fixed duration, a single URL, nor a non-empty
    /// timeline, or when the timescale is not positive. These encode
    /// manifest well-formedness the caller must have validated already.
    pub fn new(
        mpd: Arc<Mpd>,
        period: Arc<Period>,
        representation: Arc<Representation>,
        manifest_creation_time: f64,
    ) -> Self {
        let segment_list = representation
            .segment_list
            .as_ref()
            .expect("representation must declare a segment list");

        let has_timeline = segment_list
            .timeline
            .as_ref()
            .is_some_and(|timeline| !timeline.points.is_empty());
        assert!(
            segment_list.segment_duration.is_some()
                || segment_list.segment_urls.len() == 1
                || has_timeline,
            "segment list must declare a fixed duration, a single url, or a non-empty timeline"
        );
        assert!(segment_list.timescale > 0, "timescale must be positive");

        Self {
            mpd: Some(mpd),
            period: Some(period),
            representation: Some(representation),
            manifest_creation_time,
            index: None,
            truncation: None,
        }
    }

    /// Diagnostic from `create`, present when the timeline and URL list
    /// lengths disagreed and the reference list was truncated.
    pub fn truncation(&self) -> Option<&TruncationDiagnostic> {
        self.truncation.as_ref()
    }
}

impl SegmentIndexSource for ListSegmentIndexSource {
    async fn create(&mut self) -> HibikiResult<Arc<Index>> {
        if let Some(index) = &self.index {
            return Ok(index.clone());
        }

        let mpd = self.mpd.as_ref().expect("source used after destroy");
        let period = self.period.as_ref().expect("source used after destroy");
        let representation = self
            .representation
            .as_ref()
            .expect("source used after destroy");
        let segment_list = representation
            .segment_list
            .as_ref()
            .expect("asserted at construction");

        let (references, truncation) = build_references(segment_list, period);
        if let Some(truncation) = &truncation {
            tracing::warn!(
                "The length of the segment timeline and segment urls does not match, truncating {} to {}",
                truncation.url_count,
                truncation.emitted,
            );
        }
        self.truncation = truncation;

        let index = Arc::new(match mpd.mpd_type {
            MpdType::Dynamic => Index::Live(LiveSegmentIndex::new(
                references,
                mpd.clone(),
                period.clone(),
                self.manifest_creation_time,
            )),
            MpdType::Static => Index::Static(SegmentIndex::new(references)),
        });
        self.index = Some(index.clone());

        Ok(index)
    }

    fn destroy(&mut self) {
        self.mpd = None;
        self.period = None;
        self.representation = None;
        self.index = None;
    }
}

/// Folds the segment list into an ordered reference list, threading the
/// previous end tick as the next start tick.
///
/// Tick values are held as f64: the single-segment branch derives its
/// end tick from the period duration in seconds, which need not land on
/// an integer tick.
fn build_references(
    segment_list: &SegmentList,
    period: &Period,
) -> (Vec<SegmentReference>, Option<TruncationDiagnostic>) {
    let timeline = segment_list
        .timeline
        .as_ref()
        .map(|descriptor| expand_timeline(descriptor, segment_list.timescale))
        .unwrap_or_default();

    let mut last_end_time = match (segment_list.segment_duration, segment_list.start_number) {
        (Some(duration), Some(start_number)) => (duration * start_number) as f64,
        _ => timeline
            .first()
            .map(|interval| interval.start as f64)
            .unwrap_or(0.0),
    };

    let mut emitted = segment_list.segment_urls.len();
    let mut truncation = None;
    if !timeline.is_empty() && timeline.len() != segment_list.segment_urls.len() {
        emitted = timeline.len().min(segment_list.segment_urls.len());
        truncation = Some(TruncationDiagnostic {
            timeline_count: timeline.len(),
            url_count: segment_list.segment_urls.len(),
            emitted,
        });
    }

    let timescale = segment_list.timescale as f64;
    let mut references = Vec::with_capacity(emitted);
    for (i, segment_url) in segment_list.segment_urls.iter().take(emitted).enumerate() {
        let start_time = last_end_time;
        let scaled_start_time = start_time / timescale;

        let (end_time, scaled_end_time) = if let Some(duration) = segment_list.segment_duration {
            let end_time = start_time + duration as f64;
            (end_time, end_time / timescale)
        } else if !timeline.is_empty() {
            // The interval start is ignored; list entries are continuous.
            let end_time = timeline[i].end as f64;
            (end_time, end_time / timescale)
        } else {
            // Asserted at construction: exactly one url, bounded by the
            // period duration.
            let period_duration = period
                .duration
                .expect("period duration must be known for a single-segment list");
            let scaled_end_time = scaled_start_time + period_duration;
            (scaled_end_time * timescale, scaled_end_time)
        };
        last_end_time = end_time;

        let locator = match &segment_url.media_range {
            Some(range) => {
                Locator::with_range(segment_url.media_urls.clone(), range.start, range.end)
            }
            None => Locator::new(segment_url.media_urls.clone()),
        };

        references.push(SegmentReference::new(
            scaled_start_time,
            scaled_end_time,
            locator,
        ));
    }

    (references, truncation)
}
