use std::sync::Arc;

use crate::{
    error::{HibikiError, HibikiResult},
    index::{Index, LiveSegmentIndex, SegmentIndex, SegmentReference},
    mpd::{Mpd, MpdType, Period, Representation},
    template::resolve_media_url,
    timeline::expand_timeline,
};

use super::SegmentIndexSource;

/// Builds a segment index from a media URL template driven by an
/// explicit timeline.
pub struct TimelineSegmentIndexSource {
    mpd: Option<Arc<Mpd>>,
    period: Option<Arc<Period>>,
    representation: Option<Arc<Representation>>,
    /// Wall-clock seconds at which the manifest snapshot was created.
    manifest_creation_time: f64,

    index: Option<Arc<Index>>,
}

impl TimelineSegmentIndexSource {
    /// # Panics
    ///
    /// Panics when the period start is unknown, when the representation
    /// declares no segment template, when the template lacks a media URL
    /// template or a timeline, or when the timescale is not positive.
    pub fn new(
        mpd: Arc<Mpd>,
        period: Arc<Period>,
        representation: Arc<Representation>,
        manifest_creation_time: f64,
    ) -> Self {
        assert!(period.start.is_some(), "period start must be known");

        let segment_template = representation
            .segment_template
            .as_ref()
            .expect("representation must declare a segment template");
        assert!(
            segment_template.media_url_template.is_some(),
            "segment template must declare a media url template"
        );
        assert!(segment_template.timescale > 0, "timescale must be positive");
        assert!(
            segment_template.timeline.is_some(),
            "segment template must declare a timeline"
        );

        Self {
            mpd: Some(mpd),
            period: Some(period),
            representation: Some(representation),
            manifest_creation_time,
            index: None,
        }
    }
}

impl SegmentIndexSource for TimelineSegmentIndexSource {
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
        let segment_template = representation
            .segment_template
            .as_ref()
            .expect("asserted at construction");
        let media_url_template = segment_template
            .media_url_template
            .as_deref()
            .expect("asserted at construction");
        let descriptor = segment_template
            .timeline
            .as_ref()
            .expect("asserted at construction");

        let timeline = expand_timeline(descriptor, segment_template.timescale);
        let timescale = segment_template.timescale as f64;

        // A dynamic manifest is assumed to only list segments that are or
        // were available, so the availability start time can be ignored
        // here. Entries that have already left the time-shift window are
        // pruned by the live index, not at construction.
        let mut references = Vec::with_capacity(timeline.len());
        for (i, interval) in timeline.iter().enumerate() {
            let scaled_start_time = interval.start as f64 / timescale;
            let scaled_end_time = interval.end as f64 / timescale;

            // The number replacement may be zero.
            let segment_number = i as u64 + segment_template.start_number;
            let locator = resolve_media_url(representation, segment_number, interval.start, 0, None)
                .ok_or_else(|| {
                    HibikiError::MediaUrlResolution(media_url_template.to_string())
                })?;

            references.push(SegmentReference::new(
                scaled_start_time,
                scaled_end_time,
                locator,
            ));
        }

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
