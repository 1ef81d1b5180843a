//! # hibiki
//!
//! Turns one adaptive-streaming manifest snapshot's addressing scheme
//! into a concrete, time-ordered segment index, and fetches the
//! resulting segments resiliently across mirror URLs.
//!
//! ```text
//! ┌──────────────────────┐   timeline    ┌─────────────────────┐
//! │ manifest descriptor  ├───expansion──►│ per-segment scaling │
//! │ (SegmentList /       │               │ + url resolution    │
//! │  SegmentTemplate)    │               └─────────┬───────────┘
//! └──────────────────────┘                         │
//!                                 ordered SegmentReference list
//!                                                  │
//!                          ┌───────────────────────▼───────────┐
//!                          │ SegmentIndex (static manifest)    │
//!                          │ LiveSegmentIndex (dynamic)        │
//!                          └───────────────────────┬───────────┘
//!                                                  │ fetch
//!                                       ┌──────────▼──────────┐
//!                                       │ Locator failover    │
//!                                       │ mirror 0 → 1 → …    │
//!                                       └─────────────────────┘
//! ```
//!
//! The two [`SegmentIndexSource`] variants cover the two addressing
//! modes: [`ListSegmentIndexSource`] for explicit per-segment URL lists
//! and [`TimelineSegmentIndexSource`] for URL templates driven by a
//! timeline. Both memoize their index across `create` calls and wrap it
//! in a live variant for dynamic manifests.

pub mod error;
pub mod index;
pub mod locator;
pub mod mpd;
pub mod source;
pub mod template;
pub mod timeline;
pub mod util;

pub use error::{HibikiError, HibikiResult};
pub use index::{Index, LiveSegmentIndex, SegmentIndex, SegmentReference};
pub use locator::Locator;
pub use source::{
    ListSegmentIndexSource, SegmentIndexSource, TimelineSegmentIndexSource, TruncationDiagnostic,
};
pub use util::{http::HttpClient, range::ByteRange};
