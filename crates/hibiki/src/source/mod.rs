//! Segment index sources: lazy, memoizing constructors of a
//! representation's segment index.

mod list;
mod template;

pub use list::{ListSegmentIndexSource, TruncationDiagnostic};
pub use template::TimelineSegmentIndexSource;

use std::sync::Arc;

use crate::{error::HibikiResult, index::Index};

/// Lazily builds and owns one representation's segment index.
///
/// `create` memoizes: the first call builds the index, every later call
/// returns the same cached instance. The result is delivered
/// asynchronously even though construction itself performs no I/O, so
/// the caller sees one uniform shape for all index kinds.
///
/// `destroy` is terminal: it releases the cached index together with the
/// manifest data backing the source. Calling `create` afterwards is a
/// contract violation.
pub trait SegmentIndexSource {
    fn create(&mut self) -> impl std::future::Future<Output = HibikiResult<Arc<Index>>> + Send;

    fn destroy(&mut self);
}
