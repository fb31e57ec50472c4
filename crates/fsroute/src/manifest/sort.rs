/// Specificity ordering for manifest routes
use std::cmp::Ordering;

use crate::path::strip_index_suffix;
use crate::route::pattern::{classify_segment, SegmentType};

/// Matching precedence of one path segment, most specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SegmentRank {
    Static,
    Dynamic,
    CatchAll,
    NotFound,
}

impl SegmentRank {
    /// Whether a request path must contain this segment
    fn is_required(self) -> bool {
        matches!(self, SegmentRank::Static | SegmentRank::Dynamic)
    }
}

/// Ranks of the non-group segments of an absolute route path
pub(crate) fn segment_ranks(path: &str) -> Vec<SegmentRank> {
    strip_index_suffix(path.trim_matches('/'))
        .split('/')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| match classify_segment(segment) {
            SegmentType::Static(_) => Some(SegmentRank::Static),
            SegmentType::Dynamic(_) => Some(SegmentRank::Dynamic),
            SegmentType::CatchAll(_) => Some(SegmentRank::CatchAll),
            SegmentType::NotFound => Some(SegmentRank::NotFound),
            SegmentType::Group(_) | SegmentType::ArrayGroup(_) => None,
        })
        .collect()
}

/// Order two routes so the more specific one comes first
///
/// 1. With `static_first`, fully static routes before any dynamic route
/// 2. More required segments first (catch-alls are optional)
/// 3. At the first differing segment: ending < static < dynamic < catch-all < not-found
///
/// Remaining ties compare equal so a stable sort keeps discovery order.
pub(crate) fn compare_routes(a: &str, b: &str, static_first: bool) -> Ordering {
    let a_ranks = segment_ranks(a);
    let b_ranks = segment_ranks(b);

    let is_dynamic = |ranks: &[SegmentRank]| ranks.iter().any(|rank| *rank != SegmentRank::Static);
    let required = |ranks: &[SegmentRank]| ranks.iter().filter(|rank| rank.is_required()).count();

    let by_static = if static_first {
        is_dynamic(&a_ranks).cmp(&is_dynamic(&b_ranks))
    } else {
        Ordering::Equal
    };

    by_static
        .then_with(|| required(&b_ranks).cmp(&required(&a_ranks)))
        .then_with(|| {
            let len = a_ranks.len().max(b_ranks.len());
            (0..len)
                .map(|i| a_ranks.get(i).cmp(&b_ranks.get(i)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
}
