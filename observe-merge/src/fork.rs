//! Fork resolution.
//!
//! A replicated store may hold several concurrent revisions (forks) of the
//! same element after a write conflict. Export picks exactly one of them:
//!
//! 1. if both forks carry a timestamp, the later timestamp wins;
//! 2. a fork with a timestamp beats a fork without one;
//! 3. otherwise, and on equal timestamps, the lexicographically greater
//!    version wins.
//!
//! Rule 3 does not express recency. Version tokens are opaque, so it only
//! keeps repeated queries returning the same fork.

use observe_types::Element;
use std::cmp::Ordering;

/// Compares two forks by recency. `Greater` means `a` is more recent than `b`.
pub fn compare_recency(a: &Element, b: &Element) -> Ordering {
    let by_time = match (&a.timestamp, &b.timestamp) {
        (Some(ta), Some(tb)) => ta.cmp(tb),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    // Option ordering puts a missing version below any present one.
    by_time.then_with(|| a.version.cmp(&b.version))
}

/// Returns the winning fork, or `None` if the element has no forks.
///
/// On a complete tie (same timestamp and version) the earliest fork in input
/// order is kept.
pub fn resolve<I>(forks: I) -> Option<Element>
where
    I: IntoIterator<Item = Element>,
{
    forks.into_iter().reduce(|best, fork| {
        if compare_recency(&fork, &best) == Ordering::Greater {
            fork
        } else {
            best
        }
    })
}

/// Borrowing form of [`resolve`].
pub fn latest(forks: &[Element]) -> Option<&Element> {
    forks.iter().reduce(|best, fork| {
        if compare_recency(fork, best) == Ordering::Greater {
            fork
        } else {
            best
        }
    })
}

/// Sorts elements oldest first: the inverse of fork precedence.
///
/// The sort is stable, so fully tied elements keep their relative order.
pub fn sort_oldest_first(elements: &mut [&Element]) {
    elements.sort_by(|a, b| compare_recency(a, b));
}
