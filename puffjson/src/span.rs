use std::ops::Range;

/// A [`Span`] represents a contiguous region of the input. It is used to correspond a decoded
/// JSON value to its source bytes. An invariant to be maintained is that `lo <= hi`. It is
/// typically the case that the decoder has logic bugs if this invariant is violated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub lo: usize,
    pub hi: usize,
}

impl Span {
    /// Construct a new span. Will panic if `lo > hi`. Prefer this constructor to construct a new
    /// [`Span`] over using direct struct initialization.
    pub const fn new(lo: usize, hi: usize) -> Self {
        assert!(lo <= hi, "`lo` must not be larger than `hi`");
        Span { lo, hi }
    }

    /// Number of bytes covered.
    pub const fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub const fn is_empty(&self) -> bool {
        self.lo == self.hi
    }

    pub const fn into_range(self) -> Range<usize> {
        self.lo..self.hi
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.into_range()
    }
}
