use std::fmt;
use std::ops::RangeInclusive;

/// Inclusive, contiguous range of frame indices `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

#[allow(clippy::len_without_is_empty)]
impl Window {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "window start {start} past end {end}");
        Self { start, end }
    }

    /// `[max(0, center - radius), min(len - 1, center + radius)]`.
    pub fn around(center: usize, radius: usize, len: usize) -> Self {
        let last = len.saturating_sub(1);
        let center = center.min(last);
        Self {
            start: center.saturating_sub(radius),
            end: center.saturating_add(radius).min(last),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Every index in the window except `center`.
    pub fn neighbors(&self, center: usize) -> impl Iterator<Item = usize> {
        self.indices().filter(move |&i| i != center)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
