//! Segment/period resolution
//!
//! Two sources of half boundaries:
//! - frame counters with a gap (`periods_from_frame_jumps`), used by the
//!   open CSV where both halves share one running counter
//! - an explicit segment field per sample (`PeriodTracker`), used by the txt
//!   stream whose gameclock restarts every half
//!
//! The tracker also estimates the sampling rate from the gameclock.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Diagnostics, ParseWarning};
use crate::models::SegmentKey;

/// Inclusive bounds of one segment, in frames or milliseconds
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub start: i64,
    pub end: i64,
}

impl Period {
    pub fn contains(&self, value: i64) -> bool {
        self.start <= value && value <= self.end
    }

    /// Row count of a frame-unit period
    pub fn frame_count(&self) -> usize {
        (self.end - self.start + 1).max(0) as usize
    }

    /// Row count of a millisecond-unit period sampled at `framerate`
    pub fn frame_count_at(&self, framerate: Option<u32>) -> usize {
        self.frame_offset_at(self.end, framerate).map_or(0, |last| last + 1)
    }

    /// Row of a millisecond timestamp inside this period
    pub fn frame_offset_at(&self, clock_ms: i64, framerate: Option<u32>) -> Option<usize> {
        if !self.contains(clock_ms) {
            return None;
        }
        let elapsed = clock_ms - self.start;
        let offset = match framerate {
            Some(rate) => elapsed * rate as i64 / 1000,
            None => 0,
        };
        Some(offset as usize)
    }
}

/// Split a frame counter into segments wherever it jumps by more than one.
///
/// Frames are de-duplicated in order of first appearance (tracking rows
/// repeat the frame once per object). Segments are numbered from 1, the way
/// the event CSV numbers its phases.
pub fn periods_from_frame_jumps<I>(frames: I) -> BTreeMap<SegmentKey, Period>
where
    I: IntoIterator<Item = i64>,
{
    let mut seen = FxHashSet::default();
    let distinct: Vec<i64> = frames.into_iter().filter(|f| seen.insert(*f)).collect();

    let mut periods = BTreeMap::new();
    let Some(&first) = distinct.first() else {
        return periods;
    };

    let mut start = first;
    let mut prev = first;
    let mut index = 1u32;
    for &frame in &distinct[1..] {
        if frame - prev > 1 {
            periods.insert(SegmentKey::Index(index), Period { start, end: prev });
            index += 1;
            start = frame;
        }
        prev = frame;
    }
    periods.insert(SegmentKey::Index(index), Period { start, end: prev });

    periods
}

/// `round(1000 / delta_ms)`; `None` for deltas that give no usable rate
pub fn framerate_from_delta(delta_ms: i64) -> Option<u32> {
    let delta = delta_ms.unsigned_abs();
    if delta == 0 {
        return None;
    }
    let rate = (1000.0 / delta as f64).round() as u32;
    (rate > 0).then_some(rate)
}

/// Tracks segment bounds and framerate over a stream of
/// `(segment, gameclock_ms)` samples in file order.
///
/// A segment starts at its first sample and ends at the last sample seen for
/// it. The framerate comes from consecutive samples of the same segment; when
/// an estimate disagrees with the current one the newer estimate wins and a
/// warning is emitted. Data already placed is not rescaled.
#[derive(Debug, Default)]
pub struct PeriodTracker {
    periods: BTreeMap<SegmentKey, Period>,
    last: Option<(SegmentKey, i64)>,
    framerate: Option<u32>,
    diag: Diagnostics,
}

impl PeriodTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, segment: SegmentKey, clock_ms: i64) {
        self.periods
            .entry(segment.clone())
            .and_modify(|p| p.end = p.end.max(clock_ms))
            .or_insert(Period { start: clock_ms, end: clock_ms });

        if let Some((last_segment, last_clock)) = &self.last {
            if *last_segment == segment {
                self.update_framerate(clock_ms - last_clock);
            }
        }

        self.last = Some((segment, clock_ms));
    }

    fn update_framerate(&mut self, delta_ms: i64) {
        let Some(estimate) = framerate_from_delta(delta_ms) else {
            return;
        };

        match self.framerate {
            None => self.framerate = Some(estimate),
            Some(current) if current != estimate => {
                self.diag.warn(ParseWarning::FramerateAmbiguity {
                    previous: current,
                    current: estimate,
                });
                self.framerate = Some(estimate);
            }
            Some(_) => {}
        }
    }

    pub fn framerate(&self) -> Option<u32> {
        self.framerate
    }

    pub(crate) fn finish(self) -> (BTreeMap<SegmentKey, Period>, Option<u32>, Diagnostics) {
        (self.periods, self.framerate, self.diag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_jump_splits_segments() {
        let periods = periods_from_frame_jumps([100, 101, 102, 205, 206]);
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[&SegmentKey::Index(1)], Period { start: 100, end: 102 });
        assert_eq!(periods[&SegmentKey::Index(2)], Period { start: 205, end: 206 });
    }

    #[test]
    fn test_repeated_frames_are_deduplicated() {
        let periods = periods_from_frame_jumps([1, 1, 1, 2, 2, 3, 3, 10, 10, 11]);
        assert_eq!(periods[&SegmentKey::Index(1)], Period { start: 1, end: 3 });
        assert_eq!(periods[&SegmentKey::Index(2)], Period { start: 10, end: 11 });
    }

    #[test]
    fn test_single_frame_segment() {
        let periods = periods_from_frame_jumps([5, 9]);
        assert_eq!(periods[&SegmentKey::Index(1)], Period { start: 5, end: 5 });
        assert_eq!(periods[&SegmentKey::Index(1)].frame_count(), 1);
        assert_eq!(periods[&SegmentKey::Index(2)], Period { start: 9, end: 9 });
    }

    #[test]
    fn test_empty_input() {
        assert!(periods_from_frame_jumps(Vec::new()).is_empty());
    }

    #[test]
    fn test_framerate_from_40ms() {
        assert_eq!(framerate_from_delta(40), Some(25));
        assert_eq!(framerate_from_delta(-40), Some(25));
        assert_eq!(framerate_from_delta(100), Some(10));
        assert_eq!(framerate_from_delta(0), None);
        assert_eq!(framerate_from_delta(5000), None);
    }

    #[test]
    fn test_tracker_steady_rate() {
        let mut tracker = PeriodTracker::new();
        for i in 0..10 {
            tracker.observe(SegmentKey::Index(1), i * 40);
        }
        let (periods, framerate, diag) = tracker.finish();

        assert_eq!(framerate, Some(25));
        assert_eq!(periods[&SegmentKey::Index(1)], Period { start: 0, end: 360 });
        assert!(diag.into_warnings().is_empty());
    }

    #[test]
    fn test_tracker_segment_marker_and_restart() {
        let mut tracker = PeriodTracker::new();
        for clock in [0, 40, 80] {
            tracker.observe(SegmentKey::Index(1), clock);
        }
        // second half restarts its clock, the jump between halves is not a delta
        for clock in [2_700_000, 2_700_040] {
            tracker.observe(SegmentKey::Index(2), clock);
        }
        let (periods, framerate, diag) = tracker.finish();

        assert_eq!(periods[&SegmentKey::Index(1)], Period { start: 0, end: 80 });
        assert_eq!(periods[&SegmentKey::Index(2)], Period { start: 2_700_000, end: 2_700_040 });
        assert_eq!(framerate, Some(25));
        assert!(diag.into_warnings().is_empty());
    }

    #[test]
    fn test_tracker_diverging_rate_last_wins() {
        let mut tracker = PeriodTracker::new();
        for clock in [0, 40, 80, 160] {
            tracker.observe(SegmentKey::Index(1), clock);
        }
        let (_, framerate, diag) = tracker.finish();

        assert_eq!(framerate, Some(13));
        assert_eq!(
            diag.into_warnings(),
            vec![ParseWarning::FramerateAmbiguity { previous: 25, current: 13 }]
        );
    }

    #[test]
    fn test_frame_offsets_in_ms_period() {
        let period = Period { start: 1000, end: 1360 };
        assert_eq!(period.frame_count_at(Some(25)), 10);
        assert_eq!(period.frame_offset_at(1000, Some(25)), Some(0));
        assert_eq!(period.frame_offset_at(1120, Some(25)), Some(3));
        assert_eq!(period.frame_offset_at(2000, Some(25)), None);

        let single = Period { start: 500, end: 500 };
        assert_eq!(single.frame_count_at(None), 1);
    }
}
