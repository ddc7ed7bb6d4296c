/*!
 * Temporal transformations on a subtitle document.
 *
 * All of these operate on `Subtitles::items` in place and cannot fail. Only
 * `fragment`, `unfragment` and `order` leave the items sorted by start time;
 * `duration` and `force_duration` look at the list as it is.
 */

use chrono::TimeDelta;
use log::{debug, warn};

use crate::subtitles::{Item, Line, Subtitles};

/// Text of the filler cue added by `force_duration`
const DUMMY_ITEM_TEXT: &str = "...";

impl Subtitles {
    /// Shifts every cue by `delta`, which may be negative.
    ///
    /// Cues pushed entirely before zero are dropped; cues straddling zero
    /// start at zero.
    pub fn add(&mut self, delta: TimeDelta) {
        let zero = TimeDelta::zero();
        let before = self.items.len();
        self.items.retain_mut(|item| {
            item.start_at += delta;
            item.end_at += delta;
            if item.end_at <= zero && item.start_at <= zero {
                return false;
            }
            if item.start_at <= zero {
                item.start_at = zero;
            }
            true
        });

        let dropped = before - self.items.len();
        if dropped > 0 {
            debug!("Shift by {}ms dropped {} item(s)", delta.num_milliseconds(), dropped);
        }
    }

    /// End of the last cue in the list, zero when there is none
    pub fn duration(&self) -> TimeDelta {
        self.items.last().map_or_else(TimeDelta::zero, |item| item.end_at)
    }

    /// Makes the document last exactly `duration`.
    ///
    /// Longer documents are cut: cues starting at or after `duration` are
    /// removed along with everything after them, cues running past it are
    /// shortened. Shorter documents get a one millisecond `...` cue ending at
    /// `duration` when `add_dummy_item` is set.
    pub fn force_duration(&mut self, duration: TimeDelta, add_dummy_item: bool) {
        if self.duration() == duration {
            return;
        }

        if self.duration() > duration {
            let mut cut_at = None;
            for (index, item) in self.items.iter_mut().enumerate() {
                if item.start_at >= duration {
                    cut_at = Some(index);
                    break;
                } else if item.end_at > duration {
                    item.end_at = duration;
                }
            }
            if let Some(index) = cut_at {
                self.items.truncate(index);
            }
        }

        if add_dummy_item && self.duration() < duration {
            self.items.push(Item {
                start_at: duration - TimeDelta::milliseconds(1),
                end_at: duration,
                lines: vec![Line::from_text(DUMMY_ITEM_TEXT)],
                ..Item::default()
            });
        }
    }

    /// Splits cues so that none crosses a multiple of `period`.
    ///
    /// Each split keeps the original styling on both halves. The result is
    /// sorted by start time.
    pub fn fragment(&mut self, period: TimeDelta) {
        if self.items.is_empty() {
            return;
        }
        if period <= TimeDelta::zero() {
            warn!("Ignoring fragmentation with non-positive period {}ms", period.num_milliseconds());
            return;
        }

        let mut fragment_start = TimeDelta::zero();
        let mut splits = 0usize;
        loop {
            let Some(last) = self.items.last() else { break };
            if fragment_start >= last.end_at {
                break;
            }
            let fragment_end = fragment_start + period;

            let mut fragmented = Vec::with_capacity(self.items.len() + 1);
            for item in self.items.drain(..) {
                let boundary = if item.start_at < fragment_start && item.end_at > fragment_start {
                    Some(fragment_start)
                } else if item.start_at < fragment_end && item.end_at > fragment_end {
                    Some(fragment_end)
                } else {
                    None
                };

                match boundary {
                    Some(boundary) => {
                        let mut left = item.clone();
                        left.end_at = boundary;
                        let mut right = item;
                        right.start_at = boundary;
                        fragmented.push(left);
                        fragmented.push(right);
                        splits += 1;
                    }
                    None => fragmented.push(item),
                }
            }
            self.items = fragmented;
            fragment_start = fragment_end;
        }

        debug!("Fragmented with {}ms period: {} split(s)", period.num_milliseconds(), splits);
        self.order();
    }

    /// Merges touching or overlapping cues that show the same text.
    ///
    /// Single greedy pass: each cue absorbs the following same-text cues it
    /// reaches, and the scan for that cue stops at the first cue starting
    /// after it ends.
    pub fn unfragment(&mut self) {
        if self.items.len() <= 1 {
            return;
        }
        self.order();

        let before = self.items.len();
        let mut i = 0;
        while i + 1 < self.items.len() {
            let anchor_text = self.items[i].to_string();
            let mut j = i + 1;
            while j < self.items.len() {
                let anchor_end = self.items[i].end_at;
                let (start_at, end_at) = (self.items[j].start_at, self.items[j].end_at);
                if anchor_end >= start_at && self.items[j].to_string() == anchor_text {
                    if anchor_end < end_at {
                        self.items[i].end_at = end_at;
                    }
                    self.items.remove(j);
                } else if anchor_end < start_at {
                    break;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }

        debug!("Unfragmented {} item(s) into {}", before, self.items.len());
    }

    /// Remaps every cue through the affine function taking `actual1` to
    /// `desired1` and `actual2` to `desired2`.
    ///
    /// Fixes timing that drifts at a constant rate, typically a frame rate
    /// mismatch. Identical actual points define no function and leave the
    /// document untouched.
    pub fn apply_linear_correction(
        &mut self,
        actual1: TimeDelta,
        desired1: TimeDelta,
        actual2: TimeDelta,
        desired2: TimeDelta,
    ) {
        if actual1 == actual2 {
            warn!("Ignoring linear correction with identical reference points");
            return;
        }

        let a = nanos(desired2 - desired1) / nanos(actual2 - actual1);
        let b = TimeDelta::nanoseconds((nanos(desired1) - a * nanos(actual1)) as i64);

        for item in &mut self.items {
            item.end_at = TimeDelta::nanoseconds((a * nanos(item.end_at)) as i64) + b;
            item.start_at = TimeDelta::nanoseconds((a * nanos(item.start_at)) as i64) + b;
        }
    }

    /// Sorts cues by start time, keeping the relative order of equal starts
    pub fn order(&mut self) {
        if self.items.len() <= 1 {
            return;
        }
        self.items.sort_by_key(|item| item.start_at);
    }
}

fn nanos(duration: TimeDelta) -> f64 {
    duration
        .num_nanoseconds()
        .map_or_else(|| duration.num_milliseconds() as f64 * 1e6, |n| n as f64)
}
