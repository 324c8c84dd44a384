// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// A sorted, non-overlapping byte interval of the input under
/// consideration (spec §2's "included ranges" — e.g. the code blocks of
/// a templated document).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludedRange {
    pub start_byte: usize,
    pub end_byte: usize,
}

/// Spec §3's "included-range differences": the byte ranges where the old
/// and new included-range sets disagree, and therefore where a reparse
/// must not reuse a subtree from the previous tree. Grounded on
/// `ts_parser__has_included_range_difference`/`ts_parser_reset`'s use of
/// `included_range_differences`; the diffing itself
/// (`ts_range_array_get_changed_ranges`) isn't in this codebase's
/// reference material, so `compute` instead takes the symmetric
/// difference of the two interval sets directly — the same byte ranges
/// the original's output describes, by a coarser two-pointer merge
/// rather than its exact algorithm.
pub struct RangeDifferences {
    ranges: Vec<IncludedRange>,
    index: usize,
}

impl RangeDifferences {
    pub fn none() -> Self {
        RangeDifferences { ranges: Vec::new(), index: 0 }
    }

    pub fn compute(old: &[IncludedRange], new: &[IncludedRange]) -> Self {
        let mut boundaries: Vec<usize> = Vec::with_capacity(old.len() * 2 + new.len() * 2);
        for r in old.iter().chain(new.iter()) {
            boundaries.push(r.start_byte);
            boundaries.push(r.end_byte);
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut ranges = Vec::new();
        for window in boundaries.windows(2) {
            let (start, end) = (window[0], window[1]);
            if start == end {
                continue;
            }
            let mid = start + (end - start) / 2;
            if covers(old, mid) != covers(new, mid) {
                match ranges.last_mut() {
                    Some(IncludedRange { end_byte, .. }) if *end_byte == start => *end_byte = end,
                    _ => ranges.push(IncludedRange { start_byte: start, end_byte: end }),
                }
            }
        }
        RangeDifferences { ranges, index: 0 }
    }

    /// Whether `[start_byte, end_byte)` overlaps any not-yet-passed
    /// difference range.
    pub fn intersects(&self, start_byte: usize, end_byte: usize) -> bool {
        self.ranges[self.index..]
            .iter()
            .any(|r| r.start_byte < end_byte && start_byte < r.end_byte)
    }

    /// Advance past any difference range that ends at or before `position`
    /// (spec §4.17's per-iteration index advance).
    pub fn advance_past(&mut self, position: usize) {
        while self.index < self.ranges.len() && self.ranges[self.index].end_byte <= position {
            self.index += 1;
        }
    }
}

fn covers(ranges: &[IncludedRange], byte: usize) -> bool {
    ranges.iter().any(|r| r.start_byte <= byte && byte < r.end_byte)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identical_ranges_produce_no_differences() {
        let ranges = [IncludedRange { start_byte: 0, end_byte: 10 }];
        let diff = RangeDifferences::compute(&ranges, &ranges);
        assert!(!diff.intersects(0, 10));
    }

    #[test]
    fn a_shrunk_range_marks_the_dropped_tail_as_different() {
        let old = [IncludedRange { start_byte: 0, end_byte: 10 }];
        let new = [IncludedRange { start_byte: 0, end_byte: 6 }];
        let diff = RangeDifferences::compute(&old, &new);
        assert!(diff.intersects(6, 10));
        assert!(!diff.intersects(0, 6));
    }

    #[test]
    fn advance_past_drops_exhausted_ranges() {
        let old = [IncludedRange { start_byte: 0, end_byte: 10 }];
        let new = [IncludedRange { start_byte: 0, end_byte: 6 }];
        let mut diff = RangeDifferences::compute(&old, &new);
        assert!(diff.intersects(6, 10));
        diff.advance_past(10);
        assert!(!diff.intersects(6, 10));
    }
}
