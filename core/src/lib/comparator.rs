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

use glr_stack::ErrorStatus;

/// Spec §4.5's outcomes. "Take" means the other version is strictly
/// dominated and should be deleted outright; "prefer" means keep both but
/// rank `left` ahead of `right` (or vice versa) for tie-breaking purposes
/// elsewhere (e.g. which paused version `condense` resumes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    TakeLeft,
    PreferLeft,
    None,
    PreferRight,
    TakeRight,
}

/// Spec §5 default: how much worse (cost difference scaled by the cheaper
/// version's node count) one version may be before it's discarded rather
/// than merely disprefered.
pub fn compare(a: &ErrorStatus, b: &ErrorStatus, max_cost_difference: u32) -> Outcome {
    if a.is_in_error != b.is_in_error {
        return if a.is_in_error {
            // b is the non-error one.
            if b.cost < a.cost {
                Outcome::TakeRight
            } else {
                Outcome::PreferRight
            }
        } else if a.cost < b.cost {
            Outcome::TakeLeft
        } else {
            Outcome::PreferLeft
        };
    }

    if a.cost != b.cost {
        let (smaller, larger, smaller_is_a) = if a.cost < b.cost {
            (a, b, true)
        } else {
            (b, a, false)
        };
        let delta = larger.cost - smaller.cost;
        let take = (delta as u64) * (1 + smaller.node_count as u64) > max_cost_difference as u64;
        return match (take, smaller_is_a) {
            (true, true) => Outcome::TakeLeft,
            (true, false) => Outcome::TakeRight,
            (false, true) => Outcome::PreferLeft,
            (false, false) => Outcome::PreferRight,
        };
    }

    if a.dynamic_precedence != b.dynamic_precedence {
        return if a.dynamic_precedence > b.dynamic_precedence {
            Outcome::PreferLeft
        } else {
            Outcome::PreferRight
        };
    }

    Outcome::None
}

#[cfg(test)]
mod test {
    use super::*;

    fn status(cost: u32, node_count: u32, dynamic_precedence: i32, is_in_error: bool) -> ErrorStatus {
        ErrorStatus {
            cost,
            node_count,
            dynamic_precedence,
            is_in_error,
            node_count_at_last_error: 0,
        }
    }

    #[test]
    fn non_error_version_is_taken_over_error_version_with_higher_cost() {
        let err = status(10, 5, 0, true);
        let ok = status(3, 5, 0, false);
        assert_eq!(compare(&err, &ok, 128), Outcome::TakeRight);
    }

    #[test]
    fn close_costs_only_prefer() {
        let a = status(1, 5, 0, false);
        let b = status(2, 5, 0, false);
        assert_eq!(compare(&a, &b, 128), Outcome::PreferLeft);
    }

    #[test]
    fn far_apart_costs_take() {
        let a = status(0, 100, 0, false);
        let b = status(200, 0, 0, false);
        assert_eq!(compare(&a, &b, 128), Outcome::TakeLeft);
    }

    #[test]
    fn equal_cost_breaks_tie_on_dynamic_precedence() {
        let a = status(4, 1, 2, false);
        let b = status(4, 1, 0, false);
        assert_eq!(compare(&a, &b, 128), Outcome::PreferLeft);
    }

    #[test]
    fn fully_tied_is_none() {
        let a = status(4, 1, 0, false);
        let b = status(4, 1, 0, false);
        assert_eq!(compare(&a, &b, 128), Outcome::None);
    }
}
