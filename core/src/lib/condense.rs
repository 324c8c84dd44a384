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

use glr_grammar::ParseTable;
use glr_stack::{Gss, VersionId};
use glr_tree::SubtreePool;

use crate::comparator::{compare, Outcome};
use crate::options::ParseOptions;
use crate::recovery::handle_error;

/// Spec §4.15: run after each outer-loop iteration of `advance`. Removes
/// halted versions, pairwise-compares and merges/discards the rest via the
/// version comparator (spec §4.5), caps the survivors at
/// `max_version_count`, and — if every surviving version ended up paused —
/// resumes the most promising one into error recovery. Returns the lowest
/// error cost among the surviving non-error versions, for the orchestrator
/// to compare against `finished_tree`'s cost (spec §4.17's dominance
/// check). Grounded on `ts_parser__condense_stack`.
pub fn condense<P>(
    gss: &mut Gss,
    pool: &SubtreePool,
    table: &dyn ParseTable,
    options: &ParseOptions<P>,
    accept_count: usize,
) -> u32 {
    for v in 0..gss.slot_count() {
        if gss.is_live(v) && gss.is_halted(v) {
            gss.remove_version(v);
        }
    }

    let mut order: Vec<VersionId> = (0..gss.slot_count()).filter(|&v| gss.is_live(v)).collect();
    let mut min_error_cost = u32::MAX;

    let mut i = 1;
    while i < order.len() {
        let mut j = 0;
        let mut took_left_or_merged = false;
        while j < i {
            let vj = order[j];
            let vi = order[i];
            let outcome = compare(&gss.error_status(vj), &gss.error_status(vi), options.max_cost_difference);
            match outcome {
                Outcome::TakeLeft => {
                    gss.remove_version(vi);
                    order.remove(i);
                    took_left_or_merged = true;
                    break;
                }
                Outcome::PreferLeft | Outcome::None => {
                    if gss.merge(vj, vi) {
                        order.remove(i);
                        took_left_or_merged = true;
                        break;
                    }
                }
                Outcome::PreferRight => {
                    if gss.merge(vj, vi) {
                        order.remove(i);
                        took_left_or_merged = true;
                        break;
                    } else {
                        order.swap(i, j);
                    }
                }
                Outcome::TakeRight => {
                    gss.remove_version(vj);
                    order.remove(j);
                    i -= 1;
                    continue;
                }
            }
            j += 1;
        }
        if !took_left_or_merged {
            i += 1;
        }
    }

    for &v in &order {
        let status = gss.error_status(v);
        if !status.is_in_error && status.cost < min_error_cost {
            min_error_cost = status.cost;
        }
    }

    if order.len() > options.max_version_count {
        for &v in &order[options.max_version_count..] {
            gss.remove_version(v);
        }
        order.truncate(options.max_version_count);
    }

    let mut has_unpaused_version = false;
    let mut idx = 0;
    while idx < order.len() {
        let v = order[idx];
        if gss.is_paused(v) {
            if !has_unpaused_version && accept_count < options.max_version_count {
                min_error_cost = gss.error_cost(v);
                let lookahead = gss.resume(v).expect("a paused version always carries a lookahead");
                handle_error(gss, pool, table, v, lookahead.symbol(), options.max_summary_depth);
                has_unpaused_version = true;
                idx += 1;
            } else {
                gss.remove_version(v);
                order.remove(idx);
            }
        } else {
            has_unpaused_version = true;
            idx += 1;
        }
    }

    min_error_cost
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{StateId, Symbol};
    use glr_lex::Point;

    fn push_error(gss: &mut Gss, pool: &SubtreePool, v: VersionId, cost: u32) {
        let leaf = pool.error_leaf(gss.position(v), 1, 0);
        gss.push(v, leaf, false, StateId::new(1), Point::ZERO);
        gss.add_error_cost(v, cost);
        gss.set_is_in_error(v, true);
    }

    #[test]
    fn a_far_cheaper_version_takes_the_pricier_one() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let clone = gss.copy_version(0);
        push_error(&mut gss, &pool, clone, 1000);

        let options: ParseOptions<()> = ParseOptions::default();
        condense(&mut gss, &pool, &table, &options, 0);

        assert!(gss.is_live(0));
        assert!(!gss.is_live(clone));
    }

    #[test]
    fn halted_versions_are_dropped() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        gss.halt(0);

        let options: ParseOptions<()> = ParseOptions::default();
        condense(&mut gss, &pool, &table, &options, 0);

        assert!(!gss.is_live(0));
    }

    #[test]
    fn caps_surviving_versions_at_max_version_count() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let mut extra = Vec::new();
        for _ in 0..3 {
            let clone = gss.copy_version(0);
            gss.push(clone, pool.leaf(Symbol::new(9), StateId::new(9), 0, 0, 0, false), false, StateId::new(9), Point::ZERO);
            extra.push(clone);
        }

        let options: ParseOptions<()> = ParseOptions {
            max_version_count: 2,
            ..ParseOptions::default()
        };
        condense(&mut gss, &pool, &table, &options, 0);

        assert_eq!((0..gss.slot_count()).filter(|&v| gss.is_live(v)).count(), 2);
    }
}
