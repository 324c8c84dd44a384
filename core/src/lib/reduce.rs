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

use std::cmp::Ordering;

use glr_grammar::{ParseTable, ProductionId, StateId, Symbol};
use glr_stack::{Gss, VersionId};
use glr_tree::{structural_cmp, Subtree, SubtreePool};

/// Spec §4.7: given the parent already built from `left`'s children,
/// decide whether `right` (an alternative children array reaching the
/// same parent symbol) should replace it.
///
/// `Ordering::Less` keeps `left`, `Ordering::Greater` takes `right`.
pub fn select_children(
    pool: &SubtreePool,
    symbol: Symbol,
    production_id: ProductionId,
    dynamic_precedence: i32,
    left: &[Subtree],
    right: &[Subtree],
) -> Ordering {
    let left_scratch = pool.node(symbol, None, production_id, dynamic_precedence, left.to_vec());
    let right_scratch = pool.node(symbol, None, production_id, dynamic_precedence, right.to_vec());

    if left_scratch.error_cost() != right_scratch.error_cost() {
        return left_scratch.error_cost().cmp(&right_scratch.error_cost());
    }
    if left_scratch.dynamic_precedence() != right_scratch.dynamic_precedence() {
        return right_scratch.dynamic_precedence().cmp(&left_scratch.dynamic_precedence());
    }
    if left_scratch.error_cost() > 0 {
        return Ordering::Less;
    }
    match structural_cmp(&left_scratch, &right_scratch) {
        Ordering::Greater => Ordering::Greater,
        _ => Ordering::Less,
    }
}

/// Split trailing `extra` children off the end of a popped slice. Shared
/// with `recovery.rs`'s `recover_to_state`, which performs the same
/// trailing-extras dance when wrapping skipped subtrees in an error node.
pub(crate) fn split_trailing_extras(mut children: Vec<Subtree>) -> (Vec<Subtree>, Vec<Subtree>) {
    let mut extras = Vec::new();
    while children.last().map(|c| c.flags().extra).unwrap_or(false) {
        extras.push(children.pop().unwrap());
    }
    extras.reverse();
    (children, extras)
}

/// Spec §4.6: pop `count` subtrees off `version`, fold them into a new
/// `symbol` node, and push it back. Returns the version (unchanged — this
/// never spawns a new one) paired with the parent node just pushed, or
/// `None` if the version-count ceiling was already exceeded (the reduce is
/// aborted and the version left untouched) or if `version` turns out not
/// to be live.
///
/// The returned parent is what lets a caller juggling a reduce-reduce
/// conflict (several `Reduce` actions on the same lookahead) run the
/// spec's §4.7 comparison for real: `advance.rs` calls this once per
/// conflicting action against an independent copy of the pre-conflict
/// version (via `Gss::copy_version`), then feeds the parents this returns
/// through `select_tree` to pick a winner and discards the rest. That
/// keeps every alternative's pop/push pair isolated to its own stack
/// copy instead of each one mutating the state the previous alternative
/// left behind.
#[allow(clippy::too_many_arguments)]
pub fn reduce(
    gss: &mut Gss,
    pool: &SubtreePool,
    table: &dyn ParseTable,
    version: VersionId,
    symbol: Symbol,
    count: usize,
    dyn_prec: i32,
    production_id: ProductionId,
    is_fragile: bool,
    end_of_non_terminal_extra: bool,
    max_version_count: usize,
    version_count_overflow: usize,
) -> Option<(VersionId, Subtree)> {
    if !gss.is_live(version) {
        return None;
    }
    let halted_version_count = (0..gss.slot_count()).filter(|&v| gss.is_live(v) && gss.is_halted(v)).count();
    let ceiling = max_version_count
        .saturating_add(version_count_overflow)
        .saturating_add(halted_version_count);
    if gss.version_count() > ceiling {
        return None;
    }

    let initial_version_count = gss.version_count();
    let point = gss.point(version);
    let pre_reduce_state = gss.state(version);

    let slice = gss.pop_count(version, count).remove(0);
    let (children, trailing_extras) = split_trailing_extras(slice.children);

    let mut parent = pool.node(symbol, None, production_id, dyn_prec, children);

    let next_state = table.next_state(slice.state, symbol);
    if end_of_non_terminal_extra && next_state == slice.state {
        parent.make_mut().flags.extra = true;
    }
    if is_fragile || initial_version_count > 1 {
        let data = parent.make_mut();
        data.flags.fragile_left = true;
        data.flags.fragile_right = true;
        data.parse_state = None;
    } else {
        parent.make_mut().parse_state = Some(pre_reduce_state);
    }
    parent.make_mut().dynamic_precedence += dyn_prec;

    gss.push(version, parent.clone(), false, next_state, point);
    for extra in trailing_extras {
        gss.push(version, extra, false, next_state, point);
    }

    Some((version, parent))
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_lex::Point;

    fn table_with_reduction() -> ToyTable {
        let mut t = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        t.set_transition(StateId::new(0), Symbol::new(9), StateId::new(5));
        t
    }

    #[test]
    fn folds_children_into_parent_and_pushes() {
        let table = table_with_reduction();
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let a = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        let b = pool.leaf(Symbol::new(2), StateId::new(2), 1, 1, 0, false);
        gss.push(0, a, false, StateId::new(1), Point::ZERO);
        gss.push(0, b, false, StateId::new(2), Point::ZERO);

        let result = reduce(
            &mut gss,
            &pool,
            &table,
            0,
            Symbol::new(9),
            2,
            0,
            glr_grammar::ProductionId::new(0),
            false,
            false,
            6,
            4,
        );
        let (result_version, parent) = result.expect("reduce should succeed");
        assert_eq!(result_version, 0);
        assert_eq!(parent.symbol(), Symbol::new(9));
        assert_eq!(gss.state(0), StateId::new(5));
        assert_eq!(gss.position(0), 3);
    }

    #[test]
    fn select_children_prefers_lower_error_cost() {
        let pool = SubtreePool::new();
        let cheap = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        let costly = pool.error_leaf(0, 0, 0);
        let ordering = select_children(
            &pool,
            Symbol::new(9),
            glr_grammar::ProductionId::new(0),
            0,
            &[cheap],
            &[costly],
        );
        assert_eq!(ordering, Ordering::Less);
    }
}
