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

use glr_grammar::{ParseTable, ProductionId, StateId, Symbol, ERROR_STATE};
use glr_stack::{ErrorStatus, Gss, VersionId};
use glr_tree::{Subtree, SubtreePool};

use crate::comparator::{compare, Outcome};
use crate::potential_reductions::do_all_potential_reductions;
use crate::reduce::split_trailing_extras;

/// The cost-model tunables spec §4.11/§4.12 need, lifted straight out of
/// `ParseOptions` by the caller rather than threading the whole options
/// struct (and its generic payload type parameter) through this module.
#[derive(Clone, Copy, Debug)]
pub struct RecoveryCosts {
    pub error_cost_per_skipped_tree: u32,
    pub error_cost_per_skipped_char: u32,
    pub error_cost_per_skipped_line: u32,
    pub max_cost_difference: u32,
}

fn version_status(gss: &Gss, v: VersionId, error_cost_per_skipped_tree: u32) -> ErrorStatus {
    let mut cost = gss.error_cost(v);
    if gss.is_paused(v) {
        cost = cost.saturating_add(error_cost_per_skipped_tree);
    }
    ErrorStatus {
        cost,
        node_count: gss.node_count_since_error(v),
        dynamic_precedence: gss.dynamic_precedence(v),
        is_in_error: gss.is_paused(v) || gss.state(v) == ERROR_STATE,
        node_count_at_last_error: 0,
    }
}

/// Read-only counterpart to `Gss::merge`'s compatibility check: would `a`
/// and `b` merge if asked, without actually doing it.
fn can_merge(gss: &Gss, a: VersionId, b: VersionId) -> bool {
    if gss.state(a) != gss.state(b) || gss.position(a) != gss.position(b) {
        return false;
    }
    match (gss.last_external_token(a), gss.last_external_token(b)) {
        (None, None) => true,
        (Some(x), Some(y)) => Subtree::ptr_eq(&x, &y),
        _ => false,
    }
}

/// Spec §4.11: would recovering `version` at the given hypothetical `cost`
/// clearly be worse than some other live version (or the already-finished
/// tree, when one exists)? Grounded on `ts_parser__better_version_exists`.
pub fn better_version_exists(
    gss: &Gss,
    version: VersionId,
    is_in_error: bool,
    cost: u32,
    finished_tree_cost: Option<u32>,
    costs: &RecoveryCosts,
) -> bool {
    if let Some(finished_cost) = finished_tree_cost {
        if finished_cost <= cost {
            return true;
        }
    }

    let position = gss.position(version);
    let status = ErrorStatus {
        cost,
        node_count: gss.node_count_since_error(version),
        dynamic_precedence: gss.dynamic_precedence(version),
        is_in_error,
        node_count_at_last_error: 0,
    };

    for i in 0..gss.slot_count() {
        if i == version || !gss.is_live(i) || gss.position(i) < position {
            continue;
        }
        let status_i = version_status(gss, i, costs.error_cost_per_skipped_tree);
        match compare(&status, &status_i, costs.max_cost_difference) {
            Outcome::TakeRight => return true,
            Outcome::PreferRight if can_merge(gss, i, version) => return true,
            _ => {}
        }
    }

    false
}

/// Spec §4.11 strategy 1: pop `depth` frames off `version` and, if that
/// lands exactly on `goal_state`, splice any error node already sitting on
/// top back in, wrap everything (minus trailing extras) in a fresh error
/// node, and push it at `goal_state`. Grounded on `ts_parser__recover_to_state`;
/// the original's "slice fanned out into several versions, skip ones that
/// don't match" loop collapses to a single check here (see `glr-stack`'s
/// module doc comment on why `pop_count` never fans out in this GSS).
pub fn recover_to_state(
    gss: &mut Gss,
    pool: &SubtreePool,
    table: &dyn ParseTable,
    version: VersionId,
    depth: u32,
    goal_state: StateId,
) -> bool {
    let slice = gss.pop_count(version, depth as usize).remove(0);
    if slice.state != goal_state {
        gss.halt(version);
        return false;
    }

    let mut children = slice.children;
    if let Some(error_slice) = gss.pop_error(version) {
        if let Some(error_tree) = error_slice.children.into_iter().next() {
            let mut spliced: Vec<Subtree> = error_tree.children().to_vec();
            spliced.extend(children);
            children = spliced;
        }
    }

    let (body, trailing_extras) = split_trailing_extras(children);
    let point = gss.point(version);

    if !body.is_empty() {
        let mut error = pool.node(table.builtin_sym_error(), None, ProductionId::new(0), 0, body);
        {
            let data = error.make_mut();
            data.flags.error = true;
            data.flags.extra = true;
        }
        gss.push(version, error, false, goal_state, point);
    }
    for extra in trailing_extras {
        gss.push(version, extra, false, goal_state, point);
    }

    true
}

/// What `recover` did, for the driver (spec §4.13) to act on.
#[derive(Debug, PartialEq, Eq)]
pub enum RecoverOutcome {
    /// The lookahead (plus any pre-existing top-of-stack error) was wrapped
    /// into an `error_repeat` node; `version` stays alive at `ERROR_STATE`.
    Continue,
    /// `lookahead` was the end of input; `version` is ready to be finished
    /// with the error node already pushed onto it.
    Accept,
    /// This attempt was judged clearly worse than another live version;
    /// `version` has been halted and should be dropped.
    Halted,
}

/// Spec §4.11: try strategy 1 (recover to a previously recorded state),
/// then strategy 2 (skip the lookahead by wrapping it in an error node).
/// Grounded on `ts_parser__recover`.
pub fn recover(
    gss: &mut Gss,
    pool: &SubtreePool,
    table: &dyn ParseTable,
    version: VersionId,
    lookahead: Subtree,
    costs: &RecoveryCosts,
    finished_tree_cost: Option<u32>,
) -> RecoverOutcome {
    let position = gss.position(version);
    let node_count_since_error = gss.node_count_since_error(version);
    let current_error_cost = gss.error_cost(version);
    let mut did_recover = false;

    if !lookahead.flags().error {
        if let Some(summary) = gss.get_summary(version).cloned() {
            'strategy_one: for entry in summary.entries.iter() {
                if entry.state == ERROR_STATE || entry.position == position {
                    continue;
                }

                let mut depth = entry.depth;
                if node_count_since_error > 0 {
                    depth += 1;
                }

                let would_merge = (0..gss.slot_count()).any(|j| {
                    gss.is_live(j) && gss.state(j) == entry.state && gss.position(j) == position
                });
                if would_merge {
                    continue;
                }

                let current_point = gss.point(version);
                let bytes_delta = (position.saturating_sub(entry.position)) as u32;
                let line_delta = current_point.row.saturating_sub(entry.point.row);
                let new_cost = current_error_cost
                    .saturating_add(entry.depth.saturating_mul(costs.error_cost_per_skipped_tree))
                    .saturating_add(bytes_delta.saturating_mul(costs.error_cost_per_skipped_char))
                    .saturating_add(line_delta.saturating_mul(costs.error_cost_per_skipped_line));

                if better_version_exists(gss, version, false, new_cost, finished_tree_cost, costs) {
                    break 'strategy_one;
                }

                if table.has_actions(entry.state, lookahead.symbol())
                    && recover_to_state(gss, pool, table, version, depth, entry.state)
                {
                    did_recover = true;
                    break 'strategy_one;
                }
            }
        }
    }

    if lookahead.symbol() == table.builtin_sym_end() {
        let point = gss.point(version);
        let state = gss.state(version);
        let mut parent = pool.node(table.builtin_sym_error(), None, ProductionId::new(0), 0, Vec::new());
        parent.make_mut().flags.error = true;
        gss.push(version, parent, false, state, point);
        return RecoverOutcome::Accept;
    }

    if did_recover && lookahead.flags().has_external_scanner_state_change {
        gss.halt(version);
        return RecoverOutcome::Halted;
    }

    let new_cost = current_error_cost
        .saturating_add(costs.error_cost_per_skipped_tree)
        .saturating_add((lookahead.total_bytes() as u32).saturating_mul(costs.error_cost_per_skipped_char));
    if better_version_exists(gss, version, false, new_cost, finished_tree_cost, costs) {
        gss.halt(version);
        return RecoverOutcome::Halted;
    }

    let mut lookahead = lookahead;
    if table.is_extra_symbol(lookahead.symbol()) {
        lookahead.make_mut().flags.extra = true;
    }

    let mut error_repeat = pool.node(
        table.builtin_sym_error_repeat(),
        None,
        ProductionId::new(0),
        0,
        vec![lookahead],
    );

    if node_count_since_error > 0 {
        let slice = gss.pop_count(version, 1).remove(0);
        let mut combined = slice.children;
        combined.push(error_repeat);
        error_repeat = pool.node(table.builtin_sym_error_repeat(), None, ProductionId::new(0), 0, combined);
    }

    let point = gss.point(version);
    gss.push(version, error_repeat, false, ERROR_STATE, point);

    RecoverOutcome::Continue
}

/// Spec §4.12: before settling into error recovery, run every reduction the
/// grammar allows regardless of lookahead, then try inserting a single
/// missing token that would let some reduction accept the real lookahead.
/// Grounded on `ts_parser__handle_error`.
///
/// `original_source`'s version walks every stack version the preceding
/// `do_all_potential_reductions` call may have fanned `version` out into,
/// inserting a missing token speculatively on each and merging survivors
/// back onto `version`. Under this workspace's one-path-per-version `Gss`
/// that fan-out never happens, so this tries the insertion directly on
/// `version`'s own (possibly just-reduced) state and returns the
/// speculative copy it created, if the insertion panned out, for the
/// driver to keep alongside `version`.
pub fn handle_error(
    gss: &mut Gss,
    pool: &SubtreePool,
    table: &dyn ParseTable,
    version: VersionId,
    lookahead_symbol: Symbol,
    max_summary_depth: usize,
) -> Option<VersionId> {
    do_all_potential_reductions(gss, pool, table, version, None);

    let state = gss.state(version);
    let mut recovered = None;

    for raw in 1..table.token_count() {
        let missing_symbol = Symbol::new(raw);
        let state_after_missing = table.next_state(state, missing_symbol);
        if state_after_missing == StateId::new(0) || state_after_missing == state {
            continue;
        }
        if !table.has_reduce_action(state_after_missing, lookahead_symbol) {
            continue;
        }

        let point = gss.point(version);
        let candidate = gss.copy_version(version);
        let missing_tree = pool.missing_leaf(missing_symbol, state_after_missing, 0);
        gss.push(candidate, missing_tree, false, state_after_missing, point);

        if do_all_potential_reductions(gss, pool, table, candidate, Some(lookahead_symbol)) {
            recovered = Some(candidate);
            break;
        }
        gss.remove_version(candidate);
    }

    for depth in 0..max_summary_depth as u32 {
        match gss.frame_at_depth(version, depth) {
            Some((entry_state, _, _)) => gss.record_summary(version, entry_state, depth, max_summary_depth),
            None => break,
        }
    }

    recovered
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{ParseAction, Symbol};
    use glr_lex::Point;

    fn base_table() -> ToyTable {
        ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2))
    }

    fn default_costs() -> RecoveryCosts {
        RecoveryCosts {
            error_cost_per_skipped_tree: 3,
            error_cost_per_skipped_char: 1,
            error_cost_per_skipped_line: 5,
            max_cost_difference: 128,
        }
    }

    #[test]
    fn recover_to_state_wraps_popped_children_in_an_error_node() {
        let table = base_table();
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(5));
        let a = pool.leaf(Symbol::new(3), StateId::new(6), 0, 1, 0, false);
        let b = pool.leaf(Symbol::new(4), StateId::new(7), 1, 1, 0, false);
        gss.push(0, a, false, StateId::new(6), Point::ZERO);
        gss.push(0, b, false, StateId::new(7), Point::ZERO);

        assert!(recover_to_state(&mut gss, &pool, &table, 0, 2, StateId::new(5)));
        assert_eq!(gss.state(0), StateId::new(5));
    }

    #[test]
    fn recover_to_state_halts_when_goal_state_does_not_match() {
        let table = base_table();
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(5));
        let a = pool.leaf(Symbol::new(3), StateId::new(6), 0, 1, 0, false);
        gss.push(0, a, false, StateId::new(6), Point::ZERO);

        assert!(!recover_to_state(&mut gss, &pool, &table, 0, 1, StateId::new(99)));
        assert!(gss.is_halted(0));
    }

    #[test]
    fn recover_wraps_lookahead_in_error_repeat_when_no_summary_matches() {
        let mut table = base_table();
        table.add_action(
            StateId::new(0),
            Symbol::new(9),
            ParseAction::Shift { state: StateId::new(1), extra: false, repetition: false },
        );
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let lookahead = pool.leaf(Symbol::new(9), StateId::new(0), 0, 1, 0, false);

        let outcome = recover(&mut gss, &pool, &table, 0, lookahead, &default_costs(), None);
        assert_eq!(outcome, RecoverOutcome::Continue);
        assert_eq!(gss.state(0), ERROR_STATE);
    }

    #[test]
    fn recover_accepts_at_end_of_input() {
        let table = base_table();
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let eof = pool.leaf(table.builtin_sym_end(), StateId::new(0), 0, 0, 0, false);

        let outcome = recover(&mut gss, &pool, &table, 0, eof, &default_costs(), None);
        assert_eq!(outcome, RecoverOutcome::Accept);
    }

    #[test]
    fn handle_error_runs_pending_reductions_first() {
        let mut table = base_table();
        table.add_action(
            StateId::new(1),
            Symbol::new(4),
            ParseAction::Reduce {
                symbol: Symbol::new(9),
                child_count: 1,
                dynamic_precedence: 0,
                production_id: ProductionId::new(0),
            },
        );
        table.set_transition(StateId::new(1), Symbol::new(9), StateId::new(3));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(1));
        let child = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        gss.push(0, child, false, StateId::new(1), Point::ZERO);

        let recovered = handle_error(&mut gss, &pool, &table, 0, Symbol::new(4), 16);
        assert_eq!(recovered, None);
        assert_eq!(gss.state(0), StateId::new(3));
    }

    #[test]
    fn handle_error_inserts_a_missing_token_that_unlocks_a_reduction() {
        let mut table = base_table();
        table.set_transition(StateId::new(1), Symbol::new(5), StateId::new(2));
        table.add_action(
            StateId::new(2),
            Symbol::new(4),
            ParseAction::Reduce {
                symbol: Symbol::new(9),
                child_count: 1,
                dynamic_precedence: 0,
                production_id: ProductionId::new(0),
            },
        );
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(1));

        let recovered = handle_error(&mut gss, &pool, &table, 0, Symbol::new(4), 16);
        assert!(recovered.is_some());
        let candidate = recovered.unwrap();
        assert!(gss.is_live(candidate));
    }
}
