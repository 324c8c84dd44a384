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

use glr_grammar::{ParseAction, ParseTable, Symbol, TableEntry, ERROR_STATE};
use glr_lex::{ExternalScanner, KeywordLexer, MainLexer, Point, ScannerInput};
use glr_stack::{Gss, VersionId};
use glr_tree::{structural_cmp, Subtree, SubtreePool};

use crate::breakdown::{breakdown_lookahead, breakdown_top_of_stack};
use crate::cursor::ReusableCursor;
use crate::lex_driver::{self, LexContext};
use crate::options::ParseOptions;
use crate::progress::Progress;
use crate::recovery::{recover, RecoveryCosts};
use crate::reduce::reduce;
use crate::reuse_gate::reuse_gate;
use crate::reuse_node::reuse_node;
use crate::token_cache::TokenCache;

/// What a single call to `advance` accomplished, for the top-level driver
/// (spec §4.17) to act on.
#[derive(Debug, PartialEq, Eq)]
pub enum AdvanceResult {
    /// `version` is still live and waiting for its next call to `advance`.
    Done,
    /// `version` reached the end of input; `finished_tree` now holds the
    /// (possibly improved) result, and `version` has been removed.
    Accepted,
    /// The progress check (spec §4.14) asked the parse to stop.
    Cancelled,
}

fn first_leaf_symbol(tree: &Subtree) -> Symbol {
    if tree.children().is_empty() {
        tree.symbol()
    } else {
        first_leaf_symbol(&tree.children()[0])
    }
}

/// Spec §4.7, applied to two already-built root trees rather than two
/// candidate children arrays: `true` if `right` should replace `left`.
/// Grounded on `ts_parser__select_tree`; kept separate from `reduce.rs`'s
/// `select_children` because that one still needs a scratch parent built
/// from a children array, which the Accept action doesn't have.
fn select_tree(left: &Subtree, right: &Subtree) -> bool {
    if left.error_cost() != right.error_cost() {
        return right.error_cost() < left.error_cost();
    }
    if left.dynamic_precedence() != right.dynamic_precedence() {
        return right.dynamic_precedence() > left.dynamic_precedence();
    }
    if left.error_cost() > 0 {
        return false;
    }
    structural_cmp(right, left) == Ordering::Greater
}

/// Spec §4.17/Accept: fold the frames popped off an accepted version's
/// stack (the real parse tree plus whatever trailing extras follow it —
/// the EOF token this call just shifted included) into a single root,
/// keeping the grammar's start-rule symbol and production id. Grounded on
/// `ts_parser__accept`. Returns `None` only if every popped child was
/// `extra`, which a well-formed grammar never produces.
fn build_root(pool: &SubtreePool, mut children: Vec<Subtree>) -> Option<Subtree> {
    let root_index = (0..children.len()).rev().find(|&i| !children[i].flags().extra)?;
    let root = children.remove(root_index);
    let mut spliced: Vec<Subtree> = children[..root_index].to_vec();
    spliced.extend(root.children().iter().cloned());
    spliced.extend(children[root_index..].iter().cloned());
    Some(pool.node(root.symbol(), None, root.production_id(), root.dynamic_precedence(), spliced))
}

/// Spec §4.13: the per-version step of the parse loop. Resolves the next
/// lookahead (reusing a node from a previous tree, the single-slot token
/// cache, or the lexer, in that order), then interprets every parse action
/// the table has for it at the version's current state — shifting,
/// reducing, accepting, or entering error recovery. Grounded on
/// `ts_parser__advance`.
#[allow(clippy::too_many_arguments)]
pub fn advance<P: Clone>(
    gss: &mut Gss,
    pool: &SubtreePool,
    table: &dyn ParseTable,
    version: VersionId,
    version_count: usize,
    mut cursor: Option<&mut ReusableCursor>,
    token_cache: &mut TokenCache,
    main_lexer: &dyn MainLexer,
    keyword_lexer: Option<&dyn KeywordLexer>,
    mut external_scanner: Option<&mut dyn ExternalScanner>,
    input: &mut dyn ScannerInput,
    has_included_range_difference: Option<&dyn Fn(usize, usize) -> bool>,
    finished_tree: &mut Option<Subtree>,
    costs: &RecoveryCosts,
    has_error: bool,
    options: &mut ParseOptions<P>,
    progress: &mut Progress,
) -> AdvanceResult {
    let mut state = gss.state(version);
    let position = gss.position(version);
    let point = gss.point(version);
    let last_external_token = gss.last_external_token(version);

    let mut did_reuse = true;
    let mut lookahead: Option<Subtree> = None;
    let mut lookahead_end_point = point;
    let mut entry = TableEntry::default();

    if version_count == 1 {
        if let Some(c) = cursor.as_deref_mut() {
            if let Some((tree, e)) = reuse_node(
                gss,
                table,
                version,
                c,
                position,
                last_external_token.as_ref(),
                has_included_range_difference,
            ) {
                lookahead = Some(tree);
                entry = e;
            }
        }
    }

    if lookahead.is_none() {
        did_reuse = false;
        if let Some((tok, end_point)) = token_cache.get(position, last_external_token.as_ref()) {
            let candidate = table.table_entry(state, tok.symbol());
            if reuse_gate(table, state, &tok, &candidate) {
                entry = candidate;
                lookahead_end_point = end_point;
                lookahead = Some(tok);
            }
        }
    }

    let mut needs_lex = lookahead.is_none();
    loop {
        if needs_lex {
            needs_lex = false;
            let ctx = LexContext {
                state,
                position,
                point,
                last_external_token: last_external_token.as_ref(),
                node_count_since_error: gss.node_count_since_error(version),
            };
            match lex_driver::lex(table, main_lexer, keyword_lexer, external_scanner.as_deref_mut(), input, pool, &ctx) {
                Some(result) => {
                    token_cache.set(position, last_external_token.clone(), result.subtree.clone(), result.end_point);
                    entry = table.table_entry(state, result.subtree.symbol());
                    lookahead_end_point = result.end_point;
                    lookahead = Some(result.subtree);
                }
                None => {
                    entry = table.table_entry(state, table.builtin_sym_end());
                    lookahead = None;
                }
            }
        }

        if !progress.check(options, position, has_error, 1) {
            return AdvanceResult::Cancelled;
        }

        let mut did_reduce = false;
        let mut last_reduction_version: Option<VersionId> = None;
        let reduce_action_count =
            entry.actions.iter().filter(|a| matches!(a, ParseAction::Reduce { .. })).count();
        let mut reduction_winner: Option<(VersionId, Subtree)> = None;

        for &action in entry.actions.iter() {
            match action {
                ParseAction::Shift { state: shift_state, extra, repetition } => {
                    if repetition {
                        continue;
                    }
                    let mut next_state = if extra { state } else { shift_state };
                    let mut token = lookahead.take().expect("a shift action implies a lookahead token");
                    if token.child_count() > 0 {
                        if let Some(c) = cursor.as_deref_mut() {
                            breakdown_lookahead(c, state);
                            if let Some((_, _, descended)) = c.current() {
                                token = descended;
                            }
                        }
                        next_state = table.next_state(state, token.symbol());
                    }
                    crate::shift::shift(gss, version, token, next_state, extra, lookahead_end_point);
                    if did_reuse {
                        if let Some(c) = cursor.as_deref_mut() {
                            c.advance();
                        }
                    }
                    return AdvanceResult::Done;
                }

                ParseAction::Reduce { symbol, child_count, dynamic_precedence, production_id } => {
                    let is_fragile = entry.action_count() > 1;
                    let end_of_non_terminal_extra = lookahead.is_none();
                    did_reduce = true;

                    if reduce_action_count > 1 {
                        // Reduce-reduce conflict: run this alternative against its
                        // own copy of the pre-conflict version, so the pop/push it
                        // performs never observes another alternative's mutation.
                        // Spec §4.7 then picks a winner from the parents the
                        // alternatives actually built.
                        let branch = gss.copy_version(version);
                        match reduce(
                            gss,
                            pool,
                            table,
                            branch,
                            symbol,
                            child_count as usize,
                            dynamic_precedence,
                            production_id,
                            is_fragile,
                            end_of_non_terminal_extra,
                            options.max_version_count,
                            options.version_count_overflow,
                        ) {
                            Some((reduced_version, parent)) => match reduction_winner.take() {
                                None => reduction_winner = Some((reduced_version, parent)),
                                Some((prev_version, prev_parent)) => {
                                    if select_tree(&prev_parent, &parent) {
                                        gss.remove_version(prev_version);
                                        reduction_winner = Some((reduced_version, parent));
                                    } else {
                                        gss.remove_version(reduced_version);
                                        reduction_winner = Some((prev_version, prev_parent));
                                    }
                                }
                            },
                            None => gss.remove_version(branch),
                        }
                    } else {
                        let reduced = reduce(
                            gss,
                            pool,
                            table,
                            version,
                            symbol,
                            child_count as usize,
                            dynamic_precedence,
                            production_id,
                            is_fragile,
                            end_of_non_terminal_extra,
                            options.max_version_count,
                            options.version_count_overflow,
                        );
                        if let Some((v, _parent)) = reduced {
                            last_reduction_version = Some(v);
                        }
                    }
                }

                ParseAction::Accept => {
                    let eof = lookahead.take().expect("an accept action implies an eof lookahead");
                    crate::shift::shift(gss, version, eof, state, false, lookahead_end_point);
                    let slice = gss.pop_all(version);
                    if let Some(root) = build_root(pool, slice.children) {
                        let take_root = match finished_tree.as_ref() {
                            Some(existing) => select_tree(existing, &root),
                            None => true,
                        };
                        if take_root {
                            *finished_tree = Some(root);
                        }
                    }
                    gss.remove_version(version);
                    return AdvanceResult::Accepted;
                }

                ParseAction::Recover => {
                    let mut token = lookahead.take().expect("a recover action implies a lookahead token");
                    if token.child_count() > 0 {
                        if let Some(c) = cursor.as_deref_mut() {
                            breakdown_lookahead(c, ERROR_STATE);
                            if let Some((_, _, descended)) = c.current() {
                                token = descended;
                            }
                        }
                    }
                    let finished_cost = finished_tree.as_ref().map(Subtree::error_cost);
                    let _ = recover(gss, pool, table, version, token, costs, finished_cost);
                    if did_reuse {
                        if let Some(c) = cursor.as_deref_mut() {
                            c.advance();
                        }
                    }
                    return AdvanceResult::Done;
                }
            }
        }

        if reduce_action_count > 1 {
            last_reduction_version = reduction_winner.map(|(v, _)| v);
        }

        if let Some(reduced_version) = last_reduction_version {
            gss.renumber_version(reduced_version, version);
            state = gss.state(version);
            match lookahead.as_ref() {
                Some(tree) => entry = table.table_entry(state, first_leaf_symbol(tree)),
                None => needs_lex = true,
            }
            continue;
        }

        if did_reduce {
            gss.halt(version);
            return AdvanceResult::Done;
        }

        if let Some(tree) = lookahead.as_ref() {
            let is_invalid_keyword = tree.flags().is_keyword
                && Some(tree.symbol()) != table.keyword_capture_token()
                && !table.is_reserved_word(state, tree.symbol());
            if is_invalid_keyword {
                if let Some(capture) = table.keyword_capture_token() {
                    let candidate = table.table_entry(state, capture);
                    if candidate.action_count() > 0 {
                        let mut retried = tree.clone();
                        retried.make_mut().symbol = capture;
                        lookahead = Some(retried);
                        entry = candidate;
                        continue;
                    }
                }
            }
        }

        if breakdown_top_of_stack(gss, table, version) {
            state = gss.state(version);
            needs_lex = true;
            continue;
        }

        gss.pause(version, lookahead.expect("a version with no valid action but no lookahead cannot pause"));
        return AdvanceResult::Done;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{ProductionId, StateId};
    use glr_lex::{ByteInput, TextProvider};
    use glr_tree::SubtreePool;

    struct Whole<'a>(&'a [u8], bool);
    impl<'a> TextProvider for Whole<'a> {
        fn text_at(&mut self, byte_offset: usize, _point: Point) -> &[u8] {
            if self.1 || byte_offset >= self.0.len() {
                &[]
            } else {
                self.1 = true;
                &self.0[byte_offset..]
            }
        }
    }

    struct FixedLexer(Symbol, usize);
    impl MainLexer for FixedLexer {
        fn lex(&self, input: &mut dyn ScannerInput, _lex_state: u16) -> Option<Symbol> {
            for _ in 0..self.1 {
                input.advance()?;
            }
            input.mark_end();
            Some(self.0)
        }
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
    fn lexes_and_shifts_when_no_reuse_or_cache_available() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.add_action(
            StateId::new(0),
            Symbol::new(3),
            ParseAction::Shift { state: StateId::new(1), extra: false, repetition: false },
        );
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let mut token_cache = TokenCache::new();
        let lexer = FixedLexer(Symbol::new(3), 3);
        let mut src = Whole(b"abc", false);
        let mut input = ByteInput::new(&mut src);
        let mut finished_tree = None;
        let mut options: ParseOptions<()> = ParseOptions::default();
        let mut progress = Progress::new(&options);

        let result = advance(
            &mut gss,
            &pool,
            &table,
            0,
            1,
            None,
            &mut token_cache,
            &lexer,
            None,
            None,
            &mut input,
            None,
            &mut finished_tree,
            &default_costs(),
            false,
            &mut options,
            &mut progress,
        );

        assert_eq!(result, AdvanceResult::Done);
        assert_eq!(gss.state(0), StateId::new(1));
        assert_eq!(gss.position(0), 3);
    }

    #[test]
    fn pauses_when_no_action_matches_and_nothing_can_break_down() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let mut token_cache = TokenCache::new();
        let lexer = FixedLexer(Symbol::new(9), 1);
        let mut src = Whole(b"x", false);
        let mut input = ByteInput::new(&mut src);
        let mut finished_tree = None;
        let mut options: ParseOptions<()> = ParseOptions::default();
        let mut progress = Progress::new(&options);

        let result = advance(
            &mut gss,
            &pool,
            &table,
            0,
            1,
            None,
            &mut token_cache,
            &lexer,
            None,
            None,
            &mut input,
            None,
            &mut finished_tree,
            &default_costs(),
            false,
            &mut options,
            &mut progress,
        );

        assert_eq!(result, AdvanceResult::Done);
        assert!(gss.is_paused(0));
    }

    #[test]
    fn accept_builds_a_root_tree_from_the_start_symbol() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.add_action(StateId::new(1), Symbol::new(0), ParseAction::Accept);
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(1));
        let start = pool.node(Symbol::new(5), Some(StateId::new(1)), ProductionId::new(3), 0, vec![
            pool.leaf(Symbol::new(3), StateId::new(1), 0, 1, 0, false),
        ]);
        gss.push(0, start, false, StateId::new(1), Point::ZERO);
        let mut token_cache = TokenCache::new();
        let lexer = FixedLexer(Symbol::new(0), 0);
        let mut src = Whole(b"", false);
        let mut input = ByteInput::new(&mut src);
        let mut finished_tree = None;
        let mut options: ParseOptions<()> = ParseOptions::default();
        let mut progress = Progress::new(&options);

        let result = advance(
            &mut gss,
            &pool,
            &table,
            0,
            1,
            None,
            &mut token_cache,
            &lexer,
            None,
            None,
            &mut input,
            None,
            &mut finished_tree,
            &default_costs(),
            false,
            &mut options,
            &mut progress,
        );

        assert_eq!(result, AdvanceResult::Accepted);
        assert!(!gss.is_live(0));
        let root = finished_tree.expect("accept should have produced a finished tree");
        assert_eq!(root.symbol(), Symbol::new(5));
        assert_eq!(root.production_id(), ProductionId::new(3));
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn cancellation_flag_stops_before_any_action_runs() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.add_action(
            StateId::new(0),
            Symbol::new(3),
            ParseAction::Shift { state: StateId::new(1), extra: false, repetition: false },
        );
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let mut token_cache = TokenCache::new();
        let lexer = FixedLexer(Symbol::new(3), 1);
        let mut src = Whole(b"a", false);
        let mut input = ByteInput::new(&mut src);
        let mut finished_tree = None;
        let mut options: ParseOptions<()> = ParseOptions {
            op_count_per_timeout_check: 1,
            ..ParseOptions::default()
        };
        let flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        options.cancellation_flag = Some(flag);
        let mut progress = Progress::new(&options);

        let result = advance(
            &mut gss,
            &pool,
            &table,
            0,
            1,
            None,
            &mut token_cache,
            &lexer,
            None,
            None,
            &mut input,
            None,
            &mut finished_tree,
            &default_costs(),
            false,
            &mut options,
            &mut progress,
        );

        assert_eq!(result, AdvanceResult::Cancelled);
        assert_eq!(gss.state(0), StateId::new(0));
    }

    #[test]
    fn reduce_reduce_conflict_picks_a_winner_without_corrupting_the_stack() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.set_transition(StateId::new(0), Symbol::new(9), StateId::new(5));
        table.set_transition(StateId::new(0), Symbol::new(10), StateId::new(6));
        table.add_action(
            StateId::new(1),
            Symbol::new(3),
            ParseAction::Reduce {
                symbol: Symbol::new(9),
                child_count: 1,
                dynamic_precedence: 0,
                production_id: ProductionId::new(0),
            },
        );
        table.add_action(
            StateId::new(1),
            Symbol::new(3),
            ParseAction::Reduce {
                symbol: Symbol::new(10),
                child_count: 1,
                dynamic_precedence: 1,
                production_id: ProductionId::new(1),
            },
        );
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let leaf = pool.leaf(Symbol::new(4), StateId::new(1), 0, 1, 0, false);
        gss.push(0, leaf, false, StateId::new(1), Point::ZERO);

        let mut token_cache = TokenCache::new();
        let lexer = FixedLexer(Symbol::new(3), 1);
        let mut src = Whole(b"x", false);
        let mut input = ByteInput::new(&mut src);
        let mut finished_tree = None;
        let mut options: ParseOptions<()> = ParseOptions::default();
        let mut progress = Progress::new(&options);

        let result = advance(
            &mut gss,
            &pool,
            &table,
            0,
            1,
            None,
            &mut token_cache,
            &lexer,
            None,
            None,
            &mut input,
            None,
            &mut finished_tree,
            &default_costs(),
            false,
            &mut options,
            &mut progress,
        );

        assert_eq!(result, AdvanceResult::Done);
        assert!(gss.is_live(0));
        // The higher-dynamic-precedence alternative (symbol 10, landing in
        // state 6) wins; the lower-precedence one never mutates the shared
        // stack and its branch version is discarded.
        assert_eq!(gss.state(0), StateId::new(6));
        assert_eq!(gss.version_count(), 1);
    }
}
