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
use glr_lex::{ExternalScanner, KeywordLexer, MainLexer, ScannerInput};
use glr_stack::Gss;
use glr_tree::{Subtree, SubtreePool};

use std::io;
use std::path::Path;

use crate::advance::{advance, AdvanceResult};
use crate::balance::Balancer;
use crate::condense::condense;
use crate::cursor::ReusableCursor;
use crate::dotgraph::DotGraphLog;
use crate::error::ParserError;
use crate::options::ParseOptions;
use crate::progress::Progress;
use crate::ranges::{IncludedRange, RangeDifferences};
use crate::recovery::RecoveryCosts;
use crate::token_cache::TokenCache;

/// A finished parse: the root subtree plus the included-range set it was
/// parsed under (spec §4.17's "wrap the finished subtree ... into a tree
/// object").
#[derive(Clone)]
pub struct Tree {
    pub root: Subtree,
    pub included_ranges: Vec<IncludedRange>,
}

/// Spec §4.17's orchestrator, plus the resumable state spec §5 says a
/// cancelled parse must preserve across calls: the GSS, the reusable-node
/// cursor, the token cache, and the balance pass's own worklist. Grounded
/// on `TSParser`/`ts_parser_parse`; one `Parser` corresponds to one
/// `TSParser` instance reused across edits, not to one single parse call.
pub struct Parser<P: Clone = ()> {
    pub options: ParseOptions<P>,
    gss: Option<Gss>,
    cursor: Option<ReusableCursor>,
    token_cache: TokenCache,
    balancer: Balancer,
    progress: Option<Progress>,
    range_differences: RangeDifferences,
    included_ranges: Vec<IncludedRange>,
    finished_tree: Option<Subtree>,
    accept_count: usize,
    costs: RecoveryCosts,
    dot_graph: DotGraphLog,
}

impl<P: Clone> Parser<P> {
    pub fn new(options: ParseOptions<P>) -> Self {
        let costs = RecoveryCosts {
            error_cost_per_skipped_tree: options.error_cost_per_skipped_tree,
            error_cost_per_skipped_char: options.error_cost_per_skipped_char,
            error_cost_per_skipped_line: options.error_cost_per_skipped_line,
            max_cost_difference: options.max_cost_difference,
        };
        Parser {
            options,
            gss: None,
            cursor: None,
            token_cache: TokenCache::new(),
            balancer: Balancer::new(),
            progress: None,
            range_differences: RangeDifferences::none(),
            included_ranges: Vec::new(),
            finished_tree: None,
            accept_count: 0,
            costs,
            dot_graph: DotGraphLog::disabled(),
        }
    }

    /// Whether a previous call returned `None` because of cancellation and
    /// a resumed call will continue where it left off, rather than start a
    /// fresh parse (spec §5's "resume semantics").
    pub fn has_outstanding_parse(&self) -> bool {
        self.gss.is_some()
    }

    /// Open `path` (append mode) and write a `graph { ... }` block to it
    /// at every subsequent logging point, until `disable_dot_graph_log`
    /// is called (spec §6's dot-graph output).
    pub fn enable_dot_graph_log(&mut self, path: &Path) -> io::Result<()> {
        self.dot_graph.enable(path)
    }

    pub fn disable_dot_graph_log(&mut self) {
        self.dot_graph.disable();
    }

    /// Spec §4.17. `old_tree` seeds subtree reuse (ignored on a resumed
    /// call). Returns `None` on cancellation (state preserved for the next
    /// call) or on a scanner fault; otherwise the finished tree.
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        &mut self,
        table: &dyn ParseTable,
        main_lexer: &dyn MainLexer,
        keyword_lexer: Option<&dyn KeywordLexer>,
        mut external_scanner: Option<&mut dyn ExternalScanner>,
        input: &mut dyn ScannerInput,
        pool: &SubtreePool,
        old_tree: Option<&Tree>,
        new_included_ranges: Vec<IncludedRange>,
    ) -> Result<Option<Tree>, ParserError> {
        const SUPPORTED_ABI_VERSION: u32 = 14;
        if table.abi_version() != SUPPORTED_ABI_VERSION {
            return Err(ParserError::IncompatibleGrammar(glr_grammar::GrammarError::IncompatibleAbi {
                found: table.abi_version(),
                expected: SUPPORTED_ABI_VERSION,
            }));
        }
        if !is_sorted_and_disjoint(&new_included_ranges) {
            return Err(ParserError::InvalidIncludedRanges);
        }

        let resuming = self.has_outstanding_parse();
        if !resuming {
            self.gss = Some(Gss::new(table.start_state()));
            self.cursor = old_tree.map(|t| ReusableCursor::new(t.root.clone()));
            self.range_differences = match old_tree {
                Some(t) => RangeDifferences::compute(&t.included_ranges, &new_included_ranges),
                None => RangeDifferences::none(),
            };
            self.included_ranges = new_included_ranges;
            self.token_cache = TokenCache::new();
            self.finished_tree = None;
            self.accept_count = 0;
            self.progress = Some(Progress::new(&self.options));
        }
        if !self.balancer.is_resuming() {
            if let Some(outcome) = self.run_advance_loop(table, main_lexer, keyword_lexer, external_scanner.as_deref_mut(), input, pool)? {
                return outcome;
            }
        }

        let mut finished = self.finished_tree.take().expect("the advance loop only stops once finished_tree is set");
        let progress = self.progress.as_mut().expect("progress is set whenever an outstanding parse exists");
        if !self.balancer.balance(&mut finished, pool, &mut self.options, progress) {
            self.finished_tree = Some(finished);
            return Ok(None);
        }

        let included_ranges = self.included_ranges.clone();
        self.reset();
        Ok(Some(Tree { root: finished, included_ranges }))
    }

    /// Runs the per-version advance/condense loop until a finished tree
    /// dominates every live version. `Some(outcome)` means the caller
    /// should return immediately (cancellation or a scanner fault);
    /// `None` means the loop finished normally and `self.finished_tree`
    /// is ready for balancing.
    #[allow(clippy::too_many_arguments)]
    fn run_advance_loop(
        &mut self,
        table: &dyn ParseTable,
        main_lexer: &dyn MainLexer,
        keyword_lexer: Option<&dyn KeywordLexer>,
        mut external_scanner: Option<&mut dyn ExternalScanner>,
        input: &mut dyn ScannerInput,
        pool: &SubtreePool,
    ) -> Result<Option<Result<Option<Tree>, ParserError>>, ParserError> {
        loop {
            let gss = self.gss.as_mut().expect("run_advance_loop is only called with an outstanding parse");
            let mut version_count = gss.version_count();
            let mut last_position = 0usize;

            let mut v = 0;
            while v < gss.slot_count() {
                if !gss.is_live(v) {
                    v += 1;
                    continue;
                }
                version_count = gss.version_count();
                let allow_node_reuse = version_count == 1;

                while gss.is_live(v) && !gss.is_halted(v) && !gss.is_paused(v) {
                    let has_error = gss.is_in_error(v);
                    let rd = &self.range_differences;
                    let has_diff = move |s: usize, e: usize| rd.intersects(s, e);
                    let result = advance(
                        gss,
                        pool,
                        table,
                        v,
                        if allow_node_reuse { 1 } else { version_count },
                        self.cursor.as_mut(),
                        &mut self.token_cache,
                        main_lexer,
                        keyword_lexer,
                        external_scanner.as_deref_mut(),
                        input,
                        Some(&has_diff),
                        &mut self.finished_tree,
                        &self.costs,
                        has_error,
                        &mut self.options,
                        self.progress.as_mut().unwrap(),
                    );

                    match result {
                        AdvanceResult::Cancelled => return Ok(Some(Ok(None))),
                        AdvanceResult::Accepted => {
                            self.accept_count += 1;
                            if self.dot_graph.is_enabled() {
                                let cost = self.finished_tree.as_ref().map_or(0, |t| t.error_cost());
                                self.dot_graph.write_graph(
                                    "accept",
                                    &format!(
                                        "n0 [label=\"version {}, accept #{}, error_cost={}\"]",
                                        v, self.accept_count, cost
                                    ),
                                );
                            }
                            break;
                        }
                        AdvanceResult::Done => {
                            let position = if gss.is_live(v) { gss.position(v) } else { last_position };
                            if position > last_position || (v > 0 && position == last_position) {
                                last_position = position;
                                break;
                            }
                        }
                    }
                }
                v += 1;
            }

            let min_error_cost = condense(gss, pool, table, &self.options, self.accept_count);
            if let Some(finished) = self.finished_tree.as_ref() {
                if finished.error_cost() < min_error_cost {
                    break;
                }
            }

            self.range_differences.advance_past(last_position);

            if version_count == 0 {
                break;
            }
        }
        Ok(None)
    }

    /// Clears all resumable state (spec §5's "always reset on exit, except
    /// on cancellation"). `included_ranges` survives so the next call's
    /// `RangeDifferences::compute` has something to diff against.
    fn reset(&mut self) {
        self.gss = None;
        self.cursor = None;
        self.token_cache = TokenCache::new();
        self.progress = None;
        self.accept_count = 0;
        self.range_differences = RangeDifferences::none();
    }
}

fn is_sorted_and_disjoint(ranges: &[IncludedRange]) -> bool {
    ranges.windows(2).all(|w| w[0].end_byte <= w[1].start_byte)
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{ParseAction, ProductionId, StateId, Symbol};
    use glr_lex::{ByteInput, Point, TextProvider};

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

    fn single_token_table() -> ToyTable {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2)).with_abi_version(14);
        table.add_action(
            StateId::new(1),
            Symbol::new(3),
            ParseAction::Shift { state: StateId::new(2), extra: false, repetition: false },
        );
        table.add_action(
            StateId::new(2),
            Symbol::new(0),
            ParseAction::Reduce {
                symbol: Symbol::new(5),
                child_count: 1,
                dynamic_precedence: 0,
                production_id: ProductionId::new(0),
            },
        );
        table.set_transition(StateId::new(1), Symbol::new(5), StateId::new(3));
        table.add_action(StateId::new(3), Symbol::new(0), ParseAction::Accept);
        table
    }

    #[test]
    fn parses_a_single_token_to_completion() {
        let table = single_token_table();
        let pool = SubtreePool::new();
        let lexer = FixedLexer(Symbol::new(3), 1);
        let mut src = Whole(b"a", false);
        let mut input = ByteInput::new(&mut src);
        let mut parser: Parser<()> = Parser::new(ParseOptions::default());

        let result = parser
            .parse(&table, &lexer, None, None, &mut input, &pool, None, Vec::new())
            .expect("a well-formed grammar never errors out of parse");

        let tree = result.expect("no cancellation source was configured");
        assert_eq!(tree.root.symbol(), Symbol::new(5));
        assert!(!parser.has_outstanding_parse());
    }

    #[test]
    fn an_incompatible_abi_is_rejected() {
        let table = single_token_table().with_abi_version(1);
        let pool = SubtreePool::new();
        let lexer = FixedLexer(Symbol::new(3), 1);
        let mut src = Whole(b"a", false);
        let mut input = ByteInput::new(&mut src);
        let mut parser: Parser<()> = Parser::new(ParseOptions::default());

        let result = parser.parse(&table, &lexer, None, None, &mut input, &pool, None, Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn cancellation_preserves_an_outstanding_parse() {
        let table = single_token_table();
        let pool = SubtreePool::new();
        let lexer = FixedLexer(Symbol::new(3), 1);
        let mut src = Whole(b"a", false);
        let mut input = ByteInput::new(&mut src);
        let mut options: ParseOptions<()> = ParseOptions {
            op_count_per_timeout_check: 1,
            ..ParseOptions::default()
        };
        let flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        options.cancellation_flag = Some(flag);
        let mut parser: Parser<()> = Parser::new(options);

        let result = parser
            .parse(&table, &lexer, None, None, &mut input, &pool, None, Vec::new())
            .expect("cancellation is not a grammar/range error");
        assert!(result.is_none());
        assert!(parser.has_outstanding_parse());
    }
}
