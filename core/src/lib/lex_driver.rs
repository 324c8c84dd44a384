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

use glr_grammar::{ParseTable, StateId, Symbol, ERROR_STATE};
use glr_lex::{ExternalScanner, KeywordLexer, MainLexer, Point, ScannerInput};
use glr_tree::{Subtree, SubtreePool};

/// Everything `lex` needs about the version it's lexing on behalf of, so
/// the function signature doesn't grow a new positional argument every
/// time the advance loop (spec §4.13) learns something new.
pub struct LexContext<'a> {
    pub state: StateId,
    pub position: usize,
    pub point: Point,
    pub last_external_token: Option<&'a Subtree>,
    /// `ErrorStatus::node_count_since_error` for this version — zero means
    /// no progress has been made since the last error, which the
    /// empty-token guard (spec §4.2 step 3) treats as non-advancing.
    pub node_count_since_error: u32,
}

/// A freshly lexed (or synthesized) leaf, paired with the document point
/// just past it — `Subtree` itself carries no `Point` (see `glr-tree`'s
/// module doc comment), so the advance loop needs this alongside the leaf
/// to update the GSS frame's point on shift.
pub struct LexResult {
    pub subtree: Subtree,
    pub end_point: Point,
}

/// Spec §4.2: lex one token (or synthesize an error/missing-equivalent
/// leaf) at `ctx`. Returns `None` only for the "end of a non-terminal-extra
/// rule" case, where the driver must not re-enter the lexer at all.
#[allow(clippy::too_many_arguments)]
pub fn lex(
    table: &dyn ParseTable,
    main_lexer: &dyn MainLexer,
    keyword_lexer: Option<&dyn KeywordLexer>,
    mut external_scanner: Option<&mut dyn ExternalScanner>,
    input: &mut dyn ScannerInput,
    pool: &SubtreePool,
    ctx: &LexContext,
) -> Option<LexResult> {
    let lex_mode = table.lex_mode_for_state(ctx.state);
    if lex_mode.is_end_of_non_terminal_extra() {
        return None;
    }
    let error_mode = ctx.state == ERROR_STATE;

    let mut attempt_lex_mode = lex_mode;
    let mut tried_error_mode = error_mode;
    let mut start = ctx.position;
    let mut point = ctx.point;
    let mut first_error_character: Option<usize> = None;

    loop {
        if attempt_lex_mode.external_lex_state != 0 {
            if let Some(scanner) = external_scanner.as_deref_mut() {
                if let Some(bytes) = ctx.last_external_token.and_then(Subtree::external_scanner_state) {
                    scanner.deserialize(bytes);
                }
                input.reset(start, point);
                let enabled = table.external_scanner_enabled_tokens(ctx.state);
                if let Some(symbol) = scanner.scan(input, enabled) {
                    let empty = input.start_byte() == input.end_byte();
                    let new_state = scanner.serialize();
                    let old_state = ctx.last_external_token.and_then(Subtree::external_scanner_state);
                    let state_changed = old_state.map(|old| old != new_state.as_slice()).unwrap_or(true);
                    let non_advancing =
                        table.is_extra_symbol(symbol) || ctx.node_count_since_error == 0 || error_mode;
                    if !(empty && non_advancing && !state_changed) {
                        let subtree = build_leaf(
                            pool,
                            table,
                            keyword_lexer,
                            input,
                            ctx.state,
                            ctx.position,
                            symbol,
                            Some((new_state, state_changed)),
                        );
                        return Some(LexResult { subtree, end_point: input.end_point() });
                    }
                }
            }
        }

        input.reset(start, point);
        if let Some(symbol) = main_lexer.lex(input, attempt_lex_mode.lex_state) {
            let subtree = build_leaf(
                pool,
                table,
                keyword_lexer,
                input,
                ctx.state,
                ctx.position,
                symbol,
                None,
            );
            return Some(LexResult { subtree, end_point: input.end_point() });
        }

        if !tried_error_mode {
            tried_error_mode = true;
            attempt_lex_mode = table.lex_mode_for_state(ERROR_STATE);
            continue;
        }

        if first_error_character.is_none() {
            first_error_character = Some(start);
        }
        input.reset(start, point);
        match input.advance() {
            Some(c) => {
                point = point.advance(c);
                start = input.lookahead_byte();
                continue;
            }
            None => {
                let error_start = first_error_character.unwrap();
                let padding = error_start.saturating_sub(ctx.position);
                return Some(LexResult {
                    subtree: pool.error_leaf(padding, error_start, 0),
                    end_point: point,
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_leaf(
    pool: &SubtreePool,
    table: &dyn ParseTable,
    keyword_lexer: Option<&dyn KeywordLexer>,
    input: &mut dyn ScannerInput,
    state: StateId,
    position: usize,
    symbol: Symbol,
    external: Option<(Vec<u8>, bool)>,
) -> Subtree {
    let start_byte = input.start_byte();
    let end_byte = input.end_byte();
    let padding = start_byte.saturating_sub(position);
    let size = end_byte - start_byte;
    let lookahead_bytes = input.lookahead_byte().saturating_sub(end_byte);

    let mut final_symbol = symbol;
    let mut is_keyword = false;
    if external.is_none() && Some(symbol) == table.keyword_capture_token() {
        if let Some(kw_lexer) = keyword_lexer {
            let start_point = input.start_point();
            input.reset(start_byte, start_point);
            if let Some(kw_symbol) = kw_lexer.lex_keyword(input) {
                if input.end_byte() == end_byte
                    && (table.has_actions(state, kw_symbol) || table.is_reserved_word(state, kw_symbol))
                {
                    final_symbol = kw_symbol;
                    is_keyword = true;
                }
            }
        }
    }

    match external {
        Some((scanner_state, state_changed)) => pool.scanner_leaf(
            final_symbol,
            state,
            padding,
            size,
            lookahead_bytes,
            scanner_state,
            state_changed,
        ),
        None => pool.leaf(final_symbol, state, padding, size, lookahead_bytes, is_keyword),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_lex::{ByteInput, TextProvider};

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

    struct NeverLexer;
    impl MainLexer for NeverLexer {
        fn lex(&self, _input: &mut dyn ScannerInput, _lex_state: u16) -> Option<Symbol> {
            None
        }
    }

    #[test]
    fn lexes_a_plain_token() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let lexer = FixedLexer(Symbol::new(5), 3);
        let mut src = Whole(b"abcxyz", false);
        let mut input = ByteInput::new(&mut src);
        let ctx = LexContext {
            state: StateId::new(1),
            position: 0,
            point: Point::ZERO,
            last_external_token: None,
            node_count_since_error: 1,
        };
        let result = lex(&table, &lexer, None, None, &mut input, &pool, &ctx).unwrap();
        assert_eq!(result.subtree.symbol(), Symbol::new(5));
        assert_eq!(result.subtree.size(), 3);
        assert_eq!(result.subtree.padding(), 0);
        assert_eq!(result.end_point.column, 3);
    }

    #[test]
    fn skips_unrecognized_bytes_until_eof() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let lexer = NeverLexer;
        let mut src = Whole(b"$$", false);
        let mut input = ByteInput::new(&mut src);
        let ctx = LexContext {
            state: StateId::new(1),
            position: 0,
            point: Point::ZERO,
            last_external_token: None,
            node_count_since_error: 1,
        };
        let result = lex(&table, &lexer, None, None, &mut input, &pool, &ctx).unwrap();
        assert!(result.subtree.flags().error);
        assert_eq!(result.subtree.size(), 0);
    }

    #[test]
    fn returns_none_at_end_of_non_terminal_extra() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.set_lex_mode(
            StateId::new(1),
            glr_grammar::LexMode {
                lex_state: glr_grammar::SENTINEL_NONE,
                external_lex_state: 0,
            },
        );
        let pool = SubtreePool::new();
        let lexer = NeverLexer;
        let mut src = Whole(b"", false);
        let mut input = ByteInput::new(&mut src);
        let ctx = LexContext {
            state: StateId::new(1),
            position: 0,
            point: Point::ZERO,
            last_external_token: None,
            node_count_since_error: 1,
        };
        assert!(lex(&table, &lexer, None, None, &mut input, &pool, &ctx).is_none());
    }
}
