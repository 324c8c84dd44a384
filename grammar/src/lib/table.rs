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

use crate::action::{LexMode, ParseAction, TableEntry};
use crate::idxnewtype::{StateId, Symbol};

/// The read-only compiled-grammar artifact the GLR driver consumes. A real
/// implementation is produced by a grammar compiler (out of scope for this
/// crate, see `spec.md` §1); `toy::ToyTable` is a minimal stand-in used by
/// tests.
pub trait ParseTable {
    /// The ABI version this table was compiled for. The driver checks this
    /// once, at parser construction, and refuses to load an incompatible
    /// table (`ParserError::IncompatibleGrammar`).
    fn abi_version(&self) -> u32;

    /// The state a fresh GSS root frame starts in (spec §3). `ERROR_STATE`
    /// is reserved for mid-recovery versions, so a compiled table's real
    /// start state is never `0`; state `1` is the conventional default.
    fn start_state(&self) -> StateId {
        StateId::new(1)
    }

    fn next_state(&self, state: StateId, symbol: Symbol) -> StateId;

    fn lex_mode_for_state(&self, state: StateId) -> LexMode;

    /// All actions available for `(state, symbol)`. More than one action
    /// means the grammar is ambiguous at this point.
    fn actions(&self, state: StateId, symbol: Symbol) -> &[ParseAction];

    fn table_entry(&self, state: StateId, symbol: Symbol) -> TableEntry;

    fn has_actions(&self, state: StateId, symbol: Symbol) -> bool {
        !self.actions(state, symbol).is_empty()
    }

    fn has_reduce_action(&self, state: StateId, symbol: Symbol) -> bool {
        self.actions(state, symbol)
            .iter()
            .any(|a| matches!(a, ParseAction::Reduce { .. }))
    }

    fn is_reserved_word(&self, state: StateId, symbol: Symbol) -> bool;

    /// Number of distinct token symbols the lexer can ever produce
    /// (symbols `1..token_count` are valid `missing_symbol` candidates in
    /// §4.12; symbol `0` is conventionally unused/`ERROR_STATE`-adjacent).
    fn token_count(&self) -> u32;

    fn symbol_name(&self, symbol: Symbol) -> &str;

    /// `None` if the grammar has no keyword/identifier ambiguity to
    /// disambiguate (spec §4.2's keyword-capture re-lex).
    fn keyword_capture_token(&self) -> Option<Symbol>;

    fn builtin_sym_end(&self) -> Symbol;
    fn builtin_sym_error(&self) -> Symbol;
    fn builtin_sym_error_repeat(&self) -> Symbol;

    /// Whether `symbol` is declared `extra` (may appear between any two
    /// grammar tokens, e.g. whitespace/comments) independent of state.
    fn is_extra_symbol(&self, symbol: Symbol) -> bool;

    /// Which external-scanner tokens are enabled (may legally be returned
    /// by `scan`) when the table's lex mode for `state` selects the
    /// external scanner.
    fn external_scanner_enabled_tokens(&self, state: StateId) -> &[Symbol];
}
