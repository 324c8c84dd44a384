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

//! A hand-rolled, in-memory `ParseTable` used by this workspace's test
//! suites. Nothing here is a grammar compiler: callers build up a
//! `ToyTable` action-by-action, the way the teacher's own tests build a
//! grammar by hand rather than compiling a `.y` file.

use indexmap::IndexMap;

use crate::action::{LexMode, ParseAction, TableEntry, ERROR_STATE};
use crate::idxnewtype::{StateId, Symbol};
use crate::table::ParseTable;

#[derive(Debug, Clone, Default)]
pub struct ToyTable {
    abi_version: u32,
    transitions: IndexMap<(StateId, Symbol), StateId>,
    actions: IndexMap<(StateId, Symbol), Vec<ParseAction>>,
    lex_modes: IndexMap<StateId, LexMode>,
    reusable: IndexMap<(StateId, Symbol), bool>,
    reserved_words: IndexMap<(StateId, Symbol), bool>,
    symbol_names: IndexMap<Symbol, String>,
    extras: Vec<Symbol>,
    external_enabled: IndexMap<StateId, Vec<Symbol>>,
    keyword_capture: Option<Symbol>,
    sym_end: Symbol,
    sym_error: Symbol,
    sym_error_repeat: Symbol,
    token_count: u32,
}

impl ToyTable {
    pub fn new(token_count: u32, sym_end: Symbol, sym_error: Symbol, sym_error_repeat: Symbol) -> Self {
        ToyTable {
            abi_version: 14,
            token_count,
            sym_end,
            sym_error,
            sym_error_repeat,
            ..Default::default()
        }
    }

    pub fn with_abi_version(mut self, v: u32) -> Self {
        self.abi_version = v;
        self
    }

    pub fn set_lex_mode(&mut self, state: StateId, mode: LexMode) -> &mut Self {
        self.lex_modes.insert(state, mode);
        self
    }

    pub fn set_transition(&mut self, state: StateId, symbol: Symbol, next: StateId) -> &mut Self {
        self.transitions.insert((state, symbol), next);
        self
    }

    pub fn add_action(&mut self, state: StateId, symbol: Symbol, action: ParseAction) -> &mut Self {
        self.actions.entry((state, symbol)).or_default().push(action);
        self
    }

    pub fn set_reusable(&mut self, state: StateId, symbol: Symbol, reusable: bool) -> &mut Self {
        self.reusable.insert((state, symbol), reusable);
        self
    }

    pub fn set_reserved_word(&mut self, state: StateId, symbol: Symbol, reserved: bool) -> &mut Self {
        self.reserved_words.insert((state, symbol), reserved);
        self
    }

    pub fn name_symbol(&mut self, symbol: Symbol, name: &str) -> &mut Self {
        self.symbol_names.insert(symbol, name.to_string());
        self
    }

    pub fn mark_extra(&mut self, symbol: Symbol) -> &mut Self {
        self.extras.push(symbol);
        self
    }

    pub fn set_keyword_capture(&mut self, symbol: Symbol) -> &mut Self {
        self.keyword_capture = Some(symbol);
        self
    }

    pub fn set_external_enabled(&mut self, state: StateId, symbols: Vec<Symbol>) -> &mut Self {
        self.external_enabled.insert(state, symbols);
        self
    }
}

impl ParseTable for ToyTable {
    fn abi_version(&self) -> u32 {
        self.abi_version
    }

    fn next_state(&self, state: StateId, symbol: Symbol) -> StateId {
        self.transitions
            .get(&(state, symbol))
            .copied()
            .unwrap_or(ERROR_STATE)
    }

    fn lex_mode_for_state(&self, state: StateId) -> LexMode {
        self.lex_modes.get(&state).copied().unwrap_or_default()
    }

    fn actions(&self, state: StateId, symbol: Symbol) -> &[ParseAction] {
        self.actions
            .get(&(state, symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn table_entry(&self, state: StateId, symbol: Symbol) -> TableEntry {
        TableEntry {
            actions: self.actions(state, symbol).to_vec(),
            is_reusable: self.reusable.get(&(state, symbol)).copied().unwrap_or(false),
        }
    }

    fn is_reserved_word(&self, state: StateId, symbol: Symbol) -> bool {
        self.reserved_words.get(&(state, symbol)).copied().unwrap_or(false)
    }

    fn token_count(&self) -> u32 {
        self.token_count
    }

    fn symbol_name(&self, symbol: Symbol) -> &str {
        self.symbol_names
            .get(&symbol)
            .map(String::as_str)
            .unwrap_or("<anon>")
    }

    fn keyword_capture_token(&self) -> Option<Symbol> {
        self.keyword_capture
    }

    fn builtin_sym_end(&self) -> Symbol {
        self.sym_end
    }

    fn builtin_sym_error(&self) -> Symbol {
        self.sym_error
    }

    fn builtin_sym_error_repeat(&self) -> Symbol {
        self.sym_error_repeat
    }

    fn is_extra_symbol(&self, symbol: Symbol) -> bool {
        self.extras.contains(&symbol)
    }

    fn external_scanner_enabled_tokens(&self, state: StateId) -> &[Symbol] {
        self.external_enabled
            .get(&state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_transition_lands_in_error_state() {
        let t = ToyTable::new(4, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        assert_eq!(t.next_state(StateId::new(3), Symbol::new(9)), ERROR_STATE);
    }

    #[test]
    fn builder_round_trips_actions_and_names() {
        let mut t = ToyTable::new(4, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let s0 = StateId::new(0);
        let s1 = StateId::new(1);
        let x = Symbol::new(3);
        t.set_transition(s0, x, s1);
        t.add_action(
            s0,
            x,
            ParseAction::Shift {
                state: s1,
                extra: false,
                repetition: false,
            },
        );
        t.name_symbol(x, "x");
        t.mark_extra(Symbol::new(10));

        assert_eq!(t.next_state(s0, x), s1);
        assert_eq!(t.actions(s0, x).len(), 1);
        assert_eq!(t.symbol_name(x), "x");
        assert!(t.is_extra_symbol(Symbol::new(10)));
        assert!(!t.is_extra_symbol(x));
    }
}
