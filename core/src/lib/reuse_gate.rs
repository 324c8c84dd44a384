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

use glr_grammar::{ParseTable, StateId, TableEntry};
use glr_tree::Subtree;

/// Spec §4.4: may a leaf built in an old parse state be reused verbatim at
/// `state` in the new one? Checked at the cursor's candidate node before
/// `reuse_node` (§4.3) hands it back to the driver.
pub fn reuse_gate(table: &dyn ParseTable, state: StateId, subtree: &Subtree, entry: &TableEntry) -> bool {
    let lex_mode = table.lex_mode_for_state(state);
    if lex_mode.is_end_of_non_terminal_extra() {
        return false;
    }

    let old_state = match subtree.parse_state() {
        Some(s) => s,
        None => return false,
    };
    let old_lex_mode = table.lex_mode_for_state(old_state);
    let is_keyword_capture = table.keyword_capture_token() == Some(subtree.symbol());
    if entry.action_count() > 0
        && old_lex_mode == lex_mode
        && (!is_keyword_capture || (!subtree.flags().is_keyword && subtree.parse_state() == Some(state)))
    {
        return true;
    }

    if subtree.size() == 0 && subtree.symbol() != table.builtin_sym_end() {
        return false;
    }

    lex_mode.external_lex_state == 0 && entry.is_reusable
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{LexMode, ParseAction, Symbol};
    use glr_tree::SubtreePool;

    fn table() -> ToyTable {
        ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2))
    }

    #[test]
    fn rejects_when_lex_mode_signals_end_of_non_terminal_extra() {
        let mut t = table();
        t.set_lex_mode(
            StateId::new(1),
            LexMode {
                lex_state: glr_grammar::SENTINEL_NONE,
                external_lex_state: 0,
            },
        );
        let pool = SubtreePool::new();
        let leaf = pool.leaf(Symbol::new(3), StateId::new(1), 0, 1, 0, false);
        let entry = t.table_entry(StateId::new(1), Symbol::new(3));
        assert!(!reuse_gate(&t, StateId::new(1), &leaf, &entry));
    }

    #[test]
    fn accepts_matching_lex_mode_with_actions() {
        let mut t = table();
        t.add_action(
            StateId::new(1),
            Symbol::new(3),
            ParseAction::Shift {
                state: StateId::new(2),
                extra: false,
                repetition: false,
            },
        );
        let pool = SubtreePool::new();
        let leaf = pool.leaf(Symbol::new(3), StateId::new(1), 0, 1, 0, false);
        let entry = t.table_entry(StateId::new(1), Symbol::new(3));
        assert!(reuse_gate(&t, StateId::new(1), &leaf, &entry));
    }

    #[test]
    fn rejects_zero_length_non_eof_leaf_without_matching_lex_mode() {
        let t = table();
        let pool = SubtreePool::new();
        let leaf = pool.leaf(Symbol::new(3), StateId::new(2), 0, 0, 0, false);
        let entry = t.table_entry(StateId::new(9), Symbol::new(3));
        assert!(!reuse_gate(&t, StateId::new(9), &leaf, &entry));
    }
}
