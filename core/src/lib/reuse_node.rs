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

use glr_grammar::{ParseTable, Symbol, TableEntry};
use glr_stack::{Gss, VersionId};
use glr_tree::Subtree;

use crate::breakdown::breakdown_top_of_stack;
use crate::cursor::ReusableCursor;
use crate::reuse_gate::reuse_gate;

fn first_leaf_symbol(tree: &Subtree) -> Symbol {
    if tree.children().is_empty() {
        tree.symbol()
    } else {
        first_leaf_symbol(&tree.children()[0])
    }
}

/// Spec §4.3: walk `cursor` looking for a node from the previous tree that
/// can stand in for the next lookahead token without re-lexing or
/// re-parsing it. Only ever called when `version` is the sole live
/// version (a reused subtree may hide an ambiguity a second version would
/// need to see freshly lexed).
///
/// `has_included_range_difference` reports whether the caller's included
/// ranges changed anywhere inside `[start, end)` of a candidate node — an
/// edit there invalidates reuse even if the subtree's own content is
/// unchanged (spec §2's included ranges).
pub fn reuse_node(
    gss: &mut Gss,
    table: &dyn ParseTable,
    version: VersionId,
    cursor: &mut ReusableCursor,
    position: usize,
    last_external_token: Option<&Subtree>,
    has_included_range_difference: Option<&dyn Fn(usize, usize) -> bool>,
) -> Option<(Subtree, TableEntry)> {
    loop {
        let (byte_offset, end_byte_offset, tree) = cursor.current()?;
        let end_byte_offset = if tree.symbol() == table.builtin_sym_end() {
            usize::MAX
        } else {
            end_byte_offset
        };

        if byte_offset > position {
            return None;
        }
        if byte_offset < position {
            if end_byte_offset <= position || !cursor.descend() {
                cursor.advance();
            }
            continue;
        }

        let external_matches = match (cursor.last_external_token(), last_external_token) {
            (None, None) => true,
            (Some(a), Some(b)) => Subtree::ptr_eq(&a, b),
            _ => false,
        };
        if !external_matches {
            cursor.advance();
            continue;
        }

        let cant_reuse = tree.flags().has_changes
            || tree.flags().error
            || tree.flags().missing
            || tree.flags().is_fragile()
            || has_included_range_difference
                .map(|f| f(byte_offset, end_byte_offset))
                .unwrap_or(false);

        if cant_reuse {
            if !cursor.descend() {
                cursor.advance();
                breakdown_top_of_stack(gss, table, version);
            }
            continue;
        }

        let state = gss.state(version);
        let entry = table.table_entry(state, first_leaf_symbol(&tree));
        if !reuse_gate(table, state, &tree, &entry) {
            cursor.advance_past_leaf();
            return None;
        }

        return Some((tree, entry));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{ParseAction, StateId};
    use glr_tree::SubtreePool;

    #[test]
    fn reuses_a_leaf_at_the_exact_position() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.add_action(
            StateId::new(1),
            Symbol::new(3),
            ParseAction::Shift { state: StateId::new(2), extra: false, repetition: false },
        );
        let pool = SubtreePool::new();
        let leaf = pool.leaf(Symbol::new(3), StateId::new(1), 0, 2, 0, false);
        let mut cursor = ReusableCursor::new(leaf.clone());
        let mut gss = Gss::new(StateId::new(1));

        let (reused, entry) = reuse_node(&mut gss, &table, 0, &mut cursor, 0, None, None).unwrap();
        assert!(Subtree::ptr_eq(&reused, &leaf));
        assert_eq!(entry.action_count(), 1);
    }

    #[test]
    fn stops_once_past_the_requested_position() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let leaf = pool.leaf(Symbol::new(3), StateId::new(1), 0, 2, 0, false);
        let mut cursor = ReusableCursor::new(leaf);
        let mut gss = Gss::new(StateId::new(1));

        assert!(reuse_node(&mut gss, &table, 0, &mut cursor, 5, None, None).is_none());
    }

    #[test]
    fn skips_nodes_flagged_as_errors() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let err = pool.error_leaf(0, 0, 0);
        let mut cursor = ReusableCursor::new(err);
        let mut gss = Gss::new(StateId::new(1));

        assert!(reuse_node(&mut gss, &table, 0, &mut cursor, 0, None, None).is_none());
        assert!(cursor.is_exhausted());
    }
}
