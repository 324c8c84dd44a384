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

use glr_grammar::{ParseTable, StateId, ERROR_STATE};
use glr_stack::{Gss, VersionId};

use crate::cursor::ReusableCursor;

/// Spec §4.9: repeatedly pop the top-of-stack frame iff it's still
/// `pending` (a reused internal node the shift engine pushed verbatim),
/// and re-push its children one by one instead, recomputing the state
/// each child transitions to. Stops once a round pushes no more pending
/// children, or the stack has nothing pending left. Returns whether
/// anything was broken down at all.
pub fn breakdown_top_of_stack(gss: &mut Gss, table: &dyn ParseTable, version: VersionId) -> bool {
    let point = gss.point(version);
    let mut did_break_down = false;
    loop {
        let slice = match gss.pop_pending(version) {
            Some(s) => s,
            None => break,
        };
        did_break_down = true;
        let parent = slice.children.into_iter().next().expect("pop_pending always pops exactly one frame");

        let mut state = slice.state;
        let mut last_child_pending = false;
        for child in parent.children() {
            let pending = child.child_count() > 0;
            if child.flags().error {
                state = ERROR_STATE;
            } else if !child.flags().extra {
                state = table.next_state(state, child.symbol());
            }
            gss.push(version, child.clone(), pending, state, point);
            last_child_pending = pending;
        }
        if !last_child_pending {
            break;
        }
    }
    did_break_down
}

/// Spec §4.3/§4.9: descend the reusable-node cursor past any subtree that
/// still has children and whose recorded `parse_state` doesn't match
/// `state` — the lookahead the driver would otherwise reuse whole is too
/// coarse for where the live parse actually is. Returns whether the
/// cursor moved at all.
pub fn breakdown_lookahead(cursor: &mut ReusableCursor, state: StateId) -> bool {
    let mut did_descend = false;
    loop {
        let Some((_, _, tree)) = cursor.current() else {
            break;
        };
        if tree.child_count() == 0 || tree.parse_state() == Some(state) {
            break;
        }
        if !cursor.descend() {
            break;
        }
        did_descend = true;
    }
    did_descend
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{ProductionId, Symbol};
    use glr_lex::Point;
    use glr_tree::SubtreePool;

    #[test]
    fn breaks_a_pending_node_down_into_its_children() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.set_transition(StateId::new(1), Symbol::new(2), StateId::new(3));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(1));

        let leaf_a = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        let leaf_b = pool.leaf(Symbol::new(2), StateId::new(1), 1, 1, 0, false);
        let reused = pool.node(
            Symbol::new(9),
            Some(StateId::new(1)),
            ProductionId::new(0),
            0,
            vec![leaf_a, leaf_b],
        );
        gss.push(0, reused, true, StateId::new(1), Point::ZERO);

        assert!(breakdown_top_of_stack(&mut gss, &table, 0));
        assert_eq!(gss.state(0), StateId::new(3));
        let slice = gss.pop_count(0, 2).remove(0);
        assert_eq!(slice.children[0].symbol(), Symbol::new(1));
        assert_eq!(slice.children[1].symbol(), Symbol::new(2));
    }

    #[test]
    fn noop_when_nothing_pending() {
        let table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let leaf = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        gss.push(0, leaf, false, StateId::new(1), Point::ZERO);

        assert!(!breakdown_top_of_stack(&mut gss, &table, 0));
    }

    #[test]
    fn lookahead_descends_until_parse_state_matches() {
        let pool = SubtreePool::new();
        let leaf_a = pool.leaf(Symbol::new(1), StateId::new(5), 0, 1, 0, false);
        let leaf_b = pool.leaf(Symbol::new(2), StateId::new(5), 1, 1, 0, false);
        let root = pool.node(Symbol::new(9), Some(StateId::new(1)), ProductionId::new(0), 0, vec![leaf_a, leaf_b]);
        let mut cursor = ReusableCursor::new(root);

        assert!(breakdown_lookahead(&mut cursor, StateId::new(5)));
        let (_, _, tree) = cursor.current().unwrap();
        assert_eq!(tree.symbol(), Symbol::new(1));
    }

    #[test]
    fn lookahead_does_not_descend_when_state_already_matches() {
        let pool = SubtreePool::new();
        let leaf = pool.leaf(Symbol::new(1), StateId::new(5), 0, 1, 0, false);
        let root = pool.node(Symbol::new(9), Some(StateId::new(1)), ProductionId::new(0), 0, vec![leaf]);
        let mut cursor = ReusableCursor::new(root);

        assert!(!breakdown_lookahead(&mut cursor, StateId::new(1)));
    }
}
