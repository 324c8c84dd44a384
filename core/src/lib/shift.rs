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

use glr_grammar::StateId;
use glr_lex::Point;
use glr_stack::{Gss, VersionId};
use glr_tree::Subtree;

/// Spec §4.8: push `token` onto `version`'s stack, transitioning to
/// `state`. A leaf whose `extra` flag disagrees with what this shift
/// wants gets a cheap copy-on-write flip first; a reused non-leaf node is
/// pushed `pending` so the breakdown step (§4.9) gets a chance to descend
/// into it if a later action needs a finer-grained stack.
pub fn shift(gss: &mut Gss, version: VersionId, token: Subtree, state: StateId, extra: bool, end_point: Point) {
    let is_leaf = token.is_leaf();
    let to_push = if is_leaf && token.flags().extra != extra {
        token.with_extra(extra)
    } else {
        token
    };
    let pending = !is_leaf;
    gss.push(version, to_push, pending, state, end_point);
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::{ProductionId, Symbol};
    use glr_tree::SubtreePool;

    #[test]
    fn leaf_extra_flag_is_flipped_when_it_disagrees() {
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let token = pool.leaf(Symbol::new(5), StateId::new(1), 0, 1, 0, false);
        assert!(!token.flags().extra);

        shift(&mut gss, 0, token, StateId::new(1), true, Point::new(0, 1));

        let slice = gss.pop_count(0, 1).remove(0);
        assert!(slice.children[0].flags().extra);
    }

    #[test]
    fn leaf_is_pushed_non_pending() {
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let token = pool.leaf(Symbol::new(5), StateId::new(1), 0, 1, 0, false);

        shift(&mut gss, 0, token, StateId::new(1), false, Point::new(0, 1));

        assert!(gss.pop_pending(0).is_none());
        assert_eq!(gss.state(0), StateId::new(1));
    }

    #[test]
    fn reused_node_is_pushed_pending() {
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let leaf = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        let node = pool.node(Symbol::new(9), Some(StateId::new(1)), ProductionId::new(0), 0, vec![leaf]);

        shift(&mut gss, 0, node, StateId::new(1), false, Point::new(0, 1));

        assert!(gss.pop_pending(0).is_some());
    }
}
