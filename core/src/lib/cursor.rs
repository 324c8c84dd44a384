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

use glr_tree::Subtree;

#[derive(Clone)]
struct Frame {
    node: Subtree,
    offset: usize,
    child_index: usize,
}

/// Walks a previous parse's tree in document order (spec §3/§4.3):
/// `descend` into the current node's first child, `advance` to the next
/// sibling (ascending as needed), `advance_past_leaf` to skip a rejected
/// candidate. Tracks the external-scanner state in effect at the
/// cursor's position, the way the GSS tracks `last_external_token`.
pub struct ReusableCursor {
    stack: Vec<Frame>,
    last_external_token: Option<Subtree>,
    /// `None` once the cursor has walked off the end of the tree.
    exhausted: bool,
}

impl ReusableCursor {
    pub fn new(old_tree: Subtree) -> Self {
        let mut cursor = ReusableCursor {
            stack: vec![Frame {
                node: old_tree,
                offset: 0,
                child_index: 0,
            }],
            last_external_token: None,
            exhausted: false,
        };
        cursor.note_external_state();
        cursor
    }

    fn note_external_state(&mut self) {
        if let Some(frame) = self.stack.last() {
            if frame.node.external_scanner_state().is_some() {
                self.last_external_token = Some(frame.node.clone());
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn last_external_token(&self) -> Option<Subtree> {
        self.last_external_token.clone()
    }

    /// The node the cursor is currently positioned at: `(start_byte,
    /// end_byte, tree)`. Callers treat an EOF-symbol node's end as
    /// unbounded themselves (spec §4.3) since this cursor doesn't know
    /// the grammar's `builtin_sym_end`.
    pub fn current(&self) -> Option<(usize, usize, Subtree)> {
        if self.exhausted {
            return None;
        }
        let frame = self.stack.last()?;
        Some((frame.offset, frame.offset + frame.node.total_bytes(), frame.node.clone()))
    }

    /// Descend into the current node's first child. Returns `false` (no
    /// change) if the current node is a leaf.
    pub fn descend(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let frame = self.stack.last().unwrap().clone();
        let children = frame.node.children();
        if children.is_empty() {
            return false;
        }
        self.stack.push(Frame {
            node: children[0].clone(),
            offset: frame.offset,
            child_index: 0,
        });
        self.note_external_state();
        true
    }

    /// Move to the next node in document order: the next sibling, or the
    /// next sibling of the nearest ancestor that has one. Returns `false`
    /// (and marks the cursor exhausted) once there is nothing left.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        loop {
            if self.stack.len() < 2 {
                self.exhausted = true;
                return false;
            }
            let frame = self.stack.pop().unwrap();
            let parent = self.stack.last().unwrap();
            let next_index = frame.child_index + 1;
            let siblings = parent.node.children();
            if next_index < siblings.len() {
                let next_offset = frame.offset + frame.node.total_bytes();
                self.stack.push(Frame {
                    node: siblings[next_index].clone(),
                    offset: next_offset,
                    child_index: next_index,
                });
                self.note_external_state();
                return true;
            }
            // No more siblings at this level; keep ascending.
        }
    }

    /// Skip past a rejected leaf candidate (spec §4.3's "advance_past_leaf").
    pub fn advance_past_leaf(&mut self) -> bool {
        self.advance()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::{ProductionId, StateId, Symbol};
    use glr_tree::SubtreePool;

    #[test]
    fn walks_leaves_in_document_order() {
        let pool = SubtreePool::new();
        let a = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        let b = pool.leaf(Symbol::new(2), StateId::new(1), 0, 2, 0, false);
        let root = pool.node(Symbol::new(9), Some(StateId::new(1)), ProductionId::new(0), 0, vec![a, b]);

        let mut cursor = ReusableCursor::new(root);
        let (off, end, tree) = cursor.current().unwrap();
        assert_eq!((off, end), (0, 3));
        assert_eq!(tree.child_count(), 2);

        assert!(cursor.descend());
        let (off, end, tree) = cursor.current().unwrap();
        assert_eq!((off, end), (0, 1));
        assert_eq!(tree.symbol(), Symbol::new(1));

        assert!(cursor.advance());
        let (off, end, tree) = cursor.current().unwrap();
        assert_eq!((off, end), (1, 3));
        assert_eq!(tree.symbol(), Symbol::new(2));

        assert!(!cursor.advance());
        assert!(cursor.is_exhausted());
    }
}
