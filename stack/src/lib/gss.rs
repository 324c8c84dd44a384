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

use cactus::Cactus;

use glr_grammar::StateId;
use glr_lex::Point;
use glr_tree::Subtree;

use crate::error_status::ErrorStatus;
use crate::frame::Frame;
use crate::summary::Summary;

pub type VersionId = usize;

/// The result of a `pop_count`/`pop_pending`/`pop_all`/`pop_error` call:
/// the popped children (oldest first) and the frame left on top.
#[derive(Clone)]
pub struct Slice {
    pub version: VersionId,
    pub children: Vec<Subtree>,
    pub state: StateId,
    pub position: usize,
    pub last_external_token: Option<Subtree>,
}

struct VersionState {
    top: Cactus<Frame>,
    halted: bool,
    paused: Option<Subtree>,
    error: ErrorStatus,
    summary: Option<Summary>,
}

impl VersionState {
    fn frame(&self) -> &Frame {
        self.top.val().expect("version stack is never empty")
    }
}

/// The graph-structured parse stack. One `Cactus<Frame>` path per live
/// version; see the module doc comment for how this differs from a
/// fully general multi-parent GSS, and for where the ambiguity
/// resolution a multi-parent node would otherwise carry actually runs.
pub struct Gss {
    versions: Vec<Option<VersionState>>,
}

impl Gss {
    /// A fresh GSS with a single version 0, its root frame at `start_state`.
    pub fn new(start_state: StateId) -> Self {
        let root = Cactus::new().child(Frame::root(start_state));
        Gss {
            versions: vec![Some(VersionState {
                top: root,
                halted: false,
                paused: None,
                error: ErrorStatus::default(),
                summary: None,
            })],
        }
    }

    fn get(&self, v: VersionId) -> &VersionState {
        self.versions[v].as_ref().expect("version has been removed")
    }

    fn get_mut(&mut self, v: VersionId) -> &mut VersionState {
        self.versions[v].as_mut().expect("version has been removed")
    }

    /// Upper bound on live version ids; some slots below this may be `None`.
    pub fn slot_count(&self) -> usize {
        self.versions.len()
    }

    pub fn version_count(&self) -> usize {
        self.versions.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_live(&self, v: VersionId) -> bool {
        v < self.versions.len() && self.versions[v].is_some()
    }

    pub fn state(&self, v: VersionId) -> StateId {
        self.get(v).frame().state
    }

    pub fn position(&self, v: VersionId) -> usize {
        self.get(v).frame().position
    }

    pub fn last_external_token(&self, v: VersionId) -> Option<Subtree> {
        self.get(v).frame().last_external_token.clone()
    }

    /// The document point (row/col) at the top of `v`'s stack. Advanced
    /// only by shift pushes; a reduce push keeps its caller-supplied
    /// `point` unchanged (see `Frame`'s doc comment).
    pub fn point(&self, v: VersionId) -> Point {
        self.get(v).frame().point
    }

    /// Push `subtree` onto `v`, transitioning to `state` and leaving the
    /// stack's point at `point`. `pending` marks the node as still
    /// breakdownable (spec §4.9). Callers: a shift passes the lexed
    /// token's `end_point`; a reduce passes the point captured just
    /// before the pop sequence that produced `subtree`'s children.
    pub fn push(&mut self, v: VersionId, subtree: Subtree, pending: bool, state: StateId, point: Point) {
        let vs = self.get_mut(v);
        let prev = vs.frame();
        let position = prev.position + subtree.total_bytes();
        let last_external_token = if subtree.external_scanner_state().is_some() {
            Some(subtree.clone())
        } else {
            prev.last_external_token.clone()
        };
        let frame = Frame {
            state,
            subtree: Some(subtree),
            position,
            point,
            last_external_token,
            pending,
        };
        vs.top = vs.top.child(frame);
    }

    /// Pop `n` subtrees off `v`. Always returns exactly one slice (see
    /// module doc comment); the `Vec` return type matches the richer API
    /// a true multi-parent GSS would need. Callers that must compare
    /// alternative derivations (a reduce-reduce conflict) fork `v` with
    /// `copy_version` first and call this once per alternative instead.
    pub fn pop_count(&mut self, v: VersionId, n: usize) -> Vec<Slice> {
        let vs = self.get_mut(v);
        let mut children = Vec::with_capacity(n);
        let mut cursor = vs.top.clone();
        for _ in 0..n {
            let frame = cursor.val().expect("popped past the root frame");
            children.push(frame.subtree.clone().expect("popped past the root frame"));
            cursor = cursor.parent().expect("popped past the root frame");
        }
        children.reverse();
        vs.top = cursor;
        let frame = vs.frame();
        vec![Slice {
            version: v,
            children,
            state: frame.state,
            position: frame.position,
            last_external_token: frame.last_external_token.clone(),
        }]
    }

    /// Pop exactly one frame iff it is marked `pending`.
    pub fn pop_pending(&mut self, v: VersionId) -> Option<Slice> {
        if !self.get(v).frame().pending {
            return None;
        }
        Some(self.pop_count(v, 1).remove(0))
    }

    /// Pop exactly one frame iff its subtree is flagged as an error node.
    pub fn pop_error(&mut self, v: VersionId) -> Option<Slice> {
        let is_error = self
            .get(v)
            .frame()
            .subtree
            .as_ref()
            .map(|s| s.flags().error)
            .unwrap_or(false);
        if !is_error {
            return None;
        }
        Some(self.pop_count(v, 1).remove(0))
    }

    /// Pop every frame back to the root.
    pub fn pop_all(&mut self, v: VersionId) -> Slice {
        let depth = {
            let mut cursor = self.get(v).top.clone();
            let mut n = 0;
            while cursor.parent().is_some() {
                n += 1;
                cursor = cursor.parent().unwrap();
            }
            n
        };
        self.pop_count(v, depth).remove(0)
    }

    /// Two versions may merge iff they are at the same state and byte
    /// position with pointer-equal (or absent) external-scanner state
    /// (spec §3). On success `b` is discarded and its path is abandoned
    /// in favour of `a`'s (already-shared, thanks to `Cactus`, whenever
    /// the two paths had a common suffix).
    pub fn merge(&mut self, a: VersionId, b: VersionId) -> bool {
        if a == b {
            return false;
        }
        let (sa, pa, ea) = {
            let f = self.get(a).frame();
            (f.state, f.position, f.last_external_token.clone())
        };
        let (sb, pb, eb) = {
            let f = self.get(b).frame();
            (f.state, f.position, f.last_external_token.clone())
        };
        let external_matches = match (&ea, &eb) {
            (None, None) => true,
            (Some(x), Some(y)) => Subtree::ptr_eq(x, y),
            _ => false,
        };
        if sa != sb || pa != pb || !external_matches {
            return false;
        }
        debug!("gss: merging version {} into {} at state {:?}/{}", b, a, sa, pa);
        self.remove_version(b);
        true
    }

    pub fn halt(&mut self, v: VersionId) {
        self.get_mut(v).halted = true;
    }

    pub fn is_halted(&self, v: VersionId) -> bool {
        self.get(v).halted
    }

    pub fn is_paused(&self, v: VersionId) -> bool {
        self.get(v).paused.is_some()
    }

    /// Save `lookahead` and mark `v` as paused, awaiting recovery (spec
    /// §4.13 step 10).
    pub fn pause(&mut self, v: VersionId, lookahead: Subtree) {
        self.get_mut(v).paused = Some(lookahead);
    }

    /// Clear the paused flag, returning the saved lookahead.
    pub fn resume(&mut self, v: VersionId) -> Option<Subtree> {
        self.get_mut(v).paused.take()
    }

    /// Clone `v` into a brand-new slot (used by the missing-token
    /// inserter, spec §4.12, to try an insertion speculatively).
    pub fn copy_version(&mut self, v: VersionId) -> VersionId {
        let clone = {
            let vs = self.get(v);
            VersionState {
                top: vs.top.clone(),
                halted: vs.halted,
                paused: vs.paused.clone(),
                error: vs.error,
                summary: vs.summary.clone(),
            }
        };
        self.versions.push(Some(clone));
        self.versions.len() - 1
    }

    /// Move the version at `from` into slot `to`, vacating `from` (spec
    /// §4.4 step 7 / §4.13 step 7: "renumber the reduction version onto
    /// `version`").
    pub fn renumber_version(&mut self, from: VersionId, to: VersionId) {
        if from == to {
            return;
        }
        let moved = self.versions[from].take();
        while self.versions.len() <= to {
            self.versions.push(None);
        }
        self.versions[to] = moved;
    }

    pub fn remove_version(&mut self, v: VersionId) {
        self.versions[v] = None;
    }

    /// The state, byte position, and point `depth` frames back from the top
    /// of `v`'s stack (0 = the current top). `None` once `depth` walks past
    /// the root. Read-only counterpart to `pop_count`'s depth-counting walk,
    /// used by the error-recovery summary recorder (spec §4.12) to capture
    /// every candidate recovery depth without popping anything.
    pub fn frame_at_depth(&self, v: VersionId, depth: u32) -> Option<(StateId, usize, Point)> {
        let mut cursor = self.get(v).top.clone();
        for _ in 0..depth {
            cursor = cursor.parent()?;
        }
        let frame = cursor.val()?;
        Some((frame.state, frame.position, frame.point))
    }

    pub fn record_summary(&mut self, v: VersionId, state: StateId, depth: u32, max_depth: usize) {
        let (position, point) = {
            let frame = self.get(v).frame();
            (frame.position, frame.point)
        };
        let vs = self.get_mut(v);
        let summary = vs.summary.get_or_insert_with(Summary::new);
        summary.push(state, depth, position, point, max_depth);
    }

    pub fn get_summary(&self, v: VersionId) -> Option<&Summary> {
        self.get(v).summary.as_ref()
    }

    pub fn error_cost(&self, v: VersionId) -> u32 {
        self.get(v).error.cost
    }

    /// The full error-bookkeeping struct, for the version comparator
    /// (spec §4.5) and condense (spec §4.15) to compare two versions at
    /// once rather than field by field.
    pub fn error_status(&self, v: VersionId) -> ErrorStatus {
        self.get(v).error
    }

    pub fn node_count_since_error(&self, v: VersionId) -> u32 {
        self.get(v).error.node_count_since_error()
    }

    pub fn dynamic_precedence(&self, v: VersionId) -> i32 {
        self.get(v).error.dynamic_precedence
    }

    pub fn is_in_error(&self, v: VersionId) -> bool {
        self.get(v).error.is_in_error
    }

    pub fn add_error_cost(&mut self, v: VersionId, delta: u32) {
        let err = &mut self.get_mut(v).error;
        err.cost = err.cost.saturating_add(delta);
    }

    pub fn set_is_in_error(&mut self, v: VersionId, value: bool) {
        self.get_mut(v).error.is_in_error = value;
    }

    pub fn mark_error_boundary(&mut self, v: VersionId) {
        let count = self.get(v).error.node_count;
        self.get_mut(v).error.node_count_at_last_error = count;
    }

    pub fn add_dynamic_precedence(&mut self, v: VersionId, delta: i32) {
        self.get_mut(v).error.dynamic_precedence += delta;
    }

    pub fn bump_node_count(&mut self, v: VersionId) {
        self.get_mut(v).error.node_count += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::{ProductionId, Symbol};
    use glr_lex::Point;
    use glr_tree::SubtreePool;

    #[test]
    fn push_then_pop_count_round_trips() {
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let a = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        let b = pool.leaf(Symbol::new(2), StateId::new(2), 1, 1, 0, false);
        gss.push(0, a.clone(), false, StateId::new(1), Point::ZERO);
        gss.push(0, b.clone(), false, StateId::new(2), Point::ZERO);
        assert_eq!(gss.state(0), StateId::new(2));
        assert_eq!(gss.position(0), 3);

        let slices = gss.pop_count(0, 2);
        assert_eq!(slices.len(), 1);
        let slice = &slices[0];
        assert_eq!(slice.children.len(), 2);
        assert!(Subtree::ptr_eq(&slice.children[0], &a));
        assert!(Subtree::ptr_eq(&slice.children[1], &b));
        assert_eq!(gss.state(0), StateId::new(0));
        assert_eq!(gss.position(0), 0);
    }

    #[test]
    fn merge_requires_matching_state_and_position() {
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let clone = gss.copy_version(0);
        let a = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        gss.push(0, a, false, StateId::new(1), Point::ZERO);
        assert!(!gss.merge(0, clone));

        let b = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        gss.push(clone, b, false, StateId::new(1), Point::ZERO);
        assert!(gss.merge(0, clone));
        assert!(!gss.is_live(clone));
    }

    #[test]
    fn pop_pending_only_pops_pending_frames() {
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let node = pool.node(
            Symbol::new(9),
            Some(StateId::new(1)),
            ProductionId::new(0),
            0,
            vec![pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false)],
        );
        gss.push(0, node, true, StateId::new(1), Point::ZERO);
        assert!(gss.pop_pending(0).is_some());
        assert_eq!(gss.state(0), StateId::new(0));
        assert!(gss.pop_pending(0).is_none());
    }

    #[test]
    fn renumber_moves_version_and_vacates_source() {
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(0));
        let clone = gss.copy_version(0);
        let leaf = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        gss.push(clone, leaf, false, StateId::new(1), Point::ZERO);
        gss.renumber_version(clone, 0);
        assert!(!gss.is_live(clone));
        assert_eq!(gss.state(0), StateId::new(1));
    }
}
