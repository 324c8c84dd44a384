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

use glr_tree::{Subtree, SubtreeData, SubtreePool};

use crate::options::ParseOptions;
use crate::progress::Progress;

/// A node mid-rebuild: its own data (children already taken out), the
/// children not yet visited (reverse order, so `Vec::pop` yields them
/// left to right) and the children already finished.
struct Frame {
    data: SubtreeData,
    remaining: Vec<Subtree>,
    built: Vec<Subtree>,
}

/// Spec §4.16: after a parse finishes, repeat nodes built by the reduce
/// engine can end up lopsided (many children pushed onto one side),
/// which makes a later incremental edit touch more of the tree than it
/// needs to. This walks the finished tree and regroups overly deep
/// repeat chains toward a balanced shape.
///
/// A `Balancer` lives for the lifetime of one `Document`, mirroring the
/// orchestrator's `canceled_balancing` flag: a progress-check failure
/// mid-pass leaves the in-progress rebuild sitting in `frames`, and the
/// next `parse` call resumes it instead of starting over.
///
/// Grounded on `ts_parser__balance_subtree`, which walks an explicit
/// stack of subtrees and mutates each uniquely-owned node's children in
/// place through a raw-pointer "unsafe mutable view" that skips the
/// usual retain/release bookkeeping. `Subtree` has no such escape hatch
/// (and adding one would mean trusting an aliasing invariant the type
/// doesn't otherwise need), so this rebuilds nodes bottom-up instead:
/// `Subtree::try_take_children` takes ownership of a node only when it's
/// the sole handle, and `Subtree::from_data_and_children` reassembles it
/// once its children are done. The repeat-depth check a node runs only
/// reads its own children's `repeat_depth`, which an already-processed
/// descendant never changes, so bottom-up order produces the identical
/// result as the original's top-down walk.
///
/// The `compress` step itself is also a simplification: tree-sitter's
/// real `ts_subtree_compress` (in `subtree.c`, not present in this
/// codebase's reference material) rotates the repeat chain's internal
/// structure directly. This instead groups the excess tail children
/// under a new wrapper node carrying the parent's own symbol and
/// production, which narrows the same depth gap at a coarser grain.
pub struct Balancer {
    frames: Vec<Frame>,
    canceled: bool,
    total_bytes: usize,
    has_error: bool,
}

impl Balancer {
    pub fn new() -> Self {
        Balancer {
            frames: Vec::new(),
            canceled: false,
            total_bytes: 0,
            has_error: false,
        }
    }

    /// Whether the previous call stopped mid-pass and this one will
    /// resume it rather than start balancing `finished_tree` afresh.
    pub fn is_resuming(&self) -> bool {
        self.canceled
    }

    /// Balance `finished_tree` in place. Returns `true` once the whole
    /// tree has been visited; `false` means a progress check failed and
    /// `finished_tree` was left untouched (the in-progress rebuild lives
    /// in `self` for the next call to pick up).
    pub fn balance<P: Clone>(
        &mut self,
        finished_tree: &mut Subtree,
        pool: &SubtreePool,
        options: &mut ParseOptions<P>,
        progress: &mut Progress,
    ) -> bool {
        if !self.canceled {
            self.frames.clear();
            if finished_tree.child_count() > 0 && finished_tree.ref_count() == 1 {
                self.total_bytes = finished_tree.total_bytes();
                self.has_error = finished_tree.error_cost() > 0;
                let placeholder = pool.leaf(finished_tree.symbol(), finished_tree.parse_state().unwrap_or_default(), 0, 0, 0, false);
                let root = std::mem::replace(finished_tree, placeholder);
                push_frame(&mut self.frames, root);
            } else {
                return true;
            }
        }
        self.canceled = false;

        loop {
            let has_more_children = !self.frames.last().unwrap().remaining.is_empty();

            if has_more_children {
                let child = self.frames.last_mut().unwrap().remaining.pop().unwrap();
                if !child.is_leaf() && child.ref_count() == 1 {
                    push_frame(&mut self.frames, child);
                } else {
                    self.frames.last_mut().unwrap().built.push(child);
                }
                continue;
            }

            if !progress.check(options, self.total_bytes, self.has_error, 1) {
                self.canceled = true;
                return false;
            }

            let mut frame = self.frames.pop().unwrap();
            if !compress(&mut frame, pool, options, progress, self.total_bytes, self.has_error) {
                self.frames.push(frame);
                self.canceled = true;
                return false;
            }

            let rebuilt = Subtree::from_data_and_children(frame.data, frame.built);
            match self.frames.last_mut() {
                Some(parent) => parent.built.push(rebuilt),
                None => {
                    *finished_tree = rebuilt;
                    return true;
                }
            }
        }
    }
}

impl Default for Balancer {
    fn default() -> Self {
        Balancer::new()
    }
}

fn push_frame(frames: &mut Vec<Frame>, tree: Subtree) {
    match tree.try_take_children() {
        Ok((data, mut children)) => {
            children.reverse();
            frames.push(Frame {
                data,
                remaining: children,
                built: Vec::new(),
            });
        }
        Err(_) => unreachable!("caller checked ref_count() == 1 before calling push_frame"),
    }
}

/// Narrow the gap between the first and last child's `repeat_depth` by
/// wrapping shrinking tail slices into new nodes, halving the increment
/// each round (same progression as the original's `for (i = n/2; i > 0;
/// i /= 2)`). Returns `false` if a progress check fails partway through,
/// leaving `frame.built` partially compressed for the next call.
fn compress<P: Clone>(
    frame: &mut Frame,
    pool: &SubtreePool,
    options: &mut ParseOptions<P>,
    progress: &mut Progress,
    total_bytes: usize,
    has_error: bool,
) -> bool {
    if frame.data.repeat_depth == 0 || frame.built.len() < 2 {
        return true;
    }

    let first_depth = frame.built.first().unwrap().repeat_depth();
    let last_depth = frame.built.last().unwrap().repeat_depth();
    if first_depth <= last_depth {
        return true;
    }

    let mut remaining = first_depth - last_depth;
    let mut increment = remaining / 2;
    while increment > 0 {
        compress_once(frame, increment, pool);
        remaining -= increment;
        let ops = (increment >> 4).max(1);
        if !progress.check(options, total_bytes, has_error, ops) {
            return false;
        }
        increment /= 2;
    }
    true
}

fn compress_once(frame: &mut Frame, increment: u32, pool: &SubtreePool) {
    let n = frame.built.len();
    let take = (increment as usize).min(n - 1).max(1);
    let split_at = n - take;
    let tail = frame.built.split_off(split_at);
    let wrapped = pool.node(frame.data.symbol, None, frame.data.production_id, 0, tail);
    frame.built.push(wrapped);
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::{ProductionId, StateId, Symbol};

    fn leaf_with_depth(pool: &SubtreePool, depth: u32) -> Subtree {
        let mut leaf = pool.leaf(Symbol::new(1), StateId::new(0), 0, 1, 0, false);
        leaf.make_mut().repeat_depth = depth;
        leaf
    }

    fn repeat_node(pool: &SubtreePool, children: Vec<Subtree>, depth: u32) -> Subtree {
        let mut node = pool.node(Symbol::new(2), Some(StateId::new(1)), ProductionId::new(0), 0, children);
        node.make_mut().repeat_depth = depth;
        node
    }

    #[test]
    fn a_tree_with_no_children_is_left_alone() {
        let pool = SubtreePool::new();
        let mut options: ParseOptions<()> = ParseOptions::default();
        let mut progress = Progress::new(&options);
        let mut balancer = Balancer::new();

        let mut tree = pool.leaf(Symbol::new(1), StateId::new(0), 0, 1, 0, false);
        let before = tree.ref_count();
        assert!(balancer.balance(&mut tree, &pool, &mut options, &mut progress));
        assert_eq!(tree.ref_count(), before);
    }

    #[test]
    fn a_shared_tree_is_not_mutated() {
        let pool = SubtreePool::new();
        let mut options: ParseOptions<()> = ParseOptions::default();
        let mut progress = Progress::new(&options);
        let mut balancer = Balancer::new();

        let children = vec![leaf_with_depth(&pool, 4), leaf_with_depth(&pool, 0)];
        let mut tree = repeat_node(&pool, children, 4);
        let _kept_alive = tree.clone();

        assert!(balancer.balance(&mut tree, &pool, &mut options, &mut progress));
        assert_eq!(tree.child_count(), 2);
    }

    #[test]
    fn an_unbalanced_repeat_node_is_regrouped() {
        let pool = SubtreePool::new();
        let mut options: ParseOptions<()> = ParseOptions::default();
        let mut progress = Progress::new(&options);
        let mut balancer = Balancer::new();

        let children: Vec<Subtree> = (0..8).map(|i| leaf_with_depth(&pool, if i == 0 { 8 } else { 0 })).collect();
        let mut tree = repeat_node(&pool, children, 8);

        assert!(balancer.balance(&mut tree, &pool, &mut options, &mut progress));
        assert!(tree.child_count() < 8, "the tail should have been grouped under a wrapper node");
    }

    #[test]
    fn a_failed_progress_check_is_resumable() {
        let pool = SubtreePool::new();
        let mut options: ParseOptions<()> = ParseOptions {
            op_count_per_timeout_check: 1,
            progress_callback: Some(Box::new(|_state| true)),
            ..ParseOptions::default()
        };
        let mut progress = Progress::new(&options);
        let mut balancer = Balancer::new();

        let inner_children = vec![leaf_with_depth(&pool, 4), leaf_with_depth(&pool, 0)];
        let inner = repeat_node(&pool, inner_children, 4);
        let mut tree = repeat_node(&pool, vec![inner], 1);

        assert!(!balancer.balance(&mut tree, &pool, &mut options, &mut progress));
        assert!(balancer.is_resuming());

        options.progress_callback = None;
        assert!(balancer.balance(&mut tree, &pool, &mut options, &mut progress));
        assert!(!balancer.is_resuming());
    }
}
