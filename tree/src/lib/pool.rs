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

use std::cell::Cell;

use glr_grammar::{ProductionId, StateId, Symbol};

use crate::flags::SubtreeFlags;
use crate::subtree::{Kind, Subtree, SubtreeData};

/// Error cost charged for each kind of synthesized error node (spec §4's
/// error-recovery cost model). Kept here, next to the constructors that
/// apply them, rather than buried in `glr-core`.
const MISSING_TOKEN_COST: u32 = 3;
const SKIPPED_TOKEN_COST: u32 = 1;

/// A thin facade over `Subtree` construction, named the way spec §1's
/// vocabulary (`leaf`, `node`, `missing_leaf`, `error_leaf`) expects. It
/// also counts allocations, so a test can assert that a reparse reused N
/// nodes rather than allocating fresh ones (spec §8's reuse-identity
/// property) without threading an allocation counter through `glr-core`.
#[derive(Default)]
pub struct SubtreePool {
    allocated: Cell<u64>,
}

impl SubtreePool {
    pub fn new() -> Self {
        SubtreePool::default()
    }

    /// Total subtrees this pool has constructed (`leaf`/`node`/
    /// `error_leaf`/`missing_leaf` calls), ignoring reuse via `clone`.
    pub fn allocated(&self) -> u64 {
        self.allocated.get()
    }

    fn bump(&self) {
        self.allocated.set(self.allocated.get() + 1);
    }

    /// A scanned token: no children, ordinary (non-error) leaf.
    pub fn leaf(
        &self,
        symbol: Symbol,
        parse_state: StateId,
        padding: usize,
        size: usize,
        lookahead_bytes: usize,
        is_keyword: bool,
    ) -> Subtree {
        self.bump();
        Subtree::new(SubtreeData {
            symbol,
            parse_state: Some(parse_state),
            padding,
            size,
            lookahead_bytes,
            flags: SubtreeFlags {
                is_keyword,
                ..SubtreeFlags::default()
            },
            dynamic_precedence: 0,
            production_id: ProductionId::new(0),
            repeat_depth: 0,
            own_error_cost: 0,
            external_scanner_state: None,
            kind: Kind::Leaf,
        })
    }

    /// A token the external scanner produced (spec §4.2/§6), carrying the
    /// scanner's serialized state so the GSS frame can restore it before
    /// the next `scan` attempt on this version.
    #[allow(clippy::too_many_arguments)]
    pub fn scanner_leaf(
        &self,
        symbol: Symbol,
        parse_state: StateId,
        padding: usize,
        size: usize,
        lookahead_bytes: usize,
        scanner_state: Vec<u8>,
        state_changed: bool,
    ) -> Subtree {
        self.bump();
        Subtree::new(SubtreeData {
            symbol,
            parse_state: Some(parse_state),
            padding,
            size,
            lookahead_bytes,
            flags: SubtreeFlags {
                has_external_scanner_state_change: state_changed,
                ..SubtreeFlags::default()
            },
            dynamic_precedence: 0,
            production_id: ProductionId::new(0),
            repeat_depth: 0,
            own_error_cost: 0,
            external_scanner_state: Some(scanner_state),
            kind: Kind::Leaf,
        })
    }

    /// A reduced non-terminal built from `children` (spec §4.4's reduce
    /// engine). `parse_state` is `None` when any child is fragile, per
    /// spec §4.6.
    pub fn node(
        &self,
        symbol: Symbol,
        parse_state: Option<StateId>,
        production_id: ProductionId,
        dynamic_precedence: i32,
        children: Vec<Subtree>,
    ) -> Subtree {
        self.bump();
        let padding = children.first().map(Subtree::padding).unwrap_or(0);
        let size: usize = children
            .iter()
            .enumerate()
            .map(|(i, c)| c.size() + if i == 0 { 0 } else { c.padding() })
            .sum();
        let lookahead_bytes = children.last().map(Subtree::lookahead_bytes).unwrap_or(0);
        let has_changes = children.iter().any(|c| c.flags().has_changes);
        let fragile_left = children.first().map(|c| c.flags().is_fragile()).unwrap_or(false);
        let fragile_right = children.last().map(|c| c.flags().is_fragile()).unwrap_or(false);
        Subtree::new(SubtreeData {
            symbol,
            parse_state,
            padding,
            size,
            lookahead_bytes,
            flags: SubtreeFlags {
                has_changes,
                fragile_left,
                fragile_right,
                ..SubtreeFlags::default()
            },
            dynamic_precedence,
            production_id,
            repeat_depth: 0,
            own_error_cost: 0,
            external_scanner_state: None,
            kind: Kind::Node(children),
        })
    }

    /// A token the lexer could not find at all: zero width, `error` flag
    /// set, charged `SKIPPED_TOKEN_COST` (spec §4's skip-a-character
    /// recovery strategy).
    pub fn error_leaf(&self, padding: usize, start_byte: usize, lookahead_bytes: usize) -> Subtree {
        self.bump();
        Subtree::new(SubtreeData {
            symbol: Symbol::new(0),
            parse_state: None,
            padding,
            size: 0,
            lookahead_bytes,
            flags: SubtreeFlags {
                error: true,
                ..SubtreeFlags::default()
            },
            dynamic_precedence: 0,
            production_id: ProductionId::new(0),
            repeat_depth: 0,
            own_error_cost: SKIPPED_TOKEN_COST,
            external_scanner_state: None,
            kind: Kind::Leaf,
        })
    }

    /// A zero-width token synthesized by the missing-token inserter (spec
    /// §4's strategy for a state that expects a token the input doesn't
    /// contain), charged `MISSING_TOKEN_COST`.
    pub fn missing_leaf(&self, symbol: Symbol, parse_state: StateId, padding: usize) -> Subtree {
        self.bump();
        Subtree::new(SubtreeData {
            symbol,
            parse_state: Some(parse_state),
            padding,
            size: 0,
            lookahead_bytes: 0,
            flags: SubtreeFlags {
                missing: true,
                ..SubtreeFlags::default()
            },
            dynamic_precedence: 0,
            production_id: ProductionId::new(0),
            repeat_depth: 0,
            own_error_cost: MISSING_TOKEN_COST,
            external_scanner_state: None,
            kind: Kind::Leaf,
        })
    }

    pub fn retain(&self, subtree: &Subtree) -> Subtree {
        subtree.clone()
    }

    pub fn ref_count(&self, subtree: &Subtree) -> usize {
        subtree.ref_count()
    }

    pub fn ptr_eq(&self, a: &Subtree, b: &Subtree) -> bool {
        Subtree::ptr_eq(a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn leaf_and_node_track_allocation_count() {
        let pool = SubtreePool::new();
        let a = pool.leaf(Symbol::new(1), StateId::new(0), 0, 1, 0, false);
        let b = pool.leaf(Symbol::new(2), StateId::new(0), 1, 1, 0, false);
        let n = pool.node(Symbol::new(3), Some(StateId::new(1)), ProductionId::new(0), 0, vec![a, b]);
        assert_eq!(pool.allocated(), 3);
        assert_eq!(n.size(), 2);
        assert_eq!(n.padding(), 0);
    }

    #[test]
    fn retain_shares_identity() {
        let pool = SubtreePool::new();
        let a = pool.leaf(Symbol::new(1), StateId::new(0), 0, 1, 0, false);
        let b = pool.retain(&a);
        assert!(pool.ptr_eq(&a, &b));
        assert_eq!(pool.ref_count(&a), 2);
    }

    #[test]
    fn missing_leaf_is_zero_width_and_flagged() {
        let pool = SubtreePool::new();
        let m = pool.missing_leaf(Symbol::new(7), StateId::new(2), 4);
        assert_eq!(m.size(), 0);
        assert!(m.flags().missing);
        assert_eq!(m.error_cost(), MISSING_TOKEN_COST);
    }
}
