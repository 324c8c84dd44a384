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

use std::rc::Rc;

use glr_grammar::{ProductionId, StateId, Symbol};

use crate::flags::SubtreeFlags;

#[derive(Debug, Clone)]
pub enum Kind {
    Leaf,
    Node(Vec<Subtree>),
}

/// The persistent, immutable-while-shared payload behind a `Subtree`
/// handle. See spec §3 for the field-by-field contract.
#[derive(Debug, Clone)]
pub struct SubtreeData {
    pub symbol: Symbol,
    /// `None` encodes spec §4.6's "`parse_state = NONE`" for fragile
    /// nodes whose parse state cannot be trusted for reuse.
    pub parse_state: Option<StateId>,
    pub padding: usize,
    pub size: usize,
    pub lookahead_bytes: usize,
    pub flags: SubtreeFlags,
    pub dynamic_precedence: i32,
    pub production_id: ProductionId,
    pub repeat_depth: u32,
    pub own_error_cost: u32,
    /// Serialized external-scanner state (spec §4.2/§6), set only on a
    /// leaf the external scanner produced. Reduced nodes and ordinary
    /// lexer leaves leave this `None`; the GSS frame propagates whichever
    /// leaf set it most recently as `last_external_token`.
    pub external_scanner_state: Option<Vec<u8>>,
    pub kind: Kind,
}

/// A reference-counted handle to a `SubtreeData`. Cloning a `Subtree` is
/// the spec's "retain"; dropping the last clone is "release" — both are
/// ordinary `Rc` semantics, so the "every retain pairs with a release"
/// invariant (spec §8) holds by construction.
#[derive(Debug, Clone)]
pub struct Subtree(Rc<SubtreeData>);

impl Subtree {
    pub fn new(data: SubtreeData) -> Self {
        Subtree(Rc::new(data))
    }

    pub fn symbol(&self) -> Symbol {
        self.0.symbol
    }

    pub fn parse_state(&self) -> Option<StateId> {
        self.0.parse_state
    }

    pub fn padding(&self) -> usize {
        self.0.padding
    }

    pub fn size(&self) -> usize {
        self.0.size
    }

    /// Total byte span, `padding + size` (spec §3 invariant).
    pub fn total_bytes(&self) -> usize {
        self.0.padding + self.0.size
    }

    pub fn lookahead_bytes(&self) -> usize {
        self.0.lookahead_bytes
    }

    pub fn flags(&self) -> SubtreeFlags {
        self.0.flags
    }

    pub fn dynamic_precedence(&self) -> i32 {
        self.0.dynamic_precedence
    }

    pub fn production_id(&self) -> ProductionId {
        self.0.production_id
    }

    pub fn repeat_depth(&self) -> u32 {
        self.0.repeat_depth
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.0.kind, Kind::Leaf)
    }

    pub fn children(&self) -> &[Subtree] {
        match &self.0.kind {
            Kind::Leaf => &[],
            Kind::Node(children) => children,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn external_scanner_state(&self) -> Option<&[u8]> {
        self.0.external_scanner_state.as_deref()
    }

    /// Sum of child error costs plus this node's own penalty (spec §3).
    pub fn error_cost(&self) -> u32 {
        let own = self.0.own_error_cost;
        let children: u32 = self.children().iter().map(Subtree::error_cost).sum();
        own.saturating_add(children)
    }

    pub fn node_count(&self) -> u32 {
        1 + self.children().iter().map(Subtree::node_count).sum::<u32>()
    }

    /// Two handles refer to the exact same allocation (identity, not
    /// structural equality) — what spec §8's instrumented-pool reuse
    /// tests observe.
    pub fn ptr_eq(a: &Subtree, b: &Subtree) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// A mutable view, available only when uniquely owned; otherwise
    /// clones the payload first (spec §9's guarded `make_mut`).
    pub fn make_mut(&mut self) -> &mut SubtreeData {
        Rc::make_mut(&mut self.0)
    }

    pub fn data(&self) -> &SubtreeData {
        &self.0
    }

    /// Return a copy of this leaf/node with `extra` flipped to `extra`.
    /// Used by the shift engine (spec §4.8) when a subtree's `extra` tag
    /// disagrees with how it's about to be pushed.
    pub fn with_extra(&self, extra: bool) -> Subtree {
        let mut copy = self.clone();
        copy.make_mut().flags.extra = extra;
        copy
    }

    /// Consume a uniquely-owned node, handing back its data and children
    /// for the caller to rearrange. Returns `Err(self)` unchanged if
    /// another handle to the same allocation is still alive — the
    /// `Rc`-based equivalent of spec §9's "guarded `make_mut`", used
    /// where the caller needs to take the children out entirely (the
    /// balance pass, spec §4.16) rather than mutate them in place.
    pub fn try_take_children(self) -> Result<(SubtreeData, Vec<Subtree>), Subtree> {
        match Rc::try_unwrap(self.0) {
            Ok(mut data) => {
                let children = match std::mem::replace(&mut data.kind, Kind::Leaf) {
                    Kind::Node(children) => children,
                    Kind::Leaf => Vec::new(),
                };
                Ok((data, children))
            }
            Err(rc) => Err(Subtree(rc)),
        }
    }

    /// The inverse of `try_take_children`: rebuild a node from its data
    /// (with whatever `kind` it last had discarded) and a children list.
    pub fn from_data_and_children(mut data: SubtreeData, children: Vec<Subtree>) -> Subtree {
        data.kind = Kind::Node(children);
        Subtree::new(data)
    }
}

impl PartialEq for Subtree {
    fn eq(&self, other: &Subtree) -> bool {
        Subtree::ptr_eq(self, other) || structural_eq(self, other)
    }
}

fn structural_eq(a: &Subtree, b: &Subtree) -> bool {
    a.symbol() == b.symbol()
        && a.padding() == b.padding()
        && a.size() == b.size()
        && a.child_count() == b.child_count()
        && a.children().iter().zip(b.children()).all(|(x, y)| x == y)
}
