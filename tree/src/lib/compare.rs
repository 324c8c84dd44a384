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

use std::cmp::Ordering;

use crate::subtree::Subtree;

/// Lexicographic tie-break between two subtrees that cover the same byte
/// span: compare error cost, then dynamic precedence, then symbol, then
/// child count, then recurse pairwise over children. Used once the
/// version comparator (spec §4.5) runs out of cheaper signals and by the
/// alternative-children selection in spec §4.7.
///
/// `Ordering::Less` means `a` is preferred over `b`.
pub fn structural_cmp(a: &Subtree, b: &Subtree) -> Ordering {
    a.error_cost()
        .cmp(&b.error_cost())
        .then_with(|| b.dynamic_precedence().cmp(&a.dynamic_precedence()))
        .then_with(|| a.symbol().cmp(&b.symbol()))
        .then_with(|| a.child_count().cmp(&b.child_count()))
        .then_with(|| {
            a.children()
                .iter()
                .zip(b.children())
                .map(|(x, y)| structural_cmp(x, y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::flags::SubtreeFlags;
    use crate::subtree::{Kind, SubtreeData};
    use glr_grammar::{ProductionId, Symbol};

    fn leaf(symbol: u32, own_error_cost: u32) -> Subtree {
        Subtree::new(SubtreeData {
            symbol: Symbol::new(symbol),
            parse_state: None,
            padding: 0,
            size: 1,
            lookahead_bytes: 0,
            flags: SubtreeFlags::default(),
            dynamic_precedence: 0,
            production_id: ProductionId::new(0),
            repeat_depth: 0,
            own_error_cost,
            external_scanner_state: None,
            kind: Kind::Leaf,
        })
    }

    #[test]
    fn lower_error_cost_wins() {
        let cheap = leaf(1, 0);
        let costly = leaf(1, 10);
        assert_eq!(structural_cmp(&cheap, &costly), Ordering::Less);
    }

    #[test]
    fn higher_dynamic_precedence_wins_on_tie() {
        let mut hi = leaf(1, 0);
        hi.make_mut().dynamic_precedence = 5;
        let lo = leaf(1, 0);
        assert_eq!(structural_cmp(&hi, &lo), Ordering::Less);
    }

    #[test]
    fn equal_trees_compare_equal() {
        let x = leaf(3, 0);
        let y = leaf(3, 0);
        assert_eq!(structural_cmp(&x, &y), Ordering::Equal);
    }
}
