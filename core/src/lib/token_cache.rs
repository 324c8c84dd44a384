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

use glr_lex::Point;
use glr_tree::Subtree;

/// Spec §3/§4.1: a single memoized lookahead, keyed on the byte position
/// it was lexed at and the external-scanner state in effect then. Since
/// most versions share a position after a shift, this saves re-lexing
/// for every live version.
#[derive(Default)]
pub struct TokenCache {
    slot: Option<(usize, Option<Subtree>, Subtree, Point)>,
}

impl TokenCache {
    pub fn new() -> Self {
        TokenCache::default()
    }

    /// Returns the cached token (and the point just past it) iff it was
    /// lexed at exactly `position` with the same external-scanner state.
    /// The caller still must run it through the reuse gate (§4.4) before
    /// trusting it at a given parse state.
    pub fn get(&self, position: usize, last_external_token: Option<&Subtree>) -> Option<(Subtree, Point)> {
        let (byte_index, cached_external, token, end_point) = self.slot.as_ref()?;
        if *byte_index != position {
            return None;
        }
        let external_matches = match (cached_external, last_external_token) {
            (None, None) => true,
            (Some(a), Some(b)) => Subtree::ptr_eq(a, b),
            _ => false,
        };
        if external_matches {
            Some((token.clone(), *end_point))
        } else {
            None
        }
    }

    pub fn set(&mut self, byte_index: usize, last_external_token: Option<Subtree>, token: Subtree, end_point: Point) {
        trace!("token cache: caching token at byte {}", byte_index);
        self.slot = Some((byte_index, last_external_token, token, end_point));
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::{StateId, Symbol};
    use glr_tree::SubtreePool;

    #[test]
    fn hits_only_at_same_position_and_external_state() {
        let pool = SubtreePool::new();
        let mut cache = TokenCache::new();
        let tok = pool.leaf(Symbol::new(1), StateId::new(0), 0, 1, 0, false);
        cache.set(5, None, tok.clone(), Point::new(0, 6));

        let (hit, end_point) = cache.get(5, None).unwrap();
        assert!(Subtree::ptr_eq(&hit, &tok));
        assert_eq!(end_point, Point::new(0, 6));
        assert!(cache.get(6, None).is_none());

        let external = pool.leaf(Symbol::new(2), StateId::new(0), 0, 1, 0, false);
        assert!(cache.get(5, Some(&external)).is_none());
    }
}
