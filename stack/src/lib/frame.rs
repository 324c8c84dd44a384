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
use glr_tree::Subtree;

/// One link in a version's `Cactus` chain: the state reached after
/// `subtree` was pushed, plus the bookkeeping the advance loop (spec
/// §4.13) needs at every step. The root frame of every version has
/// `subtree = None`.
///
/// `point` is tracked here rather than on `Subtree` itself: a reduce
/// repackages already-consumed bytes without lexing anything new, so the
/// document position doesn't move — only a shift (which shows up as a
/// push carrying a freshly lexed token) advances it. Whoever pushes is
/// responsible for passing the right `point` (see `glr-core`'s shift and
/// reduce engines).
#[derive(Clone)]
pub struct Frame {
    pub state: StateId,
    pub subtree: Option<Subtree>,
    pub position: usize,
    pub point: Point,
    pub last_external_token: Option<Subtree>,
    /// Set when the pushed subtree still has children that could be
    /// broken down (spec §4.9's `pop_pending`/`breakdown_top_of_stack`).
    pub pending: bool,
}

impl Frame {
    pub fn root(state: StateId) -> Self {
        Frame {
            state,
            subtree: None,
            position: 0,
            point: Point::ZERO,
            last_external_token: None,
            pending: false,
        }
    }
}
