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

/// A recorded prior stack shape a version can recover back to (spec
/// §4.11's "recover-to-prior-state via a recorded summary" strategy).
/// Bounded to `MAX_SUMMARY_DEPTH` entries by whoever calls
/// `Gss::record_summary` (the core driver); this crate just stores what
/// it's given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub entries: Vec<SummaryEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryEntry {
    pub state: StateId,
    pub depth: u32,
    /// Byte position and document point this state was recorded at, so
    /// the recovery cost model (spec §4.11) can charge for how far back
    /// (in bytes and lines) a candidate recovery state sits.
    pub position: usize,
    pub point: Point,
}

impl Summary {
    pub fn new() -> Self {
        Summary { entries: Vec::new() }
    }

    pub fn push(&mut self, state: StateId, depth: u32, position: usize, point: Point, max_depth: usize) {
        self.entries.push(SummaryEntry { state, depth, position, point });
        if self.entries.len() > max_depth {
            self.entries.remove(0);
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Summary::new()
    }
}
