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

use crate::idxnewtype::{ProductionId, StateId, Symbol};

/// State 0 is reserved: a version sitting in `ERROR_STATE` is mid-recovery.
pub const ERROR_STATE: StateId = StateId::new_const(0);

/// `lex_mode_for_state` returns this `lex_state` to mean "this state ends a
/// non-terminal-extra rule; the lex driver must not be entered again."
pub const SENTINEL_NONE: u16 = 0xFFFF;

/// One action the table associates with a `(state, lookahead symbol)` pair.
/// A single pair may have more than one action when the grammar is
/// ambiguous (shift/reduce or reduce/reduce conflicts), which is exactly
/// what drives GSS version splitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParseAction {
    Shift {
        state: StateId,
        extra: bool,
        repetition: bool,
    },
    Reduce {
        symbol: Symbol,
        child_count: u32,
        dynamic_precedence: i32,
        production_id: ProductionId,
    },
    Accept,
    Recover,
}

/// The lex mode a state requires: which internal DFA state to start in, and
/// which external-scanner state (if any) is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LexMode {
    pub lex_state: u16,
    pub external_lex_state: u16,
}

impl LexMode {
    pub fn is_end_of_non_terminal_extra(&self) -> bool {
        self.lex_state == SENTINEL_NONE
    }
}

/// A `(state, symbol)` table lookup bundled with whether a leaf built in
/// the old state is reusable verbatim (see the reuse gate, §4.4).
#[derive(Clone, Debug, Default)]
pub struct TableEntry {
    pub actions: Vec<ParseAction>,
    pub is_reusable: bool,
}

impl TableEntry {
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}
