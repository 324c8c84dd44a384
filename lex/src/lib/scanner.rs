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

use glr_grammar::Symbol;

use crate::input::ScannerInput;
use crate::point::Point;

/// What a successful lex attempt produces: a recognized symbol plus the
/// span `ScannerInput` marked out. `lookahead_bytes` is `end_byte -
/// mark_end_byte` worth of extra bytes the lexer had to peek past the
/// recognized token to decide (spec §3's `lookahead_bytes`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LexedToken {
    pub symbol: Symbol,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_point: Point,
    pub end_point: Point,
    pub lookahead_bytes: usize,
}

/// The internal (compiled-from-grammar) DFA lexer. Out of scope for this
/// repository to *generate* (spec §1); `glr_core` only ever calls it
/// through this trait.
pub trait MainLexer {
    /// Attempt to recognize a token starting at the input's current reset
    /// position, in DFA state `lex_state`. On success, the implementation
    /// must have called `input.mark_end()` at the recognized token's end
    /// before returning.
    fn lex(&self, input: &mut dyn ScannerInput, lex_state: u16) -> Option<Symbol>;
}

/// The keyword/identifier disambiguation lexer (spec §4.2's keyword
/// capture): re-lexes the same bytes as a plain word and returns the
/// keyword symbol it matches, if any.
pub trait KeywordLexer {
    fn lex_keyword(&self, input: &mut dyn ScannerInput) -> Option<Symbol>;
}

/// The external-scanner ABI (spec §6). `create`/`destroy` are modeled as
/// ordinary Rust construction/`Drop`; what's left is `scan` plus the
/// state (de)serialization the GSS needs to carry one scanner-state blob
/// per stack version.
pub trait ExternalScanner {
    /// Attempt to scan one token. `enabled` restricts which symbols may be
    /// returned (`ParseTable::external_scanner_enabled_tokens`). On
    /// success, `input.mark_end()` must already have been called.
    fn scan(&mut self, input: &mut dyn ScannerInput, enabled: &[Symbol]) -> Option<Symbol>;

    /// Serialize this scanner's persistent state (e.g. an indentation
    /// stack) into a byte blob stored on the GSS version's
    /// `last_external_token`.
    fn serialize(&self) -> Vec<u8>;

    /// Restore state previously produced by `serialize`. Called before
    /// every `scan` attempt with the state saved by whichever token is
    /// currently `last_external_token` for the version being advanced.
    fn deserialize(&mut self, state: &[u8]);
}
