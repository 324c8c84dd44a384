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

//! `glr_grammar` holds the compiled-grammar side of the parsing engine: the
//! read-only artifact a grammar compiler hands to the GLR driver.
//!
//! A grammar is a state machine (`next_state`), a table of actions per
//! `(state, symbol)` pair, a lex-mode table, and a handful of named
//! "builtin" symbols (end-of-input, error, error-repeat, keyword-capture).
//! None of this crate's types know how to *produce* a grammar from source;
//! they only describe the shape that `glr_core`'s driver consumes. A small
//! `toy` module is provided for building hand-rolled grammars in tests.
//!
//! Unlike `cfgrammar`, which distinguishes `Symbol::Rule`/`Symbol::Token`,
//! the artifact this crate describes uses a single flat symbol space (every
//! terminal and nonterminal is just a `Symbol`), matching the grammars a
//! real GLR table generator emits.

extern crate indexmap;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

mod idxnewtype;
mod action;
mod table;
pub mod error;
pub mod toy;

pub use action::{LexMode, ParseAction, TableEntry, ERROR_STATE, SENTINEL_NONE};
pub use error::GrammarError;
pub use idxnewtype::{ProductionId, StateId, Symbol};
pub use table::ParseTable;
