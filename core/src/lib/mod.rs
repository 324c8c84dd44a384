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

//! `glr_core` drives a generalized-LR parse over a compiled `ParseTable`:
//! a graph-structured stack of candidate derivations (`glr_stack::Gss`)
//! is advanced one lexed token at a time, splitting on ambiguity and
//! merging (or discarding) versions as their derivations reconverge or
//! fall behind on cost, until exactly one version accepts or every live
//! version is judged worse than a tree already in hand. The engine is
//! error-tolerant (missing-token insertion and cost-ranked recovery,
//! `recovery.rs`) and incremental (subtree reuse from a previous parse
//! guided by a document-order cursor, `cursor.rs`/`reuse_node.rs`).
//!
//! [`Parser::parse`] is the entry point; everything else in this crate
//! is a collaborator it drives.

#[macro_use]
extern crate log;

mod advance;
mod balance;
mod breakdown;
mod comparator;
mod condense;
mod cursor;
mod dotgraph;
mod error;
mod lex_driver;
mod options;
mod parser;
mod potential_reductions;
mod progress;
mod ranges;
mod recovery;
mod reduce;
mod reuse_gate;
mod reuse_node;
mod shift;
mod token_cache;

pub use dotgraph::DotGraphLog;
pub use error::ParserError;
pub use options::{ParseOptions, ProgressState};
pub use parser::{Parser, Tree};
pub use ranges::IncludedRange;
pub use recovery::RecoveryCosts;
