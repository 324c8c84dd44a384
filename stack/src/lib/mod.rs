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

//! `glr_stack` is the graph-structured parse stack (GSS) primitive spec
//! §1 calls out as an external collaborator: "push, pop, pop-pending,
//! pop-all, merge, halt, renumber, summary — consumed as an ADT."
//!
//! Each version's path is a `Cactus<Frame>` (the same persistent-stack
//! crate the teacher's own recovery search uses for its `pstack`):
//! pushing a frame is `.child(frame)`, popping is `.parent()`, and two
//! versions that share a suffix share the same `Cactus` nodes for free.
//! Where a full GSS allows a single node to have *several* predecessors
//! (a true merge point), this implementation keeps one path per version
//! and merges at the version level instead — `merge(a, b)` discards one
//! version's path outright once both reach the same state/position, on
//! the grounds that a `Cactus` path is immutable and cheap to fork, so
//! genuine ambiguity (two competing derivations of one nonterminal) is
//! resolved *before* it ever reaches `merge`: `glr-core`'s reduce-reduce
//! handling (see `advance.rs`) forks a version per conflicting reduce
//! with `copy_version`, lets each build its own candidate parent, and
//! runs the spec's §4.7 comparison across them, discarding the losers.
//! `pop_count` still returns a `Vec<Slice>` to match the richer API
//! shape a node with several predecessors would need; it is always
//! length 1 here, since that forking happens a layer up instead. See
//! `DESIGN.md` for the rationale.

extern crate cactus;
#[macro_use]
extern crate log;

mod error_status;
mod frame;
mod gss;
mod summary;

pub use error_status::ErrorStatus;
pub use frame::Frame;
pub use gss::{Gss, Slice, VersionId};
pub use summary::Summary;
