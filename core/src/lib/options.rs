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

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Snapshot handed to the user's progress callback (spec §6): enough to
/// decide whether to cancel without exposing internal parser state.
#[derive(Clone, Debug)]
pub struct ProgressState<P> {
    pub current_byte_offset: usize,
    pub has_error: bool,
    pub payload: P,
}

/// Tunables spec §5 calls "fixed" constants. SPEC_FULL turns them into
/// overridable fields (defaulting to the spec's own values) so tests can
/// shrink `max_version_count` without recompiling the crate.
#[derive(Clone, Debug)]
pub struct ParseOptions<P = ()> {
    pub max_version_count: usize,
    pub version_count_overflow: usize,
    pub max_summary_depth: usize,
    pub max_cost_difference: u32,
    pub error_cost_per_skipped_tree: u32,
    pub error_cost_per_skipped_char: u32,
    pub error_cost_per_skipped_line: u32,
    pub op_count_per_timeout_check: u32,
    pub timeout: Option<Duration>,
    /// Checked alongside `timeout` and the progress callback (spec §4.14).
    /// Lets a parse running on one thread be cancelled from another —
    /// `parser.c`'s `cancellation_flag`.
    pub cancellation_flag: Option<Arc<AtomicBool>>,
    /// `true` = halt the first version that would enter `ERROR_STATE`
    /// instead of running recovery (supplemented feature, grounded on
    /// `parser.c`'s `halt_on_error`).
    pub halt_on_error: bool,
    pub payload: P,
    /// Returning `true` cancels the parse, matching `parser.c`'s
    /// "`progress_callback` returns `true`" convention (the name reads
    /// oddly for a cancellation test, but it's what the original does).
    pub progress_callback: Option<Box<dyn FnMut(&ProgressState<P>) -> bool>>,
}

impl<P: Default> Default for ParseOptions<P> {
    fn default() -> Self {
        ParseOptions {
            max_version_count: 6,
            version_count_overflow: 4,
            max_summary_depth: 16,
            max_cost_difference: 128,
            error_cost_per_skipped_tree: 3,
            error_cost_per_skipped_char: 1,
            error_cost_per_skipped_line: 5,
            op_count_per_timeout_check: 100,
            timeout: None,
            cancellation_flag: None,
            halt_on_error: false,
            payload: P::default(),
            progress_callback: None,
        }
    }
}
