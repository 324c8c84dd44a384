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

use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::options::{ParseOptions, ProgressState};

/// Spec §4.14: batches cancellation/timeout/callback checks so they run
/// once every `op_count_per_timeout_check` parse actions instead of on
/// every single one. One `Progress` lives for the whole top-level `parse`
/// call, threaded through `advance` and `balance`.
pub struct Progress {
    operation_count: u32,
    deadline: Option<Instant>,
}

impl Progress {
    pub fn new<P>(options: &ParseOptions<P>) -> Self {
        Progress {
            operation_count: 0,
            deadline: options.timeout.map(|d| Instant::now() + d),
        }
    }

    /// Charge `operations` toward the next check; only actually evaluates
    /// cancellation/timeout/callback once the running count crosses
    /// `op_count_per_timeout_check`. Returns `false` to mean "stop now".
    pub fn check<P: Clone>(
        &mut self,
        options: &mut ParseOptions<P>,
        current_byte_offset: usize,
        has_error: bool,
        operations: u32,
    ) -> bool {
        self.operation_count = self.operation_count.saturating_add(operations);
        if self.operation_count < options.op_count_per_timeout_check {
            return true;
        }
        self.operation_count = 0;

        if let Some(flag) = options.cancellation_flag.as_ref() {
            if flag.load(Ordering::SeqCst) {
                return false;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                return false;
            }
        }
        if let Some(callback) = options.progress_callback.as_mut() {
            let snapshot = ProgressState {
                current_byte_offset,
                has_error,
                payload: options.payload.clone(),
            };
            if callback(&snapshot) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    #[test]
    fn only_evaluates_every_nth_operation() {
        let mut options: ParseOptions<()> = ParseOptions {
            op_count_per_timeout_check: 3,
            ..ParseOptions::default()
        };
        let flag = Arc::new(AtomicBool::new(true));
        options.cancellation_flag = Some(flag);
        let mut progress = Progress::new(&options);

        assert!(progress.check(&mut options, 0, false, 1));
        assert!(progress.check(&mut options, 0, false, 1));
        assert!(!progress.check(&mut options, 0, false, 1));
    }

    #[test]
    fn callback_returning_true_cancels() {
        let mut options: ParseOptions<()> = ParseOptions {
            op_count_per_timeout_check: 1,
            progress_callback: Some(Box::new(|_state| true)),
            ..ParseOptions::default()
        };
        let mut progress = Progress::new(&options);
        assert!(!progress.check(&mut options, 10, false, 1));
    }
}
