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

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// One logging point's worth of "graph{ ... }" text (spec §6's dot-graph
/// output). A `Parser` owns at most one of these at a time; attaching a
/// new file replaces (and closes) whichever one was previously open.
/// Grounded on `ts_parser_print_dot_graphs`, which stores a raw `FILE*`
/// on `TSParser` and writes a `graph { ... }` block from inside the
/// advance/reduce/shift engines whenever it's non-null; here that's an
/// `Option<File>` field plus a method each logging point calls, rather
/// than a null check sprinkled through every call site.
pub struct DotGraphLog {
    file: Option<File>,
}

impl DotGraphLog {
    pub fn disabled() -> Self {
        DotGraphLog { file: None }
    }

    /// Open (append mode, text) the file this parser will write dot
    /// graphs to for every subsequent logging point, until `disable` is
    /// called or another file is attached.
    pub fn enable(&mut self, path: &Path) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.file = Some(file);
        Ok(())
    }

    pub fn disable(&mut self) {
        self.file = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Write one `graph { ... }` block built from `body` (the node/edge
    /// statements only; this supplies the wrapping braces and trailing
    /// newline). A write failure is logged and otherwise ignored — a
    /// broken trace file must never abort a parse.
    pub fn write_graph(&mut self, label: &str, body: &str) {
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "graph {{\nlabel=\"{}\"\n{}\n}}", label, body) {
                warn!("dot-graph log: write failed, disabling: {}", e);
                self.file = None;
            }
        }
    }
}

impl Default for DotGraphLog {
    fn default() -> Self {
        DotGraphLog::disabled()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn a_disabled_log_writes_nothing() {
        let mut log = DotGraphLog::disabled();
        log.write_graph("advance", "n0 [label=\"x\"]");
        assert!(!log.is_enabled());
    }

    #[test]
    fn an_enabled_log_appends_a_graph_block() {
        let path = std::env::temp_dir().join(format!("glr-core-dotgraph-test-{}.dot", std::process::id()));
        let mut log = DotGraphLog::disabled();
        log.enable(&path).expect("temp file should be creatable");
        log.write_graph("advance", "n0 -> n1");
        assert!(log.is_enabled());
        let contents = std::fs::read_to_string(&path).expect("file should exist");
        assert!(contents.contains("graph {"));
        assert!(contents.contains("n0 -> n1"));
        let _ = std::fs::remove_file(&path);
    }
}
