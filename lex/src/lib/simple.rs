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

//! A small regex-backed `MainLexer`/`KeywordLexer`, in the spirit of
//! `lrlex`'s rule files, used by this workspace's tests and as a
//! reference implementation for hosts that don't need a hand-tuned DFA.
//! It is not the pluggable-lexer contract itself (that's `MainLexer` in
//! `scanner.rs`) — just one implementation of it.

use indexmap::IndexMap;
use regex::Regex;

use glr_grammar::Symbol;

use crate::input::ScannerInput;
use crate::point::Point;
use crate::scanner::{KeywordLexer, MainLexer};

/// How many chars of lookahead a single lex attempt buffers before giving
/// up on a longer match. Generous enough for any reasonable token.
const LOOKAHEAD_BUFFER_CHARS: usize = 512;

pub struct RegexLexer {
    rules: Vec<(u16, Regex, Symbol)>,
}

impl RegexLexer {
    pub fn new() -> Self {
        RegexLexer { rules: Vec::new() }
    }

    /// Register a rule active in lex mode `lex_state`. Rules are tried in
    /// registration order; the longest match wins, ties broken by
    /// earlier-registered rule (classic "maximal munch, first rule wins
    /// on ties" lexer semantics).
    pub fn add_rule(&mut self, lex_state: u16, pattern: &str, symbol: Symbol) -> Result<&mut Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})", pattern))?;
        self.rules.push((lex_state, anchored, symbol));
        Ok(self)
    }

    fn buffer_lookahead(input: &mut dyn ScannerInput) -> String {
        let mut buf = String::with_capacity(16);
        for _ in 0..LOOKAHEAD_BUFFER_CHARS {
            match input.advance() {
                Some(c) => buf.push(c),
                None => break,
            }
        }
        buf
    }
}

impl Default for RegexLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl MainLexer for RegexLexer {
    fn lex(&self, input: &mut dyn ScannerInput, lex_state: u16) -> Option<Symbol> {
        let start_byte = input.start_byte();
        let start_point = input.start_point();
        let buf = Self::buffer_lookahead(input);

        let mut best: Option<(usize, usize, Symbol)> = None;
        for (state, re, sym) in &self.rules {
            if *state != lex_state {
                continue;
            }
            if let Some(m) = re.find(&buf) {
                if m.end() > 0 {
                    let char_count = buf[..m.end()].chars().count();
                    let is_better = match &best {
                        None => true,
                        Some((best_len, ..)) => char_count > *best_len,
                    };
                    if is_better {
                        best = Some((char_count, m.end(), *sym));
                    }
                }
            }
        }

        let (char_count, _, symbol) = best?;
        input.reset(start_byte, start_point);
        for _ in 0..char_count {
            input.advance();
        }
        input.mark_end();
        Some(symbol)
    }
}

/// Matches a plain `[A-Za-z_][A-Za-z0-9_]*` word, then looks the text up
/// in a reserved-keyword table; returns the keyword's symbol only if it
/// is listed (spec §4.2's keyword-capture re-lex).
pub struct WordKeywordLexer {
    word: Regex,
    keywords: IndexMap<String, Symbol>,
}

impl WordKeywordLexer {
    pub fn new() -> Self {
        WordKeywordLexer {
            word: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap(),
            keywords: IndexMap::new(),
        }
    }

    pub fn add_keyword(&mut self, text: &str, symbol: Symbol) -> &mut Self {
        self.keywords.insert(text.to_string(), symbol);
        self
    }
}

impl Default for WordKeywordLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordLexer for WordKeywordLexer {
    fn lex_keyword(&self, input: &mut dyn ScannerInput) -> Option<Symbol> {
        let start_byte = input.start_byte();
        let start_point = input.start_point();
        let buf = RegexLexer::buffer_lookahead(input);
        let m = self.word.find(&buf)?;
        let text = &buf[..m.end()];
        let symbol = *self.keywords.get(text)?;
        let char_count = text.chars().count();
        input.reset(start_byte, start_point);
        for _ in 0..char_count {
            input.advance();
        }
        input.mark_end();
        Some(symbol)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::input::{ByteInput, TextProvider};

    struct Whole<'a>(&'a [u8], bool);
    impl<'a> TextProvider for Whole<'a> {
        fn text_at(&mut self, byte_offset: usize, _point: Point) -> &[u8] {
            if self.1 || byte_offset >= self.0.len() {
                &[]
            } else {
                self.1 = true;
                &self.0[byte_offset..]
            }
        }
    }

    #[test]
    fn longest_match_wins() {
        let mut lex = RegexLexer::new();
        lex.add_rule(0, r"x", Symbol::new(1)).unwrap();
        lex.add_rule(0, r"xx", Symbol::new(2)).unwrap();

        let mut src = Whole(b"xx", false);
        let mut input = ByteInput::new(&mut src);
        input.reset(0, Point::ZERO);
        let sym = lex.lex(&mut input, 0).unwrap();
        assert_eq!(sym, Symbol::new(2));
        assert_eq!(input.end_byte(), 2);
    }

    #[test]
    fn no_match_returns_none() {
        let lex = RegexLexer::new();
        let mut src = Whole(b"q", false);
        let mut input = ByteInput::new(&mut src);
        input.reset(0, Point::ZERO);
        assert_eq!(lex.lex(&mut input, 0), None);
    }

    #[test]
    fn keyword_lexer_prefers_listed_words() {
        let mut kw = WordKeywordLexer::new();
        kw.add_keyword("if", Symbol::new(5));

        let mut src = Whole(b"if", false);
        let mut input = ByteInput::new(&mut src);
        input.reset(0, Point::ZERO);
        assert_eq!(kw.lex_keyword(&mut input), Some(Symbol::new(5)));

        let mut src2 = Whole(b"ifs", false);
        let mut input2 = ByteInput::new(&mut src2);
        input2.reset(0, Point::ZERO);
        assert_eq!(kw.lex_keyword(&mut input2), None);
    }
}
