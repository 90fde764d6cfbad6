//! SimplicityHL lexer.

use crate::{is_word_char, Span, Tag};

const KEYWORDS: &[&str] = &["fn", "let", "const", "match", "assert!"];

const BUILTIN_TYPES: &[&str] = &[
    "u1", "u2", "u4", "u8", "u16", "u32", "u64", "u128", "u256", "i8", "i16", "i32", "i64", "i128",
    "bool", "str", "Signature", "Pubkey",
];

/// Where the lexer is relative to comments.
///
/// Only `BlockComment` survives a line break; a line comment always ends
/// with its line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexState {
    #[default]
    Code,
    LineComment,
    BlockComment,
}

/// Lazy lexer over SimplicityHL source.
pub struct ProgramLexer<'src> {
    src: &'src str,
    pos: usize,
    state: LexState,
    /// The previous token was a `::` directly followed by a word.
    after_path: bool,
}

impl<'src> ProgramLexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self::with_state(src, LexState::Code)
    }

    /// Resume lexing in `state`, e.g. inside a block comment opened on an
    /// earlier line.
    pub fn with_state(src: &'src str, state: LexState) -> Self {
        Self {
            src,
            pos: 0,
            state,
            after_path: false,
        }
    }

    /// Comment state at the current position.
    pub fn state(&self) -> LexState {
        self.state
    }

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn emit(&mut self, end: usize, tag: Tag) -> Span<'src> {
        let span = Span::new(&self.src[self.pos..end], tag);
        self.pos = end;
        span
    }

    fn line_comment(&mut self) -> Span<'src> {
        let end = self.rest().find('\n').map_or(self.src.len(), |i| self.pos + i);
        self.state = LexState::Code;
        self.emit(end, Tag::Comment)
    }

    /// Emit a block comment body starting at `pos`, looking for the closer
    /// from `search_from`.
    fn block_comment(&mut self, search_from: usize) -> Span<'src> {
        match self.src[search_from..].find("*/") {
            Some(i) => {
                self.state = LexState::Code;
                self.emit(search_from + i + 2, Tag::Comment)
            }
            None => {
                self.state = LexState::BlockComment;
                self.emit(self.src.len(), Tag::Comment)
            }
        }
    }

    fn word_end(&self, from: usize) -> usize {
        self.src[from..]
            .char_indices()
            .find(|&(_, c)| !is_word_char(c))
            .map_or(self.src.len(), |(i, _)| from + i)
    }

    fn number(&mut self) -> Span<'src> {
        let rest = self.rest();
        let prefixed = |prefix: &str, valid: fn(char) -> bool| -> Option<usize> {
            let digits = rest.strip_prefix(prefix)?;
            let n = digits.find(|c: char| !valid(c)).unwrap_or(digits.len());
            (n > 0).then_some(prefix.len() + n)
        };

        let len = prefixed("0x", |c| c.is_ascii_hexdigit())
            .or_else(|| prefixed("0b", |c| c == '0' || c == '1'))
            .unwrap_or_else(|| rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len()));

        let end = self.pos + len;
        // `12ab` is not a literal; keep the whole word plain.
        let word_end = self.word_end(end);
        if word_end > end {
            return self.emit(word_end, Tag::Plain);
        }
        self.emit(end, Tag::Number)
    }

    fn word(&mut self) -> Span<'src> {
        let mut end = self.word_end(self.pos);
        let word = &self.src[self.pos..end];
        if word == "assert" && self.src[end..].starts_with('!') {
            end += 1;
        }
        let word = &self.src[self.pos..end];

        let tag = if self.after_path || word == "main" {
            Tag::Function
        } else if KEYWORDS.contains(&word) {
            Tag::Keyword
        } else if word == "jet" {
            Tag::Module
        } else if BUILTIN_TYPES.contains(&word) {
            Tag::Type
        } else if is_constant(word) {
            Tag::Constant
        } else {
            Tag::Plain
        };
        self.emit(end, tag)
    }

    fn code(&mut self) -> Span<'src> {
        let rest = self.rest();
        let first = match rest.chars().next() {
            Some(c) => c,
            None => return self.emit(self.pos, Tag::Plain),
        };

        if rest.starts_with("//") {
            self.state = LexState::LineComment;
            return self.line_comment();
        }
        if rest.starts_with("/*") {
            self.state = LexState::BlockComment;
            return self.block_comment(self.pos + 2);
        }
        if rest.starts_with("::") {
            let span = self.emit(self.pos + 2, Tag::Operator);
            self.after_path = self.rest().starts_with(is_word_char);
            return span;
        }
        if rest.starts_with("->") {
            return self.emit(self.pos + 2, Tag::Operator);
        }

        match first {
            ':' | ';' | '=' => self.emit(self.pos + 1, Tag::Operator),
            '(' | ')' | '{' | '}' | '[' | ']' => self.emit(self.pos + 1, Tag::Punctuation),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.word(),
            c if c.is_whitespace() => {
                let n = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
                self.emit(self.pos + n, Tag::Plain)
            }
            c => self.emit(self.pos + c.len_utf8(), Tag::Plain),
        }
    }
}

impl<'src> Iterator for ProgramLexer<'src> {
    type Item = Span<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.src.len() {
            return None;
        }
        let span = match self.state {
            LexState::Code => {
                let after_path = self.after_path;
                let span = self.code();
                if after_path {
                    self.after_path = false;
                }
                span
            }
            LexState::LineComment if self.rest().starts_with('\n') => {
                self.state = LexState::Code;
                return self.next();
            }
            LexState::LineComment => self.line_comment(),
            LexState::BlockComment => self.block_comment(self.pos),
        };
        Some(span)
    }
}

fn is_constant(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase() || c == '_')
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Highlight one line, resuming from `state`. Returns the spans and the
/// state to resume the next line with.
pub fn highlight_line(line: &str, state: LexState) -> (Vec<Span<'_>>, LexState) {
    let mut lexer = ProgramLexer::with_state(line, state);
    let spans: Vec<_> = lexer.by_ref().collect();
    let next = match lexer.state() {
        LexState::BlockComment => LexState::BlockComment,
        _ => LexState::Code,
    };
    (spans, next)
}

/// Highlight a whole program line by line. Line terminators stay attached
/// to their line so that nothing is lost.
pub fn highlight_program(source: &str) -> Vec<Vec<Span<'_>>> {
    let mut state = LexState::Code;
    source
        .split_inclusive('\n')
        .map(|line| {
            let (spans, next) = highlight_line(line, state);
            state = next;
            spans
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(src: &str) -> Vec<(&str, Tag)> {
        ProgramLexer::new(src).map(|s| (s.text, s.tag)).collect()
    }

    #[test]
    fn test_function_signature() {
        assert_eq!(
            tags("fn main() {"),
            vec![
                ("fn", Tag::Keyword),
                (" ", Tag::Plain),
                ("main", Tag::Function),
                ("(", Tag::Punctuation),
                (")", Tag::Punctuation),
                (" ", Tag::Plain),
                ("{", Tag::Punctuation),
            ]
        );
    }

    #[test]
    fn test_jet_path() {
        let spans = tags("jet::bip_0340_verify((pk, msg), sig)");
        assert_eq!(spans[0], ("jet", Tag::Module));
        assert_eq!(spans[1], ("::", Tag::Operator));
        assert_eq!(spans[2], ("bip_0340_verify", Tag::Function));
        assert_eq!(spans[3], ("(", Tag::Punctuation));
        assert!(spans.contains(&("pk", Tag::Plain)));
    }

    #[test]
    fn test_let_binding() {
        let spans = tags("let x: u8 = 0xff;");
        assert_eq!(
            spans,
            vec![
                ("let", Tag::Keyword),
                (" ", Tag::Plain),
                ("x", Tag::Plain),
                (":", Tag::Operator),
                (" ", Tag::Plain),
                ("u8", Tag::Type),
                (" ", Tag::Plain),
                ("=", Tag::Operator),
                (" ", Tag::Plain),
                ("0xff", Tag::Number),
                (";", Tag::Operator),
            ]
        );
    }

    #[test]
    fn test_literals_and_constants() {
        assert_eq!(tags("0b1010"), vec![("0b1010", Tag::Number)]);
        assert_eq!(tags("42"), vec![("42", Tag::Number)]);
        assert_eq!(tags("12ab"), vec![("12ab", Tag::Plain)]);
        assert_eq!(tags("witness::SIG"), vec![
            ("witness", Tag::Plain),
            ("::", Tag::Operator),
            ("SIG", Tag::Function),
        ]);
        assert_eq!(tags("MAX_LEN"), vec![("MAX_LEN", Tag::Constant)]);
        assert_eq!(tags("assert!(ok)")[0], ("assert!", Tag::Keyword));
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert_eq!(tags("often"), vec![("often", Tag::Plain)]);
        assert_eq!(tags("mainly"), vec![("mainly", Tag::Plain)]);
    }

    #[test]
    fn test_line_comment_ends_at_newline() {
        let spans = tags("let a; // note\nlet b;");
        assert!(spans.contains(&("// note", Tag::Comment)));
        assert!(spans.contains(&("\n", Tag::Plain)));
        assert_eq!(spans.last(), Some(&(";", Tag::Operator)));
    }

    #[test]
    fn test_block_comment_across_lines() {
        let (first, state) = highlight_line("let a = 1; /* start", LexState::Code);
        assert_eq!(state, LexState::BlockComment);
        assert_eq!(first.last().map(|s| s.tag), Some(Tag::Comment));

        let (second, state) = highlight_line("still inside", state);
        assert_eq!(state, LexState::BlockComment);
        assert_eq!(second, vec![Span::new("still inside", Tag::Comment)]);

        let (third, state) = highlight_line("end */ fn", state);
        assert_eq!(state, LexState::Code);
        assert_eq!(third[0], Span::new("end */", Tag::Comment));
        assert_eq!(third.last(), Some(&Span::new("fn", Tag::Keyword)));
    }

    #[test]
    fn test_line_comment_does_not_carry() {
        let (_, state) = highlight_line("// trailing", LexState::Code);
        assert_eq!(state, LexState::Code);
    }

    #[test]
    fn test_comment_opener_not_reused_as_closer() {
        let spans = tags("/*/ x");
        assert_eq!(spans, vec![("/*/ x", Tag::Comment)]);
    }

    #[test]
    fn test_highlight_program_keeps_lines() {
        let src = "fn main() {\n    /* a\n b */ let x = 1;\n}";
        let lines = highlight_program(src);
        assert_eq!(lines.len(), 4);
        let joined: String = lines.iter().flatten().map(|s| s.text).collect();
        assert_eq!(joined, src);
        assert!(lines[2].contains(&Span::new(" b */", Tag::Comment)));
    }
}
