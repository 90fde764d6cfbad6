//! Bitcoin Script lexer: `OP_*` opcodes and `0x` data pushes, everything
//! else passes through as plain text.

use crate::{is_word_char, Span, Tag};

pub struct ScriptLexer<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> ScriptLexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    /// Token starting at byte `at`, as (end, tag).
    fn token_at(&self, at: usize) -> Option<(usize, Tag)> {
        let rest = &self.src[at..];

        if let Some(name) = rest.strip_prefix("OP_") {
            let at_boundary = self.src[..at].chars().next_back().map_or(true, |c| !is_word_char(c));
            let len = name
                .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
                .unwrap_or(name.len());
            let closed = name[len..].chars().next().map_or(true, |c| !is_word_char(c));
            if at_boundary && len > 0 && closed {
                return Some((at + 3 + len, Tag::Opcode));
            }
        }

        if let Some(digits) = rest.strip_prefix("0x") {
            let len = digits.find(|c: char| !c.is_ascii_hexdigit()).unwrap_or(digits.len());
            return Some((at + 2 + len, Tag::HexLiteral));
        }

        None
    }
}

impl<'src> Iterator for ScriptLexer<'src> {
    type Item = Span<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.src.len() {
            return None;
        }
        let start = self.pos;

        if let Some((end, tag)) = self.token_at(start) {
            self.pos = end;
            return Some(Span::new(&self.src[start..end], tag));
        }

        // Plain run up to the next token.
        let mut end = start;
        for (i, c) in self.src[start..].char_indices() {
            let at = start + i;
            if at > start && self.token_at(at).is_some() {
                break;
            }
            end = at + c.len_utf8();
        }
        self.pos = end;
        Some(Span::new(&self.src[start..end], Tag::Plain))
    }
}

/// Highlight a whole script buffer.
pub fn highlight_script(source: &str) -> Vec<Span<'_>> {
    ScriptLexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(src: &str) -> Vec<(&str, Tag)> {
        ScriptLexer::new(src).map(|s| (s.text, s.tag)).collect()
    }

    #[test]
    fn test_multisig() {
        let spans = tags("OP_2 OP_PUSHBYTES_33 0x02ab OP_CHECKMULTISIG");
        assert_eq!(
            spans,
            vec![
                ("OP_2", Tag::Opcode),
                (" ", Tag::Plain),
                ("OP_PUSHBYTES_33", Tag::Opcode),
                (" ", Tag::Plain),
                ("0x02ab", Tag::HexLiteral),
                (" ", Tag::Plain),
                ("OP_CHECKMULTISIG", Tag::Opcode),
            ]
        );
    }

    #[test]
    fn test_opcode_word_boundaries() {
        assert_eq!(tags("XOP_DUP"), vec![("XOP_DUP", Tag::Plain)]);
        assert_eq!(tags("OP_DUPx"), vec![("OP_DUPx", Tag::Plain)]);
        assert_eq!(tags("OP_"), vec![("OP_", Tag::Plain)]);
        assert_eq!(tags("(OP_DUP)"), vec![
            ("(", Tag::Plain),
            ("OP_DUP", Tag::Opcode),
            (")", Tag::Plain),
        ]);
    }

    #[test]
    fn test_bare_hex_prefix() {
        assert_eq!(tags("0x"), vec![("0x", Tag::HexLiteral)]);
        assert_eq!(tags("ab0x1g"), vec![
            ("ab", Tag::Plain),
            ("0x1", Tag::HexLiteral),
            ("g", Tag::Plain),
        ]);
    }

    #[test]
    fn test_unicode_plain_text() {
        let spans = tags("é OP_1 ✓");
        assert_eq!(spans[0], ("é ", Tag::Plain));
        assert_eq!(spans[1], ("OP_1", Tag::Opcode));
        assert_eq!(spans[2], (" ✓", Tag::Plain));
    }
}
