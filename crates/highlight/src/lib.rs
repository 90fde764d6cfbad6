//! Syntax highlighting for the two editor grammars.
//!
//! Both lexers are total: every byte of the input lands in exactly one
//! [`Span`], in order, so joining the span texts gives back the input.
//!
//! - [`ProgramLexer`] handles SimplicityHL source, including `//` line
//!   comments and `/* */` block comments that may span lines.
//! - [`ScriptLexer`] handles human-readable Bitcoin Script (`OP_*` opcodes
//!   and `0x` pushes).

mod program;
mod script;

pub use program::{highlight_line, highlight_program, LexState, ProgramLexer};
pub use script::{highlight_script, ScriptLexer};

use serde::Serialize;

/// Style class of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Keyword,
    /// `main` and the identifier after `::`
    Function,
    /// The `jet` namespace
    Module,
    Type,
    Number,
    Constant,
    Operator,
    Punctuation,
    Comment,
    Opcode,
    /// `0x` data push in a script
    HexLiteral,
    Plain,
}

impl Tag {
    /// Display colour (hex RGB) used by the program grammar.
    pub fn color(self) -> &'static str {
        match self {
            Tag::Keyword => "#e083cc",
            Tag::Function | Tag::Opcode => "#ffb067",
            Tag::Module | Tag::Type => "#57adf3",
            Tag::Number | Tag::HexLiteral => "#b5cea8",
            Tag::Constant => "#4fc1ff",
            Tag::Operator => "#fa5538",
            Tag::Punctuation => "#ffd700",
            Tag::Comment => "#9a9ca3",
            Tag::Plain => "#9cdcfe",
        }
    }
}

/// Which editor a buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Program,
    Script,
}

impl Grammar {
    /// Colour for `tag` under this grammar. Script text outside tokens is amber.
    pub fn color(self, tag: Tag) -> &'static str {
        match (self, tag) {
            (Grammar::Script, Tag::Plain) => "#fbbf24",
            _ => tag.color(),
        }
    }

    /// Lex a whole buffer.
    pub fn highlight(self, source: &str) -> Vec<Span<'_>> {
        match self {
            Grammar::Program => ProgramLexer::new(source).collect(),
            Grammar::Script => ScriptLexer::new(source).collect(),
        }
    }
}

/// A slice of the input and its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span<'src> {
    pub text: &'src str,
    pub tag: Tag,
}

impl<'src> Span<'src> {
    pub(crate) fn new(text: &'src str, tag: Tag) -> Self {
        Self { text, tag }
    }
}

/// ASCII word character, as `\w`.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_plain_color() {
        assert_eq!(Grammar::Script.color(Tag::Plain), "#fbbf24");
        assert_eq!(Grammar::Program.color(Tag::Plain), "#9cdcfe");
        assert_eq!(Grammar::Script.color(Tag::Opcode), "#ffb067");
        assert_eq!(Grammar::Script.color(Tag::HexLiteral), "#b5cea8");
    }

    #[test]
    fn test_span_serializes_tag() {
        let span = Span::new("fn", Tag::Keyword);
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(json, r#"{"text":"fn","tag":"keyword"}"#);
    }
}
