//! Every input must be reproduced exactly by the emitted spans.

use unchained_highlight::{highlight_program, highlight_script, Grammar, ProgramLexer};

const PIECES: &[&str] = &[
    "fn", " ", "main", "jet", "::", ":", ";", "=", "->", "(", ")", "{", "}", "[", "]", "//", "/*",
    "*/", "\n", "0x", "0b", "1", "ff", "OP_", "DUP", "_", "assert", "!", "é", "✓", "\t", "u8",
    "SIG", "/", "*", "x", "\r\n",
];

/// Small deterministic generator so the corpus is stable across runs.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }
}

fn corpus() -> Vec<String> {
    let mut rng = Lcg(0x5eed);
    let mut inputs = vec![String::new(), "\n".to_string(), "/*".to_string(), "::".to_string()];
    for _ in 0..500 {
        let len = rng.next() % 24;
        let s: String = (0..len).map(|_| PIECES[rng.next() % PIECES.len()]).collect();
        inputs.push(s);
    }
    inputs
}

#[test]
fn program_lexer_is_total() {
    for input in corpus() {
        let joined: String = ProgramLexer::new(&input).map(|s| s.text).collect();
        assert_eq!(joined, input);
        assert!(ProgramLexer::new(&input).all(|s| !s.text.is_empty()));
    }
}

#[test]
fn program_lines_are_total() {
    for input in corpus() {
        let joined: String = highlight_program(&input).iter().flatten().map(|s| s.text).collect();
        assert_eq!(joined, input);
    }
}

#[test]
fn script_lexer_is_total() {
    for input in corpus() {
        let spans = highlight_script(&input);
        let joined: String = spans.iter().map(|s| s.text).collect();
        assert_eq!(joined, input);
        assert!(spans.iter().all(|s| !s.text.is_empty()));
    }
}

#[test]
fn grammar_dispatch_matches_lexers() {
    let src = "OP_1 OP_CHECKSIG";
    assert_eq!(Grammar::Script.highlight(src), highlight_script(src));
    let src = "fn main() {}";
    assert_eq!(
        Grammar::Program.highlight(src),
        ProgramLexer::new(src).collect::<Vec<_>>()
    );
}
