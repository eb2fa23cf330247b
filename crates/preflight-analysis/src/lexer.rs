//! Lexical context tracking for near-JavaScript sources.
//!
//! Classifies every character as code, comment, or string content without
//! building tokens. Block comments and template literals carry across lines;
//! quoted strings and line comments end at the line break. Regex literals are
//! not recognized and read as code.

use serde::Serialize;

/// What a character (or the start of a line) sits inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LexContext {
    Code,
    LineComment,
    BlockComment,
    SingleQuoted,
    DoubleQuoted,
    Template,
}

/// Stateful line-by-line classifier.
#[derive(Debug, Clone)]
pub struct LexicalScanner {
    state: LexContext,
}

impl Default for LexicalScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalScanner {
    pub fn new() -> Self {
        Self {
            state: LexContext::Code,
        }
    }

    /// Context carried into the next line.
    pub fn state(&self) -> LexContext {
        self.state
    }

    /// Classify each character of `line`, calling `visit(column_index, ch, context)`.
    /// Delimiting characters (quotes, `//`, `/*`, `*/`) belong to the span they open or close.
    pub fn scan_line<F>(&mut self, line: &str, mut visit: F)
    where
        F: FnMut(usize, char, LexContext),
    {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        let mut continued = false;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            match self.state {
                LexContext::Code => match (c, next) {
                    ('/', Some('/')) => {
                        self.state = LexContext::LineComment;
                        visit(i, c, LexContext::LineComment);
                    }
                    ('/', Some('*')) => {
                        self.state = LexContext::BlockComment;
                        visit(i, c, LexContext::BlockComment);
                        visit(i + 1, '*', LexContext::BlockComment);
                        i += 1;
                    }
                    ('\'', _) => {
                        self.state = LexContext::SingleQuoted;
                        visit(i, c, LexContext::SingleQuoted);
                    }
                    ('"', _) => {
                        self.state = LexContext::DoubleQuoted;
                        visit(i, c, LexContext::DoubleQuoted);
                    }
                    ('`', _) => {
                        self.state = LexContext::Template;
                        visit(i, c, LexContext::Template);
                    }
                    _ => visit(i, c, LexContext::Code),
                },
                LexContext::LineComment => visit(i, c, LexContext::LineComment),
                LexContext::BlockComment => {
                    visit(i, c, LexContext::BlockComment);
                    if c == '*' && next == Some('/') {
                        visit(i + 1, '/', LexContext::BlockComment);
                        i += 1;
                        self.state = LexContext::Code;
                    }
                }
                ctx @ (LexContext::SingleQuoted | LexContext::DoubleQuoted | LexContext::Template) => {
                    visit(i, c, ctx);
                    if c == '\\' {
                        match next {
                            Some(escaped) => {
                                visit(i + 1, escaped, ctx);
                                i += 1;
                            }
                            None => continued = true,
                        }
                    } else if closes(ctx, c) {
                        self.state = LexContext::Code;
                    }
                }
            }
            i += 1;
        }

        // Line comments and unterminated quoted strings stop at the line break
        // unless the string ends in a backslash continuation.
        match self.state {
            LexContext::LineComment => self.state = LexContext::Code,
            LexContext::SingleQuoted | LexContext::DoubleQuoted if !continued => {
                self.state = LexContext::Code
            }
            _ => {}
        }
    }
}

fn closes(ctx: LexContext, c: char) -> bool {
    matches!(
        (ctx, c),
        (LexContext::SingleQuoted, '\'') | (LexContext::DoubleQuoted, '"') | (LexContext::Template, '`')
    )
}

/// The context each line starts in.
pub fn line_start_contexts<S: AsRef<str>>(lines: &[S]) -> Vec<LexContext> {
    let mut scanner = LexicalScanner::new();
    lines
        .iter()
        .map(|line| {
            let start = scanner.state();
            scanner.scan_line(line.as_ref(), |_, _, _| {});
            start
        })
        .collect()
}

/// True when the trimmed line opens with a comment marker (`//`, `/*`, `*`).
pub fn has_comment_prefix(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts(line: &str) -> Vec<LexContext> {
        let mut out = Vec::new();
        LexicalScanner::new().scan_line(line, |_, _, ctx| out.push(ctx));
        out
    }

    #[test]
    fn test_line_comment_covers_rest_of_line() {
        let ctx = contexts("a(); // b(");
        assert_eq!(ctx[0], LexContext::Code);
        assert!(ctx[5..].iter().all(|c| *c == LexContext::LineComment));
    }

    #[test]
    fn test_string_contents_and_escapes() {
        let ctx = contexts(r#"f("a\"(")"#);
        assert_eq!(ctx[1], LexContext::Code);
        assert!(ctx[2..8].iter().all(|c| *c == LexContext::DoubleQuoted));
        assert_eq!(ctx[8], LexContext::Code);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let starts = line_start_contexts(&["x(); /* open", "still (", "done */ y();", "z();"]);
        assert_eq!(
            starts,
            vec![
                LexContext::Code,
                LexContext::BlockComment,
                LexContext::BlockComment,
                LexContext::Code
            ]
        );
    }

    #[test]
    fn test_template_literal_spans_lines() {
        let starts = line_start_contexts(&["const t = `", "<<<<<<< inside", "`;"]);
        assert_eq!(starts[1], LexContext::Template);
        assert_eq!(starts[2], LexContext::Template);
    }

    #[test]
    fn test_unterminated_quote_resets_at_line_end() {
        let starts = line_start_contexts(&["var s = 'oops", "next();"]);
        assert_eq!(starts[1], LexContext::Code);
    }

    #[test]
    fn test_comment_prefix() {
        assert!(has_comment_prefix("// note"));
        assert!(has_comment_prefix("* @param x"));
        assert!(has_comment_prefix("/** doc"));
        assert!(!has_comment_prefix("x = 1; // trailing"));
    }
}
