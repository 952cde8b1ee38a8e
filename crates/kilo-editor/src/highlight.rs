//! Highlighter — per-row syntax tagging with block-comment carry.
//!
//! [`highlight_row`] is a single left-to-right pass over a row's rendered
//! characters. Its only inputs besides the text are the active rule set and
//! whether the previous row ended inside a block comment; its outputs are
//! one [`Highlight`] per character and whether *this* row ends inside one.
//!
//! The pass keeps three pieces of state:
//!
//! - `prev_sep`: the previous character was a separator (or we are at the
//!   start of the row). Numbers and keywords only start at a boundary.
//! - `in_string`: the quote character that opened the current string.
//! - `in_comment`: inside a `/* ... */` block.
//!
//! Priority at each position: line comment, block comment, string, number,
//! keyword, plain. Propagating a changed end-of-row comment state to the
//! following rows is the buffer's job.

use crate::syntax::{Highlight, Syntax, SyntaxFlags};

/// Whether `c` ends a number or keyword.
#[must_use]
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0' || ",.()+-/*=~%<>[];".contains(c)
}

/// Recompute `hl` for `render` and return the row's new `open_comment`.
///
/// `hl` is resized to match `render`. Without a rule set every character
/// is [`Highlight::Normal`] and the row never leaves a comment open.
pub fn highlight_row(
    render: &[char],
    syntax: Option<&Syntax>,
    prev_open_comment: bool,
    hl: &mut Vec<Highlight>,
) -> bool {
    hl.clear();
    hl.resize(render.len(), Highlight::Normal);

    let Some(syntax) = syntax else {
        return false;
    };

    let line_comment: Vec<char> = syntax.line_comment.chars().collect();
    let mc_start: Vec<char> = syntax.block_comment.0.chars().collect();
    let mc_end: Vec<char> = syntax.block_comment.1.chars().collect();
    let has_block = !mc_start.is_empty() && !mc_end.is_empty();

    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = prev_open_comment;

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        // Line comment: the rest of the row.
        if !line_comment.is_empty()
            && in_string.is_none()
            && !in_comment
            && starts_with_at(render, i, &line_comment)
        {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        // Block comment.
        if has_block && in_string.is_none() {
            if in_comment {
                hl[i] = Highlight::MlComment;
                if starts_with_at(render, i, &mc_end) {
                    hl[i..i + mc_end.len()].fill(Highlight::MlComment);
                    i += mc_end.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    i += 1;
                }
                continue;
            } else if starts_with_at(render, i, &mc_start) {
                hl[i..i + mc_start.len()].fill(Highlight::MlComment);
                i += mc_start.len();
                in_comment = true;
                continue;
            }
        }

        // Strings.
        if syntax.flags.contains(SyntaxFlags::STRINGS) {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == '\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == '"' || c == '\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        // Numbers.
        if syntax.flags.contains(SyntaxFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == '.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        // Keywords.
        if prev_sep {
            if let Some((len, kind)) = match_keyword(render, i, syntax.keywords) {
                hl[i..i + len].fill(kind);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    in_comment
}

/// Find the first keyword that starts at `at` and ends at a separator or
/// the end of the row. Returns its length and category.
fn match_keyword(render: &[char], at: usize, keywords: &[&str]) -> Option<(usize, Highlight)> {
    keywords.iter().find_map(|kw| {
        let (word, kind) = kw
            .strip_suffix('|')
            .map_or((*kw, Highlight::Keyword1), |w| (w, Highlight::Keyword2));
        let len = word_len_at(render, at, word)?;
        let bounded = render.get(at + len).is_none_or(|&c| is_separator(c));
        bounded.then_some((len, kind))
    })
}

/// Length of `word` in chars if `render[at..]` starts with it.
#[inline]
fn word_len_at(render: &[char], at: usize, word: &str) -> Option<usize> {
    let rest = render.get(at..)?;
    let mut len = 0;
    for want in word.chars() {
        if rest.get(len) != Some(&want) {
            return None;
        }
        len += 1;
    }
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::syntax::Highlight::{
        Comment, Keyword1, Keyword2, MlComment, Normal, Number, String as Str,
    };

    fn c_syntax() -> &'static Syntax {
        Syntax::select("test.c").unwrap()
    }

    fn run(text: &str, prev_open: bool) -> (Vec<Highlight>, bool) {
        let render: Vec<char> = text.chars().collect();
        let mut hl = Vec::new();
        let open = highlight_row(&render, Some(c_syntax()), prev_open, &mut hl);
        (hl, open)
    }

    fn tags(text: &str) -> Vec<Highlight> {
        run(text, false).0
    }

    #[test]
    fn separators() {
        for c in ",.()+-/*=~%<>[]; \t\0".chars() {
            assert!(is_separator(c), "{c:?}");
        }
        for c in "a_Z9\"'{}".chars() {
            assert!(!is_separator(c), "{c:?}");
        }
    }

    #[test]
    fn no_syntax_is_all_normal() {
        let render: Vec<char> = "int /* x".chars().collect();
        let mut hl = vec![Comment; 3];
        let open = highlight_row(&render, None, true, &mut hl);
        assert_eq!(hl, vec![Normal; render.len()]);
        assert!(!open);
    }

    #[test]
    fn statement_with_trailing_comment() {
        let hl = tags("int x = 1; // comment");
        let expected: Vec<Highlight> = [
            vec![Keyword2; 3],
            vec![Normal; 5],
            vec![Number],
            vec![Normal; 2],
            vec![Comment; 10],
        ]
        .concat();
        assert_eq!(hl, expected);
    }

    #[test]
    fn keyword1() {
        assert_eq!(tags("if"), vec![Keyword1; 2]);
        assert_eq!(&tags("while(x)")[..5], &[Keyword1; 5]);
    }

    #[test]
    fn keyword_needs_boundary_after() {
        assert_eq!(tags("iffy"), vec![Normal; 4]);
        assert_eq!(tags("int_t"), vec![Normal; 5]);
    }

    #[test]
    fn keyword_at_row_end_and_truncated() {
        assert_eq!(tags("x=char"), [&[Normal, Normal][..], &[Keyword2; 4]].concat());
        assert_eq!(tags("x=cha"), vec![Normal; 5]);
    }

    #[test]
    fn word_len_counts_chars() {
        let render: Vec<char> = "a return".chars().collect();
        assert_eq!(word_len_at(&render, 2, "return"), Some(6));
        assert_eq!(word_len_at(&render, 2, "returned"), None);
        assert_eq!(word_len_at(&render, 0, "return"), None);
        assert_eq!(word_len_at(&render, 9, "if"), None);
    }

    #[test]
    fn keyword_needs_boundary_before() {
        assert_eq!(tags("xif"), vec![Normal; 3]);
    }

    #[test]
    fn numbers_and_decimals() {
        assert_eq!(tags("3.14"), vec![Number; 4]);
        assert_eq!(tags("x1"), vec![Normal; 2]);
        assert_eq!(tags("(42)"), vec![Normal, Number, Number, Normal]);
    }

    #[test]
    fn strings_with_escapes() {
        let hl = tags(r#""a\"b" x"#);
        assert_eq!(hl, [vec![Str; 6], vec![Normal; 2]].concat());
    }

    #[test]
    fn single_quoted_string() {
        assert_eq!(tags("'x'"), vec![Str; 3]);
    }

    #[test]
    fn comment_marker_inside_string_is_text() {
        assert_eq!(tags("\"//\""), vec![Str; 4]);
    }

    #[test]
    fn keyword_after_string_is_at_boundary() {
        let hl = tags("\"a\"if");
        assert_eq!(&hl[3..], &[Keyword1; 2]);
    }

    #[test]
    fn block_comment_opens() {
        let (hl, open) = run("x /* y", false);
        assert_eq!(hl, [vec![Normal; 2], vec![MlComment; 4]].concat());
        assert!(open);
    }

    #[test]
    fn block_comment_continues() {
        let (hl, open) = run("plain", true);
        assert_eq!(hl, vec![MlComment; 5]);
        assert!(open);
    }

    #[test]
    fn block_comment_closes() {
        let (hl, open) = run("a */ 7", true);
        assert_eq!(hl, [vec![MlComment; 4], vec![Normal], vec![Number]].concat());
        assert!(!open);
    }

    #[test]
    fn block_comment_on_one_line() {
        let (hl, open) = run("/* x */int", false);
        assert_eq!(hl, [vec![MlComment; 7], vec![Keyword2; 3]].concat());
        assert!(!open);
    }

    #[test]
    fn line_comment_inside_block_is_ignored() {
        let (hl, open) = run("// */", true);
        assert_eq!(hl, vec![MlComment; 5]);
        assert!(!open);
    }

    #[test]
    fn empty_row_carries_comment_state() {
        assert!(run("", true).1);
        assert!(!run("", false).1);
    }

    #[test]
    fn idempotent() {
        let render: Vec<char> = "for (int i = 0; i < 10; i++) /* loop".chars().collect();
        let mut first = Vec::new();
        let mut second = Vec::new();
        let a = highlight_row(&render, Some(c_syntax()), false, &mut first);
        let b = highlight_row(&render, Some(c_syntax()), false, &mut second);
        assert_eq!(first, second);
        assert_eq!(a, b);
    }

    #[test]
    fn length_always_matches_render() {
        for text in ["", "a", "\"unterminated", "/*", "x\\", "1.2.3"] {
            assert_eq!(tags(text).len(), text.chars().count(), "{text:?}");
        }
    }
}
