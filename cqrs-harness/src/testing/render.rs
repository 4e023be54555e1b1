//! Plain-text rendering of match reports and message diffs.

use yansi::Paint;

use super::MatchResult;

pub(crate) const DETAIL_PREFIX: &str = "  | ";
const CHILD_PREFIX: &str = "    ";

/// Largest token grid handed to the LCS diff. Bigger differences are shown
/// as one deleted block followed by one inserted block.
const MAX_DIFF_CELLS: usize = 1 << 20;

/// Write `result` and its children depth-first.
pub(crate) fn write_result(out: &mut String, result: &MatchResult, color: bool) {
    let glyph = if result.passed() { "✓" } else { "✗" };
    let heading = format!("{glyph} {}", result.title());
    if !color {
        out.push_str(&heading);
    } else if result.passed() {
        out.push_str(&heading.green().to_string());
    } else {
        out.push_str(&heading.red().to_string());
    }

    if !result.message().is_empty() {
        out.push_str(" (");
        out.push_str(result.message());
        out.push(')');
    }
    out.push('\n');

    let details = result.details().trim();
    let hint = result.hint();

    if !details.is_empty() || !hint.is_empty() {
        out.push('\n');
        let mut block = String::new();
        if !details.is_empty() {
            block.push_str(details);
            block.push('\n');
        }
        if !hint.is_empty() {
            if !details.is_empty() {
                block.push('\n');
            }
            block.push_str("Hint: ");
            block.push_str(hint);
            block.push('\n');
        }
        out.push_str(&indent(&block, DETAIL_PREFIX));
    }

    if !result.children().is_empty() {
        let mut children = String::new();
        for child in result.children() {
            write_result(&mut children, child, color);
        }
        out.push_str(&indent(&children, CHILD_PREFIX));
    }
}

/// Prefix every line of `text` with `prefix`.
///
/// Blank lines are prefixed too, with trailing whitespace trimmed, so a
/// detail block reads as one continuous gutter.
pub(crate) fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len() + prefix.len() * 4);
    for line in text.split_inclusive('\n') {
        let (content, newline) = match line.strip_suffix('\n') {
            Some(content) => (content, "\n"),
            None => (line, ""),
        };
        if content.is_empty() {
            out.push_str(prefix.trim_end());
        } else {
            out.push_str(prefix);
            out.push_str(content);
        }
        out.push_str(newline);
    }
    out
}

/// Token-level diff of two renderings.
///
/// Text only present in `expected` is shown as `[-deleted-]`, text only
/// present in `actual` as `{+inserted+}`. Tokens are runs of word
/// characters, runs of whitespace, or single punctuation characters.
///
/// The common prefix and suffix are kept as is. If what differs between
/// them is larger than [`MAX_DIFF_CELLS`] allows, it is marked as a single
/// replacement instead of being diffed token by token.
pub(crate) fn diff(expected: &str, actual: &str, color: bool) -> String {
    let left = tokenize(expected);
    let right = tokenize(actual);

    let prefix = left.iter().zip(&right).take_while(|(l, r)| l == r).count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(l, r)| l == r)
        .count();
    let left_middle = &left[prefix..left.len() - suffix];
    let right_middle = &right[prefix..right.len() - suffix];

    let mut out = left[..prefix].concat();
    let mut deleted = String::new();
    let mut inserted = String::new();

    if left_middle.len().saturating_mul(right_middle.len()) > MAX_DIFF_CELLS {
        tracing::debug!(
            expected_tokens = left_middle.len(),
            actual_tokens = right_middle.len(),
            "diff too large, marking whole block"
        );
        deleted = left_middle.concat();
        inserted = right_middle.concat();
    } else {
        for change in diff::slice(left_middle, right_middle) {
            match change {
                diff::Result::Left(token) => deleted.push_str(token),
                diff::Result::Right(token) => inserted.push_str(token),
                diff::Result::Both(token, _) => {
                    flush(&mut out, &mut deleted, &mut inserted, color);
                    out.push_str(token);
                }
            }
        }
    }
    flush(&mut out, &mut deleted, &mut inserted, color);
    out.push_str(&left[left.len() - suffix..].concat());
    out
}

fn flush(out: &mut String, deleted: &mut String, inserted: &mut String, color: bool) {
    if !deleted.is_empty() {
        let marked = format!("[-{deleted}-]");
        if color {
            out.push_str(&marked.cyan().to_string());
        } else {
            out.push_str(&marked);
        }
        deleted.clear();
    }
    if !inserted.is_empty() {
        let marked = format!("{{+{inserted}+}}");
        if color {
            out.push_str(&marked.yellow().to_string());
        } else {
            out.push_str(&marked);
        }
        inserted.clear();
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    #[derive(PartialEq)]
    enum Kind {
        Word,
        Space,
        Other,
    }

    fn kind(c: char) -> Kind {
        if c.is_alphanumeric() || c == '_' {
            Kind::Word
        } else if c.is_whitespace() {
            Kind::Space
        } else {
            Kind::Other
        }
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<Kind> = None;

    for (i, c) in text.char_indices() {
        let k = kind(c);
        let continues = match &current {
            Some(prev) => *prev == k && k != Kind::Other,
            None => false,
        };
        if !continues {
            if i > start {
                tokens.push(&text[start..i]);
            }
            start = i;
        }
        current = Some(k);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tokenize_splits_words_spaces_and_punctuation() {
        assert_eq!(
            tokenize(r#"name: "Wrong Name","#),
            vec!["name", ":", " ", "\"", "Wrong", " ", "Name", "\"", ","]
        );
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn diff_marks_replaced_words() {
        assert_eq!(
            diff(r#"name: "Bob""#, r#"name: "Wrong Name""#, false),
            r#"name: "[-Bob-]{+Wrong Name+}""#
        );
    }

    #[test]
    fn diff_of_equal_text_is_unmarked() {
        assert_eq!(diff("Credited { amount: 5 }", "Credited { amount: 5 }", false), "Credited { amount: 5 }");
    }

    #[test]
    fn diff_marks_pure_insertions_and_deletions() {
        assert_eq!(diff("Box<Debited>", "Debited", false), "[-Box<-]Debited[->-]");
        assert_eq!(diff("Debited", "Option<Debited>", false), "{+Option<+}Debited{+>+}");
    }

    #[test]
    fn large_change_is_marked_as_one_block() {
        let expected: Vec<u32> = (0..4000).collect();
        let mut actual = expected.clone();
        actual[0] = 9999;
        actual[3999] = 9999;

        let out = diff(&format!("{expected:#?}"), &format!("{actual:#?}"), false);
        assert!(out.starts_with("[\n    [-0,\n    1,\n"));
        assert!(out.contains("3999-]{+9999,\n    1,\n"));
        assert!(out.ends_with("9999+},\n]"));
        assert_eq!(out.matches("[-").count(), 1);
        assert_eq!(out.matches("{+").count(), 1);
    }

    #[test]
    fn large_rendering_with_small_change_stays_precise() {
        let expected: Vec<u32> = (0..4000).collect();
        let mut actual = expected.clone();
        actual[2000] = 9999;

        let out = diff(&format!("{expected:#?}"), &format!("{actual:#?}"), false);
        assert!(out.contains("    1999,\n    [-2000-]{+9999+},\n    2001,\n"));
        assert_eq!(out.matches("[-").count(), 1);
        assert!(out.ends_with("    3999,\n]"));
    }

    #[test]
    fn coloured_diff_keeps_markers_and_text() {
        let out = diff("Bob", "Alice", true);
        assert!(out.contains("[-Bob-]"));
        assert!(out.contains("{+Alice+}"));
        assert!(out.contains('\u{1b}'));
    }

    #[test]
    fn indent_prefixes_every_line() {
        assert_eq!(indent("a\n\nb\n", "  | "), "  | a\n  |\n  | b\n");
        assert_eq!(indent("a", "    "), "    a");
    }

    #[test]
    fn renders_leaf_with_details_and_hint() {
        let result = MatchResult::new("record specific 'Debited' event")
            .with_message("this event was not recorded")
            .with_details("Debited {\n    amount: [-5-]{+6+},\n}")
            .with_hint("Check the type of the message.");

        assert_eq!(
            result.render(false),
            "✗ record specific 'Debited' event (this event was not recorded)\n\
             \n  | Debited {\
             \n  |     amount: [-5-]{+6+},\
             \n  | }\
             \n  |\
             \n  | Hint: Check the type of the message.\n"
        );
    }

    #[test]
    fn renders_children_one_level_deeper() {
        let mut result = MatchResult::new("all of")
            .with_message("1 of 2 sub-matchers passed, expected all");
        result.append(MatchResult::new("record any 'Credited' event").with_passed(true));
        result.append(
            MatchResult::new("record any 'Debited' event")
                .with_message("no events of this type were recorded"),
        );

        assert_eq!(
            result.to_string(),
            "✗ all of (1 of 2 sub-matchers passed, expected all)\n\
             \x20   ✓ record any 'Credited' event\n\
             \x20   ✗ record any 'Debited' event (no events of this type were recorded)\n"
        );
    }

    #[test]
    fn coloured_heading() {
        let passed = MatchResult::new("ok").with_passed(true).render(true);
        let failed = MatchResult::new("bad").render(true);
        assert!(passed.starts_with('\u{1b}'));
        assert!(passed.contains("✓ ok"));
        assert!(failed.contains("✗ bad"));
    }
}
