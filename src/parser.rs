//! Line-scanning parser for structured TODO comment blocks.
//!
//! Recognized block layout, expressed with a `//` line comment:
//!
//! ```text
//! // TODO: short title
//! // Labels: comma,separated,tags     (optional)
//! // free-text description line       (zero or more)
//! // Issue: https://tracker/issues/7  (present once tracked)
//! ```
//!
//! The scanner is a two-state automaton: `Idle` until a `TODO:` directive
//! opens a marker, `Collecting` until the comment run ends. A marker is
//! finalized the moment a non-comment line (or end of input) is reached
//! and never mutated again during the same scan.

use std::path::Path;

use crate::lang::Language;
use crate::marker::Marker;

/// Directive opening a marker.
const TITLE_DIRECTIVE: &str = "TODO:";
/// Directive carrying the label set for the open marker.
const LABELS_DIRECTIVE: &str = "Labels:";
/// Directive carrying an existing tracking reference.
pub(crate) const ISSUE_DIRECTIVE: &str = "Issue:";

/// Parser state: either between markers or collecting one.
enum ScanState {
    Idle,
    Collecting(Marker),
}

impl ScanState {
    /// Finalizes the open marker, if any, into `out`.
    fn finalize(&mut self, out: &mut Vec<Marker>) {
        if let ScanState::Collecting(marker) = std::mem::replace(self, ScanState::Idle) {
            out.push(marker);
        }
    }
}

/// Extracts the value following `directive` in a comment body.
///
/// The directive may appear anywhere in the body; there must be at least
/// one character after it. The returned value is not yet trimmed.
fn directive_value<'a>(body: &'a str, directive: &str) -> Option<&'a str> {
    let idx = body.find(directive)?;
    let rest = &body[idx + directive.len()..];
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Parses one file's text into the markers it contains.
///
/// Pure function of the inputs: no I/O, deterministic. `path` is only
/// recorded into each marker's location.
#[must_use]
pub fn parse(path: &Path, text: &str, language: &Language) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut state = ScanState::Idle;
    let mut in_block_comment = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_number = idx + 1;
        let trimmed = raw_line.trim();

        // Block tracking. A start token may share its line with content,
        // but a line carrying the end token is consumed entirely and is
        // never inspected for directives.
        if let Some(start) = language.block_comment_start {
            if trimmed.contains(start) {
                in_block_comment = true;
            }
        }
        if let Some(end) = language.block_comment_end {
            if trimmed.contains(end) {
                in_block_comment = false;
                continue;
            }
        }

        let body = if let Some(token) =
            language.line_comment.filter(|token| trimmed.starts_with(token))
        {
            Some(trimmed[token.len()..].trim())
        } else if in_block_comment {
            Some(trimmed)
        } else {
            None
        };

        let Some(body) = body else {
            state.finalize(&mut markers);
            continue;
        };

        match &mut state {
            ScanState::Idle => {
                if let Some(title) = directive_value(body, TITLE_DIRECTIVE) {
                    state = ScanState::Collecting(Marker::open(
                        path.to_path_buf(),
                        line_number,
                        title.trim().to_string(),
                    ));
                }
            }
            ScanState::Collecting(marker) => {
                if let Some(reference) = directive_value(body, ISSUE_DIRECTIVE) {
                    marker.tracking_ref = Some(reference.trim().to_string());
                } else if let Some(labels) = directive_value(body, LABELS_DIRECTIVE) {
                    marker.labels =
                        labels.trim().split(',').map(|label| label.trim().to_string()).collect();
                } else if !body.is_empty() {
                    marker.description.push(body.to_string());
                }
            }
        }
    }

    state.finalize(&mut markers);
    markers
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::lang::{Language, LanguageRegistry};
    use crate::marker::Marker;
    use std::path::Path;

    fn rust_lang() -> Language {
        LanguageRegistry::builtin().lookup("x.rs").unwrap().clone()
    }

    fn parse_rs(text: &str) -> Vec<Marker> {
        parse(Path::new("src/lib.rs"), text, &rust_lang())
    }

    #[test]
    fn parses_title_labels_and_description() {
        let markers = parse_rs("// TODO: fix bug\n// Labels: a,b\n// details here\n");
        assert_eq!(markers.len(), 1);
        let m = &markers[0];
        assert_eq!(m.title, "fix bug");
        assert_eq!(m.labels, vec!["a", "b"]);
        assert_eq!(m.description, vec!["details here"]);
        assert!(m.tracking_ref.is_none());
        assert_eq!(m.location.line, 1);
    }

    #[test]
    fn marker_finalizes_on_non_comment_line() {
        let markers = parse_rs("// TODO: one\n// first detail\nlet x = 1;\n// stray comment\n");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].description, vec!["first detail"]);
    }

    #[test]
    fn marker_finalizes_at_end_of_input() {
        let markers = parse_rs("fn main() {}\n// TODO: trailing");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "trailing");
        assert_eq!(markers[0].location.line, 2);
    }

    #[test]
    fn two_markers_separated_by_code_get_their_own_lines() {
        let text = "// TODO: first\nfn a() {}\n\n// TODO: second\n// more\n";
        let markers = parse_rs(text);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].location.line, 1);
        assert_eq!(markers[0].title, "first");
        assert_eq!(markers[1].location.line, 4);
        assert_eq!(markers[1].title, "second");
        assert_eq!(markers[1].description, vec!["more"]);
    }

    #[test]
    fn issue_directive_sets_tracking_ref() {
        let markers =
            parse_rs("// TODO: tracked already\n// Issue: https://tracker/issues/42\n");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].tracking_ref.as_deref(), Some("https://tracker/issues/42"));
    }

    #[test]
    fn last_directive_occurrence_wins() {
        let text = "// TODO: t\n// Labels: a\n// Labels: b,c\n// Issue: one\n// Issue: two\n";
        let markers = parse_rs(text);
        assert_eq!(markers[0].labels, vec!["b", "c"]);
        assert_eq!(markers[0].tracking_ref.as_deref(), Some("two"));
    }

    #[test]
    fn directive_lines_never_enter_the_description() {
        let text = "// TODO: t\n// Labels: a\n// real detail\n// Issue: ref\n";
        let markers = parse_rs(text);
        assert_eq!(markers[0].description, vec!["real detail"]);
    }

    #[test]
    fn empty_comment_bodies_are_dropped() {
        let text = "// TODO: t\n//\n// detail\n//   \n// more\n";
        let markers = parse_rs(text);
        assert_eq!(markers[0].description, vec!["detail", "more"]);
    }

    #[test]
    fn todo_inside_open_marker_joins_description() {
        // A second TODO: while collecting does not start a new marker;
        // the line is kept as description text of the open marker.
        let text = "// TODO: first\n// TODO: second\n";
        let markers = parse_rs(text);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "first");
        assert_eq!(markers[0].description, vec!["TODO: second"]);
    }

    #[test]
    fn title_may_follow_other_text_on_the_line() {
        let markers = parse_rs("// see TODO: tighten bounds\n");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "tighten bounds");
    }

    #[test]
    fn bare_todo_directive_without_text_is_ignored() {
        let markers = parse_rs("// TODO:\n// TODO: real one\n");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "real one");
    }

    #[test]
    fn block_comment_collects_marker_without_line_tokens() {
        let text = "/*\nTODO: inside block\nLabels: x\ndetail line\n*/\nfn main() {}\n";
        let markers = parse_rs(text);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "inside block");
        assert_eq!(markers[0].labels, vec!["x"]);
        assert_eq!(markers[0].description, vec!["detail line"]);
        assert_eq!(markers[0].location.line, 2);
    }

    #[test]
    fn single_line_block_comment_is_consumed_by_the_end_token() {
        // The closing token makes the whole line pure closing syntax, so
        // the title directive on it is never seen. Deliberate asymmetry
        // with block-start lines, which may carry content.
        let markers = parse_rs("/* TODO: x */\n");
        assert!(markers.is_empty());
    }

    #[test]
    fn block_end_line_does_not_finalize_via_description() {
        let text = "/*\nTODO: t\nlast detail\nclosing */\n";
        let markers = parse_rs(text);
        assert_eq!(markers.len(), 1);
        // The "closing */" line is skipped entirely, not recorded.
        assert_eq!(markers[0].description, vec!["last detail"]);
    }

    #[test]
    fn hash_comment_language_parses() {
        let registry = LanguageRegistry::builtin();
        let lang = registry.lookup("job.py").unwrap();
        let text = "# TODO: port this\n# Labels: chore\n# longer note\nprint('x')\n";
        let markers = parse(Path::new("job.py"), text, lang);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "port this");
        assert_eq!(markers[0].labels, vec!["chore"]);
    }

    #[test]
    fn html_block_only_language_parses() {
        let registry = LanguageRegistry::builtin();
        let lang = registry.lookup("page.html").unwrap();
        let text = "<!--\nTODO: rewrite header\nnotes\n-->\n<html></html>\n";
        let markers = parse(Path::new("page.html"), text, lang);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "rewrite header");
        assert_eq!(markers[0].description, vec!["notes"]);
    }

    #[test]
    fn labels_are_trimmed_but_not_deduplicated_here() {
        let markers = parse_rs("// TODO: t\n// Labels: a , b , a ,\n");
        // Dedup and empty-drop happen at issue creation, not in the parser.
        assert_eq!(markers[0].labels, vec!["a", "b", "a", ""]);
    }

    #[test]
    fn reparsing_an_annotated_file_is_idempotent() {
        let original = "// TODO: fix bug\n// details here\n";
        let annotated = "// TODO: fix bug\n// Issue: https://tracker/issues/7\n// details here\n";
        let before = parse_rs(original);
        let after = parse_rs(annotated);
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].title, before[0].title);
        assert_eq!(after[0].description, before[0].description);
        assert!(after[0].is_tracked());
        assert!(crate::marker::unprocessed(after).is_empty());
    }
}
