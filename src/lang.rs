//! Comment-syntax registry keyed by file extension.
//!
//! The registry is immutable after construction and passed explicitly to
//! whatever needs it; there is no global table.

/// Comment syntax for one language (or a family sharing the same syntax).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// File extensions covered, each including the leading dot.
    pub extensions: Vec<&'static str>,
    /// Token opening a single-line comment (e.g. `//`), if the language
    /// has one. Write-back requires it.
    pub line_comment: Option<&'static str>,
    /// Token opening a block comment (e.g. `/*`), if the language has one.
    pub block_comment_start: Option<&'static str>,
    /// Token closing a block comment (e.g. `*/`), if the language has one.
    pub block_comment_end: Option<&'static str>,
}

/// Immutable mapping from file extension to comment syntax.
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    /// Builds the registry of supported languages.
    #[must_use]
    pub fn builtin() -> Self {
        let languages = vec![
            entry(&[".go"], Some("//"), None, None),
            entry(
                &[
                    ".java", ".js", ".ts", ".jsx", ".tsx", ".c", ".cpp", ".cs", ".h", ".hpp",
                    ".swift", ".kt", ".rs", ".php", ".scala", ".groovy",
                ],
                Some("//"),
                Some("/*"),
                Some("*/"),
            ),
            entry(&[".py", ".rb", ".pl", ".r", ".sh", ".bash"], Some("#"), None, None),
            entry(&[".lua"], Some("--"), None, None),
            entry(&[".sql"], Some("--"), Some("/*"), Some("*/")),
            entry(&[".html", ".xml"], None, Some("<!--"), Some("-->")),
            entry(&[".css"], None, Some("/*"), Some("*/")),
            entry(&[".ex", ".exs"], Some("#"), None, None),
            entry(&[".erl", ".hrl"], Some("%"), None, None),
            entry(&[".hs"], Some("--"), Some("{-"), Some("-}")),
            entry(&[".ps1"], Some("#"), None, None),
            entry(&[".fs"], Some("//"), Some("(*"), Some("*)")),
            entry(&[".m"], Some("//"), Some("/*"), Some("*/")),
            entry(&[".md", ".markdown"], Some("//"), None, None),
        ];
        Self { languages }
    }

    /// Resolves the language for a filename by its extension.
    ///
    /// Matching is exact and case-sensitive, including the leading dot.
    /// Returns `None` for unrecognized extensions; callers treat that as
    /// "skip this file", not as an error.
    #[must_use]
    pub fn lookup(&self, filename: &str) -> Option<&Language> {
        let ext = extension_of(filename)?;
        self.languages.iter().find(|lang| lang.extensions.contains(&ext))
    }
}

/// Extracts the extension of a filename, including the leading dot.
fn extension_of(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.rfind('.').map(|idx| &name[idx..])
}

fn entry(
    extensions: &[&'static str],
    line_comment: Option<&'static str>,
    block_comment_start: Option<&'static str>,
    block_comment_end: Option<&'static str>,
) -> Language {
    Language {
        extensions: extensions.to_vec(),
        line_comment,
        block_comment_start,
        block_comment_end,
    }
}
