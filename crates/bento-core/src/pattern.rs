//! Path-pattern compiler and matcher
//!
//! Patterns follow gitignore-like semantics: `*`/`?` match within one path
//! segment, `**` spans segments, a leading `/` anchors to the root, a leading
//! `!` negates. Compilation is bespoke: each pattern becomes one anchored
//! regular expression plus a negation flag.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::BentoError;
use crate::result::Result;

/// One compiled path pattern. Immutable once compiled.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    negate: bool,
    matcher: Regex,
}

/// Outcome of evaluating an ordered pattern list against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMatch {
    /// At least one positive pattern matched and no negated pattern did
    Matched,
    /// A negated pattern matched; vetoes the path regardless of position
    Negated,
    /// No pattern matched at all
    None,
}

impl Pattern {
    /// Compile one pattern string into a matching predicate.
    pub fn compile(raw: &str) -> Result<Pattern> {
        let mut rest = raw;
        let negate = rest.starts_with('!');
        if negate {
            rest = &rest[1..];
        }

        let anchored = rest.starts_with('/');
        let prefix = if anchored { "^" } else { "^(.*/)?" };

        let chars: Vec<char> = rest.chars().collect();
        let len = chars.len();
        let mut body = String::new();
        let mut i = 0;

        while i < len {
            match chars[i] {
                '*' if i + 1 < len && chars[i + 1] == '*' => {
                    let preceded = i == 0 || chars[i - 1] == '/';
                    if !preceded {
                        return Err(BentoError::pattern(raw, "`**` not preceded by a slash"));
                    }
                    if i + 2 < len && chars[i + 2] == '/' {
                        // "**/": zero or more whole path segments
                        body.push_str("(.*/)?");
                        i += 3;
                    } else if i + 2 == len {
                        // trailing "**": anything below this point
                        body.push_str(".*");
                        i += 2;
                    } else {
                        return Err(BentoError::pattern(raw, "`**` not followed by a slash"));
                    }
                }
                '*' => {
                    body.push_str("[^/]*");
                    i += 1;
                }
                '?' => {
                    body.push_str("[^/]");
                    i += 1;
                }
                '[' => {
                    let mut j = i + 1;
                    while j < len && chars[j] != ']' {
                        j += 1;
                    }
                    if j == len {
                        return Err(BentoError::pattern(raw, "unterminated `[` character class"));
                    }
                    body.push('[');
                    for &c in &chars[i + 1..j] {
                        body.push(c);
                    }
                    body.push(']');
                    i = j + 1;
                }
                c => {
                    body.push_str(&regex::escape(&c.to_string()));
                    i += 1;
                }
            }
        }

        // A negated directory pattern also excludes everything beneath it; a
        // positive pattern without a trailing slash may match a file or a
        // same-named directory.
        let suffix = if negate {
            if rest.ends_with('/') { ".*" } else { "(/.*)?" }
        } else if !rest.ends_with('/') {
            "/?"
        } else {
            ""
        };

        let source = format!("{prefix}{body}{suffix}$");
        let matcher = Regex::new(&source)
            .map_err(|e| BentoError::pattern(raw, format!("compiled to invalid regex: {e}")))?;

        Ok(Pattern {
            raw: raw.to_string(),
            negate,
            matcher,
        })
    }

    /// Compile a list of pattern strings, failing on the first bad one.
    pub fn compile_all<S: AsRef<str>>(raws: &[S]) -> Result<Vec<Pattern>> {
        raws.iter().map(|r| Pattern::compile(r.as_ref())).collect()
    }

    /// The original pattern string, including any `!` prefix.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether this pattern vetoes rather than selects.
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// Test the compiled predicate against a pre-relativized candidate.
    fn accepts(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}

/// Build the candidate string the matchers run against:
/// `"/" + <path relative to root> + ("/" if directory)`.
///
/// Relative input paths are resolved against the explicit `root`; the
/// matching engine never consults ambient process state.
fn candidate_string(path: &Path, is_dir: bool, root: &Path) -> String {
    let joined: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    let relative = joined.strip_prefix(root).unwrap_or(joined.as_path());

    let mut candidate = String::from("/");
    let mut first = true;
    for component in relative.components() {
        if let std::path::Component::Normal(part) = component {
            if !first {
                candidate.push('/');
            }
            candidate.push_str(&part.to_string_lossy());
            first = false;
        }
    }
    if is_dir && !candidate.ends_with('/') {
        candidate.push('/');
    }
    candidate
}

/// Evaluate an ordered pattern list against one path.
///
/// A matching negated pattern wins immediately, regardless of its position in
/// the list; this is not "last match wins". A positive match is recorded but
/// scanning continues so that a later negation can still veto.
pub fn match_path(patterns: &[Pattern], path: &Path, is_dir: bool, root: &Path) -> PatternMatch {
    let candidate = candidate_string(path, is_dir, root);

    let mut matched = false;
    for pattern in patterns {
        if pattern.accepts(&candidate) {
            if pattern.negate {
                return PatternMatch::Negated;
            }
            matched = true;
        }
    }

    if matched {
        PatternMatch::Matched
    } else {
        PatternMatch::None
    }
}

/// One-off membership test against raw pattern strings, compiling on the fly.
pub fn matches_path<S: AsRef<str>>(
    raws: &[S],
    path: &Path,
    is_dir: bool,
    root: &Path,
) -> Result<bool> {
    let patterns = Pattern::compile_all(raws)?;
    Ok(match_path(&patterns, path, is_dir, root) == PatternMatch::Matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/project")
    }

    fn matches(raw: &str, rel: &str, is_dir: bool) -> bool {
        let p = Pattern::compile(raw).unwrap();
        let path = root().join(rel);
        match match_path(&[p], &path, is_dir, &root()) {
            PatternMatch::Matched => true,
            _ => false,
        }
    }

    #[test]
    fn plain_name_matches_at_any_depth() {
        assert!(matches("foo.js", "foo.js", false));
        assert!(matches("foo.js", "src/deep/foo.js", false));
        assert!(!matches("foo.js", "foo.jsx", false));
    }

    #[test]
    fn leading_slash_anchors_to_root() {
        assert!(matches("/foo.js", "foo.js", false));
        assert!(!matches("/foo.js", "src/foo.js", false));
    }

    #[test]
    fn star_does_not_cross_segments() {
        assert!(matches("*.js", "a.js", false));
        assert!(matches("*.js", "src/a.js", false));
        assert!(!matches("src*.js", "src/a.js", false));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(matches("a?.js", "ab.js", false));
        assert!(!matches("a?.js", "a.js", false));
        assert!(!matches("a?.js", "a/b.js", false));
    }

    #[test]
    fn double_star_spans_segments() {
        assert!(matches("src/**/test.js", "src/test.js", false));
        assert!(matches("src/**/test.js", "src/a/b/test.js", false));
        assert!(matches("src/**", "src/a/b/c.js", false));
        assert!(matches("**", "anything/at/all", false));
    }

    #[test]
    fn misplaced_double_star_is_an_error() {
        assert!(Pattern::compile("a**").is_err());
        assert!(Pattern::compile("**b").is_err());
        assert!(Pattern::compile("a/b**/c").is_err());
    }

    #[test]
    fn character_class_is_copied() {
        assert!(matches("file[0-9].js", "file3.js", false));
        assert!(!matches("file[0-9].js", "fileX.js", false));
        assert!(Pattern::compile("file[0-9.js").is_err());
    }

    #[test]
    fn positive_pattern_matches_same_named_directory() {
        assert!(matches("build", "build", true));
        assert!(matches("build", "build", false));
        // trailing slash restricts to directories
        assert!(matches("build/", "build", true));
        assert!(!matches("build/", "build", false));
    }

    #[test]
    fn negated_pattern_covers_subtree() {
        let p = Pattern::compile("!b").unwrap();
        assert!(p.is_negated());
        assert!(p.accepts("/b"));
        assert!(p.accepts("/b/"));
        assert!(p.accepts("/b/c"));
        assert!(!p.accepts("/bc"));
    }

    #[test]
    fn negation_wins_regardless_of_order() {
        let before = Pattern::compile_all(&["!b", "**"]).unwrap();
        let after = Pattern::compile_all(&["**", "!b"]).unwrap();
        let path = root().join("b");

        assert_eq!(
            match_path(&before, &path, true, &root()),
            PatternMatch::Negated
        );
        assert_eq!(
            match_path(&after, &path, true, &root()),
            PatternMatch::Negated
        );
    }

    #[test]
    fn no_match_yields_none() {
        let patterns = Pattern::compile_all(&["*.js"]).unwrap();
        assert_eq!(
            match_path(&patterns, &root().join("a.rs"), false, &root()),
            PatternMatch::None
        );
    }

    #[test]
    fn compilation_is_deterministic_and_idempotent() {
        for _ in 0..3 {
            let p = Pattern::compile("src/**/*.js").unwrap();
            for _ in 0..3 {
                assert!(p.accepts("/src/a/b.js"));
                assert!(!p.accepts("/lib/a/b.js"));
            }
        }
    }

    #[test]
    fn convenience_entry_point_compiles_on_the_fly() {
        assert!(matches_path(&["*.md"], &root().join("README.md"), false, &root()).unwrap());
        assert!(!matches_path(&["*.md"], &root().join("main.rs"), false, &root()).unwrap());
        assert!(matches_path(&["a**"], &root().join("ab"), false, &root()).is_err());
    }
}
