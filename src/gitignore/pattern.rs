//! Gitignore-style glob pattern compilation.
//!
//! Translates one ignore pattern into an anchored regex over slash-normalized
//! relative paths. Negation, directory-only, and root-anchored markers are
//! parsed off the source line before translation.

use regex::Regex;

/// A single compiled ignore-style pattern.
///
/// Matching operates on paths relative to the directory that declared the
/// pattern, using `/` separators and no leading `./`.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
    /// For directory-only patterns: matches the directory path itself,
    /// without the descendant suffix.
    self_regex: Option<Regex>,
    negated: bool,
    dir_only: bool,
}

impl GlobPattern {
    /// Compile one pattern line. The line must already be trimmed and
    /// non-empty; comment filtering is the caller's job.
    pub fn compile(line: &str) -> Result<Self, regex::Error> {
        let mut pattern = line;

        let negated = pattern.starts_with('!');
        if negated {
            pattern = &pattern[1..];
        }

        let dir_only = pattern.ends_with('/');
        if dir_only {
            pattern = &pattern[..pattern.len() - 1];
        }

        // A leading slash anchors the pattern to the declaring directory;
        // everything else matches at any depth below it.
        let anchored = pattern.starts_with('/');
        if anchored {
            pattern = &pattern[1..];
        }

        let body = translate(pattern);
        let alternatives = if anchored {
            format!("(?:{body})")
        } else {
            format!("(?:{body}|.*/(?:{body}))")
        };

        let (regex, self_regex) = if dir_only {
            (
                Regex::new(&format!("^{alternatives}(?:/.*)?$"))?,
                Some(Regex::new(&format!("^{alternatives}$"))?),
            )
        } else {
            (Regex::new(&format!("^{alternatives}$"))?, None)
        };

        Ok(Self {
            source: line.to_string(),
            regex,
            self_regex,
            negated,
            dir_only,
        })
    }

    /// Test a slash-normalized relative path against this pattern.
    ///
    /// `is_dir` distinguishes a directory named like the pattern from a plain
    /// file: a directory-only pattern matches the directory itself and
    /// anything under it, but never a file of the same name.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if !self.regex.is_match(path) {
            return false;
        }
        if let Some(self_regex) = &self.self_regex
            && self_regex.is_match(path)
        {
            return is_dir;
        }
        true
    }

    /// Whether this pattern un-ignores matches instead of ignoring them.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Whether the pattern names one exact path: no glob metacharacters and
    /// no trailing slash.
    pub fn is_literal(&self) -> bool {
        !self.dir_only && !self.source.contains(['*', '?', '[', ']'])
    }

    /// The pattern text as written.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Translate a glob body to regex syntax.
///
/// `*` and `?` stay within one path segment; `**/` spans zero or more whole
/// segments; a bare or trailing `**` spans anything. Character classes pass
/// through, so an unbalanced bracket surfaces as a regex error.
fn translate(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_boundary = i == 0 || chars[i - 1] == '/';
                if at_boundary && chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:[^/]+/)*");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            '/' | '[' | ']' => {
                out.push(chars[i]);
                i += 1;
            }
            c => {
                out.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    out
}
