// api.rs - Idiomatic front end for the parser.
//
// Wraps `regparse::parse_pattern` with Rust-native types: ParsedPattern
// (the tree plus its capture table) and PatternBuilder.

use std::collections::HashMap;

use crate::error::Result;
use crate::regexp::Regexp;
use crate::regparse::{parse_pattern, DEFAULT_NEST_LIMIT};
use crate::regsyntax::Flags;

/// A parsed, normalized pattern.
///
/// # Examples
///
/// ```
/// use ferroni_syntax::api::ParsedPattern;
///
/// let parsed = ParsedPattern::new(r"(?P<year>\d{4})-(\d{2})").unwrap();
/// assert_eq!(parsed.captures_len, 2);
/// assert_eq!(parsed.name_index("year"), Some(1));
/// assert_eq!(parsed.root.to_string(), r"(?P<year>[0-9]{4})-([0-9]{2})");
/// ```
#[derive(Debug, Clone)]
pub struct ParsedPattern {
    /// Root of the tree.
    pub root: Regexp,
    /// Number of capture groups (excluding group 0).
    pub captures_len: usize,
    /// Capture name to 1-based group index.
    pub names: HashMap<String, usize>,
}

impl ParsedPattern {
    /// Parse a pattern using Perl syntax.
    pub fn new(pattern: &str) -> Result<ParsedPattern> {
        PatternBuilder::new(pattern).build()
    }

    /// Create a [`PatternBuilder`] for fine-grained control over parsing.
    pub fn builder(pattern: &str) -> PatternBuilder {
        PatternBuilder::new(pattern)
    }

    /// Index of the capture group called `name`.
    pub fn name_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Capture names indexed by group number; see [`Regexp::cap_names`].
    pub fn cap_names(&self) -> Vec<Option<String>> {
        let mut names = vec![None; self.captures_len + 1];
        for (name, &i) in &self.names {
            names[i] = Some(name.clone());
        }
        names
    }

    /// The tree with counted repetition rewritten; see [`Regexp::simplify`].
    pub fn simplified(&self) -> Regexp {
        self.root.simplify()
    }

    pub fn into_root(self) -> Regexp {
        self.root
    }
}

// === PatternBuilder ===

/// Builder for parsing a pattern with custom flags.
///
/// Starts from [`Flags::PERL`]; each setter turns one behavior on or off.
///
/// # Examples
///
/// ```
/// use ferroni_syntax::api::PatternBuilder;
///
/// let parsed = PatternBuilder::new("hello")
///     .case_insensitive(true)
///     .build()
///     .unwrap();
/// assert_eq!(parsed.root.dump(), "strfold{HELLO}");
/// ```
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    pattern: String,
    flags: Flags,
    nest_limit: u32,
}

impl PatternBuilder {
    /// Create a new builder for the given pattern.
    pub fn new(pattern: &str) -> Self {
        PatternBuilder {
            pattern: pattern.to_string(),
            flags: Flags::PERL,
            nest_limit: DEFAULT_NEST_LIMIT,
        }
    }

    fn set(mut self, flag: Flags, yes: bool) -> Self {
        self.flags.set(flag, yes);
        self
    }

    /// Enable or disable case-insensitive matching.
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.set(Flags::FOLD_CASE, yes)
    }

    /// Enable or disable `.` matching `\n`.
    pub fn dot_matches_newline(self, yes: bool) -> Self {
        self.set(Flags::DOT_NL, yes)
    }

    /// Enable or disable `^`/`$` matching at every line boundary.
    pub fn multi_line(self, yes: bool) -> Self {
        self.set(Flags::ONE_LINE, !yes)
    }

    /// Make repetition operators non-greedy by default (`?` makes them greedy).
    pub fn swap_greed(self, yes: bool) -> Self {
        self.set(Flags::NON_GREEDY, yes)
    }

    /// Treat the whole pattern as a literal string.
    pub fn literal(self, yes: bool) -> Self {
        self.set(Flags::LITERAL, yes)
    }

    /// Enable or disable Perl extensions such as `(?i)`, `\d` and `\A`.
    pub fn perl_extensions(self, yes: bool) -> Self {
        self.set(Flags::PERL_X, yes)
    }

    /// Enable or disable `\p{Name}` Unicode groups.
    pub fn unicode_groups(self, yes: bool) -> Self {
        self.set(Flags::UNICODE_GROUPS, yes)
    }

    /// Replace all flags at once.
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Maximum depth of groups and stacked repetitions (default 1000).
    pub fn nest_limit(mut self, limit: u32) -> Self {
        self.nest_limit = limit;
        self
    }

    /// Parse the pattern.
    pub fn build(&self) -> Result<ParsedPattern> {
        parse_pattern(&self.pattern, self.flags, self.nest_limit)
    }
}
