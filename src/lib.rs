//! # Ferroni Syntax
//!
//! Regular expression parser that turns a pattern string into a normalized
//! syntax tree, ready for a compiler to consume.
//!
//! The parser is a stack machine over a character cursor. As it goes it
//! merges adjacent literals, folds case, rewrites trivial classes into
//! literals, and factors common prefixes out of alternations, so the tree
//! it returns is already in canonical form.
//!
//! ## Quick Start
//!
//! ```rust
//! use ferroni_syntax::prelude::*;
//!
//! let parsed = ParsedPattern::new(r"abc|abd|x\d+").unwrap();
//! assert_eq!(parsed.root.to_string(), r"ab(?:c|d)|x[0-9]+");
//! assert_eq!(parsed.root.dump(), "alt{cat{str{ab}alt{lit{c}lit{d}}}cat{lit{x}plus{cc{0x30-0x39}}}}");
//! ```
//!
//! For fine-grained control, use [`PatternBuilder`](api::PatternBuilder):
//!
//! ```rust
//! use ferroni_syntax::prelude::*;
//!
//! let parsed = PatternBuilder::new(r"(?P<word>\w+)")
//!     .case_insensitive(true)
//!     .build()
//!     .unwrap();
//! assert_eq!(parsed.captures_len, 1);
//! assert_eq!(parsed.name_index("word"), Some(1));
//! ```
//!
//! ## Low-Level API
//!
//! The parser entry point takes raw [`Flags`](regsyntax::Flags):
//!
//! ```rust
//! use ferroni_syntax::regparse::parse;
//! use ferroni_syntax::regsyntax::Flags;
//!
//! let re = parse("a**", Flags::POSIX).unwrap();
//! assert_eq!(re.dump(), "star{star{lit{a}}}");
//! assert_eq!(re.simplify().dump(), "star{lit{a}}");
//!
//! let err = parse("a**", Flags::PERL).unwrap_err();
//! assert_eq!(err.to_string(), "error parsing regexp: invalid nested repetition operator: `**`");
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`cursor`] | Character cursor over the pattern |
//! | [`unicode`] | Simple case folding and character groups |
//! | [`regexp`] | Syntax tree nodes, equality, printing |
//! | [`regparse`] | Parser stack machine and escapes |
//! | [`regclass`] | Bracket classes and range algebra |
//! | [`regfactor`] | Collapsing and prefix factoring |
//! | [`regsimplify`] | Counted repetition rewriting |
//! | [`regsyntax`] | Flags and dialect presets |
//! | [`error`] | Error codes and messages |
//! | [`api`] | `ParsedPattern` and `PatternBuilder` |

// Enable #[coverage(off)] attribute when running under cargo-llvm-cov on nightly.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod cursor;
pub mod error;
pub mod prelude;
pub mod regclass;
pub mod regexp;
pub mod regfactor;
pub mod regparse;
pub mod regsimplify;
pub mod regsyntax;
pub mod unicode;
