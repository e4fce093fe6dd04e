// prelude.rs - Convenient re-exports for the idiomatic API.
//
//! # Prelude
//!
//! ```
//! use ferroni_syntax::prelude::*;
//!
//! let parsed = ParsedPattern::new(r"a+|b").unwrap();
//! assert_eq!(parsed.root.op, Op::Alternate);
//! assert_eq!(parsed.root.to_string(), "a+|b");
//! ```

pub use crate::api::{ParsedPattern, PatternBuilder};
pub use crate::error::{Error, ErrorCode};
pub use crate::regexp::{Op, Regexp};
pub use crate::regsyntax::Flags;
