// unicode/property_data.rs - Character group tables.
//
// Perl and POSIX groups are fixed ASCII tables. The `\p{...}` properties
// are derived once from the standard library's character predicates and
// cached for the life of the process.

use std::sync::OnceLock;

use super::{Rune, MAX_RUNE};

/// A named group of characters, possibly negated (`\D`, `[:^alpha:]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharGroup {
    pub negated: bool,
    /// Clean (sorted, non-overlapping) `[lo, hi]` pairs.
    pub class: &'static [Rune],
}

const fn group(negated: bool, class: &'static [Rune]) -> CharGroup {
    CharGroup { negated, class }
}

// === Perl groups ===

const CODE_DIGIT: &[Rune] = &[0x30, 0x39];
const CODE_SPACE: &[Rune] = &[0x09, 0x0a, 0x0c, 0x0d, 0x20, 0x20];
const CODE_WORD: &[Rune] = &[0x30, 0x39, 0x41, 0x5a, 0x5f, 0x5f, 0x61, 0x7a];

static PERL_GROUPS: &[(&str, CharGroup)] = &[
    (r"\D", group(true, CODE_DIGIT)),
    (r"\S", group(true, CODE_SPACE)),
    (r"\W", group(true, CODE_WORD)),
    (r"\d", group(false, CODE_DIGIT)),
    (r"\s", group(false, CODE_SPACE)),
    (r"\w", group(false, CODE_WORD)),
];

// === POSIX groups ===

const CODE_ALNUM: &[Rune] = &[0x30, 0x39, 0x41, 0x5a, 0x61, 0x7a];
const CODE_ALPHA: &[Rune] = &[0x41, 0x5a, 0x61, 0x7a];
const CODE_ASCII: &[Rune] = &[0x00, 0x7f];
const CODE_BLANK: &[Rune] = &[0x09, 0x09, 0x20, 0x20];
const CODE_CNTRL: &[Rune] = &[0x00, 0x1f, 0x7f, 0x7f];
const CODE_GRAPH: &[Rune] = &[0x21, 0x7e];
const CODE_LOWER: &[Rune] = &[0x61, 0x7a];
const CODE_PRINT: &[Rune] = &[0x20, 0x7e];
const CODE_PUNCT: &[Rune] = &[0x21, 0x2f, 0x3a, 0x40, 0x5b, 0x60, 0x7b, 0x7e];
const CODE_POSIX_SPACE: &[Rune] = &[0x09, 0x0d, 0x20, 0x20];
const CODE_UPPER: &[Rune] = &[0x41, 0x5a];
const CODE_XDIGIT: &[Rune] = &[0x30, 0x39, 0x41, 0x46, 0x61, 0x66];

static POSIX_GROUPS: &[(&str, CharGroup)] = &[
    ("[:^alnum:]", group(true, CODE_ALNUM)),
    ("[:^alpha:]", group(true, CODE_ALPHA)),
    ("[:^ascii:]", group(true, CODE_ASCII)),
    ("[:^blank:]", group(true, CODE_BLANK)),
    ("[:^cntrl:]", group(true, CODE_CNTRL)),
    ("[:^digit:]", group(true, CODE_DIGIT)),
    ("[:^graph:]", group(true, CODE_GRAPH)),
    ("[:^lower:]", group(true, CODE_LOWER)),
    ("[:^print:]", group(true, CODE_PRINT)),
    ("[:^punct:]", group(true, CODE_PUNCT)),
    ("[:^space:]", group(true, CODE_POSIX_SPACE)),
    ("[:^upper:]", group(true, CODE_UPPER)),
    ("[:^word:]", group(true, CODE_WORD)),
    ("[:^xdigit:]", group(true, CODE_XDIGIT)),
    ("[:alnum:]", group(false, CODE_ALNUM)),
    ("[:alpha:]", group(false, CODE_ALPHA)),
    ("[:ascii:]", group(false, CODE_ASCII)),
    ("[:blank:]", group(false, CODE_BLANK)),
    ("[:cntrl:]", group(false, CODE_CNTRL)),
    ("[:digit:]", group(false, CODE_DIGIT)),
    ("[:graph:]", group(false, CODE_GRAPH)),
    ("[:lower:]", group(false, CODE_LOWER)),
    ("[:print:]", group(false, CODE_PRINT)),
    ("[:punct:]", group(false, CODE_PUNCT)),
    ("[:space:]", group(false, CODE_POSIX_SPACE)),
    ("[:upper:]", group(false, CODE_UPPER)),
    ("[:word:]", group(false, CODE_WORD)),
    ("[:xdigit:]", group(false, CODE_XDIGIT)),
];

pub(crate) fn perl_group(name: &str) -> Option<CharGroup> {
    PERL_GROUPS
        .binary_search_by_key(&name, |(n, _)| n)
        .ok()
        .map(|idx| PERL_GROUPS[idx].1)
}

pub(crate) fn posix_group(name: &str) -> Option<CharGroup> {
    POSIX_GROUPS
        .binary_search_by_key(&name, |(n, _)| n)
        .ok()
        .map(|idx| POSIX_GROUPS[idx].1)
}

// === Derived properties ===

const CODE_ANY: &[Rune] = &[0, MAX_RUNE];

type Predicate = fn(char) -> bool;

// Sorted by name.
static PROPERTIES: &[(&str, Predicate)] = &[
    ("Alphabetic", char::is_alphabetic),
    ("Cc", char::is_control),
    ("Lowercase", char::is_lowercase),
    ("N", char::is_numeric),
    ("Uppercase", char::is_uppercase),
    ("White_Space", char::is_whitespace),
];

static PROPERTY_TABLES: [OnceLock<Vec<Rune>>; 6] = [
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
];

/// Range table for a `\p{name}` property, or `None` if the name is unknown.
pub(crate) fn property_table(name: &str) -> Option<&'static [Rune]> {
    if name == "Any" {
        return Some(CODE_ANY);
    }
    let idx = PROPERTIES.binary_search_by_key(&name, |(n, _)| n).ok()?;
    let (prop, pred) = PROPERTIES[idx];
    let table = PROPERTY_TABLES[idx].get_or_init(|| {
        let table = build_table(pred);
        log::debug!("built property table {} ({} ranges)", prop, table.len() / 2);
        table
    });
    Some(table.as_slice())
}

fn build_table(pred: Predicate) -> Vec<Rune> {
    let mut table: Vec<Rune> = Vec::new();
    for c in (0..=MAX_RUNE).filter_map(char::from_u32) {
        if !pred(c) {
            continue;
        }
        let r = c as Rune;
        match table.last_mut() {
            Some(hi) if *hi + 1 == r => *hi = r,
            _ => table.extend_from_slice(&[r, r]),
        }
    }
    table
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(class: &[Rune], r: Rune) -> bool {
        class.chunks(2).any(|p| p[0] <= r && r <= p[1])
    }

    #[test]
    fn group_tables_are_sorted() {
        assert!(PERL_GROUPS.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(POSIX_GROUPS.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(PROPERTIES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(PROPERTIES.len(), PROPERTY_TABLES.len());
    }

    #[test]
    fn perl_lookup() {
        let d = perl_group(r"\d").unwrap();
        assert!(!d.negated);
        assert_eq!(d.class, &[0x30, 0x39]);
        assert!(perl_group(r"\W").unwrap().negated);
        assert!(perl_group(r"\q").is_none());
    }

    #[test]
    fn posix_lookup() {
        let g = posix_group("[:^space:]").unwrap();
        assert!(g.negated);
        assert!(contains(g.class, '\n' as Rune));
        assert!(posix_group("[:foo:]").is_none());
    }

    #[test]
    fn derived_tables() {
        let upper = property_table("Uppercase").unwrap();
        assert!(contains(upper, 'A' as Rune));
        assert!(contains(upper, 'Δ' as Rune));
        assert!(!contains(upper, 'a' as Rune));

        let n = property_table("N").unwrap();
        assert!(contains(n, '7' as Rune));
        assert!(contains(n, '٣' as Rune));
        assert!(!contains(n, 'x' as Rune));

        assert_eq!(property_table("Any").unwrap(), &[0, MAX_RUNE]);
        assert!(property_table("Klingon").is_none());
    }

    #[test]
    fn derived_tables_are_clean() {
        let t = property_table("White_Space").unwrap();
        assert_eq!(t.len() % 2, 0);
        for w in t.chunks(2).collect::<Vec<_>>().windows(2) {
            assert!(w[0][1] + 1 < w[1][0]);
        }
    }
}
