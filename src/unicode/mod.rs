// unicode/mod.rs - Unicode simple case folding and character groups.
//
// Folding walks the cyclic orbit of code points that compare equal under
// simple case folding. Irregular orbits (three or more members, or members
// that do not round-trip through upper/lower case) come from a sorted
// table; everything else folds through its single-character case pair.

mod fold_data;
mod property_data;

use fold_data::CASE_ORBIT;

pub(crate) use property_data::{perl_group, posix_group, property_table, CharGroup};

/// A Unicode code point. Values above [`MAX_RUNE`] never occur in a tree.
pub type Rune = u32;

/// Largest valid code point.
pub const MAX_RUNE: Rune = 0x10FFFF;

/// Smallest code point with a nontrivial fold orbit.
pub const MIN_FOLD: Rune = 0x0041;

/// Largest code point with a nontrivial fold orbit.
pub const MAX_FOLD: Rune = 0x1E943;

// No fold orbit has more than four members.
const MAX_ORBIT: usize = 4;

/// Returns the next code point in `r`'s fold orbit, or `r` itself when
/// the orbit has only one member.
///
/// Repeated application always cycles back to `r`:
///
/// ```
/// use ferroni_syntax::unicode::simple_fold;
///
/// assert_eq!(simple_fold('K' as u32), 'k' as u32);
/// assert_eq!(simple_fold('k' as u32), 0x212A); // KELVIN SIGN
/// assert_eq!(simple_fold(0x212A), 'K' as u32);
/// assert_eq!(simple_fold('1' as u32), '1' as u32);
/// ```
pub fn simple_fold(r: Rune) -> Rune {
    if !(MIN_FOLD..=MAX_FOLD).contains(&r) {
        return r;
    }
    if let Ok(idx) = CASE_ORBIT.binary_search_by_key(&r, |&(from, _)| from) {
        return CASE_ORBIT[idx].1;
    }
    let Some(c) = char::from_u32(r) else {
        return r;
    };
    if let Some(l) = single(c.to_lowercase()) {
        if l != c && single(l.to_uppercase()) == Some(c) {
            return l as Rune;
        }
    }
    if let Some(u) = single(c.to_uppercase()) {
        if u != c && single(u.to_lowercase()) == Some(c) {
            return u as Rune;
        }
    }
    r
}

/// The smallest member of `r`'s fold orbit. Code points outside
/// `MIN_FOLD..=MAX_FOLD` are returned unchanged.
pub fn min_fold_rune(r: Rune) -> Rune {
    if !(MIN_FOLD..=MAX_FOLD).contains(&r) {
        return r;
    }
    let mut min = r;
    let mut f = simple_fold(r);
    for _ in 0..MAX_ORBIT {
        if f == r {
            break;
        }
        min = min.min(f);
        f = simple_fold(f);
    }
    min
}

/// True when `a` and `b` form a complete two-member fold orbit.
pub(crate) fn is_fold_pair(a: Rune, b: Rune) -> bool {
    a != b && simple_fold(a) == b && simple_fold(b) == a
}

fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let c = it.next()?;
    match it.next() {
        None => Some(c),
        Some(_) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit(r: Rune) -> Vec<Rune> {
        let mut out = vec![r];
        let mut f = simple_fold(r);
        while f != r {
            assert!(out.len() < 8, "orbit of {:#x} does not close", r);
            out.push(f);
            f = simple_fold(f);
        }
        out
    }

    #[test]
    fn orbit_table_is_sorted() {
        assert!(CASE_ORBIT.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn orbit_table_is_closed() {
        for &(from, _) in CASE_ORBIT {
            let members = orbit(from);
            for m in &members {
                assert_eq!(orbit(*m).len(), members.len());
            }
        }
    }

    #[test]
    fn kelvin_orbit() {
        assert_eq!(orbit('K' as Rune), vec!['K' as Rune, 'k' as Rune, 0x212A]);
        assert_eq!(min_fold_rune(0x212A), 'K' as Rune);
        assert_eq!(min_fold_rune('k' as Rune), 'K' as Rune);
    }

    #[test]
    fn plain_pairs() {
        assert_eq!(simple_fold('a' as Rune), 'A' as Rune);
        assert_eq!(simple_fold('A' as Rune), 'a' as Rune);
        assert_eq!(simple_fold('é' as Rune), 'É' as Rune);
        assert_eq!(simple_fold('Ж' as Rune), 'ж' as Rune);
        assert!(is_fold_pair('x' as Rune, 'X' as Rune));
        assert!(!is_fold_pair('k' as Rune, 'K' as Rune));
    }

    #[test]
    fn sigma_orbit() {
        let o = orbit(0x03A3);
        assert_eq!(o.len(), 3);
        assert!(o.contains(&0x03C2));
        assert!(o.contains(&0x03C3));
        assert_eq!(min_fold_rune(0x03C2), 0x03A3);
    }

    #[test]
    fn titlecase_greek_pairs() {
        // The full uppercase of these is two characters, but each has a
        // single-character simple fold partner.
        assert_eq!(simple_fold(0x1F80), 0x1F88);
        assert_eq!(simple_fold(0x1F88), 0x1F80);
        assert_eq!(simple_fold(0x1FA7), 0x1FAF);
        for (lower, title) in [(0x1FB3, 0x1FBC), (0x1FC3, 0x1FCC), (0x1FF3, 0x1FFC)] {
            assert!(is_fold_pair(lower, title), "{:#x} {:#x}", lower, title);
            assert_eq!(min_fold_rune(title), lower);
        }
    }

    #[test]
    fn fixed_points() {
        for r in ['1' as Rune, '_' as Rune, 0x0130, 0x0131, 0x10FFFF, 0x20] {
            assert_eq!(simple_fold(r), r);
            assert_eq!(min_fold_rune(r), r);
        }
    }

    #[test]
    fn min_fold_is_lower_bound_of_orbit() {
        for r in (0x41..0x600).chain(0x1E00..0x2200) {
            let m = min_fold_rune(r);
            for member in orbit(r) {
                assert!(m <= member);
            }
        }
    }
}
