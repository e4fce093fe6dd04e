// regclass.rs - Character classes.
//
// A class is a flat list of `[lo, hi]` pairs. While a class is being built
// the pairs may overlap and appear in any order; `clean_class` sorts and
// merges them. Everything that reads a finished class expects it clean.

use memchr::memmem;

use crate::cursor::{Cursor, Pos};
use crate::error::{Error, ErrorCode, Result};
use crate::regexp::{Op, Regexp, RuneBuf};
use crate::regparse::Parser;
use crate::regsyntax::Flags;
use crate::unicode::{
    perl_group, posix_group, property_table, simple_fold, CharGroup, Rune, MAX_FOLD, MAX_RUNE,
    MIN_FOLD,
};

// ============================================================================
// Range algebra
// ============================================================================

/// Sorts the pairs of `r` and merges overlapping or abutting ones.
pub(crate) fn clean_class(r: &mut RuneBuf) {
    let mut pairs: Vec<(Rune, Rune)> = r.chunks_exact(2).map(|p| (p[0], p[1])).collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    r.clear();
    for (lo, hi) in pairs {
        if let Some(last) = r.last_mut() {
            if lo <= *last + 1 {
                if hi > *last {
                    *last = hi;
                }
                continue;
            }
        }
        r.push(lo);
        r.push(hi);
    }
}

/// Appends `[lo, hi]`, widening one of the last two pairs instead when
/// the new range touches it.
pub(crate) fn append_range(r: &mut RuneBuf, lo: Rune, hi: Rune) {
    let n = r.len();
    for i in [2, 4] {
        if n >= i {
            let (rlo, rhi) = (r[n - i], r[n - i + 1]);
            if lo <= rhi + 1 && rlo <= hi + 1 {
                if lo < rlo {
                    r[n - i] = lo;
                }
                if hi > rhi {
                    r[n - i + 1] = hi;
                }
                return;
            }
        }
    }
    r.push(lo);
    r.push(hi);
}

/// Appends `[lo, hi]` together with every code point that folds to a
/// member of it.
pub(crate) fn append_folded_range(r: &mut RuneBuf, mut lo: Rune, mut hi: Rune) {
    if (lo <= MIN_FOLD && hi >= MAX_FOLD) || hi < MIN_FOLD || lo > MAX_FOLD {
        // Either everything foldable is already included or nothing is.
        append_range(r, lo, hi);
        return;
    }
    if lo < MIN_FOLD {
        append_range(r, lo, MIN_FOLD - 1);
        lo = MIN_FOLD;
    }
    if hi > MAX_FOLD {
        append_range(r, MAX_FOLD + 1, hi);
        hi = MAX_FOLD;
    }
    for c in lo..=hi {
        append_range(r, c, c);
        let mut f = simple_fold(c);
        while f != c {
            append_range(r, f, f);
            f = simple_fold(f);
        }
    }
}

/// Appends every pair of the clean class `x`.
pub(crate) fn append_class(r: &mut RuneBuf, x: &[Rune]) {
    for pair in x.chunks_exact(2) {
        append_range(r, pair[0], pair[1]);
    }
}

pub(crate) fn append_folded_class(r: &mut RuneBuf, x: &[Rune]) {
    for pair in x.chunks_exact(2) {
        append_folded_range(r, pair[0], pair[1]);
    }
}

/// Appends the complement of the clean class `x`.
pub(crate) fn append_negated_class(r: &mut RuneBuf, x: &[Rune]) {
    let mut next_lo: Rune = 0;
    for pair in x.chunks_exact(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if lo > next_lo {
            append_range(r, next_lo, lo - 1);
        }
        next_lo = hi + 1;
    }
    if next_lo <= MAX_RUNE {
        append_range(r, next_lo, MAX_RUNE);
    }
}

/// Replaces the clean class `r` with its complement.
pub(crate) fn negate_class(r: &mut RuneBuf) {
    let mut next_lo: Rune = 0;
    let mut w = 0;
    for i in (0..r.len()).step_by(2) {
        let (lo, hi) = (r[i], r[i + 1]);
        if lo > next_lo {
            r[w] = next_lo;
            r[w + 1] = lo - 1;
            w += 2;
        }
        next_lo = hi + 1;
    }
    r.truncate(w);
    if next_lo <= MAX_RUNE {
        r.push(next_lo);
        r.push(MAX_RUNE);
    }
}

/// Cleans a finished alternative. A class covering everything becomes
/// `AnyChar`; everything but newline becomes `AnyCharNotNL`.
pub(crate) fn clean_alt(re: &mut Regexp) {
    if re.op != Op::CharClass {
        return;
    }
    clean_class(&mut re.runes);
    const NL: Rune = '\n' as Rune;
    let op = match re.runes.as_slice() {
        [0, MAX_RUNE] => Op::AnyChar,
        [0, a, b, MAX_RUNE] if *a == NL - 1 && *b == NL + 1 => Op::AnyCharNotNL,
        _ => return,
    };
    re.runes.clear();
    re.op = op;
}

// ============================================================================
// Class parsing
// ============================================================================

impl Parser {
    /// Parses a bracketed class at the cursor and pushes it.
    pub(crate) fn parse_class(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        let start = cur.pos();
        cur.skip_ascii(1);
        let mut re = self.new_regexp(Op::CharClass);
        re.flags = self.flags;
        let mut class = std::mem::take(&mut re.runes);

        let negated = cur.looking_at_char('^');
        if negated {
            cur.skip_ascii(1);
            // Excluding \n before negating keeps it out of the result.
            if !self.flags.contains(Flags::CLASS_NL) {
                class.extend_from_slice(&['\n' as Rune, '\n' as Rune]);
            }
        }

        // `]` and `-` are literals in first position.
        let mut first = true;
        while first || !cur.looking_at_char(']') {
            // POSIX allows an unescaped `-` only first or last.
            if !first
                && !self.flags.perl_x()
                && cur.looking_at_char('-')
                && !cur.looking_at("-]")
            {
                let mut probe = cur.clone();
                probe.skip_ascii(1);
                if probe.more() {
                    probe.pop();
                }
                return Err(Error::new(ErrorCode::InvalidCharRange, probe.from(cur.pos())));
            }
            first = false;

            if cur.looking_at("[:") && self.parse_named_class(cur, &mut class)? {
                continue;
            }
            if self.parse_unicode_class(cur, &mut class)? {
                continue;
            }
            if self.parse_perl_class_escape(cur, &mut class) {
                continue;
            }

            let range_start = cur.pos();
            let lo = self.parse_class_char(cur, start)?;
            let mut hi = lo;
            // `[a-]` is `a` and `-`.
            if cur.looking_at_char('-') && !cur.looking_at("-]") && cur.rest().len() >= 2 {
                cur.skip_ascii(1);
                hi = self.parse_class_char(cur, start)?;
                if hi < lo {
                    return Err(Error::new(ErrorCode::InvalidCharRange, cur.from(range_start)));
                }
            }
            if self.flags.fold_case() {
                append_folded_range(&mut class, lo, hi);
            } else {
                append_range(&mut class, lo, hi);
            }
        }
        cur.skip_ascii(1);

        clean_class(&mut class);
        if negated {
            negate_class(&mut class);
        }
        re.runes = class;
        self.push(re);
        Ok(())
    }

    fn parse_class_char(&self, cur: &mut Cursor<'_>, class_start: Pos) -> Result<Rune> {
        if !cur.more() {
            return Err(Error::new(ErrorCode::MissingBracket, cur.from(class_start)));
        }
        if cur.looking_at_char('\\') {
            return self.parse_escape(cur);
        }
        Ok(cur.pop())
    }

    /// Parses `[:alpha:]` or `[:^alpha:]` into `class`. Returns `false`
    /// without consuming anything when there is no `:]` terminator.
    fn parse_named_class(&self, cur: &mut Cursor<'_>, class: &mut RuneBuf) -> Result<bool> {
        let rest = cur.rest();
        let Some(i) = memmem::find(&rest.as_bytes()[2..], b":]") else {
            return Ok(false);
        };
        let name = &rest[..i + 4];
        let Some(group) = posix_group(name) else {
            return Err(Error::new(ErrorCode::InvalidCharRange, name));
        };
        cur.skip_literal(name);
        self.append_group(class, group);
        Ok(true)
    }

    /// Parses `\pN`, `\p{Name}`, `\PN`, `\P{Name}` and the `\p{^Name}`
    /// negation into `class`. Returns `false` when the cursor is not on
    /// such an escape or Unicode groups are disabled.
    pub(crate) fn parse_unicode_class(
        &self,
        cur: &mut Cursor<'_>,
        class: &mut RuneBuf,
    ) -> Result<bool> {
        if !self.flags.contains(Flags::UNICODE_GROUPS)
            || !(cur.looking_at(r"\p") || cur.looking_at(r"\P"))
        {
            return Ok(false);
        }
        let start = cur.pos();
        let mut negated = cur.looking_at(r"\P");
        cur.skip_ascii(2);

        let name = if cur.looking_at_char('{') {
            let rest = cur.rest();
            let Some(end) = memchr::memchr(b'}', rest.as_bytes()) else {
                return Err(Error::new(ErrorCode::InvalidCharRange, &cur.text()[start..]));
            };
            cur.skip_literal(&rest[..=end]);
            &rest[1..end]
        } else if cur.more() {
            let at = cur.pos();
            cur.pop();
            cur.from(at)
        } else {
            ""
        };
        let seq = cur.from(start);
        let name = match name.strip_prefix('^') {
            Some(stripped) => {
                negated = !negated;
                stripped
            }
            None => name,
        };
        let Some(table) = property_table(name) else {
            return Err(Error::new(ErrorCode::InvalidCharRange, seq));
        };

        if self.flags.fold_case() {
            let mut folded = RuneBuf::new();
            append_folded_class(&mut folded, table);
            clean_class(&mut folded);
            append_maybe_negated(class, &folded, negated);
        } else {
            append_maybe_negated(class, table, negated);
        }
        Ok(true)
    }

    /// Parses `\d`, `\s`, `\w` and their negations into `class` when Perl
    /// extensions are enabled.
    pub(crate) fn parse_perl_class_escape(&self, cur: &mut Cursor<'_>, class: &mut RuneBuf) -> bool {
        if !self.flags.perl_x() || !cur.looking_at_char('\\') {
            return false;
        }
        let Some(group) = cur.rest().get(..2).and_then(perl_group) else {
            return false;
        };
        cur.skip_ascii(2);
        self.append_group(class, group);
        true
    }

    fn append_group(&self, class: &mut RuneBuf, group: CharGroup) {
        if self.flags.fold_case() {
            let mut folded = RuneBuf::new();
            append_folded_class(&mut folded, group.class);
            clean_class(&mut folded);
            append_maybe_negated(class, &folded, group.negated);
        } else {
            append_maybe_negated(class, group.class, group.negated);
        }
    }
}

fn append_maybe_negated(class: &mut RuneBuf, x: &[Rune], negated: bool) {
    if negated {
        append_negated_class(class, x);
    } else {
        append_class(class, x);
    }
}

// ============================================================================
// Tests
// ============================================================================
