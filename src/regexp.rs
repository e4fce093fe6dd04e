// regexp.rs - Syntax tree node.
//
// A `Regexp` is one node of the parsed pattern. Which fields are meaningful
// depends on `op`; unused fields stay at their reset values so that pooled
// nodes can be handed out again without reallocating their buffers.

use std::fmt::{self, Write};

use smallvec::SmallVec;

use crate::regsyntax::Flags;
use crate::unicode::{simple_fold, Rune, MAX_RUNE};

/// Rune storage for a node: a literal's runes or a class's range pairs.
pub type RuneBuf = SmallVec<[Rune; 4]>;

/// Node operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Matches no strings.
    NoMatch,
    /// Matches the empty string.
    EmptyMatch,
    /// Matches `runes` as a sequence.
    Literal,
    /// Matches any rune inside the `[lo, hi]` pairs of `runes`.
    CharClass,
    AnyCharNotNL,
    AnyChar,
    BeginLine,
    EndLine,
    BeginText,
    EndText,
    WordBoundary,
    NoWordBoundary,
    /// Capturing group `cap` with optional `name`.
    Capture,
    Star,
    Plus,
    Quest,
    /// `subs[0]{min,max}`; `max == -1` means unbounded.
    Repeat,
    Concat,
    Alternate,

    // Parse stack markers. Never present in a finished tree.
    /// Open group. `cap` is the capture index (0 for non-capturing) and
    /// `flags` holds the flags to restore when the group closes.
    LeftParen,
    /// Alternation bar. The alternatives parsed so far sit below it.
    VerticalBar,
}

impl Op {
    #[inline]
    pub fn is_pseudo(self) -> bool {
        matches!(self, Op::LeftParen | Op::VerticalBar)
    }

    #[inline]
    pub(crate) fn is_repeat(self) -> bool {
        matches!(self, Op::Star | Op::Plus | Op::Quest | Op::Repeat)
    }

    fn dump_name(self) -> &'static str {
        match self {
            Op::NoMatch => "no",
            Op::EmptyMatch => "emp",
            Op::Literal => "lit",
            Op::CharClass => "cc",
            Op::AnyCharNotNL => "dnl",
            Op::AnyChar => "dot",
            Op::BeginLine => "bol",
            Op::EndLine => "eol",
            Op::BeginText => "bot",
            Op::EndText => "eot",
            Op::WordBoundary => "wb",
            Op::NoWordBoundary => "nwb",
            Op::Capture => "cap",
            Op::Star => "star",
            Op::Plus => "plus",
            Op::Quest => "que",
            Op::Repeat => "rep",
            Op::Concat => "cat",
            Op::Alternate => "alt",
            Op::LeftParen => "lpar",
            Op::VerticalBar => "vbar",
        }
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone)]
pub struct Regexp {
    pub op: Op,
    pub flags: Flags,
    /// Children: one for repeats and captures, any number for
    /// `Concat`/`Alternate`.
    pub subs: Vec<Regexp>,
    /// Literal runes, or flattened `[lo, hi]` pairs for `CharClass`.
    pub runes: RuneBuf,
    pub min: i32,
    pub max: i32,
    /// 1-based capture index.
    pub cap: usize,
    pub name: Option<String>,
}

impl Regexp {
    pub fn new(op: Op, flags: Flags) -> Self {
        Regexp {
            op,
            flags,
            subs: Vec::new(),
            runes: RuneBuf::new(),
            min: 0,
            max: 0,
            cap: 0,
            name: None,
        }
    }

    /// A literal node holding `runes`.
    pub fn literal(runes: &[Rune], flags: Flags) -> Self {
        let mut re = Regexp::new(Op::Literal, flags);
        re.runes.extend_from_slice(runes);
        re
    }

    /// Resets every field except the allocated buffers.
    pub(crate) fn reset(&mut self, op: Op) {
        self.op = op;
        self.flags = Flags::empty();
        self.subs.clear();
        self.runes.clear();
        self.min = 0;
        self.max = 0;
        self.cap = 0;
        self.name = None;
    }

    /// Structural equality. Two trees are equal when they would match the
    /// same strings in the same way.
    pub fn equal(&self, other: &Regexp) -> bool {
        if self.op != other.op {
            return false;
        }
        match self.op {
            Op::EndText => {
                self.flags.contains(Flags::WAS_DOLLAR) == other.flags.contains(Flags::WAS_DOLLAR)
            }
            Op::Literal => {
                self.flags.fold_bit() == other.flags.fold_bit() && self.runes == other.runes
            }
            Op::CharClass => self.runes == other.runes,
            Op::Star | Op::Plus | Op::Quest => {
                self.flags.non_greedy() == other.flags.non_greedy()
                    && self.subs[0].equal(&other.subs[0])
            }
            Op::Repeat => {
                self.flags.non_greedy() == other.flags.non_greedy()
                    && self.min == other.min
                    && self.max == other.max
                    && self.subs[0].equal(&other.subs[0])
            }
            Op::Capture => {
                self.cap == other.cap
                    && self.name == other.name
                    && self.subs[0].equal(&other.subs[0])
            }
            Op::Concat | Op::Alternate => {
                self.subs.len() == other.subs.len()
                    && self.subs.iter().zip(&other.subs).all(|(a, b)| a.equal(b))
            }
            _ => true,
        }
    }

    /// The largest capture index in the tree, or 0 if there are none.
    pub fn max_cap(&self) -> usize {
        let own = if self.op == Op::Capture { self.cap } else { 0 };
        self.subs.iter().map(Regexp::max_cap).fold(own, usize::max)
    }

    /// Capture names indexed by capture number. Entry 0 (the whole match)
    /// and unnamed groups are `None`.
    pub fn cap_names(&self) -> Vec<Option<String>> {
        let mut names = vec![None; self.max_cap() + 1];
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut [Option<String>]) {
        if self.op == Op::Capture {
            names[self.cap] = self.name.clone();
        }
        for sub in &self.subs {
            sub.collect_names(names);
        }
    }

    /// Compact structural form, e.g. `cat{lit{a}star{lit{b}}}`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out);
        out
    }

    fn dump_into(&self, b: &mut String) {
        match self.op {
            Op::Star | Op::Plus | Op::Quest | Op::Repeat => {
                if self.flags.non_greedy() {
                    b.push('n');
                }
                b.push_str(self.op.dump_name());
            }
            Op::Literal => {
                b.push_str(if self.runes.len() > 1 { "str" } else { "lit" });
                if self.flags.fold_case() && self.runes.iter().any(|&r| simple_fold(r) != r) {
                    b.push_str("fold");
                }
            }
            op => b.push_str(op.dump_name()),
        }
        b.push('{');
        match self.op {
            Op::EndText => {
                if !self.flags.contains(Flags::WAS_DOLLAR) {
                    b.push_str(r"\z");
                }
            }
            Op::Literal => {
                for &r in &self.runes {
                    b.push(char::from_u32(r).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            Op::Concat | Op::Alternate => {
                for sub in &self.subs {
                    sub.dump_into(b);
                }
            }
            Op::Star | Op::Plus | Op::Quest => self.subs[0].dump_into(b),
            Op::Repeat => {
                let _ = write!(b, "{},{} ", self.min, self.max);
                self.subs[0].dump_into(b);
            }
            Op::Capture => {
                if let Some(name) = &self.name {
                    b.push_str(name);
                    b.push(':');
                }
                self.subs[0].dump_into(b);
            }
            Op::CharClass => {
                for (i, pair) in self.runes.chunks(2).enumerate() {
                    if i > 0 {
                        b.push(' ');
                    }
                    match *pair {
                        [lo, hi] if lo != hi => {
                            let _ = write!(b, "{:#x}-{:#x}", lo, hi);
                        }
                        [lo, ..] => {
                            let _ = write!(b, "{:#x}", lo);
                        }
                        [] => {}
                    }
                }
            }
            _ => {}
        }
        b.push('}');
    }
}

impl PartialEq for Regexp {
    fn eq(&self, other: &Regexp) -> bool {
        self.equal(other)
    }
}

impl Eq for Regexp {}

// === Perl syntax printing ===

const META: &str = r"\.+*?()|[]{}^$";

fn is_print(c: char) -> bool {
    c == ' ' || !(c.is_control() || c.is_whitespace())
}

fn write_escaped(f: &mut fmt::Formatter<'_>, r: Rune, force: bool) -> fmt::Result {
    if let Some(c) = char::from_u32(r).filter(|&c| is_print(c)) {
        if force || META.contains(c) {
            f.write_char('\\')?;
        }
        return f.write_char(c);
    }
    match r {
        0x07 => f.write_str(r"\a"),
        0x0C => f.write_str(r"\f"),
        0x0A => f.write_str(r"\n"),
        0x0D => f.write_str(r"\r"),
        0x09 => f.write_str(r"\t"),
        0x0B => f.write_str(r"\v"),
        r if r < 0x100 => write!(f, r"\x{:02x}", r),
        r => write!(f, r"\x{{{:x}}}", r),
    }
}

fn write_class_range(f: &mut fmt::Formatter<'_>, lo: Rune, hi: Rune) -> fmt::Result {
    write_escaped(f, lo, lo == '-' as Rune)?;
    if lo != hi {
        f.write_char('-')?;
        write_escaped(f, hi, hi == '-' as Rune)?;
    }
    Ok(())
}

impl fmt::Display for Regexp {
    /// Writes the node in Perl syntax. Parsing the output yields an equal
    /// tree, except that `NoMatch` comes back as an empty character class
    /// that also matches nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Op::NoMatch => f.write_str(r"[^\x00-\x{10ffff}]"),
            Op::EmptyMatch => f.write_str("(?:)"),
            Op::Literal => {
                if self.flags.fold_case() {
                    f.write_str("(?i:")?;
                }
                for &r in &self.runes {
                    write_escaped(f, r, false)?;
                }
                if self.flags.fold_case() {
                    f.write_char(')')?;
                }
                Ok(())
            }
            Op::CharClass => {
                if self.runes.len() % 2 != 0 {
                    return f.write_str("[invalid char class]");
                }
                f.write_char('[')?;
                let n = self.runes.len();
                if n == 0 {
                    f.write_str(r"^\x00-\x{10ffff}")?;
                } else if self.runes[0] == 0 && self.runes[n - 1] == MAX_RUNE && n > 2 {
                    // Print the complement of the gaps.
                    f.write_char('^')?;
                    let mut i = 1;
                    while i < n - 1 {
                        write_class_range(f, self.runes[i] + 1, self.runes[i + 1] - 1)?;
                        i += 2;
                    }
                } else {
                    for pair in self.runes.chunks(2) {
                        write_class_range(f, pair[0], pair[1])?;
                    }
                }
                f.write_char(']')
            }
            Op::AnyCharNotNL => f.write_str("(?-s:.)"),
            Op::AnyChar => f.write_str("(?s:.)"),
            Op::BeginLine => f.write_str("(?m:^)"),
            Op::EndLine => f.write_str("(?m:$)"),
            Op::BeginText => f.write_str(r"\A"),
            Op::EndText => {
                if self.flags.contains(Flags::WAS_DOLLAR) {
                    f.write_str("(?-m:$)")
                } else {
                    f.write_str(r"\z")
                }
            }
            Op::WordBoundary => f.write_str(r"\b"),
            Op::NoWordBoundary => f.write_str(r"\B"),
            Op::Capture => {
                match &self.name {
                    Some(name) => write!(f, "(?P<{}>", name)?,
                    None => f.write_char('(')?,
                }
                if self.subs[0].op != Op::EmptyMatch {
                    write!(f, "{}", self.subs[0])?;
                }
                f.write_char(')')
            }
            Op::Star | Op::Plus | Op::Quest | Op::Repeat => {
                let sub = &self.subs[0];
                let group = sub.op.is_repeat()
                    || matches!(sub.op, Op::Concat | Op::Alternate)
                    || (sub.op == Op::Literal && sub.runes.len() > 1);
                if group {
                    write!(f, "(?:{})", sub)?;
                } else {
                    write!(f, "{}", sub)?;
                }
                match self.op {
                    Op::Star => f.write_char('*')?,
                    Op::Plus => f.write_char('+')?,
                    Op::Quest => f.write_char('?')?,
                    _ => {
                        write!(f, "{{{}", self.min)?;
                        if self.max != self.min {
                            f.write_char(',')?;
                            if self.max >= 0 {
                                write!(f, "{}", self.max)?;
                            }
                        }
                        f.write_char('}')?;
                    }
                }
                if self.flags.non_greedy() {
                    f.write_char('?')?;
                }
                Ok(())
            }
            Op::Concat => {
                for sub in &self.subs {
                    if sub.op == Op::Alternate {
                        write!(f, "(?:{})", sub)?;
                    } else {
                        write!(f, "{}", sub)?;
                    }
                }
                Ok(())
            }
            Op::Alternate => {
                for (i, sub) in self.subs.iter().enumerate() {
                    if i > 0 {
                        f.write_char('|')?;
                    }
                    write!(f, "{}", sub)?;
                }
                Ok(())
            }
            Op::LeftParen => f.write_str("<lpar>"),
            Op::VerticalBar => f.write_str("<vbar>"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Regexp {
        let runes: Vec<Rune> = s.chars().map(|c| c as Rune).collect();
        Regexp::literal(&runes, Flags::empty())
    }

    fn wrap(op: Op, subs: Vec<Regexp>) -> Regexp {
        let mut re = Regexp::new(op, Flags::empty());
        re.subs = subs;
        re
    }

    fn class(pairs: &[Rune]) -> Regexp {
        let mut re = Regexp::new(Op::CharClass, Flags::empty());
        re.runes.extend_from_slice(pairs);
        re
    }

    #[test]
    fn dump_shapes() {
        let re = wrap(Op::Concat, vec![lit("a"), wrap(Op::Star, vec![lit("b")])]);
        assert_eq!(re.dump(), "cat{lit{a}star{lit{b}}}");

        let mut rep = wrap(Op::Repeat, vec![lit("ab")]);
        rep.min = 2;
        rep.max = -1;
        rep.flags = Flags::NON_GREEDY;
        assert_eq!(rep.dump(), "nrep{2,-1 str{ab}}");

        assert_eq!(class(&[0x30, 0x39, 0x5f, 0x5f]).dump(), "cc{0x30-0x39 0x5f}");
    }

    #[test]
    fn dump_fold_marker_needs_foldable_rune() {
        let re = Regexp::literal(&['A' as Rune], Flags::FOLD_CASE);
        assert_eq!(re.dump(), "litfold{A}");
        let re = Regexp::literal(&['1' as Rune], Flags::FOLD_CASE);
        assert_eq!(re.dump(), "lit{1}");
    }

    #[test]
    fn dump_end_text() {
        let z = Regexp::new(Op::EndText, Flags::empty());
        assert_eq!(z.dump(), r"eot{\z}");
        let dollar = Regexp::new(Op::EndText, Flags::WAS_DOLLAR);
        assert_eq!(dollar.dump(), "eot{}");
    }

    #[test]
    fn equality_compares_structure() {
        assert_eq!(lit("ab"), lit("ab"));
        assert_ne!(lit("ab"), lit("abc"));
        assert_ne!(lit("a"), Regexp::literal(&['a' as Rune], Flags::FOLD_CASE));

        let greedy = wrap(Op::Star, vec![lit("a")]);
        let mut lazy = greedy.clone();
        lazy.flags |= Flags::NON_GREEDY;
        assert_ne!(greedy, lazy);

        // Flags outside the compared set do not matter.
        let mut other = greedy.clone();
        other.flags |= Flags::PERL_X;
        assert_eq!(greedy, other);

        assert_ne!(
            Regexp::new(Op::EndText, Flags::empty()),
            Regexp::new(Op::EndText, Flags::WAS_DOLLAR)
        );
    }

    #[test]
    fn captures() {
        let mut c1 = wrap(Op::Capture, vec![lit("a")]);
        c1.cap = 1;
        let mut c2 = wrap(Op::Capture, vec![lit("b")]);
        c2.cap = 2;
        c2.name = Some("x".to_string());
        let re = wrap(Op::Concat, vec![c1, c2]);
        assert_eq!(re.max_cap(), 2);
        assert_eq!(re.cap_names(), vec![None, None, Some("x".to_string())]);
        assert_eq!(lit("a").max_cap(), 0);
    }

    #[test]
    fn display_perl_syntax() {
        let re = wrap(Op::Concat, vec![lit("a+"), wrap(Op::Plus, vec![lit("bc")])]);
        assert_eq!(re.to_string(), r"a\+(?:bc)+");

        let alt = wrap(Op::Alternate, vec![lit("x"), lit("y")]);
        assert_eq!(wrap(Op::Concat, vec![lit("a"), alt]).to_string(), "a(?:x|y)");

        assert_eq!(class(&[0x61, 0x7a, 0x2d, 0x2d]).to_string(), r"[a-z\-]");
        assert_eq!(class(&[0x0, 0x9, 0xb, MAX_RUNE]).to_string(), r"[^\n]");
        assert_eq!(lit("\t").to_string(), r"\t");
        assert_eq!(lit("\u{1}").to_string(), r"\x01");
    }

    #[test]
    fn display_repeat_bounds() {
        let mut re = wrap(Op::Repeat, vec![lit("a")]);
        re.min = 2;
        re.max = 2;
        assert_eq!(re.to_string(), "a{2}");
        re.max = -1;
        assert_eq!(re.to_string(), "a{2,}");
        re.max = 5;
        re.flags = Flags::NON_GREEDY;
        assert_eq!(re.to_string(), "a{2,5}?");
    }

    #[test]
    fn reset_keeps_nothing_observable() {
        let mut re = lit("abc");
        re.cap = 3;
        re.name = Some("n".into());
        re.reset(Op::EmptyMatch);
        assert_eq!(re, Regexp::new(Op::EmptyMatch, Flags::empty()));
        assert!(re.runes.is_empty());
        assert!(re.name.is_none());
    }
}
