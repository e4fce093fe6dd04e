// regfactor.rs - Concatenation/alternation collapsing and prefix factoring.
//
// `collapse` builds the node that replaces a run of stack entries, splicing
// in children of same-op entries so concatenations and alternations never
// nest directly. For alternations it then factors common prefixes out of
// neighbouring branches in two rounds:
//
//   1. common leading literal strings:  abc|abd  ->  ab(?:c|d)
//   2. common leading pieces:           [xy]a|[xy]b  ->  [xy](?:a|b)
//
// Only neighbouring branches are grouped, so the order in which branches
// are tried is unchanged.

use crate::regexp::{Op, Regexp};
use crate::regparse::Parser;
use crate::regsyntax::Flags;
use crate::unicode::Rune;

/// A run of neighbouring branches sharing a literal prefix.
struct StringRun {
    len: usize,
    prefix: usize,
    flags: Flags,
}

impl Parser {
    /// Combines `subs` into one node with operation `op`.
    pub(crate) fn collapse(&mut self, mut subs: Vec<Regexp>, op: Op) -> Regexp {
        if subs.len() == 1 {
            if let Some(only) = subs.pop() {
                return only;
            }
        }
        let mut re = self.new_regexp(op);
        for mut sub in subs {
            if sub.op != op {
                self.push_sub(&mut re, sub);
                continue;
            }
            for inner in std::mem::take(&mut sub.subs) {
                self.push_sub(&mut re, inner);
            }
            self.reuse(sub);
        }
        if op == Op::Concat && re.subs.len() == 1 {
            if let Some(only) = re.subs.pop() {
                self.reuse(re);
                return only;
            }
        }
        if op == Op::Alternate {
            let branches = std::mem::take(&mut re.subs);
            re.subs = self.factor(branches);
            if re.subs.len() == 1 {
                if let Some(only) = re.subs.pop() {
                    self.reuse(re);
                    return only;
                }
            }
        }
        re
    }

    /// Appends `sub` to `re`. Inside a concatenation a literal that follows
    /// a literal with the same fold flag is merged into it.
    fn push_sub(&mut self, re: &mut Regexp, sub: Regexp) {
        if re.op == Op::Concat && sub.op == Op::Literal {
            if let Some(last) = re.subs.last_mut() {
                if last.op == Op::Literal && last.flags.fold_bit() == sub.flags.fold_bit() {
                    last.runes.extend_from_slice(&sub.runes);
                    self.reuse(sub);
                    return;
                }
            }
        }
        re.subs.push(sub);
    }

    /// Factors common prefixes out of neighbouring alternation branches.
    pub(crate) fn factor(&mut self, sub: Vec<Regexp>) -> Vec<Regexp> {
        if sub.len() < 2 {
            return sub;
        }
        let sub = self.factor_strings(sub);
        self.factor_pieces(sub)
    }

    /// Round 1: common leading literal strings.
    fn factor_strings(&mut self, sub: Vec<Regexp>) -> Vec<Regexp> {
        let mut runs = Vec::new();
        {
            let mut start = 0;
            let mut prefix: &[Rune] = &[];
            let mut prefix_flags = Flags::empty();
            for i in 0..=sub.len() {
                let mut istr: &[Rune] = &[];
                let mut iflags = Flags::empty();
                if i < sub.len() {
                    (istr, iflags) = leading_string(&sub[i]);
                    if iflags == prefix_flags {
                        let same = prefix
                            .iter()
                            .zip(istr)
                            .take_while(|(a, b)| a == b)
                            .count();
                        if same > 0 {
                            // Still at least one rune in common.
                            prefix = &prefix[..same];
                            continue;
                        }
                    }
                }
                // sub[start..i] all begin with `prefix`; sub[i] does not.
                if i > start {
                    runs.push(StringRun {
                        len: i - start,
                        prefix: prefix.len(),
                        flags: prefix_flags,
                    });
                }
                start = i;
                prefix = istr;
                prefix_flags = iflags;
            }
        }

        let mut out = Vec::with_capacity(runs.len());
        let mut items = sub.into_iter();
        for run in runs {
            let group: Vec<Regexp> = items.by_ref().take(run.len).collect();
            if run.len == 1 {
                out.extend(group);
                continue;
            }
            let mut prefix = self.new_regexp(Op::Literal);
            prefix.flags = run.flags;
            prefix
                .runes
                .extend_from_slice(&leading_string(&group[0]).0[..run.prefix]);
            let stripped: Vec<Regexp> = group
                .into_iter()
                .map(|re| self.remove_leading_string(re, run.prefix))
                .collect();
            log::trace!(
                "factor: {} branches share literal prefix {}",
                run.len,
                prefix.dump()
            );
            let suffix = self.collapse(stripped, Op::Alternate);
            out.push(self.factored(prefix, suffix));
        }
        out
    }

    /// Round 2: common leading pieces of fixed width.
    fn factor_pieces(&mut self, sub: Vec<Regexp>) -> Vec<Regexp> {
        let mut runs = Vec::new();
        {
            let mut start = 0;
            let mut first: Option<&Regexp> = None;
            for i in 0..=sub.len() {
                let mut ifirst = None;
                if i < sub.len() {
                    ifirst = leading_regexp(&sub[i]);
                    if let (Some(f), Some(g)) = (first, ifirst) {
                        if is_fixed_width(f) && f.equal(g) {
                            continue;
                        }
                    }
                }
                if i > start {
                    runs.push(i - start);
                }
                start = i;
                first = ifirst;
            }
        }

        let mut out = Vec::with_capacity(runs.len());
        let mut items = sub.into_iter();
        for len in runs {
            let group: Vec<Regexp> = items.by_ref().take(len).collect();
            if len == 1 {
                out.extend(group);
                continue;
            }
            let mut prefix = None;
            let mut rests = Vec::with_capacity(len);
            for re in group {
                let (rest, piece) = self.remove_leading_regexp(re);
                rests.push(rest);
                // Every removed piece is equal; keep the first.
                if prefix.is_none() {
                    prefix = Some(piece);
                } else {
                    self.reuse(piece);
                }
            }
            let suffix = self.collapse(rests, Op::Alternate);
            match prefix {
                Some(prefix) => {
                    log::trace!("factor: {} branches share leading {}", len, prefix.dump());
                    out.push(self.factored(prefix, suffix));
                }
                None => out.push(suffix),
            }
        }
        out
    }

    /// `prefix` followed by `suffix`, as one flat concatenation.
    fn factored(&mut self, prefix: Regexp, mut suffix: Regexp) -> Regexp {
        let mut re = self.new_regexp(Op::Concat);
        re.subs.push(prefix);
        if suffix.op == Op::Concat {
            for inner in std::mem::take(&mut suffix.subs) {
                self.push_sub(&mut re, inner);
            }
            self.reuse(suffix);
        } else {
            self.push_sub(&mut re, suffix);
        }
        if re.subs.len() == 1 {
            if let Some(only) = re.subs.pop() {
                self.reuse(re);
                return only;
            }
        }
        re
    }

    /// Removes the first `n` runes of the leading literal of `re`.
    fn remove_leading_string(&mut self, mut re: Regexp, n: usize) -> Regexp {
        if re.op == Op::Concat && !re.subs.is_empty() {
            strip_literal(&mut re.subs[0], n);
            if re.subs[0].op == Op::EmptyMatch {
                let emptied = re.subs.remove(0);
                self.reuse(emptied);
                if re.subs.len() == 1 {
                    if let Some(only) = re.subs.pop() {
                        self.reuse(re);
                        return only;
                    }
                }
                if re.subs.is_empty() {
                    re.reset(Op::EmptyMatch);
                }
            }
            return re;
        }
        strip_literal(&mut re, n);
        re
    }

    /// Splits `re` into what follows its leading piece and the piece itself.
    fn remove_leading_regexp(&mut self, mut re: Regexp) -> (Regexp, Regexp) {
        if re.op == Op::Concat && !re.subs.is_empty() {
            let piece = re.subs.remove(0);
            if re.subs.len() == 1 {
                if let Some(only) = re.subs.pop() {
                    self.reuse(re);
                    return (only, piece);
                }
            }
            if re.subs.is_empty() {
                re.reset(Op::EmptyMatch);
            }
            return (re, piece);
        }
        let empty = self.new_regexp(Op::EmptyMatch);
        (empty, re)
    }
}

/// The literal string `re` begins with, and its fold flag.
fn leading_string(re: &Regexp) -> (&[Rune], Flags) {
    let re = match re.op {
        Op::Concat if !re.subs.is_empty() => &re.subs[0],
        _ => re,
    };
    if re.op != Op::Literal {
        return (&[], Flags::empty());
    }
    (re.runes.as_slice(), re.flags.fold_bit())
}

/// The first piece of `re`: its first child if it is a concatenation,
/// otherwise `re` itself. `None` for an empty match.
fn leading_regexp(re: &Regexp) -> Option<&Regexp> {
    if re.op == Op::EmptyMatch {
        return None;
    }
    if re.op == Op::Concat && !re.subs.is_empty() {
        let sub = &re.subs[0];
        if sub.op == Op::EmptyMatch {
            return None;
        }
        return Some(sub);
    }
    Some(re)
}

fn strip_literal(re: &mut Regexp, n: usize) {
    if re.op == Op::Literal {
        re.runes.drain(..n);
        if re.runes.is_empty() {
            re.op = Op::EmptyMatch;
        }
    }
}

/// Matches exactly one character.
fn is_char_class(re: &Regexp) -> bool {
    (re.op == Op::Literal && re.runes.len() == 1)
        || matches!(re.op, Op::CharClass | Op::AnyCharNotNL | Op::AnyChar)
}

/// Leading pieces that can be factored without changing which path a
/// match takes: single characters, empty-width assertions, and exact
/// counted repeats of a single character.
fn is_fixed_width(re: &Regexp) -> bool {
    is_char_class(re)
        || matches!(
            re.op,
            Op::BeginLine
                | Op::EndLine
                | Op::BeginText
                | Op::EndText
                | Op::WordBoundary
                | Op::NoWordBoundary
        )
        || (re.op == Op::Repeat && re.min == re.max && is_char_class(&re.subs[0]))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regparse::{parse, DEFAULT_NEST_LIMIT};

    const TEST_FLAGS: Flags = Flags::MATCH_NL
        .union(Flags::PERL_X)
        .union(Flags::UNICODE_GROUPS);

    fn dump(pattern: &str) -> String {
        match parse(pattern, TEST_FLAGS) {
            Ok(re) => re.dump(),
            Err(err) => panic!("parse {:?}: {}", pattern, err),
        }
    }

    fn lit(s: &str) -> Regexp {
        let runes: Vec<Rune> = s.chars().map(|c| c as Rune).collect();
        Regexp::literal(&runes, Flags::empty())
    }

    fn parser() -> Parser {
        Parser::new(TEST_FLAGS, DEFAULT_NEST_LIMIT)
    }

    #[test]
    fn factoring_example() {
        let re = parse("ABC|ABD|AEF|BCX|BCY", TEST_FLAGS).unwrap();
        assert_eq!(re.to_string(), "A(?:B(?:C|D)|EF)|BC(?:X|Y)");
        assert_eq!(
            dump("abc|abd|aef|bcx|bcy"),
            "alt{cat{lit{a}alt{cat{lit{b}alt{lit{c}lit{d}}}str{ef}}}cat{str{bc}alt{lit{x}lit{y}}}}"
        );
    }

    #[test]
    fn factoring_result_reparses_to_itself() {
        let re = parse("ABC|ABD|AEF|BCX|BCY", TEST_FLAGS).unwrap();
        let again = parse(&re.to_string(), TEST_FLAGS).unwrap();
        assert_eq!(re, again);
    }

    #[test]
    fn runs_of_one_pass_through() {
        assert_eq!(dump("a|b|c"), "alt{lit{a}lit{b}lit{c}}");
        assert_eq!(dump("ab|cd|ab"), "alt{str{ab}str{cd}str{ab}}");
    }

    #[test]
    fn prefix_may_consume_whole_branch() {
        assert_eq!(dump("ab|abc"), "cat{str{ab}alt{emp{}lit{c}}}");
        assert_eq!(dump("ab|ab"), "cat{str{ab}alt{emp{}emp{}}}");
    }

    #[test]
    fn fold_flags_split_runs() {
        assert_eq!(dump("ab|(?i:ac)"), "alt{str{ab}strfold{AC}}");
    }

    #[test]
    fn common_piece_factoring() {
        assert_eq!(dump("[ab]c|[ab]d"), "cat{cc{0x61-0x62}alt{lit{c}lit{d}}}");
        assert_eq!(dump("^a|^b"), "cat{bol{}alt{lit{a}lit{b}}}");
        assert_eq!(
            dump(r"\d{2}x|\d{2}y"),
            "cat{rep{2,2 cc{0x30-0x39}}alt{lit{x}lit{y}}}"
        );
    }

    #[test]
    fn quantified_pieces_are_not_factored() {
        assert_eq!(
            dump("a*b|a*c"),
            "alt{cat{star{lit{a}}lit{b}}cat{star{lit{a}}lit{c}}}"
        );
        assert_eq!(
            dump("(a)b|(a)c"),
            "alt{cat{cap{lit{a}}lit{b}}cat{cap{lit{a}}lit{c}}}"
        );
    }

    #[test]
    fn factored_concat_stays_flat() {
        // The inner factoring yields a concatenation that is spliced into
        // the outer one.
        assert_eq!(
            dump("x[ab]c|x[ab]d"),
            "cat{lit{x}cc{0x61-0x62}alt{lit{c}lit{d}}}"
        );
    }

    #[test]
    fn spliced_literals_merge() {
        assert_eq!(dump("a(?:bc|bd)"), "cat{str{ab}alt{lit{c}lit{d}}}");
        assert_eq!(dump("x(?:abc|abd)"), "cat{str{xab}alt{lit{c}lit{d}}}");
        // Different fold flags stay apart.
        assert_eq!(
            dump("a(?i:bc|bd)"),
            "cat{lit{a}litfold{B}alt{litfold{C}litfold{D}}}"
        );

        let mut p = parser();
        let re = p.collapse(vec![lit("ab"), lit("cd"), lit("ef")], Op::Concat);
        assert_eq!(re.dump(), "str{abcdef}");
    }

    #[test]
    fn collapse_flattens_same_op() {
        let mut p = parser();
        let inner = p.collapse(vec![lit("a"), lit("b")], Op::Alternate);
        assert_eq!(inner.dump(), "alt{lit{a}lit{b}}");
        let outer = p.collapse(vec![inner, lit("c")], Op::Alternate);
        assert_eq!(outer.dump(), "alt{lit{a}lit{b}lit{c}}");
    }

    #[test]
    fn collapse_is_idempotent() {
        let mut p = parser();
        let once = p.collapse(vec![lit("ab"), lit("cd"), lit("ef")], Op::Concat);
        let again = p.collapse(vec![once.clone()], Op::Concat);
        assert_eq!(once.dump(), again.dump());

        let alt = p.collapse(vec![lit("abc"), lit("abd"), lit("x")], Op::Alternate);
        let twice = p.collapse(vec![alt.clone()], Op::Alternate);
        assert_eq!(alt.dump(), twice.dump());
        let branches = alt.subs.clone();
        let refactored = p.collapse(branches, Op::Alternate);
        assert_eq!(alt.dump(), refactored.dump());
    }

    #[test]
    fn collapse_single_item_is_unchanged() {
        let mut p = parser();
        let re = p.collapse(vec![lit("abc")], Op::Alternate);
        assert_eq!(re.dump(), "str{abc}");
    }

    #[test]
    fn remove_leading_string_simplifies() {
        let mut p = parser();
        let mut cat = Regexp::new(Op::Concat, Flags::empty());
        cat.subs = vec![lit("ab"), Regexp::new(Op::AnyChar, Flags::empty())];
        let re = p.remove_leading_string(cat, 2);
        assert_eq!(re.dump(), "dot{}");

        let re = p.remove_leading_string(lit("ab"), 2);
        assert_eq!(re.op, Op::EmptyMatch);

        let re = p.remove_leading_string(lit("abc"), 1);
        assert_eq!(re.dump(), "str{bc}");
    }

    #[test]
    fn remove_leading_regexp_splits() {
        let mut p = parser();
        let mut cat = Regexp::new(Op::Concat, Flags::empty());
        cat.subs = vec![lit("a"), lit("b"), lit("c")];
        let (rest, piece) = p.remove_leading_regexp(cat);
        assert_eq!(piece.dump(), "lit{a}");
        assert_eq!(rest.dump(), "cat{lit{b}lit{c}}");

        let (rest, piece) = p.remove_leading_regexp(lit("x"));
        assert_eq!(piece.dump(), "lit{x}");
        assert_eq!(rest.op, Op::EmptyMatch);
    }

    #[test]
    fn no_nested_concat_or_alternate() {
        fn check(re: &Regexp) {
            for sub in &re.subs {
                if matches!(re.op, Op::Concat | Op::Alternate) {
                    assert_ne!(sub.op, re.op, "nested {:?} in {}", re.op, re.dump());
                }
                check(sub);
            }
        }
        for pattern in [
            "ABC|ABD|AEF|BCX|BCY",
            "x[ab]c|x[ab]d|y",
            "(?:a|b)|(?:c|d)",
            "(?:ab)(?:cd)",
            "a(?:b|c)d|a(?:b|c)e",
        ] {
            check(&parse(pattern, TEST_FLAGS).unwrap());
        }
    }
}
