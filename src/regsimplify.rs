// regsimplify.rs - Rewriting counted repetition into simpler operators.
//
// A compiler that only knows `*`, `+` and `?` can consume the result
// directly: `x{n,m}` becomes n copies of `x` followed by nested optional
// copies, and stacked identical operators collapse.

use crate::regexp::{Op, Regexp};
use crate::regsyntax::Flags;

impl Regexp {
    /// Returns an equivalent tree without `Repeat` nodes.
    ///
    /// ```
    /// use ferroni_syntax::regparse::parse;
    /// use ferroni_syntax::regsyntax::Flags;
    ///
    /// let re = parse("a{2,3}", Flags::PERL).unwrap();
    /// assert_eq!(re.simplify().to_string(), "aaa?");
    /// ```
    pub fn simplify(&self) -> Regexp {
        if self.flags.contains(Flags::SIMPLE) {
            return self.clone();
        }
        let mut re = simplify_node(self);
        re.flags |= Flags::SIMPLE;
        re
    }
}

fn simplify_node(re: &Regexp) -> Regexp {
    match re.op {
        Op::Capture | Op::Concat | Op::Alternate => {
            let mut out = Regexp::new(re.op, re.flags);
            out.cap = re.cap;
            out.name = re.name.clone();
            out.subs = re.subs.iter().map(simplify_node).collect();
            out
        }
        Op::Star | Op::Plus | Op::Quest => {
            let sub = simplify_node(&re.subs[0]);
            simplify1(re.op, re.flags, sub)
        }
        Op::Repeat => simplify_repeat(re),
        _ => re.clone(),
    }
}

fn simplify_repeat(re: &Regexp) -> Regexp {
    if re.min == 0 && re.max == 0 {
        return Regexp::new(Op::EmptyMatch, Flags::empty());
    }
    let sub = simplify_node(&re.subs[0]);
    if sub.op == Op::EmptyMatch {
        return sub;
    }

    if re.max == -1 {
        return match re.min {
            0 => simplify1(Op::Star, re.flags, sub),
            1 => simplify1(Op::Plus, re.flags, sub),
            // x{4,} is xxx+.
            n => {
                let mut parts: Vec<Regexp> = (1..n).map(|_| sub.clone()).collect();
                parts.push(simplify1(Op::Plus, re.flags, sub));
                concat_of(parts)
            }
        };
    }
    if re.min == 1 && re.max == 1 {
        return sub;
    }

    // x{n,m} is n copies of x followed by m-n nested optional copies:
    // x{2,5} is xx(x(x(x)?)?)?.
    let mut parts: Vec<Regexp> = (0..re.min).map(|_| sub.clone()).collect();
    if re.max > re.min {
        let mut suffix = simplify1(Op::Quest, re.flags, sub.clone());
        for _ in re.min + 1..re.max {
            let inner = concat_of(vec![sub.clone(), suffix]);
            suffix = simplify1(Op::Quest, re.flags, inner);
        }
        parts.push(suffix);
    }
    if parts.len() == 1 {
        if let Some(only) = parts.pop() {
            return only;
        }
    }
    if parts.is_empty() {
        // min > max, which the parser rejects.
        return Regexp::new(Op::NoMatch, Flags::empty());
    }
    concat_of(parts)
}

/// `sub` under the unary operator `op`, unless that is redundant.
fn simplify1(op: Op, flags: Flags, sub: Regexp) -> Regexp {
    // (?:)* is just the empty match.
    if sub.op == Op::EmptyMatch {
        return sub;
    }
    // x** is x*, x++ is x+, x?? is x?.
    if sub.op == op && sub.flags.non_greedy() == flags.non_greedy() {
        return sub;
    }
    let mut re = Regexp::new(op, flags - Flags::SIMPLE);
    re.subs.push(sub);
    re
}

/// A flat concatenation of `parts`.
fn concat_of(parts: Vec<Regexp>) -> Regexp {
    let mut re = Regexp::new(Op::Concat, Flags::empty());
    for part in parts {
        if part.op == Op::Concat {
            re.subs.extend(part.subs);
        } else {
            re.subs.push(part);
        }
    }
    re
}

// ============================================================================
// Tests
// ============================================================================
