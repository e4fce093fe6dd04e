// regparse.rs - Pattern parser.
//
// The parser is an operator-precedence stack machine. Atoms are pushed as
// they are read; `|` and `(` leave pseudo markers on the stack; at `|`,
// `)` and the end of the pattern everything above the nearest marker is
// collapsed into a concatenation or alternation. Adjacent literals are
// merged as they are pushed, so a repetition operator always binds to the
// most recent atom only.
//
// Structure: parser state -> stack operations -> repetition ->
// concatenation/alternation -> driver -> Perl flags -> escapes.

use std::collections::HashMap;

use crate::api::ParsedPattern;
use crate::cursor::{Cursor, Pos};
use crate::error::{Error, ErrorCode, Result};
use crate::regclass::clean_alt;
use crate::regexp::{Op, Regexp};
use crate::regsyntax::Flags;
use crate::unicode::{is_fold_pair, min_fold_rune, Rune, MAX_RUNE};

// ============================================================================
// Constants
// ============================================================================

/// Largest count accepted in `{n,m}`, and the bound on the product of
/// nested counted repetitions.
pub const MAX_REPEAT: i32 = 1000;

/// Default limit on group and repetition nesting.
pub const DEFAULT_NEST_LIMIT: u32 = 1000;

// ============================================================================
// Parser state
// ============================================================================

pub(crate) struct Parser {
    /// Flags in effect at the current position.
    pub(crate) flags: Flags,
    pub(crate) stack: Vec<Regexp>,
    /// Discarded nodes, handed out again by `new_regexp`.
    free: Vec<Regexp>,
    num_cap: usize,
    names: HashMap<String, usize>,
    nest_limit: u32,
    /// Number of currently open groups.
    depth: u32,
}

impl Parser {
    pub(crate) fn new(flags: Flags, nest_limit: u32) -> Self {
        Parser {
            flags,
            stack: Vec::new(),
            free: Vec::new(),
            num_cap: 0,
            names: HashMap::new(),
            nest_limit,
            depth: 0,
        }
    }

    /// A blank node for `op`, taken from the pool when one is available.
    pub(crate) fn new_regexp(&mut self, op: Op) -> Regexp {
        match self.free.pop() {
            Some(mut re) => {
                re.reset(op);
                re
            }
            None => Regexp::new(op, Flags::empty()),
        }
    }

    /// Returns `re` to the pool. Children still attached are dropped.
    pub(crate) fn reuse(&mut self, mut re: Regexp) {
        re.subs.clear();
        self.free.push(re);
    }

    // === Stack operations ===

    /// Pushes `re`, first merging the two literals below it.
    ///
    /// A class holding one rune, or one rune and its fold partner, is pushed
    /// as a literal instead. If that literal can be appended to the literal
    /// already on top of the stack, nothing is pushed and `false` is returned.
    pub(crate) fn push(&mut self, mut re: Regexp) -> bool {
        if re.op == Op::CharClass && re.runes.len() == 2 && re.runes[0] == re.runes[1] {
            let flags = self.flags - Flags::FOLD_CASE;
            if self.maybe_concat(Some((re.runes[0], flags))) {
                self.reuse(re);
                return false;
            }
            re.op = Op::Literal;
            re.runes.truncate(1);
            re.flags = flags;
        } else if re.op == Op::CharClass && is_fold_literal(&re.runes) {
            let flags = self.flags | Flags::FOLD_CASE;
            if self.maybe_concat(Some((re.runes[0], flags))) {
                self.reuse(re);
                return false;
            }
            re.op = Op::Literal;
            re.runes.truncate(1);
            re.flags = flags;
        } else {
            self.maybe_concat(None);
        }
        self.stack.push(re);
        true
    }

    /// Merges the top two stack entries when both are literals with the same
    /// fold flag.
    ///
    /// With `next = Some((r, flags))` the emptied top node is kept and
    /// rewritten to hold just `r`, and the return value is `true`: the caller
    /// no longer needs to push `r`. Otherwise the top node is discarded.
    pub(crate) fn maybe_concat(&mut self, next: Option<(Rune, Flags)>) -> bool {
        let n = self.stack.len();
        if n < 2 {
            return false;
        }
        let (below, top) = self.stack.split_at_mut(n - 1);
        let re2 = &mut below[n - 2];
        let re1 = &mut top[0];
        if re1.op != Op::Literal
            || re2.op != Op::Literal
            || re1.flags.fold_bit() != re2.flags.fold_bit()
        {
            return false;
        }
        re2.runes.extend_from_slice(&re1.runes);

        if let Some((r, flags)) = next {
            re1.runes.clear();
            re1.runes.push(r);
            re1.flags = flags;
            return true;
        }
        if let Some(re1) = self.stack.pop() {
            self.reuse(re1);
        }
        false
    }

    /// Pushes a single-rune literal.
    pub(crate) fn literal(&mut self, r: Rune) {
        let mut re = self.new_regexp(Op::Literal);
        re.flags = self.flags;
        let r = if self.flags.fold_case() {
            min_fold_rune(r)
        } else {
            r
        };
        re.runes.push(r);
        self.push(re);
    }

    /// Pushes a node with no operands and returns it.
    pub(crate) fn op(&mut self, op: Op) -> &mut Regexp {
        let mut re = self.new_regexp(op);
        re.flags = self.flags;
        self.push(re);
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    // === Repetition ===

    /// Applies a repetition operator to the top of the stack.
    ///
    /// `before` is where the operator starts; the cursor sits right after
    /// it. `last_repeat` is the start of the immediately preceding
    /// repetition operator, if there was one.
    pub(crate) fn repeat(
        &mut self,
        cur: &mut Cursor<'_>,
        op: Op,
        min: i32,
        max: i32,
        before: Pos,
        last_repeat: Option<Pos>,
    ) -> Result<()> {
        let mut flags = self.flags;
        if self.flags.perl_x() {
            if cur.looking_at_char('?') {
                cur.skip_ascii(1);
                flags ^= Flags::NON_GREEDY;
            }
            if let Some(last) = last_repeat {
                // Perl has no meaning for stacked operators: a** is an error.
                return Err(Error::new(ErrorCode::InvalidRepeatOp, cur.from(last)));
            }
        }
        let sub = match self.stack.pop() {
            Some(sub) if !sub.op.is_pseudo() => sub,
            _ => {
                return Err(Error::new(
                    ErrorCode::MissingRepeatArgument,
                    cur.from(before),
                ))
            }
        };
        if self.repeat_chain(&sub) >= self.nest_limit {
            return Err(Error::new(ErrorCode::NestingDepth, cur.text()));
        }

        let mut re = self.new_regexp(op);
        re.min = min;
        re.max = max;
        re.flags = flags;
        re.subs.push(sub);
        if op == Op::Repeat && (min >= 2 || max >= 2) && !repeat_is_valid(&re, MAX_REPEAT) {
            return Err(Error::new(ErrorCode::InvalidRepeatSize, cur.from(before)));
        }
        self.stack.push(re);
        Ok(())
    }

    /// Open groups plus the repetitions directly stacked on `re`.
    fn repeat_chain(&self, mut re: &Regexp) -> u32 {
        let mut n = self.depth;
        while re.op.is_repeat() && n < self.nest_limit {
            n += 1;
            re = &re.subs[0];
        }
        n
    }

    // === Concatenation and alternation ===

    /// Index just above the nearest pseudo marker.
    fn marker_index(&self) -> usize {
        self.stack
            .iter()
            .rposition(|re| re.op.is_pseudo())
            .map_or(0, |i| i + 1)
    }

    /// Replaces everything above the nearest marker with its concatenation.
    pub(crate) fn concat(&mut self) {
        self.maybe_concat(None);

        let i = self.marker_index();
        let subs = self.stack.split_off(i);
        if subs.is_empty() {
            let re = self.new_regexp(Op::EmptyMatch);
            self.push(re);
            return;
        }
        let re = self.collapse(subs, Op::Concat);
        self.push(re);
    }

    /// Replaces everything above the nearest marker with its alternation.
    pub(crate) fn alternate(&mut self) {
        let i = self.marker_index();
        let mut subs = self.stack.split_off(i);
        // The other alternatives were cleaned when they were swapped below
        // the bar.
        if let Some(last) = subs.last_mut() {
            clean_alt(last);
        }
        if subs.is_empty() {
            let re = self.new_regexp(Op::NoMatch);
            self.push(re);
            return;
        }
        let re = self.collapse(subs, Op::Alternate);
        self.push(re);
    }

    /// Handles `|`: finishes the current alternative and keeps a bar marker
    /// on top of the stack.
    pub(crate) fn parse_vertical_bar(&mut self) {
        self.concat();
        if !self.swap_vertical_bar() {
            self.op(Op::VerticalBar);
        }
    }

    /// If the alternative on top sits above a bar, swaps it below the bar
    /// so the stack reads `... alt1 alt2 |`.
    pub(crate) fn swap_vertical_bar(&mut self) -> bool {
        let n = self.stack.len();
        if n >= 2 && self.stack[n - 2].op == Op::VerticalBar {
            if n >= 3 {
                // Out of reach from now on.
                clean_alt(&mut self.stack[n - 3]);
            }
            self.stack.swap(n - 2, n - 1);
            return true;
        }
        false
    }

    /// Handles `)`.
    pub(crate) fn parse_right_paren(&mut self, cur: &Cursor<'_>) -> Result<()> {
        self.concat();
        if self.swap_vertical_bar() {
            self.stack.pop();
        }
        self.alternate();

        let unexpected = || Error::new(ErrorCode::UnexpectedParen, cur.text());
        let re1 = self.stack.pop().ok_or_else(unexpected)?;
        let mut re2 = self.stack.pop().ok_or_else(unexpected)?;
        if re2.op != Op::LeftParen {
            return Err(unexpected());
        }
        self.depth -= 1;
        // Restore the flags in effect at the `(`.
        self.flags = re2.flags;
        if re2.cap == 0 {
            self.reuse(re2);
            self.push(re1);
        } else {
            re2.op = Op::Capture;
            re2.subs.push(re1);
            self.push(re2);
        }
        Ok(())
    }

    /// Pushes a `(` marker. `capture` groups get the next capture index.
    fn open_group(
        &mut self,
        capture: bool,
        name: Option<String>,
        cur: &Cursor<'_>,
    ) -> Result<()> {
        if self.depth >= self.nest_limit {
            return Err(Error::new(ErrorCode::NestingDepth, cur.text()));
        }
        self.depth += 1;
        let cap = if capture {
            self.num_cap += 1;
            self.num_cap
        } else {
            0
        };
        if let Some(name) = &name {
            self.names.insert(name.clone(), cap);
        }
        let re = self.op(Op::LeftParen);
        re.cap = cap;
        re.name = name;
        Ok(())
    }

    // === Driver ===

    /// Parses one token at the cursor. Returns the start of the token when
    /// it was a repetition operator.
    fn parse_step(&mut self, cur: &mut Cursor<'_>, last_repeat: Option<Pos>) -> Result<Option<Pos>> {
        let before = cur.pos();
        match cur.peek_char() {
            '(' => {
                if self.flags.perl_x() && cur.looking_at("(?") {
                    self.parse_perl_flags(cur)?;
                } else {
                    cur.skip_ascii(1);
                    self.open_group(true, None, cur)?;
                }
            }
            '|' => {
                cur.skip_ascii(1);
                self.parse_vertical_bar();
            }
            ')' => {
                cur.skip_ascii(1);
                self.parse_right_paren(cur)?;
            }
            '^' => {
                cur.skip_ascii(1);
                if self.flags.contains(Flags::ONE_LINE) {
                    self.op(Op::BeginText);
                } else {
                    self.op(Op::BeginLine);
                }
            }
            '$' => {
                cur.skip_ascii(1);
                if self.flags.contains(Flags::ONE_LINE) {
                    self.op(Op::EndText).flags |= Flags::WAS_DOLLAR;
                } else {
                    self.op(Op::EndLine);
                }
            }
            '.' => {
                cur.skip_ascii(1);
                if self.flags.contains(Flags::DOT_NL) {
                    self.op(Op::AnyChar);
                } else {
                    self.op(Op::AnyCharNotNL);
                }
            }
            '[' => self.parse_class(cur)?,
            c @ ('*' | '+' | '?') => {
                cur.skip_ascii(1);
                let op = match c {
                    '*' => Op::Star,
                    '+' => Op::Plus,
                    _ => Op::Quest,
                };
                self.repeat(cur, op, 0, 0, before, last_repeat)?;
                return Ok(Some(before));
            }
            '{' => match parse_repeat(cur) {
                None => {
                    // Not a well-formed count: `{` is a literal.
                    cur.rewind_to(before);
                    cur.skip_ascii(1);
                    self.literal('{' as Rune);
                }
                Some((min, max)) => {
                    if min < 0 || min > MAX_REPEAT || max > MAX_REPEAT || (max >= 0 && min > max) {
                        return Err(Error::new(ErrorCode::InvalidRepeatSize, cur.from(before)));
                    }
                    self.repeat(cur, Op::Repeat, min, max, before, last_repeat)?;
                    return Ok(Some(before));
                }
            },
            '\\' => self.parse_backslash(cur)?,
            _ => {
                let r = cur.pop();
                self.literal(r);
            }
        }
        Ok(None)
    }

    /// Handles a `\` outside a class: assertions, `\Q…\E`, class escapes
    /// and single-character escapes.
    fn parse_backslash(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        if self.flags.perl_x() {
            let op = match cur.rest()[1..].chars().next() {
                Some('A') => Some(Op::BeginText),
                Some('b') => Some(Op::WordBoundary),
                Some('B') => Some(Op::NoWordBoundary),
                Some('z') => Some(Op::EndText),
                Some('C') => {
                    // Any byte: not supported.
                    return Err(Error::new(ErrorCode::InvalidEscape, &cur.rest()[..2]));
                }
                Some('Q') => {
                    cur.skip_ascii(2);
                    self.parse_quoted(cur);
                    return Ok(());
                }
                _ => None,
            };
            if let Some(op) = op {
                cur.skip_ascii(2);
                self.op(op);
                return Ok(());
            }
        }

        let mut re = self.new_regexp(Op::CharClass);
        re.flags = self.flags;
        if self.parse_unicode_class(cur, &mut re.runes)?
            || self.parse_perl_class_escape(cur, &mut re.runes)
        {
            self.push(re);
            return Ok(());
        }
        self.reuse(re);

        let r = self.parse_escape(cur)?;
        self.literal(r);
        Ok(())
    }

    /// Pushes the text up to `\E` (or the end of the pattern) as literals.
    fn parse_quoted(&mut self, cur: &mut Cursor<'_>) {
        let stop = memchr::memmem::find(cur.rest().as_bytes(), br"\E").map(|i| cur.pos() + i);
        let end = stop.unwrap_or(cur.text().len());
        while cur.pos() < end {
            let r = cur.pop();
            self.literal(r);
        }
        if stop.is_some() {
            cur.skip_literal(r"\E");
        }
    }

    // === Perl flags and named groups ===

    /// Handles `(?`: flag changes `(?i-s)`, non-capturing groups `(?i:…)`
    /// and named captures `(?P<name>…)` / `(?<name>…)`.
    fn parse_perl_flags(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        let start = cur.pos();
        let rest = cur.rest();

        let name_at = if rest.len() > 4 && rest.starts_with("(?P<") {
            Some(4)
        } else if rest.len() > 3 && rest.starts_with("(?<") {
            Some(3)
        } else {
            None
        };
        if let Some(name_at) = name_at {
            let Some(end) = memchr::memchr(b'>', rest.as_bytes()) else {
                return Err(Error::new(ErrorCode::InvalidNamedCapture, rest));
            };
            let capture = &rest[..=end];
            let name = &rest[name_at..end];
            if !is_valid_capture_name(name) || self.names.contains_key(name) {
                return Err(Error::new(ErrorCode::InvalidNamedCapture, capture));
            }
            cur.skip_literal(capture);
            return self.open_group(true, Some(name.to_string()), cur);
        }

        cur.skip_ascii(2);
        let mut flags = self.flags;
        let mut negated = false;
        let mut saw_flag = false;
        while cur.more() {
            let c = cur.pop_char();
            match c {
                'i' | 'm' | 's' | 'U' => {
                    let (bit, on) = match c {
                        'i' => (Flags::FOLD_CASE, true),
                        'm' => (Flags::ONE_LINE, false),
                        's' => (Flags::DOT_NL, true),
                        _ => (Flags::NON_GREEDY, true),
                    };
                    flags.set(bit, on != negated);
                    saw_flag = true;
                }
                '-' => {
                    if negated {
                        break;
                    }
                    negated = true;
                    saw_flag = false;
                }
                ':' | ')' => {
                    if negated && !saw_flag {
                        break;
                    }
                    if c == ':' {
                        // The group restores the flags in effect before it.
                        self.open_group(false, None, cur)?;
                    }
                    self.flags = flags;
                    return Ok(());
                }
                _ => break,
            }
        }
        Err(Error::new(ErrorCode::InvalidPerlOp, cur.from(start)))
    }

    // === Escapes ===

    /// Parses a single-character escape at the cursor (which is on the `\`).
    pub(crate) fn parse_escape(&self, cur: &mut Cursor<'_>) -> Result<Rune> {
        let start = cur.pos();
        cur.skip_ascii(1);
        if !cur.more() {
            return Err(Error::new(ErrorCode::TrailingBackslash, ""));
        }
        let c = cur.pop_char();
        match c {
            // A lone \1-\7 would be a backreference, which is not supported.
            '1'..='7' if !at_octal_digit(cur) => {}
            '0'..='7' => {
                let mut r = c as Rune - '0' as Rune;
                for _ in 1..3 {
                    if !at_octal_digit(cur) {
                        break;
                    }
                    r = r * 8 + cur.pop() - '0' as Rune;
                }
                return Ok(r);
            }
            'x' => {
                if let Some(r) = parse_hex_escape(cur) {
                    return Ok(r);
                }
            }
            'a' => return Ok(0x07),
            'f' => return Ok(0x0C),
            'n' => return Ok(0x0A),
            'r' => return Ok(0x0D),
            't' => return Ok(0x09),
            'v' => return Ok(0x0B),
            // Escaped punctuation is always itself.
            c if c.is_ascii() && !c.is_ascii_alphanumeric() => return Ok(c as Rune),
            _ => {}
        }
        Err(Error::new(ErrorCode::InvalidEscape, cur.from(start)))
    }
}

/// True for `[a a b b]` or `[a b]` where `a` and `b` are each other's only
/// fold partner.
fn is_fold_literal(runes: &[Rune]) -> bool {
    match *runes {
        [a, a2, b, b2] => a == a2 && b == b2 && is_fold_pair(a, b),
        [a, b] => a + 1 == b && is_fold_pair(a, b),
        _ => false,
    }
}

/// Checks that nested counted repetitions do not expand beyond `n` copies.
fn repeat_is_valid(re: &Regexp, mut n: i32) -> bool {
    if re.op == Op::Repeat {
        let mut m = re.max;
        if m == 0 {
            return true;
        }
        if m < 0 {
            m = re.min;
        }
        if m > n {
            return false;
        }
        if m > 0 {
            n /= m;
        }
    }
    re.subs.iter().all(|sub| repeat_is_valid(sub, n))
}

fn is_valid_capture_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn at_octal_digit(cur: &Cursor<'_>) -> bool {
    cur.more() && matches!(cur.peek_char(), '0'..='7')
}

/// Parses the part of `\x` escapes after the `x`: two hex digits or
/// `{hex…}`. Leaves the cursor after what it consumed either way.
fn parse_hex_escape(cur: &mut Cursor<'_>) -> Option<Rune> {
    if !cur.more() {
        return None;
    }
    let c = cur.pop_char();
    if c == '{' {
        let mut r: Rune = 0;
        let mut digits = 0;
        loop {
            if !cur.more() {
                return None;
            }
            let c = cur.pop_char();
            if c == '}' {
                break;
            }
            r = r * 16 + c.to_digit(16)?;
            if r > MAX_RUNE {
                return None;
            }
            digits += 1;
        }
        return if digits == 0 { None } else { Some(r) };
    }
    let x = c.to_digit(16);
    if !cur.more() {
        return None;
    }
    let y = cur.pop_char().to_digit(16);
    Some(x? * 16 + y?)
}

/// Parses `{n}`, `{n,}` or `{n,m}`. Counts too large to represent come
/// back as `min == -1`. Returns `None` (cursor position unspecified) when
/// the text is not a well-formed count.
fn parse_repeat(cur: &mut Cursor<'_>) -> Option<(i32, i32)> {
    if !cur.looking_at_char('{') {
        return None;
    }
    cur.skip_ascii(1);
    let mut min = parse_int(cur)?;
    let max;
    if cur.looking_at_char(',') {
        cur.skip_ascii(1);
        if cur.looking_at_char('}') {
            max = -1;
        } else {
            max = parse_int(cur)?;
            if max < 0 {
                min = -1;
            }
        }
    } else {
        max = min;
    }
    if !cur.looking_at_char('}') {
        return None;
    }
    cur.skip_ascii(1);
    Some((min, max))
}

/// Decimal count without leading zeros; -1 when it is too large.
fn parse_int(cur: &mut Cursor<'_>) -> Option<i32> {
    let rest = cur.rest();
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 || (len >= 2 && rest.starts_with('0')) {
        return None;
    }
    cur.skip_ascii(len);
    let mut n: i32 = 0;
    for b in rest[..len].bytes() {
        if n >= 100_000_000 {
            return Some(-1);
        }
        n = n * 10 + i32::from(b - b'0');
    }
    Some(n)
}

// ============================================================================
// Entry points
// ============================================================================

/// Parses `pattern` under `flags` and returns the normalized tree.
///
/// ```
/// use ferroni_syntax::regparse::parse;
/// use ferroni_syntax::regsyntax::Flags;
///
/// let re = parse("ab*", Flags::PERL).unwrap();
/// assert_eq!(re.dump(), "cat{lit{a}star{lit{b}}}");
/// ```
pub fn parse(pattern: &str, flags: Flags) -> Result<Regexp> {
    parse_pattern(pattern, flags, DEFAULT_NEST_LIMIT).map(|parsed| parsed.root)
}

/// Parses `pattern` and returns the tree together with its capture count
/// and name table.
pub fn parse_pattern(pattern: &str, flags: Flags, nest_limit: u32) -> Result<ParsedPattern> {
    log::debug!("parse {:?} flags={:?}", pattern, flags);

    if flags.contains(Flags::LITERAL) {
        let runes: Vec<Rune> = pattern.chars().map(|c| c as Rune).collect();
        return Ok(ParsedPattern {
            root: Regexp::literal(&runes, flags),
            captures_len: 0,
            names: HashMap::new(),
        });
    }

    let mut p = Parser::new(flags, nest_limit);
    let mut cur = Cursor::new(pattern);
    let mut last_repeat = None;
    while cur.more() {
        last_repeat = p.parse_step(&mut cur, last_repeat)?;
    }

    p.concat();
    if p.swap_vertical_bar() {
        p.stack.pop();
    }
    p.alternate();

    if p.stack.len() != 1 {
        return Err(Error::new(ErrorCode::MissingParen, pattern));
    }
    let root = p.stack.pop().ok_or_else(|| Error::new(ErrorCode::MissingParen, pattern))?;
    log::debug!("parsed {:?}: {} captures, pool {}", pattern, p.num_cap, p.free.len());
    Ok(ParsedPattern {
        root,
        captures_len: p.num_cap,
        names: p.names,
    })
}

// ============================================================================
// Tests
// ============================================================================
