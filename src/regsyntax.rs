// regsyntax.rs - Syntax flags and dialect presets.
//
// The parser only ever sees the resulting bitmask; which dialect a caller
// wants is expressed by combining these bits (or picking a preset).

use bitflags::bitflags;

bitflags! {
    /// Parse-mode flags.
    ///
    /// The same type is stored on every [`Regexp`](crate::regexp::Regexp)
    /// node, where only `FOLD_CASE`, `NON_GREEDY` and `WAS_DOLLAR` carry
    /// meaning for the consumer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u16 {
        /// Case-insensitive match.
        const FOLD_CASE = 1 << 0;
        /// Treat the pattern as a literal string.
        const LITERAL = 1 << 1;
        /// Allow character classes like `[^a-z]` and `[[:space:]]` to match newline.
        const CLASS_NL = 1 << 2;
        /// Allow `.` to match newline.
        const DOT_NL = 1 << 3;
        /// Treat `^` and `$` as only matching at beginning and end of text.
        const ONE_LINE = 1 << 4;
        /// Make repetition operators default to non-greedy.
        const NON_GREEDY = 1 << 5;
        /// Allow Perl extensions: `(?:`, `(?i)`, `\A \z \b \B \d \s \w`, `\Q…\E`, lazy `?`.
        const PERL_X = 1 << 6;
        /// Allow `\p{Name}` and `\pN` Unicode group escapes.
        const UNICODE_GROUPS = 1 << 7;
        /// Internal: the `EndText` node came from `$`, not `\z`.
        const WAS_DOLLAR = 1 << 8;
        /// Internal: the tree has already been simplified.
        const SIMPLE = 1 << 9;

        /// `CLASS_NL | DOT_NL`.
        const MATCH_NL = Self::CLASS_NL.bits() | Self::DOT_NL.bits();
        /// As close to Perl as possible.
        const PERL = Self::CLASS_NL.bits()
            | Self::ONE_LINE.bits()
            | Self::PERL_X.bits()
            | Self::UNICODE_GROUPS.bits();
    }
}

impl Flags {
    /// POSIX syntax: no extensions at all.
    pub const POSIX: Flags = Flags::empty();

    #[inline]
    pub fn fold_case(self) -> bool {
        self.contains(Flags::FOLD_CASE)
    }

    #[inline]
    pub fn non_greedy(self) -> bool {
        self.contains(Flags::NON_GREEDY)
    }

    #[inline]
    pub fn perl_x(self) -> bool {
        self.contains(Flags::PERL_X)
    }

    /// The fold-case bit alone; two literals merge only when these agree.
    #[inline]
    pub(crate) fn fold_bit(self) -> Flags {
        self & Flags::FOLD_CASE
    }
}

// ============================================================================
// Tests
// ============================================================================
