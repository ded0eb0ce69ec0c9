use std::fmt;

use strum::Display;

use crate::error::{Error, Result};
use crate::pattern::{MAX_TOKEN_LEN, Pattern};

/// How a token's value is compared against an input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "??")]
    Wildcard,
    #[strum(serialize = "<")]
    LessThan,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = ">")]
    GreaterThan,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
}

/// How many input bytes a token may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Quantifier {
    #[strum(serialize = "1")]
    ExactlyOne,
    #[strum(serialize = "?")]
    ZeroOrOne,
    #[strum(serialize = "*")]
    ZeroOrMore,
    #[strum(serialize = "+")]
    OneOrMore,
}

/// One compiled element of a pattern: a byte comparison plus a quantifier.
///
/// Tokens are owned by the [`Pattern`] that compiled them. A token knows its
/// own position in the sequence and addresses its successor by index whenever
/// an optional quantifier needs one token of lookahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    operation: Operation,
    quantifier: Quantifier,
    value: u8,
    /// Single-digit shorthand: the value is a high nibble.
    nibble: bool,
    index: usize,
}

fn hex_digit(c: char) -> u8 {
    match c {
        '0'..='9' => c as u8 - b'0',
        _ => c as u8 - b'A' + 10,
    }
}

impl Token {
    /// Compile one whitespace-delimited element of pattern text.
    ///
    /// The scan is a left-to-right accumulation over the case-folded token:
    /// hex digits fill the value high nibble first, `?` is a full wildcard
    /// before any digit and a zero-or-one quantifier after one, `<`/`<=`/
    /// `>`/`>=` select a comparison, and `*`/`+` select a greedy quantifier.
    pub(crate) fn parse(text: &str, index: usize) -> Result<Self> {
        if text.len() > MAX_TOKEN_LEN {
            return Err(Error::TokenTooLong {
                token: text.to_string(),
                limit: MAX_TOKEN_LEN,
            });
        }

        let mut operation = Operation::Equal;
        let mut quantifier = Quantifier::ExactlyOne;
        let mut value = 0u8;
        let mut digits = 0u8;
        let mut wildcard = false;
        let mut operator = false;

        let folded = text.to_ascii_uppercase();
        let mut chars = folded.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '0'..='9' | 'A'..='F' => {
                    match digits {
                        0 => value = hex_digit(c) << 4,
                        1 => value |= hex_digit(c),
                        _ => return Err(Error::TooManyHexDigits(text.to_string())),
                    }
                    digits += 1;
                }
                '?' => {
                    if digits > 0 {
                        quantifier = Quantifier::ZeroOrOne;
                    } else {
                        operation = Operation::Wildcard;
                        wildcard = true;
                    }
                }
                '<' => {
                    operator = true;
                    operation = if chars.next_if_eq(&'=').is_some() {
                        Operation::LessOrEqual
                    } else {
                        Operation::LessThan
                    };
                }
                '>' => {
                    operator = true;
                    operation = if chars.next_if_eq(&'=').is_some() {
                        Operation::GreaterOrEqual
                    } else {
                        Operation::GreaterThan
                    };
                }
                '*' => {
                    operator = true;
                    quantifier = Quantifier::ZeroOrMore;
                }
                '+' => {
                    operator = true;
                    quantifier = Quantifier::OneOrMore;
                }
                other => {
                    return Err(Error::UnexpectedCharacter {
                        token: text.to_string(),
                        ch: other,
                    });
                }
            }
        }

        if operator && digits == 0 && !wildcard {
            return Err(Error::DanglingOperator(text.to_string()));
        }

        // High-nibble shorthand: a lone digit shifts down into the low bits
        // and is compared against the input's high nibble.
        let nibble = digits == 1;
        if nibble {
            value >>= 4;
        }
        // A token without digits has nothing to compare against.
        if digits == 0 {
            operation = Operation::Wildcard;
        }

        Ok(Self {
            operation,
            quantifier,
            value,
            nibble,
            index,
        })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Apply the token's operation to a single input byte. Never fails.
    pub fn matches_byte(&self, byte: u8) -> bool {
        let input = if self.nibble { byte >> 4 } else { byte };
        match self.operation {
            Operation::Equal => input == self.value,
            Operation::Wildcard => true,
            Operation::LessThan => input < self.value,
            Operation::LessOrEqual => input <= self.value,
            Operation::GreaterThan => input > self.value,
            Operation::GreaterOrEqual => input >= self.value,
        }
    }

    /// Whether this token could begin a match at the current position.
    ///
    /// This is the one-token lookahead used when the preceding token is
    /// optional. It inspects the current byte only and never recurses into
    /// this token's own quantifier, so chains of adjacent optional tokens
    /// resolve against their immediate neighbor alone.
    fn could_start(&self, input: &[u8]) -> bool {
        match input.first() {
            Some(&byte) => self.matches_byte(byte),
            None => false,
        }
    }

    /// Match this token at the start of `input`, returning the number of
    /// bytes consumed and whether the token succeeded.
    ///
    /// `input` runs from the read cursor to the end of the buffer, so the
    /// greedy quantifiers are bounded by it and an empty slice fails every
    /// form that must consume a byte.
    pub(crate) fn matches(&self, pattern: &Pattern, input: &[u8]) -> (usize, bool) {
        match self.quantifier {
            Quantifier::ExactlyOne => match input.first() {
                Some(&byte) if self.matches_byte(byte) => (1, true),
                _ => (0, false),
            },
            Quantifier::ZeroOrOne => {
                if let Some(&byte) = input.first()
                    && self.matches_byte(byte)
                {
                    return (1, true);
                }
                (0, self.skip_allowed(pattern, input))
            }
            Quantifier::ZeroOrMore => {
                let run = self.matching_run(input);
                if run > 0 {
                    (run, true)
                } else {
                    (0, self.skip_allowed(pattern, input))
                }
            }
            Quantifier::OneOrMore => {
                let run = self.matching_run(input);
                (run, run > 0)
            }
        }
    }

    /// Length of the maximal run of matching bytes at the start of `input`.
    fn matching_run(&self, input: &[u8]) -> usize {
        input
            .iter()
            .take_while(|&&byte| self.matches_byte(byte))
            .count()
    }

    /// Zero-consumption rule for optional tokens: the successor must be able
    /// to pick up at the same position; a trailing optional may always skip.
    fn skip_allowed(&self, pattern: &Pattern, input: &[u8]) -> bool {
        match pattern.token_after(self.index) {
            Some(next) => next.could_start(input),
            None => true,
        }
    }

    /// The exact byte this token requires at its first position, if any.
    pub(crate) fn required_first_byte(&self) -> Option<u8> {
        let literal = self.operation == Operation::Equal && !self.nibble;
        let consumes = matches!(
            self.quantifier,
            Quantifier::ExactlyOne | Quantifier::OneOrMore
        );
        (literal && consumes).then_some(self.value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Operation::Equal => {}
            op => write!(f, "{op}")?,
        }
        if self.operation != Operation::Wildcard {
            if self.nibble {
                write!(f, "{:X}", self.value)?;
            } else {
                write!(f, "{:02X}", self.value)?;
            }
        }
        match self.quantifier {
            Quantifier::ExactlyOne => Ok(()),
            q => write!(f, "{q}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str) -> Token {
        Token::parse(text, 0).unwrap()
    }

    #[test]
    fn test_parse_exact_byte() {
        let t = token("4A");
        assert_eq!(t.operation(), Operation::Equal);
        assert_eq!(t.quantifier(), Quantifier::ExactlyOne);
        assert_eq!(t.value(), 0x4A);
        assert!(t.matches_byte(0x4A));
        assert!(!t.matches_byte(0x4B));
        assert!(!t.matches_byte(0x00));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let t = token("4a");
        assert_eq!(t.value(), 0x4A);
        assert!(t.matches_byte(0x4A));
    }

    #[test]
    fn test_parse_single_digit_matches_high_nibble() {
        let t = token("4");
        assert_eq!(t.operation(), Operation::Equal);
        for byte in 0x40..=0x4F {
            assert!(t.matches_byte(byte), "expected {byte:#04X} to match");
        }
        assert!(!t.matches_byte(0x3F));
        assert!(!t.matches_byte(0x50));
    }

    #[test]
    fn test_parse_full_wildcard() {
        let t = token("??");
        assert_eq!(t.operation(), Operation::Wildcard);
        for byte in 0..=u8::MAX {
            assert!(t.matches_byte(byte));
        }
    }

    #[test]
    fn test_parse_comparisons() {
        let t = token("<10");
        assert!(t.matches_byte(0x0F));
        assert!(!t.matches_byte(0x10));

        let t = token("<=10");
        assert!(t.matches_byte(0x10));
        assert!(!t.matches_byte(0x11));

        let t = token(">EF");
        assert!(t.matches_byte(0xF0));
        assert!(!t.matches_byte(0xEF));

        let t = token(">=EF");
        assert!(t.matches_byte(0xEF));
        assert!(!t.matches_byte(0xEE));
    }

    #[test]
    fn test_parse_single_digit_comparison() {
        // "<7" compares the input's high nibble.
        let t = token("<7");
        assert!(t.matches_byte(0x6F));
        assert!(!t.matches_byte(0x70));
    }

    #[test]
    fn test_parse_quantifiers() {
        assert_eq!(token("4A").quantifier(), Quantifier::ExactlyOne);
        assert_eq!(token("4A?").quantifier(), Quantifier::ZeroOrOne);
        assert_eq!(token("4A*").quantifier(), Quantifier::ZeroOrMore);
        assert_eq!(token("4A+").quantifier(), Quantifier::OneOrMore);
    }

    #[test]
    fn test_question_mark_is_contextual() {
        // Before any digit it wildcards the byte; after a digit it makes the
        // byte optional.
        assert_eq!(token("?").operation(), Operation::Wildcard);
        assert_eq!(token("?").quantifier(), Quantifier::ExactlyOne);
        assert_eq!(token("4?").operation(), Operation::Equal);
        assert_eq!(token("4?").quantifier(), Quantifier::ZeroOrOne);
    }

    #[test]
    fn test_token_without_digits_is_wildcard() {
        // A comparison with no digits to compare against degrades to a
        // wildcard as long as a `?` marker supplied value context.
        let t = token("?<");
        assert_eq!(t.operation(), Operation::Wildcard);
    }

    #[test]
    fn test_parse_too_many_hex_digits() {
        let err = Token::parse("4AB", 0).unwrap_err();
        assert!(matches!(err, Error::TooManyHexDigits(ref t) if t == "4AB"));
    }

    #[test]
    fn test_parse_dangling_operators() {
        for text in ["<", ">", "<=", ">=", "*", "+"] {
            let err = Token::parse(text, 0).unwrap_err();
            assert!(
                matches!(err, Error::DanglingOperator(_)),
                "expected dangling operator for {text:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_unexpected_character() {
        let err = Token::parse("4G", 0).unwrap_err();
        assert!(matches!(err, Error::UnexpectedCharacter { ch: 'G', .. }));
    }

    #[test]
    fn test_parse_token_too_long() {
        let text = "4".repeat(MAX_TOKEN_LEN + 1);
        let err = Token::parse(&text, 0).unwrap_err();
        assert!(matches!(err, Error::TokenTooLong { limit, .. } if limit == MAX_TOKEN_LEN));
    }

    #[test]
    fn test_matches_exactly_one() {
        let pattern = Pattern::compile("4A").unwrap();
        let t = &pattern.tokens()[0];
        assert_eq!(t.matches(&pattern, &[0x4A, 0x4B]), (1, true));
        assert_eq!(t.matches(&pattern, &[0x4B]), (0, false));
        assert_eq!(t.matches(&pattern, &[]), (0, false));
    }

    #[test]
    fn test_matches_one_or_more_is_greedy() {
        let pattern = Pattern::compile("<10+").unwrap();
        let t = &pattern.tokens()[0];
        assert_eq!(t.matches(&pattern, &[0x05, 0x09, 0xFF]), (2, true));
        assert_eq!(t.matches(&pattern, &[0xFF]), (0, false));
        assert_eq!(t.matches(&pattern, &[]), (0, false));
    }

    #[test]
    fn test_matches_zero_or_more_nibble_run() {
        let pattern = Pattern::compile("4?*").unwrap();
        let t = &pattern.tokens()[0];
        assert_eq!(t.matches(&pattern, &[0x41, 0x42, 0x50]), (2, true));
    }

    #[test]
    fn test_matches_run_is_bounded_by_input() {
        let pattern = Pattern::compile("??+").unwrap();
        let t = &pattern.tokens()[0];
        assert_eq!(t.matches(&pattern, &[0x00, 0x01]), (2, true));
    }

    #[test]
    fn test_trailing_optional_skips_on_mismatch() {
        let pattern = Pattern::compile("4A?").unwrap();
        let t = &pattern.tokens()[0];
        assert_eq!(t.matches(&pattern, &[0x99]), (0, true));
        assert_eq!(t.matches(&pattern, &[]), (0, true));
    }

    #[test]
    fn test_optional_defers_to_successor() {
        let pattern = Pattern::compile("4A? 4B").unwrap();
        let t = &pattern.tokens()[0];
        // Successor can pick up here, so the optional may skip.
        assert_eq!(t.matches(&pattern, &[0x4B]), (0, true));
        // Successor cannot, so the optional fails.
        assert_eq!(t.matches(&pattern, &[0x99]), (0, false));
        assert_eq!(t.matches(&pattern, &[]), (0, false));
    }

    #[test]
    fn test_required_first_byte() {
        let full = Pattern::compile("4A").unwrap();
        assert_eq!(full.tokens()[0].required_first_byte(), Some(0x4A));

        let optional = Pattern::compile("4A?").unwrap();
        assert_eq!(optional.tokens()[0].required_first_byte(), None);

        let nibble = Pattern::compile("4").unwrap();
        assert_eq!(nibble.tokens()[0].required_first_byte(), None);

        let wildcard = Pattern::compile("??").unwrap();
        assert_eq!(wildcard.tokens()[0].required_first_byte(), None);
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["4A", "4", "??", "4?", "<7F+", ">=0A", "??*"] {
            assert_eq!(token(text).to_string(), text);
        }
        // The last quantifier marker wins, so display is canonical.
        assert_eq!(token("4?*").to_string(), "4*");
    }
}
