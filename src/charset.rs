//! Character class table for the mask language
//!
//! Maps hashcat-style two-character tokens (`?l`, `?u`, ...) to the literal
//! characters they stand for. The table is built once at startup from the
//! four user-supplied custom charsets and is immutable afterwards.

use crate::error::MaskError;

/// The character that introduces a charset token in a mask
pub const MASK_SIGIL: char = '?';

/// The class character that marks the following mask unit as optional
pub const OPTIONAL_MARKER: char = '-';

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const HEX_LOWER: &str = "0123456789abcdef";
const HEX_UPPER: &str = "0123456789ABCDEF";
const SYMBOLS: &str = " !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Charset lookup table: fixed built-in classes plus four custom slots
#[derive(Debug, Clone)]
pub struct CharsetTable {
    /// Expansion of `?a`: lower + upper + digits + symbols, in that order
    all: String,
    /// Custom charsets `?1`..`?4`, empty when unset
    custom: [String; 4],
}

impl CharsetTable {
    /// Build the table with the given custom charsets for `?1`..`?4`
    pub fn new(custom: [String; 4]) -> Self {
        let mut all =
            String::with_capacity(LOWER.len() + UPPER.len() + DIGITS.len() + SYMBOLS.len());
        all.push_str(LOWER);
        all.push_str(UPPER);
        all.push_str(DIGITS);
        all.push_str(SYMBOLS);

        Self { all, custom }
    }

    /// Resolve the class character of a `?X` token to its character set.
    ///
    /// An unknown class is a fatal configuration error: the mask that
    /// referenced it cannot be parsed.
    pub fn resolve(&self, class: char) -> std::result::Result<&str, MaskError> {
        Ok(match class {
            'l' => LOWER,
            'u' => UPPER,
            'd' => DIGITS,
            'h' => HEX_LOWER,
            'H' => HEX_UPPER,
            's' => SYMBOLS,
            'a' => self.all.as_str(),
            // "??" escapes the sigil itself
            MASK_SIGIL => "?",
            '1'..='4' => self.custom[class as usize - '1' as usize].as_str(),
            other => return Err(MaskError::UnknownCharset(other)),
        })
    }

    /// The known classes and their expansions, for help text
    pub fn descriptions(&self) -> Vec<(String, &str)> {
        let mut entries = vec![
            ("?l".to_string(), LOWER),
            ("?u".to_string(), UPPER),
            ("?d".to_string(), DIGITS),
            ("?h".to_string(), HEX_LOWER),
            ("?H".to_string(), HEX_UPPER),
            ("?s".to_string(), SYMBOLS),
            ("??".to_string(), "?"),
            ("?a".to_string(), self.all.as_str()),
        ];
        for (i, set) in self.custom.iter().enumerate() {
            entries.push((format!("?{}", i + 1), set.as_str()));
        }
        entries
    }
}

impl Default for CharsetTable {
    fn default() -> Self {
        Self::new(Default::default())
    }
}
