//! Human-friendly record id patterns.

use std::fmt;
use std::str::FromStr;

use recsync_core::error::{Error, ValidationError};
use uuid::Uuid;

/// Letters without `O`, so ids never show an O next to a 0.
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNPQRSTUVWXYZ";

/// Digits without `0`.
const DIGITS: &[u8] = b"123456789";

/// The placeholder replaced by a random character.
const PLACEHOLDER: char = 'X';

/// A pattern for generated record ids, such as `XXXX-XXXX`.
///
/// Every `X` is replaced by a random character from `A-Z` (without `O`) and
/// `1-9`. The first `X` always becomes a letter. Other characters are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPattern(String);

impl IdPattern {
    /// Default pattern: two blocks of four.
    pub const DEFAULT: &'static str = "XXXX-XXXX";

    /// Create a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern has no `X`, or if the ids it
    /// produces would not be valid record ids.
    pub fn new(pattern: impl Into<String>) -> Result<Self, Error> {
        let pattern = pattern.into();
        if !pattern.contains(PLACEHOLDER) {
            return Err(ValidationError::InvalidId {
                value: pattern,
                reason: "pattern needs at least one 'X'".to_string(),
            }
            .into());
        }
        recsync_core::RecordId::new(pattern.as_str())?;
        Ok(Self(pattern))
    }

    /// Returns the pattern string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of distinct ids this pattern can produce, saturating.
    pub fn capacity(&self) -> u64 {
        let slots = self.0.chars().filter(|c| *c == PLACEHOLDER).count();
        let all = (LETTERS.len() + DIGITS.len()) as u64;
        (1..slots).fold(LETTERS.len() as u64, |n, _| n.saturating_mul(all))
    }

    /// Produce one id.
    pub fn generate(&self) -> String {
        let mut rng = Randomness::new();
        let mut first = true;
        self.0
            .chars()
            .map(|c| {
                if c != PLACEHOLDER {
                    return c;
                }
                let pick = if first {
                    first = false;
                    LETTERS[rng.below(LETTERS.len())]
                } else {
                    let i = rng.below(LETTERS.len() + DIGITS.len());
                    if i < LETTERS.len() {
                        LETTERS[i]
                    } else {
                        DIGITS[i - LETTERS.len()]
                    }
                };
                pick as char
            })
            .collect()
    }
}

impl Default for IdPattern {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for IdPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Random draws backed by v4 UUIDs.
struct Randomness {
    pool: u128,
    left: u32,
}

impl Randomness {
    /// Draws taken from one UUID before refilling.
    const DRAWS_PER_UUID: u32 = 16;

    fn new() -> Self {
        Self { pool: 0, left: 0 }
    }

    fn below(&mut self, n: usize) -> usize {
        if self.left == 0 {
            self.pool = Uuid::new_v4().as_u128();
            self.left = Self::DRAWS_PER_UUID;
        }
        self.left -= 1;
        let n = n as u128;
        let pick = self.pool % n;
        self.pool /= n;
        pick as usize
    }
}
