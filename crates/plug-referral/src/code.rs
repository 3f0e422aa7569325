//! Referral code generation and validation.
//!
//! ## Scheme
//!
//! A code is exactly [`REFERRAL_CODE_LEN`] characters from `[A-Z0-9]`:
//! up to three leading ASCII letters/digits of the first name (uppercased),
//! padded with random base-36 characters. Names shorter than three usable
//! characters get a longer random suffix, so the length never varies.
//!
//! ## Collisions
//!
//! With a full prefix the random suffix has `36^5 ≈ 6.05e7` values. Among
//! `n` entrants sharing a prefix the birthday bound gives a collision
//! probability of roughly `n² / (2 · 36^5)`, about 0.8% at `n = 1000`.
//! Callers check the store and regenerate on collision.

use std::fmt;
use std::str::FromStr;

use plug_types::REFERRAL_CODE_LEN;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ReferralError, Result};

/// Base-36 alphabet, uppercase.
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum characters taken from the first name.
pub const NAME_PREFIX_LEN: usize = 3;

/// How many times a caller should regenerate on collision before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// A well-formed referral code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Generate a fresh code for `first_name` using the thread RNG.
    pub fn generate(first_name: &str) -> Self {
        Self::generate_with(first_name, &mut rand::thread_rng())
    }

    /// Generate a code with an explicit RNG.
    pub fn generate_with<R: Rng + ?Sized>(first_name: &str, rng: &mut R) -> Self {
        let mut code: String = first_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(NAME_PREFIX_LEN)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        while code.len() < REFERRAL_CODE_LEN {
            let idx = rng.gen_range(0..ALPHABET.len());
            code.push(ALPHABET[idx] as char);
        }

        Self(code)
    }

    /// Parse a code, enforcing `^[A-Z0-9]{8}$`.
    pub fn parse(s: &str) -> Result<Self> {
        if is_well_formed(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ReferralError::InvalidCode(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Whether `s` matches `^[A-Z0-9]{8}$`.
pub fn is_well_formed(s: &str) -> bool {
    s.len() == REFERRAL_CODE_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReferralCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ReferralCode {
    type Err = ReferralError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = ReferralError;

    fn try_from(s: String) -> Result<Self> {
        if is_well_formed(&s) {
            Ok(Self(s))
        } else {
            Err(ReferralError::InvalidCode(s))
        }
    }
}

impl From<ReferralCode> for String {
    fn from(code: ReferralCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_code_is_well_formed() {
        for name in ["Ada", "Bo", "", "Ngozi-Ann", "Émile", "x"] {
            let code = ReferralCode::generate(name);
            assert!(is_well_formed(code.as_str()), "{name:?} -> {code}");
        }
    }

    #[test]
    fn test_prefix_from_first_name() {
        let code = ReferralCode::generate("ngozi");
        assert!(code.as_str().starts_with("NGO"));

        let short = ReferralCode::generate("Bo");
        assert!(short.as_str().starts_with("BO"));
        assert_eq!(short.as_str().len(), REFERRAL_CODE_LEN);
    }

    #[test]
    fn test_non_ascii_name_characters_skipped() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = ReferralCode::generate_with("Émile", &mut rng);
        assert!(code.as_str().starts_with("MIL"));
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = ReferralCode::generate_with("Ada", &mut StdRng::seed_from_u64(42));
        let b = ReferralCode::generate_with("Ada", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_check() {
        assert!(is_well_formed("ADA12345"));
        assert!(is_well_formed("00000000"));
        assert!(!is_well_formed("ada12345"));
        assert!(!is_well_formed("ADA1234"));
        assert!(!is_well_formed("ADA123456"));
        assert!(!is_well_formed("ADA-2345"));
        assert!(!is_well_formed(""));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ReferralCode::parse("ADA12345").map(ReferralCode::into_string),
            Ok("ADA12345".to_string())
        );
        assert_eq!(
            "bad".parse::<ReferralCode>(),
            Err(ReferralError::InvalidCode("bad".to_string()))
        );
    }
}
