//! # plug-referral
//!
//! Referral codes, share links, and the rewards ladder.
//!
//! - [`code`] - Code generation and the `^[A-Z0-9]{8}$` format check
//! - [`link`] - `<appUrl>?ref=<code>` and `<appUrl>/confirm?code=<code>` links
//! - [`rewards`] - Reward tiers unlocked by referral count
//!
//! ## Referral Flow
//!
//! 1. An entrant signs up and receives a code derived from their first name.
//! 2. They share `<appUrl>?ref=<code>`; every landing is logged as a visit.
//! 3. A visitor who signs up carries the code as `referredBy`.
//! 4. The referrer's count is bumped server-side and their rewards progress.
//!
//! The same code doubles as the email confirmation token.

pub mod code;
pub mod link;
pub mod rewards;

pub use code::ReferralCode;

/// Error types for referral operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferralError {
    /// The code is not exactly eight `[A-Z0-9]` characters.
    #[error("invalid referral code: {0:?}")]
    InvalidCode(String),

    /// The link is missing the expected query parameter.
    #[error("invalid referral URL: {0}")]
    InvalidUrl(String),
}

/// Convenience result type for referral operations.
pub type Result<T> = std::result::Result<T, ReferralError>;
