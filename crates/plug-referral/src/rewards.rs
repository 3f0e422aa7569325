//! Referral rewards ladder.

use plug_types::feed::{ReferralProgress, RewardTier};
use plug_types::REFERRAL_GOAL;

/// A reward unlocked at a referral threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reward {
    pub referrals: u64,
    pub title: &'static str,
    pub description: &'static str,
}

/// Rewards in ascending threshold order.
pub const REWARDS: [Reward; 4] = [
    Reward {
        referrals: 0,
        title: "early access",
        description: "join before public launch",
    },
    Reward {
        referrals: 3,
        title: "booking credit",
        description: "unlock exclusive credit",
    },
    Reward {
        referrals: 5,
        title: "premium badge",
        description: "verified member status",
    },
    Reward {
        referrals: 10,
        title: "vip status",
        description: "priority support and perks",
    },
];

impl From<&Reward> for RewardTier {
    fn from(reward: &Reward) -> Self {
        RewardTier {
            referrals: reward.referrals,
            title: reward.title.to_string(),
            description: reward.description.to_string(),
        }
    }
}

/// Percentage toward [`REFERRAL_GOAL`], capped at 100.
pub fn progress_pct(referrals: u64) -> u8 {
    (referrals.min(REFERRAL_GOAL) * 100 / REFERRAL_GOAL) as u8
}

/// Full progress report for a referral code.
pub fn progress(referral_code: &str, referrals: u64) -> ReferralProgress {
    let unlocked = REWARDS
        .iter()
        .filter(|r| r.referrals <= referrals)
        .map(RewardTier::from)
        .collect();
    let next = REWARDS
        .iter()
        .find(|r| r.referrals > referrals)
        .map(RewardTier::from);

    ReferralProgress {
        referral_code: referral_code.to_string(),
        referrals,
        progress_pct: progress_pct(referrals),
        unlocked,
        next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_pct() {
        assert_eq!(progress_pct(0), 0);
        assert_eq!(progress_pct(3), 30);
        assert_eq!(progress_pct(10), 100);
        assert_eq!(progress_pct(250), 100);
    }

    #[test]
    fn test_new_entrant_has_early_access_only() {
        let p = progress("ADA12345", 0);
        assert_eq!(p.unlocked.len(), 1);
        assert_eq!(p.unlocked[0].title, "early access");
        assert_eq!(p.next.map(|t| t.referrals), Some(3));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let p = progress("ADA12345", 5);
        assert_eq!(p.unlocked.len(), 3);
        assert_eq!(p.next.map(|t| t.title), Some("vip status".to_string()));
    }

    #[test]
    fn test_top_tier_has_no_next() {
        let p = progress("ADA12345", 12);
        assert_eq!(p.unlocked.len(), REWARDS.len());
        assert!(p.next.is_none());
    }
}
