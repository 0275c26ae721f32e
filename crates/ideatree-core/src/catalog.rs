//! Catalog - canned decision summaries for listing screens.
//!
//! Nothing here touches the engine; summaries are generated from a fixed
//! theme table with randomized counts and timestamps.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ports::Clock;

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Listing bucket of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionCategory {
    Ongoing,
    Completed,
    Upcoming,
}

impl DecisionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Upcoming => "upcoming",
        }
    }
}

/// One row of a decision listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: DecisionCategory,
    pub total_tokens: u64,
    pub participants: u32,
    pub branches: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rounds: Option<u32>,
}

pub struct Theme {
    pub title: &'static str,
    pub description: &'static str,
    pub branches: [&'static str; 6],
}

pub const THEMES: &[Theme] = &[
    Theme {
        title: "Design the most engaging Web3 incentive scheme for IdeaTree",
        description: "How token economics and NFT rewards can draw more people into decisions",
        branches: [
            "Platform tokens for every vote cast",
            "A resellable NFT for each round joined",
            "Airdrops for adopted ideas",
            "Idea mining that rewards activity",
            "Tokens split by vote share",
            "Random airdrops",
        ],
    },
    Theme {
        title: "Pick the best decentralized governance model",
        description: "Compare DAO structures and find the one that suits the community",
        branches: [
            "Pure token voting",
            "Delegated representatives",
            "Liquid democracy hybrid",
            "Quadratic voting",
            "Time-weighted voting power",
            "Expert council plus community vote",
        ],
    },
    Theme {
        title: "Settle the platform token economy",
        description: "A sustainable allocation and burn schedule for the token",
        branches: [
            "Deflationary with scheduled burns",
            "Inflationary rewards for participants",
            "Fixed total supply",
            "Supply tuned to activity",
            "Hybrid of rewards and burns",
            "Stepped release schedule",
        ],
    },
    Theme {
        title: "Rank the Web3 social features",
        description: "Which social features ship in the next phase",
        branches: [
            "On-chain identity and reputation",
            "Decentralized messaging",
            "NFT avatars and profiles",
            "Community spaces and groups",
            "Creator incentives",
            "Cross-chain social interop",
        ],
    },
    Theme {
        title: "Plan the platform security upgrade",
        description: "Weigh measures that protect user assets and data",
        branches: [
            "Multisig wallet support",
            "Stronger contract audits",
            "Zero-knowledge privacy",
            "Decentralized identity checks",
            "Insurance fund",
            "Emergency pause switch",
        ],
    },
    Theme {
        title: "Shape the NFT marketplace",
        description: "A friendly place to trade and show off NFTs",
        branches: [
            "Low-fee auctions",
            "Automatic creator royalties",
            "Fractional NFT trading",
            "Social showcase galleries",
            "Cross-chain NFT bridge",
            "Dynamic NFT tooling",
        ],
    },
    Theme {
        title: "Choose the community incentive program",
        description: "The most effective strategy for community growth",
        branches: [
            "Referral rewards",
            "Early adopter airdrop",
            "Community ambassadors",
            "Content creation rewards",
            "Developer bounties",
            "Education grants",
        ],
    },
    Theme {
        title: "Order the cross-chain integrations",
        description: "Which networks get supported first",
        branches: [
            "Ethereum layer 2 first",
            "Deploy on many chains at once",
            "Sidechain pilot",
            "Build cross-chain bridges",
            "Join the Cosmos ecosystem",
            "Polkadot parachain",
        ],
    },
    Theme {
        title: "Draft the DeFi roadmap",
        description: "In what order the decentralized finance products get built",
        branches: [
            "Staking rewards",
            "Liquidity pools",
            "Lending market",
            "Yield aggregator",
            "Decentralized exchange",
            "Synthetic assets",
        ],
    },
    Theme {
        title: "Focus the mobile experience work",
        description: "Make the product better on phones",
        branches: [
            "Native mobile apps",
            "Progressive web app",
            "Wallet browser extension",
            "Lightweight interface",
            "Offline support",
            "Simpler transaction flow",
        ],
    },
];

/// Winners shown for completed summaries, by position.
const WINNERS: &[&str] = &[
    "Idea mining that rewards activity",
    "Liquid democracy hybrid",
    "Hybrid of rewards and burns",
    "NFT avatars and profiles",
    "Zero-knowledge privacy",
    "Social showcase galleries",
    "Content creation rewards",
    "Ethereum layer 2 first",
    "Staking rewards",
    "Progressive web app",
    "Pure token voting",
    "Automatic creator royalties",
];

pub const DEFAULT_ONGOING: usize = 8;
pub const DEFAULT_COMPLETED: usize = 12;
pub const DEFAULT_UPCOMING: usize = 6;

/// Summary generator.
///
/// Counts above the theme table size are capped at the table size.
pub struct MockCatalog<R> {
    clock: Arc<dyn Clock>,
    rng: R,
}

impl<R: Rng> MockCatalog<R> {
    pub fn new(clock: Arc<dyn Clock>, rng: R) -> Self {
        Self { clock, rng }
    }

    /// Random instant up to `span_ms` before `now`.
    fn before(&mut self, now: DateTime<Utc>, span_ms: i64) -> DateTime<Utc> {
        now - Duration::milliseconds(self.rng.gen_range(0..span_ms))
    }

    /// Decisions in progress.
    ///
    /// The first one runs one-minute rounds over 6 rounds. Every other one
    /// gets a round duration that leaves more than a day until its end.
    pub fn ongoing(&mut self, count: usize) -> Vec<DecisionSummary> {
        let now = self.clock.now();

        THEMES
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, theme)| {
                let created_at = self.before(now, 3 * DAY_MS);

                let (round_ms, total_rounds, current_round) = if i == 0 {
                    (60_000, 6, self.rng.gen_range(1..=5))
                } else {
                    let total: u32 = self.rng.gen_range(4..=7);
                    let current = self.rng.gen_range(1..total);
                    let remaining = i64::from(total - current + 1);
                    let min_round_ms = (DAY_MS + remaining - 1) / remaining;
                    (
                        min_round_ms + self.rng.gen_range(0..HOUR_MS),
                        total,
                        current,
                    )
                };
                let remaining = i64::from(total_rounds - current_round + 1);

                DecisionSummary {
                    id: format!("ongoing-{}", i + 1),
                    title: theme.title.to_string(),
                    description: theme.description.to_string(),
                    category: DecisionCategory::Ongoing,
                    total_tokens: self.rng.gen_range(500..5500),
                    participants: self.rng.gen_range(10..210),
                    branches: self.rng.gen_range(3..15),
                    round_end_time: Some(now + Duration::milliseconds(round_ms)),
                    decision_end_time: Some(now + Duration::milliseconds(round_ms * remaining)),
                    created_at,
                    winner: None,
                    current_round: Some(current_round),
                    total_rounds: Some(total_rounds),
                }
            })
            .collect()
    }

    /// Finished decisions, newest first.
    pub fn completed(&mut self, count: usize) -> Vec<DecisionSummary> {
        let now = self.clock.now();

        let mut out: Vec<DecisionSummary> = THEMES
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, theme)| {
                let created_at = self.before(now, 30 * DAY_MS);
                let total_rounds = self.rng.gen_range(5..=7);
                let winner = match WINNERS.get(i) {
                    Some(w) => w.to_string(),
                    None => theme.branches[self.rng.gen_range(0..theme.branches.len())].to_string(),
                };

                DecisionSummary {
                    id: format!("completed-{}", i + 1),
                    title: theme.title.to_string(),
                    description: theme.description.to_string(),
                    category: DecisionCategory::Completed,
                    total_tokens: self.rng.gen_range(2000..10_000),
                    participants: self.rng.gen_range(50..350),
                    branches: self.rng.gen_range(6..26),
                    round_end_time: None,
                    decision_end_time: None,
                    created_at,
                    winner: Some(winner),
                    current_round: Some(total_rounds),
                    total_rounds: Some(total_rounds),
                }
            })
            .collect();

        out.sort_by_key(|d| Reverse(d.created_at));
        out
    }

    /// Scheduled decisions, soonest start first.
    ///
    /// `decision_end_time` carries the start instant; there is no current
    /// round yet.
    pub fn upcoming(&mut self, count: usize) -> Vec<DecisionSummary> {
        let now = self.clock.now();

        let mut out: Vec<DecisionSummary> = THEMES
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, theme)| {
                let starts_at = now + Duration::milliseconds(self.rng.gen_range(0..7 * DAY_MS));

                DecisionSummary {
                    id: format!("upcoming-{}", i + 1),
                    title: theme.title.to_string(),
                    description: theme.description.to_string(),
                    category: DecisionCategory::Upcoming,
                    total_tokens: self.rng.gen_range(1000..4000),
                    participants: self.rng.gen_range(0..50),
                    branches: self.rng.gen_range(2..10),
                    round_end_time: None,
                    decision_end_time: Some(starts_at),
                    created_at: self.before(now, 2 * DAY_MS),
                    winner: None,
                    current_round: None,
                    total_rounds: Some(self.rng.gen_range(4..=7)),
                }
            })
            .collect();

        out.sort_by_key(|d| d.decision_end_time);
        out
    }

    /// Ongoing, completed and upcoming with default counts, in that order.
    pub fn all(&mut self) -> Vec<DecisionSummary> {
        let mut out = self.ongoing(DEFAULT_ONGOING);
        out.extend(self.completed(DEFAULT_COMPLETED));
        out.extend(self.upcoming(DEFAULT_UPCOMING));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn catalog(seed: u64) -> MockCatalog<StdRng> {
        MockCatalog::new(
            Arc::new(FixedClock::new(now())),
            StdRng::seed_from_u64(seed),
        )
    }

    #[rstest]
    #[case(DecisionCategory::Ongoing, 8, 8)]
    #[case(DecisionCategory::Completed, 12, 10)]
    #[case(DecisionCategory::Upcoming, 6, 6)]
    #[case(DecisionCategory::Upcoming, 0, 0)]
    fn counts_are_capped_by_theme_table(
        #[case] category: DecisionCategory,
        #[case] requested: usize,
        #[case] expected: usize,
    ) {
        let mut c = catalog(1);
        let out = match category {
            DecisionCategory::Ongoing => c.ongoing(requested),
            DecisionCategory::Completed => c.completed(requested),
            DecisionCategory::Upcoming => c.upcoming(requested),
        };
        assert_eq!(out.len(), expected);
        assert!(out.iter().all(|d| d.category == category));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn ongoing_values_stay_in_range(#[case] seed: u64) {
        let out = catalog(seed).ongoing(DEFAULT_ONGOING);

        let first = &out[0];
        assert_eq!(first.total_rounds, Some(6));
        assert_eq!(first.round_end_time, Some(now() + Duration::seconds(60)));

        for d in &out {
            assert!((500..5500).contains(&d.total_tokens));
            assert!((10..210).contains(&d.participants));
            assert!((3..15).contains(&d.branches));
            assert!(d.created_at <= now() && d.created_at >= now() - Duration::days(3));

            let total = d.total_rounds.unwrap();
            let current = d.current_round.unwrap();
            assert!(current >= 1 && current < total);
        }
        for d in &out[1..] {
            assert!(d.decision_end_time.unwrap() - now() >= Duration::days(1));
        }
    }

    #[test]
    fn completed_is_newest_first_with_winners() {
        let out = catalog(5).completed(DEFAULT_COMPLETED);

        assert!(out.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        for d in &out {
            assert!(d.winner.is_some());
            assert_eq!(d.current_round, d.total_rounds);
            assert!((5..=7).contains(&d.total_rounds.unwrap()));
            assert!((2000..10_000).contains(&d.total_tokens));
        }
    }

    #[test]
    fn upcoming_is_soonest_first_and_in_the_future() {
        let out = catalog(9).upcoming(DEFAULT_UPCOMING);

        assert!(out
            .windows(2)
            .all(|w| w[0].decision_end_time <= w[1].decision_end_time));
        for d in &out {
            let start = d.decision_end_time.unwrap();
            assert!(start >= now() && start <= now() + Duration::days(7));
            assert!(d.current_round.is_none());
            assert!(d.participants < 50);
        }
    }

    #[test]
    fn all_concatenates_buckets() {
        let out = catalog(11).all();
        assert_eq!(out.len(), 8 + 10 + 6);
        assert_eq!(out[0].category, DecisionCategory::Ongoing);
        assert_eq!(out[8].category, DecisionCategory::Completed);
        assert_eq!(out[18].category, DecisionCategory::Upcoming);
    }

    #[test]
    fn summary_serializes_camel_case_and_skips_empty_fields() {
        let out = catalog(2).upcoming(1);
        let json = serde_json::to_value(&out[0]).unwrap();

        assert_eq!(json["category"], "upcoming");
        assert!(json.get("totalTokens").is_some());
        assert!(json.get("winner").is_none());
        assert!(json.get("currentRound").is_none());
    }
}
