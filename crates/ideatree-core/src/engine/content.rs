//! Branch label generation.

use rand::Rng;
use rand::seq::SliceRandom;

/// Label templates a branch is drawn from.
pub const BRANCH_TEMPLATES: &[&str] = &[
    // incentives
    "Token staking rewards",
    "NFT achievement badges",
    "Creator royalty sharing",
    "Community governance votes",
    "Liquidity mining rewards",
    "Referral commissions",
    "Early-adopter airdrops",
    "Activity leaderboard points",
    // technology
    "Layer2 scaling",
    "Cross-chain bridging",
    "Zero-knowledge privacy",
    "Smart contract automation",
    "Decentralized storage",
    "Oracle data feeds",
    "Multisig security",
    "Gas fee optimization",
    // product
    "Social graph",
    "Content recommendation",
    "Real-time notifications",
    "Internationalization",
    "Mobile support",
    "Dark mode theme",
    "Accessibility support",
    "Offline caching",
    // business model
    "Subscription membership",
    "Trading fee revenue share",
    "Ad revenue sharing",
    "Paid feature unlocks",
    "Enterprise services",
    "Paid API access",
    "Data analytics services",
    "Custom development",
];

/// Verbs prepended to labels of branches that grow under a parent.
pub const BRANCH_PREFIXES: &[&str] = &[
    "Optimize",
    "Enhance",
    "Simplify",
    "Extend",
    "Improve",
    "Integrate",
    "Upgrade",
    "Reinvent",
];

/// Random branch label.
///
/// Only the presence of `parent` matters: a follow-up branch gets a prefix
/// verb, its template is still drawn at random.
pub fn generate_label<R: Rng + ?Sized>(rng: &mut R, parent: Option<&str>) -> String {
    let template = pick(rng, BRANCH_TEMPLATES);
    match parent {
        Some(_) => format!("{} {}", pick(rng, BRANCH_PREFIXES), template),
        None => template.to_string(),
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, table: &[&'a str]) -> &'a str {
    // tables are non-empty constants
    table.choose(rng).copied().unwrap_or_default()
}
