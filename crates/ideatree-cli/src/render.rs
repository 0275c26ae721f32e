//! Text and JSON output.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;
use termtree::Tree;

use ideatree_core::app::{DecisionStatusView, TreeNode};
use ideatree_core::catalog::DecisionSummary;
use ideatree_core::domain::{Branch, BranchId, BranchOutcome, DecisionTree, RoundHistory};

/// Final result of a `run` or `step`, for `--json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub status: DecisionStatusView,
    pub tree: &'a DecisionTree,
    pub rewards: &'a BTreeMap<BranchId, u64>,
}

impl<'a> Report<'a> {
    pub fn new(tree: &'a DecisionTree, rewards: &'a BTreeMap<BranchId, u64>) -> Self {
        Self {
            status: DecisionStatusView::from(tree),
            tree,
            rewards,
        }
    }
}

fn marker(outcome: BranchOutcome) -> &'static str {
    match outcome {
        BranchOutcome::Winner => " [winner]",
        BranchOutcome::Eliminated => " [out]",
        BranchOutcome::Contending => "",
    }
}

fn branch_line(branch: &Branch) -> String {
    format!(
        "{} ({}) {} tokens, {} votes{}",
        branch.content,
        branch.id,
        branch.tokens,
        branch.votes,
        marker(branch.outcome)
    )
}

/// Branches of the round about to be played.
pub fn live_round(tree: &DecisionTree) -> String {
    let mut out = format!(
        "Round {}/{} of \"{}\" (pool {})\n",
        tree.current_round, tree.total_rounds, tree.main_content, tree.total_tokens
    );
    for branch in &tree.branches {
        let _ = writeln!(out, "  - {}", branch_line(branch));
    }
    out
}

/// One resolved round: winner, then the per-branch token changes.
pub fn resolved_round(round: &RoundHistory) -> String {
    let mut out = format!(
        "Round {} won by {} ({}), {} tokens moved\n",
        round.round,
        round.winner.content,
        round.winner.id,
        round.eliminated_total()
    );
    for change in &round.token_changes {
        let sign = if change.is_gain() { '+' } else { '-' };
        let _ = writeln!(out, "  {sign}{} {}", change.amount, change.branch_id);
    }
    out
}

pub fn rewards(rewards: &BTreeMap<BranchId, u64>) -> String {
    let mut out = String::from("Rewards\n");
    if rewards.is_empty() {
        out.push_str("  (none)\n");
    }
    for (id, amount) in rewards {
        let _ = writeln!(out, "  {id}: {amount}");
    }
    out
}

fn node_label(node: &TreeNode) -> String {
    if node.is_main {
        format!("{} [{} tokens]", node.content, node.tokens)
    } else {
        format!(
            "{} {} tokens{}",
            node.content,
            node.tokens,
            marker(node.outcome)
        )
    }
}

pub fn tree_view(node: &TreeNode) -> Tree<String> {
    Tree::new(node_label(node)).with_leaves(node.children.iter().map(tree_view))
}

pub fn catalog(summaries: &[DecisionSummary]) -> String {
    let mut out = String::new();
    for s in summaries {
        let _ = write!(
            out,
            "[{}] {}: {} ({} tokens, {} participants, {} branches",
            s.category.as_str(),
            s.id,
            s.title,
            s.total_tokens,
            s.participants,
            s.branches
        );
        if let (Some(current), Some(total)) = (s.current_round, s.total_rounds) {
            let _ = write!(out, ", round {current}/{total}");
        }
        if let Some(winner) = &s.winner {
            let _ = write!(out, ", winner: {winner}");
        }
        if let Some(end) = s.decision_end_time {
            let _ = write!(out, ", ends {}", end.format("%Y-%m-%d %H:%M"));
        }
        out.push_str(")\n");
    }
    out
}

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
