//! TreeView - nested view of a decision for rendering.
//!
//! History is flat (one entry per round). The nested shape follows the
//! winner path: each round's winner carries the next round's branches.

use serde::{Deserialize, Serialize};

use crate::domain::{Branch, BranchOutcome, DecisionTree};

/// Id of the synthetic root node holding the main topic.
pub const ROOT_NODE_ID: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub content: String,
    pub tokens: u64,
    pub votes: u64,
    pub is_main: bool,
    pub outcome: BranchOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn from_branch(branch: &Branch) -> Self {
        Self {
            id: branch.id.to_string(),
            content: branch.content.clone(),
            tokens: branch.tokens,
            votes: branch.votes,
            is_main: false,
            outcome: branch.outcome,
            children: branch.children.iter().map(TreeNode::from_branch).collect(),
        }
    }

    fn nodes(branches: &[Branch]) -> Vec<TreeNode> {
        branches.iter().map(TreeNode::from_branch).collect()
    }

    pub fn is_winner(&self) -> bool {
        self.outcome == BranchOutcome::Winner
    }

    /// Number of nodes in this subtree, root included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }
}

/// Build the nested view of `tree`.
///
/// - no round resolved yet: the root holds the live branches
/// - otherwise the root holds round 1's branches and each round's winner
///   holds the following round's branches
/// - while running, the last winner holds the live branches
pub fn build_tree_view(tree: &DecisionTree) -> TreeNode {
    let mut below = if tree.history.is_empty() || tree.is_completed() {
        None
    } else {
        Some(TreeNode::nodes(&tree.branches))
    };

    for round in tree.history.iter().rev() {
        let mut level = TreeNode::nodes(&round.branches);
        if let Some(children) = below.take()
            && let Some(winner) = level.iter_mut().find(|n| n.is_winner())
        {
            winner.children = children;
        }
        below = Some(level);
    }

    TreeNode {
        id: ROOT_NODE_ID.to_string(),
        content: tree.main_content.clone(),
        tokens: tree.total_tokens,
        votes: 0,
        is_main: true,
        outcome: BranchOutcome::Contending,
        children: below.unwrap_or_else(|| TreeNode::nodes(&tree.branches)),
    }
}
