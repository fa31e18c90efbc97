//! Fixed-depth minimax search
//!
//! The game tree is an arena of owned nodes built top-down, level by level.
//! Every node holds its own board clone; nothing is shared between nodes and
//! the whole tree is dropped once a move is picked.
//!
//! Scores are always from the root player's point of view. Nodes where the
//! root player moves take the max of their children, nodes where the opponent
//! moves take the min. At the root each child is an opponent-to-move result:
//! its score is negated into the opponent's view and the lowest wins, i.e. the
//! move after which the opponent is worst off. Ties keep the first child in
//! row-major move order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::board::{Board, Player, Pos};
use super::evaluate::{Score, evaluate};
use super::lookahead::{self, LookaheadRule};
use crate::consts::{DEFAULT_NODE_BUDGET, DEFAULT_SEARCH_DEPTH};
use crate::error::{Error, Result};

/// Index of a node in the tree arena
pub type NodeId = usize;

/// Arena index of the root node
pub const ROOT: NodeId = 0;

/// Search limits and lookahead semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies below the root (values under 1 are treated as 1)
    pub max_depth: u32,
    /// Upper bound on arena size; `None` searches the full tree
    pub node_budget: Option<usize>,
    pub lookahead: LookaheadRule,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_SEARCH_DEPTH,
            node_budget: Some(DEFAULT_NODE_BUDGET),
            lookahead: LookaheadRule::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

/// One position in the game tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub board: Board,
    pub depth: u32,
    /// Player to move from this position
    pub to_move: Player,
    /// Move that produced this node (`None` at the root)
    pub mv: Option<Pos>,
    /// Backed-up score, root player's view
    pub score: Option<Score>,
    /// Children in move generation order
    pub children: Vec<NodeId>,
}

/// Result of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best_move: Pos,
    /// Score of the chosen child, root player's view
    pub best_score: Score,
    pub node_count: usize,
    pub max_depth_reached: u32,
    /// True if the node budget cut expansion short
    pub truncated: bool,
}

/// Scored minimax tree
#[derive(Debug, Clone)]
pub struct GameTree {
    nodes: Vec<TreeNode>,
    root_player: Player,
    config: SearchConfig,
    truncated: bool,
}

impl GameTree {
    /// Build and score the tree for `player` to move on `board`
    pub fn build(board: &Board, player: Player, config: &SearchConfig) -> Result<Self> {
        let mut config = *config;
        if config.max_depth == 0 {
            log::warn!("Search depth 0 requested, searching 1 ply");
            config.max_depth = 1;
        }

        let mut tree = Self {
            nodes: vec![TreeNode {
                board: board.clone(),
                depth: 0,
                to_move: player,
                mv: None,
                score: None,
                children: Vec::new(),
            }],
            root_player: player,
            config,
            truncated: false,
        };
        tree.expand()?;
        tree.back_up(ROOT);
        Ok(tree)
    }

    pub fn root_player(&self) -> Player {
        self.root_player
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn root(&self) -> &TreeNode {
        self.node(ROOT)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn max_depth_reached(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// A node stops the search at max depth or once the game is decided.
    /// The root is always searched.
    fn is_leaf(&self, node: &TreeNode) -> bool {
        node.depth >= self.config.max_depth
            || (node.depth > 0 && node.board.single_owner().is_some())
    }

    /// Breadth-first expansion. A node is only expanded when all of its
    /// children fit in the budget, so no node is ever half expanded.
    fn expand(&mut self) -> Result<()> {
        let mut frontier = VecDeque::from([ROOT]);

        while let Some(id) = frontier.pop_front() {
            let node = &self.nodes[id];
            if self.is_leaf(node) {
                continue;
            }
            let mover = node.to_move;
            let depth = node.depth;
            let board = node.board.clone();
            let moves: Vec<Pos> = board.legal_moves(mover).collect();

            if let Some(budget) = self.config.node_budget {
                if id != ROOT && self.nodes.len() + moves.len() > budget {
                    if !self.truncated {
                        log::warn!("Search budget of {budget} nodes reached at depth {depth}");
                    }
                    self.truncated = true;
                    continue;
                }
            }

            for mv in moves {
                let mut child = board.clone();
                lookahead::play(&mut child, mv, mover, self.config.lookahead)?;
                let child_id = self.nodes.len();
                self.nodes.push(TreeNode {
                    board: child,
                    depth: depth + 1,
                    to_move: mover.opponent(),
                    mv: Some(mv),
                    score: None,
                    children: Vec::new(),
                });
                self.nodes[id].children.push(child_id);
                frontier.push_back(child_id);
            }
        }

        Ok(())
    }

    /// Minimax backup from `id`; caches every node's score
    fn back_up(&mut self, id: NodeId) -> Score {
        let children = self.nodes[id].children.clone();
        let score = if children.is_empty() {
            evaluate(&self.nodes[id].board, self.root_player)
        } else if self.nodes[id].to_move == self.root_player {
            children
                .into_iter()
                .fold(Score::Loss, |best, c| best.max(self.back_up(c)))
        } else {
            children
                .into_iter()
                .fold(Score::Win, |best, c| best.min(self.back_up(c)))
        };
        self.nodes[id].score = Some(score);
        score
    }

    /// Root child that leaves the opponent worst off, with its score
    pub fn best_move(&self) -> Result<(Pos, Score)> {
        let mut best: Option<(Pos, Score)> = None;
        for &id in &self.root().children {
            let child = &self.nodes[id];
            let (Some(mv), Some(score)) = (child.mv, child.score) else {
                continue;
            };
            let opponent_view = -score;
            if best.is_none_or(|(_, kept)| opponent_view < -kept) {
                best = Some((mv, score));
            }
        }
        best.ok_or(Error::NoLegalMove(self.root_player))
    }
}

/// Search `board` for `player` and report the chosen move with tree stats
pub fn search(board: &Board, player: Player, config: &SearchConfig) -> Result<SearchOutcome> {
    let tree = GameTree::build(board, player, config)?;
    let (best_move, best_score) = tree.best_move()?;
    let outcome = SearchOutcome {
        best_move,
        best_score,
        node_count: tree.len(),
        max_depth_reached: tree.max_depth_reached(),
        truncated: tree.truncated(),
    };
    log::debug!(
        "Search for {player}: {best_move} scores {best_score} ({} nodes, depth {})",
        outcome.node_count,
        outcome.max_depth_reached
    );
    Ok(outcome)
}

/// Pick a move for `player` looking `max_depth` plies ahead
pub fn choose_move(board: &Board, player: Player, max_depth: u32) -> Result<Pos> {
    search(board, player, &SearchConfig::with_depth(max_depth)).map(|o| o.best_move)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[i32]]) -> Board {
        Board::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    fn unbounded(max_depth: u32) -> SearchConfig {
        SearchConfig {
            max_depth,
            node_budget: None,
            lookahead: LookaheadRule::Simplified,
        }
    }

    #[test]
    fn test_no_legal_move() {
        let b = board(&[&[1, 1], &[1, 1]]);
        let err = choose_move(&b, Player::Two, 2).unwrap_err();
        assert!(matches!(err, Error::NoLegalMove(Player::Two)));
    }

    #[test]
    fn test_elimination_dominates() {
        // Only (2,2) bursts into the lone opposing cell
        let b = board(&[&[0, 0, 0], &[0, 0, 0], &[0, -1, 1]]);
        for depth in 1..=2 {
            let outcome = search(&b, Player::One, &unbounded(depth)).unwrap();
            assert_eq!(outcome.best_move, Pos::new(2, 2));
            assert_eq!(outcome.best_score, Score::Win);
        }

        let exact = SearchConfig {
            lookahead: LookaheadRule::Authoritative,
            ..unbounded(2)
        };
        assert_eq!(search(&b, Player::One, &exact).unwrap().best_move, Pos::new(2, 2));
    }

    #[test]
    fn test_ties_keep_first_move() {
        let b = board(&[&[1, 0], &[0, -1]]);
        let outcome = search(&b, Player::One, &unbounded(1)).unwrap();
        assert_eq!(outcome.best_move, Pos::new(0, 0));
        assert_eq!(outcome.best_score, Score::Value(1));
        assert_eq!(outcome.node_count, 4);
        assert_eq!(outcome.max_depth_reached, 1);
    }

    #[test]
    fn test_minimizer_backup() {
        let b = board(&[&[1, 0], &[0, -1]]);
        let tree = GameTree::build(&b, Player::One, &unbounded(2)).unwrap();
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.max_depth_reached(), 2);

        // Player two can wipe out player one after every reply
        for &id in &tree.root().children {
            let child = tree.node(id);
            assert_eq!(child.to_move, Player::Two);
            assert_eq!(child.children.len(), 2);
            assert_eq!(child.score, Some(Score::Loss));
        }
        assert_eq!(tree.root().score, Some(Score::Loss));
        assert_eq!(tree.best_move().unwrap(), (Pos::new(0, 0), Score::Loss));
    }

    #[test]
    fn test_node_budget_truncates_below_root() {
        let b = board(&[&[1, 0], &[0, -1]]);
        let config = SearchConfig {
            node_budget: Some(5),
            ..unbounded(3)
        };
        let outcome = search(&b, Player::One, &config).unwrap();
        assert!(outcome.truncated);
        assert_eq!(outcome.node_count, 4);
        assert_eq!(outcome.max_depth_reached, 1);
    }

    #[test]
    fn test_zero_depth_searches_one_ply() {
        let b = board(&[&[1, 0], &[0, -1]]);
        assert_eq!(choose_move(&b, Player::One, 0).unwrap(), Pos::new(0, 0));
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let b = Board::starting(3, 3).unwrap();
        let before = b.clone();
        search(&b, Player::Two, &unbounded(2)).unwrap();
        assert_eq!(b, before);
    }
}
