use tracing::debug;

use crate::game::{Board, Player, ROWS};

use super::heuristic::{EvalWeights, Heuristic, WindowHeuristic};

/// Score reported when the root player can win on this move.
pub const WIN_SCORE: i32 = 1_000_000_000;
/// Score reported when the root move blocks an immediate opponent win.
pub const BLOCK_SCORE: i32 = 500_000_000;
/// Score reported for a move that leaves two winning replies at once.
pub const DOUBLE_THREAT_SCORE: i32 = 250_000_000;
/// Base score of a win found inside the tree; the remaining depth is added so
/// quicker wins rank higher.
const MATE_SCORE: i32 = 100_000_000;

/// Chosen column (if any) and its minimax value for the searching player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub column: Option<usize>,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

/// Columns where `player` would complete a line immediately, ascending.
pub fn winning_columns(board: &Board, player: Player) -> Vec<usize> {
    board
        .valid_columns()
        .into_iter()
        .filter(|&col| board.check_win_at(ROWS - 1 - board.height(col), col, player))
        .collect()
}

/// Lowest column that wins on the spot for `player`.
pub fn find_winning_move(board: &Board, player: Player) -> Option<usize> {
    winning_columns(board, player).into_iter().next()
}

/// Lowest column after which `player` threatens to win in two or more distinct
/// columns while the opponent has no immediate win of their own.
pub fn find_double_threat(board: &Board, player: Player) -> Option<usize> {
    board.valid_columns().into_iter().find(|&col| {
        board.with_drop(col, player).is_some_and(|(next, _)| {
            winning_columns(&next, player.other()).is_empty()
                && winning_columns(&next, player).len() >= 2
        })
    })
}

/// Depth-limited minimax with alpha-beta pruning over a pluggable heuristic.
///
/// The search never uses randomness: the same board, depth and player always
/// produce the same result.
pub struct SearchEngine {
    heuristic: Box<dyn Heuristic>,
}

impl SearchEngine {
    pub fn new(heuristic: Box<dyn Heuristic>) -> Self {
        SearchEngine { heuristic }
    }

    pub fn with_weights(weights: EvalWeights) -> Self {
        Self::new(Box::new(WindowHeuristic::new(weights)))
    }

    pub fn heuristic(&self) -> &dyn Heuristic {
        self.heuristic.as_ref()
    }

    /// Pick a move for `player`, taking forced tactics before searching.
    ///
    /// In order: an immediate win, a block of the opponent's immediate win, a
    /// double threat. Otherwise the result of [`SearchEngine::search`].
    pub fn best_move(&self, board: &Board, depth: usize, player: Player) -> SearchResult {
        if depth > 0 {
            if let Some(col) = find_winning_move(board, player) {
                debug!(column = col, %player, "immediate win");
                return SearchResult {
                    column: Some(col),
                    score: WIN_SCORE,
                };
            }
            if let Some(col) = find_winning_move(board, player.other()) {
                debug!(column = col, %player, "forced block");
                return SearchResult {
                    column: Some(col),
                    score: BLOCK_SCORE,
                };
            }
            if let Some(col) = find_double_threat(board, player) {
                debug!(column = col, %player, "double threat");
                return SearchResult {
                    column: Some(col),
                    score: DOUBLE_THREAT_SCORE,
                };
            }
        }
        self.search(board, depth, player)
    }

    /// Plain alpha-beta minimax, maximizing for `player`.
    pub fn search(&self, board: &Board, depth: usize, player: Player) -> SearchResult {
        self.search_with_stats(board, depth, player).0
    }

    pub fn search_with_stats(
        &self,
        board: &Board,
        depth: usize,
        player: Player,
    ) -> (SearchResult, SearchStats) {
        let mut search = Search {
            heuristic: self.heuristic.as_ref(),
            root: player,
            stats: SearchStats::default(),
        };
        // One scratch board for the whole tree: apply, recurse, undo.
        let mut scratch = *board;
        let result = search.minimax(&mut scratch, depth, i32::MIN, i32::MAX, true);
        debug!(
            depth,
            nodes = search.stats.nodes,
            cutoffs = search.stats.cutoffs,
            score = result.score,
            column = ?result.column,
            "search complete"
        );
        (result, search.stats)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(Box::new(WindowHeuristic::default()))
    }
}

struct Search<'a> {
    heuristic: &'a dyn Heuristic,
    root: Player,
    stats: SearchStats,
}

impl Search<'_> {
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        self.stats.nodes += 1;

        let valid = board.valid_columns();
        if depth == 0 || valid.is_empty() {
            return SearchResult {
                column: None,
                score: self.heuristic.evaluate(board, self.root),
            };
        }

        let mover = if maximizing {
            self.root
        } else {
            self.root.other()
        };
        let mut best = SearchResult {
            column: None,
            score: if maximizing { i32::MIN } else { i32::MAX },
        };

        for col in self.order_moves(board, &valid, mover, maximizing) {
            let Ok(row) = board.drop_piece(col, mover) else {
                continue;
            };
            let score = if board.check_win_at(row, col, mover) {
                let mate = MATE_SCORE + depth as i32;
                if maximizing {
                    mate
                } else {
                    -mate
                }
            } else {
                self.minimax(board, depth - 1, alpha, beta, !maximizing).score
            };
            board.undo_piece(col);

            // The first candidate always sets a column, even at a clamped score.
            if maximizing {
                if score > best.score || best.column.is_none() {
                    best = SearchResult {
                        column: Some(col),
                        score,
                    };
                }
                alpha = alpha.max(best.score);
            } else {
                if score < best.score || best.column.is_none() {
                    best = SearchResult {
                        column: Some(col),
                        score,
                    };
                }
                beta = beta.min(best.score);
            }

            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        best
    }

    /// Candidates sorted by their one-ply evaluation: best first for the
    /// maximizer, worst first for the minimizer. Ties keep ascending column order.
    fn order_moves(
        &self,
        board: &mut Board,
        valid: &[usize],
        mover: Player,
        maximizing: bool,
    ) -> Vec<usize> {
        let mut scored: Vec<(usize, i32)> = valid
            .iter()
            .filter_map(|&col| {
                board.drop_piece(col, mover).ok()?;
                let score = self.heuristic.evaluate(board, self.root);
                board.undo_piece(col);
                Some((col, score))
            })
            .collect();

        if maximizing {
            scored.sort_by(|a, b| b.1.cmp(&a.1));
        } else {
            scored.sort_by(|a, b| a.1.cmp(&b.1));
        }
        scored.into_iter().map(|(col, _)| col).collect()
    }
}
