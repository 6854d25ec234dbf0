use crate::game::{Board, Cell, Player, COLS, ROWS};

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Per-window scores used by [`WindowHeuristic`].
///
/// `opponent_threat` is subtracted, so all fields are positive magnitudes.
/// The evaluation is antisymmetric between the players only when
/// `threat == opponent_threat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Four of one colour.
    pub win: i32,
    /// Three opponent discs and an empty cell.
    pub opponent_threat: i32,
    /// Three own discs and an empty cell.
    pub threat: i32,
    /// Two discs and two empty cells, either side.
    pub two: i32,
    /// Per disc in the centre column.
    pub center: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            win: 100_000,
            opponent_threat: 80,
            threat: 50,
            two: 10,
            center: 3,
        }
    }
}

/// Default heuristic that scans all 4-cell windows and scores threats.
#[derive(Debug, Clone, Default)]
pub struct WindowHeuristic {
    weights: EvalWeights,
}

impl WindowHeuristic {
    pub fn new(weights: EvalWeights) -> Self {
        WindowHeuristic { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    fn score_window(&self, own: usize, opp: usize, empty: usize) -> i32 {
        let w = &self.weights;
        match (own, opp, empty) {
            (4, _, _) => w.win,
            (_, 4, _) => -w.win,
            (3, _, 1) => w.threat,
            (_, 3, 1) => -w.opponent_threat,
            (2, _, 2) => w.two,
            (_, 2, 2) => -w.two,
            _ => 0,
        }
    }
}

impl Heuristic for WindowHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        let own_cell = player.to_cell();
        let opp_cell = player.other().to_cell();
        // Sums saturate at the i32 bounds for unvalidated weights.
        let mut score: i32 = 0;

        // Center column bonus
        let center = COLS / 2;
        for row in 0..ROWS {
            let cell = board.get(row, center);
            if cell == own_cell {
                score = score.saturating_add(self.weights.center);
            } else if cell == opp_cell {
                score = score.saturating_sub(self.weights.center);
            }
        }

        for window in board.windows() {
            let own = window.iter().filter(|&&c| c == own_cell).count();
            let opp = window.iter().filter(|&&c| c == opp_cell).count();
            let empty = window.iter().filter(|&&c| c == Cell::Empty).count();
            score = score.saturating_add(self.score_window(own, opp, empty));
        }

        score
    }
}
