use std::fmt;
use std::str::FromStr;

use crate::error::{BoardParseError, MoveError};

use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
/// Discs in a straight line needed to win.
pub const WIN_LENGTH: usize = 4;

/// The four line axes as (row step, column step). Each is walked in both directions.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// The player owning this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Player::Red),
            Cell::Yellow => Some(Player::Yellow),
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Red => 'R',
            Cell::Yellow => 'Y',
        }
    }

    fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' => Some(Cell::Empty),
            'R' | 'r' => Some(Cell::Red),
            'Y' | 'y' => Some(Cell::Yellow),
            _ => None,
        }
    }
}

/// A 6x7 grid. Row 0 is the top, row 5 the bottom.
///
/// Cells are only written through [`Board::drop_piece`] and [`Board::undo_piece`],
/// so every column's discs stay stacked from the bottom with no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [usize; COLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [0; COLS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of discs stacked in a column.
    pub fn height(&self, col: usize) -> usize {
        self.heights.get(col).copied().unwrap_or(ROWS)
    }

    /// Total discs on the board.
    pub fn move_count(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.height(col) >= ROWS
    }

    /// True iff `col` is on the board and still has an empty cell.
    pub fn is_valid_column(&self, col: usize) -> bool {
        !self.is_column_full(col)
    }

    /// All playable columns in ascending order.
    pub fn valid_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_valid_column(col)).collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull(col));
        }

        let row = ROWS - 1 - self.heights[col];
        self.cells[row][col] = player.to_cell();
        self.heights[col] += 1;
        Ok(row)
    }

    /// Copy of this board with a disc dropped in `col`, plus the landing row.
    /// `None` when the column is full or off the board.
    pub fn with_drop(&self, col: usize, player: Player) -> Option<(Board, usize)> {
        let mut next = *self;
        let row = next.drop_piece(col, player).ok()?;
        Some((next, row))
    }

    /// Remove the top disc of `col`, returning what was there.
    pub fn undo_piece(&mut self, col: usize) -> Option<Cell> {
        let height = *self.heights.get(col)?;
        if height == 0 {
            return None;
        }
        let row = ROWS - height;
        let removed = self.cells[row][col];
        self.cells[row][col] = Cell::Empty;
        self.heights[col] -= 1;
        Some(removed)
    }

    /// True if a `player` disc at (row, col) sits on a line of at least
    /// [`WIN_LENGTH`]. The position itself is counted whatever it holds.
    pub fn check_win_at(&self, row: usize, col: usize, player: Player) -> bool {
        let cell = player.to_cell();
        AXES.iter().any(|&(dr, dc)| {
            1 + self.run_length(row, col, dr, dc, cell) + self.run_length(row, col, -dr, -dc, cell)
                >= WIN_LENGTH
        })
    }

    /// Consecutive `cell` discs walking away from (row, col), excluding the start.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while self.cell_at(r, c) == Some(cell) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells.get(row as usize)?.get(col as usize).copied()
    }

    /// Every run of [`WIN_LENGTH`] consecutive cells along a row, a column or
    /// either diagonal.
    pub fn windows(&self) -> impl Iterator<Item = [Cell; WIN_LENGTH]> + '_ {
        AXES.iter().flat_map(move |&(dr, dc)| {
            (0..ROWS).flat_map(move |row| {
                (0..COLS).filter_map(move |col| self.window(row, col, dr, dc))
            })
        })
    }

    fn window(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<[Cell; WIN_LENGTH]> {
        let mut window = [Cell::Empty; WIN_LENGTH];
        for (i, slot) in window.iter_mut().enumerate() {
            let step = i as isize;
            *slot = self.cell_at(row as isize + dr * step, col as isize + dc * step)?;
        }
        Some(window)
    }

    /// Scan the whole board for a completed line.
    pub fn winner(&self) -> Option<Player> {
        self.windows().find_map(|window| {
            let owner = window[0].player()?;
            window.iter().all(|&c| c == window[0]).then_some(owner)
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parse one line per row, top row first: `.` empty, `R` red, `Y` yellow.
    /// Blank lines and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != ROWS {
            return Err(BoardParseError::RowCount {
                expected: ROWS,
                found: lines.len(),
            });
        }

        let mut cells = [[Cell::Empty; COLS]; ROWS];
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != COLS {
                return Err(BoardParseError::RowWidth {
                    row,
                    expected: COLS,
                    found: width,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                cells[row][col] = Cell::from_symbol(symbol)
                    .ok_or(BoardParseError::UnknownSymbol { symbol, row, col })?;
            }
        }

        let mut heights = [0; COLS];
        for (col, height) in heights.iter_mut().enumerate() {
            let mut gap_seen = false;
            for row in (0..ROWS).rev() {
                match cells[row][col] {
                    Cell::Empty => gap_seen = true,
                    _ if gap_seen => return Err(BoardParseError::FloatingDisc { row, col }),
                    _ => *height += 1,
                }
            }
        }

        Ok(Board { cells, heights })
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = BoardParseError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        rows.join("\n").parse()
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.valid_columns(), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        // Drop first piece in column 3
        let row = board.drop_piece(3, Player::Red).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::Red);

        // Drop second piece in same column
        let row = board.drop_piece(3, Player::Yellow).unwrap();
        assert_eq!(row, 4); // Should land on top of first piece
        assert_eq!(board.get(4, 3), Cell::Yellow);
        assert_eq!(board.height(3), 2);
    }

    #[test]
    fn test_with_drop_leaves_original_untouched() {
        let board = Board::new();
        let (next, row) = board.with_drop(2, Player::Red).unwrap();
        assert_eq!(row, 5);
        assert_eq!(next.get(5, 2), Cell::Red);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();

        // Fill column 0
        for _ in 0..ROWS {
            board.drop_piece(0, Player::Red).unwrap();
        }

        assert!(board.is_column_full(0));
        assert!(!board.valid_columns().contains(&0));
        let before = board;
        assert_eq!(
            board.drop_piece(0, Player::Yellow),
            Err(MoveError::ColumnFull(0))
        );
        assert_eq!(board, before);
        assert!(board.with_drop(0, Player::Yellow).is_none());
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.drop_piece(7, Player::Red),
            Err(MoveError::InvalidColumn(7))
        );
        assert!(!board.is_valid_column(7));
    }

    #[test]
    fn test_undo_restores_previous_board() {
        let mut board = Board::new();
        board.drop_piece(4, Player::Red).unwrap();
        let before = board;
        board.drop_piece(4, Player::Yellow).unwrap();
        assert_eq!(board.undo_piece(4), Some(Cell::Yellow));
        assert_eq!(board, before);
        assert_eq!(board.undo_piece(4), Some(Cell::Red));
        assert_eq!(board.undo_piece(4), None);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Player::Red).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.valid_columns().is_empty());
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        // Create horizontal line at bottom row
        for col in 0..4 {
            board.drop_piece(col, Player::Red).unwrap();
        }
        assert!(board.check_win_at(5, 2, Player::Red)); // Check middle of the line
        assert!(!board.check_win_at(5, 2, Player::Yellow));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(3, Player::Yellow).unwrap();
        }
        assert!(board.check_win_at(2, 3, Player::Yellow)); // Check the 4th piece
    }

    #[test]
    fn test_diagonal_up_win() {
        let board = board(
            "
            .......
            .......
            ...R...
            ..RY...
            .RYY...
            RYYY...
            ",
        );
        assert!(board.check_win_at(2, 3, Player::Red));
        assert!(board.check_win_at(5, 0, Player::Red));
    }

    #[test]
    fn test_diagonal_down_win() {
        let board = board(
            "
            .......
            .......
            ...R...
            ...YR..
            ...YYR.
            ...YYYR
            ",
        );
        assert!(board.check_win_at(2, 3, Player::Red));
        assert!(board.check_win_at(4, 5, Player::Red));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Player::Red).unwrap();
        }
        assert!(!board.check_win_at(5, 1, Player::Red)); // Only 3 in a row
    }

    #[test]
    fn test_gap_breaks_line() {
        let board = board(
            "
            .......
            .......
            .......
            .......
            .......
            RRR.R..
            ",
        );
        assert!(!board.check_win_at(5, 2, Player::Red));
        assert!(!board.check_win_at(5, 4, Player::Red));
        // Filling the gap completes the line.
        assert!(board.check_win_at(5, 3, Player::Red));
    }

    #[test]
    fn test_opponent_disc_breaks_line() {
        let board = board(
            "
            .......
            .......
            .......
            .......
            .......
            RRRYR..
            ",
        );
        assert!(!board.check_win_at(5, 4, Player::Red));
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_window_count() {
        let expected = ROWS * (COLS - 3) + (ROWS - 3) * COLS + 2 * (ROWS - 3) * (COLS - 3);
        assert_eq!(Board::new().windows().count(), expected);
        assert_eq!(expected, 69);
    }

    #[test]
    fn test_winner_scan() {
        let board = board(
            "
            .......
            .......
            ...Y...
            ...Y...
            ...Y...
            RRRY...
            ",
        );
        assert_eq!(board.winner(), Some(Player::Yellow));
        assert_eq!(Board::new().winner(), None);
    }

    #[test]
    fn test_parse_display_round_trip() {
        let text = ".......\n.......\n.......\n...Y...\n..RR...\n.YRRY..";
        let board: Board = text.parse().unwrap();
        assert_eq!(board.to_string(), text);
        assert_eq!(board.height(2), 2);
        assert_eq!(board.height(3), 3);
        assert_eq!(board.move_count(), 7);
    }

    #[test]
    fn test_parse_rejects_floating_disc() {
        let err = ".......\n.......\n.......\n...R...\n.......\n......."
            .parse::<Board>()
            .unwrap_err();
        assert_eq!(err, BoardParseError::FloatingDisc { row: 3, col: 3 });
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        assert!(matches!(
            ".......".parse::<Board>(),
            Err(BoardParseError::RowCount { found: 1, .. })
        ));
        assert!(matches!(
            "......\n.......\n.......\n.......\n.......\n.......".parse::<Board>(),
            Err(BoardParseError::RowWidth { row: 0, found: 6, .. })
        ));
        assert!(matches!(
            ".......\n.......\n.......\n.......\n.......\n...X...".parse::<Board>(),
            Err(BoardParseError::UnknownSymbol { symbol: 'X', .. })
        ));
    }

    #[test]
    fn test_serde_round_trip_preserves_queries() {
        let mut board = Board::new();
        for col in [3, 3, 2, 4, 0, 0, 0, 0, 0, 0] {
            let player = if board.move_count() % 2 == 0 {
                Player::Red
            } else {
                Player::Yellow
            };
            board.drop_piece(col, player).unwrap();
        }
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
        assert_eq!(restored.valid_columns(), board.valid_columns());
        assert_eq!(restored.winner(), board.winner());
    }

    #[test]
    fn test_serde_rejects_floating_disc() {
        let json = r#"[".......",".......",".......",".......","...R...","......."]"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }
}
