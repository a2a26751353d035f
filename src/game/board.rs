use serde::{Deserialize, Serialize};

/// 棋盘边长（固定为 3×3）。
pub const BOARD_SIZE: u8 = 3;

/// 单个格子的状态。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Human,
    Computer,
}

/// 对局双方。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Human,
    Computer,
}

impl Player {
    pub fn mark(self) -> Cell {
        match self {
            Player::Human => Cell::Human,
            Player::Computer => Cell::Computer,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }
}

/// 棋盘坐标（行、列）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }
}

/// 3×3 棋盘，按行优先存储。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when the coordinate is out of range.
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        if coord.in_bounds() {
            Some(self.cells[usize::from(coord.row)][usize::from(coord.col)])
        } else {
            None
        }
    }

    /// Writes one mark. Callers validate bounds and occupancy first.
    pub fn place(&mut self, coord: Coord, player: Player) {
        self.cells[usize::from(coord.row)][usize::from(coord.col)] = player.mark();
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| *cell != Cell::Empty))
    }

    /// Empty coordinates in row-major order. The search engine relies on this
    /// ordering for its deterministic tie-break.
    pub fn empty_cells(&self) -> Vec<Coord> {
        let mut coords = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.cells[usize::from(row)][usize::from(col)] == Cell::Empty {
                    coords.push(Coord::new(row, col));
                }
            }
        }
        coords
    }

    /// 判断指定玩家是否占满任意一行、一列或对角线。
    pub fn has_winner(&self, player: Player) -> bool {
        let mark = player.mark();
        for i in 0..usize::from(BOARD_SIZE) {
            if self.cells[i].iter().all(|cell| *cell == mark) {
                return true;
            }
            if self.cells.iter().all(|row| row[i] == mark) {
                return true;
            }
        }
        (0..usize::from(BOARD_SIZE)).all(|i| self.cells[i][i] == mark)
            || (0..usize::from(BOARD_SIZE))
                .all(|i| self.cells[i][usize::from(BOARD_SIZE) - 1 - i] == mark)
    }

    pub fn clear(&mut self) {
        self.cells = Default::default();
    }
}
