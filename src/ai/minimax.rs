use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Board, Coord, Player};

/// 电脑难度档位。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for AiDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(AiDifficulty::Easy),
            "medium" | "normal" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AiConfig {
    /// Probability of playing a uniformly random empty cell instead of the
    /// minimax move.
    pub random_move_chance: f64,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: AiDifficulty) -> Self {
        match difficulty {
            AiDifficulty::Easy => Self {
                random_move_chance: 1.0,
            },
            AiDifficulty::Medium => Self {
                random_move_chance: 0.5,
            },
            AiDifficulty::Hard => Self {
                random_move_chance: 0.0,
            },
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_difficulty(AiDifficulty::Hard)
    }
}

/// 落子来源：随机策略或搜索。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    Random,
    Search,
}

/// 一次决策的结果与搜索统计。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiDecision {
    pub coord: Coord,
    pub evaluation: i32,
    pub nodes: u64,
    pub source: MoveSource,
}

pub struct AiAgent {
    config: AiConfig,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    /// 固定种子，便于测试低难度档位的随机行为。
    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> AiConfig {
        self.config
    }

    pub fn set_config(&mut self, config: AiConfig) {
        self.config = config;
    }

    /// Produces the computer's move for the current board, or `None` when no
    /// empty cell remains. The caller guarantees the game is still in
    /// progress.
    pub fn choose_move(&mut self, board: &Board) -> Option<AiDecision> {
        let empties = board.empty_cells();
        if empties.is_empty() {
            return None;
        }

        let play_random = self.config.random_move_chance > 0.0
            && self.rng.gen_bool(self.config.random_move_chance);

        if play_random {
            let coord = *empties.choose(&mut self.rng)?;
            let mut child = *board;
            child.place(coord, Player::Computer);
            let mut nodes = 0;
            let evaluation = score(&child, 0, false, &mut nodes);
            return Some(AiDecision {
                coord,
                evaluation,
                nodes,
                source: MoveSource::Random,
            });
        }

        best_move(board)
    }
}

/// Exhaustive minimax over the remaining cells. The depth term steers the
/// engine toward the fastest win and the slowest loss among equally optimal
/// lines.
pub fn score(board: &Board, depth: i32, maximizing: bool, nodes: &mut u64) -> i32 {
    *nodes += 1;

    if board.has_winner(Player::Computer) {
        return 10 - depth;
    }
    if board.has_winner(Player::Human) {
        return depth - 10;
    }
    if board.is_full() {
        return 0;
    }

    let mover = if maximizing {
        Player::Computer
    } else {
        Player::Human
    };

    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for coord in board.empty_cells() {
        let mut child = *board;
        child.place(coord, mover);
        let value = score(&child, depth + 1, !maximizing, nodes);
        best = if maximizing {
            best.max(value)
        } else {
            best.min(value)
        };
    }
    best
}

/// The game-theoretically optimal move for the computer. Ties break to the
/// first cell in row-major scan order.
pub fn best_move(board: &Board) -> Option<AiDecision> {
    let mut nodes = 0;
    let mut best: Option<(Coord, i32)> = None;

    for coord in board.empty_cells() {
        let mut child = *board;
        child.place(coord, Player::Computer);
        let value = score(&child, 0, false, &mut nodes);
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((coord, value)),
        }
    }

    best.map(|(coord, evaluation)| AiDecision {
        coord,
        evaluation,
        nodes,
        source: MoveSource::Search,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{outcome_of, Cell, GameOutcome};

    fn board_from(rows: [[Cell; 3]; 3]) -> Board {
        let mut board = Board::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Human => board.place(Coord::new(r as u8, c as u8), Player::Human),
                    Cell::Computer => board.place(Coord::new(r as u8, c as u8), Player::Computer),
                    Cell::Empty => {}
                }
            }
        }
        board
    }

    #[test]
    fn completes_its_own_winning_row() {
        use Cell::{Computer as C, Empty as E, Human as H};
        let board = board_from([[C, C, E], [H, H, E], [E, E, E]]);

        let decision = best_move(&board).expect("moves remain");
        assert_eq!(decision.coord, Coord::new(0, 2));
        assert_eq!(decision.evaluation, 10, "immediate win scores 10 - 0");
    }

    #[test]
    fn blocks_the_human_immediate_win() {
        use Cell::{Computer as C, Empty as E, Human as H};
        let board = board_from([[H, H, E], [E, C, E], [E, E, E]]);

        let decision = best_move(&board).expect("moves remain");
        assert_eq!(decision.coord, Coord::new(0, 2));
    }

    #[test]
    fn prefers_the_faster_of_two_winning_lines() {
        use Cell::{Computer as C, Empty as E, Human as H};
        // (0,2) wins immediately; every other move wins later at best.
        let board = board_from([[C, C, E], [H, H, E], [E, E, E]]);

        let mut nodes = 0;
        let mut immediate = board;
        immediate.place(Coord::new(0, 2), Player::Computer);
        let fast = score(&immediate, 0, false, &mut nodes);

        let mut delayed = board;
        delayed.place(Coord::new(2, 0), Player::Computer);
        let slow = score(&delayed, 0, false, &mut nodes);

        assert!(
            fast > slow,
            "shallower win must score strictly higher ({fast} vs {slow})"
        );
    }

    #[test]
    fn empty_board_tie_breaks_to_the_first_cell() {
        // Perfect play from the empty board is a draw everywhere, so the
        // row-major tie-break settles on (0,0).
        let decision = best_move(&Board::new()).expect("board is empty");
        assert_eq!(decision.coord, Coord::new(0, 0));
        assert_eq!(decision.evaluation, 0);
    }

    #[test]
    fn best_move_on_a_full_board_is_none() {
        use Cell::{Computer as C, Human as H};
        let board = board_from([[H, C, H], [C, C, H], [H, H, C]]);
        assert!(best_move(&board).is_none());

        let mut agent = AiAgent::with_seed(AiConfig::from_difficulty(AiDifficulty::Easy), 7);
        assert!(agent.choose_move(&board).is_none());
    }

    #[test]
    fn easy_agent_is_deterministic_under_a_fixed_seed() {
        let config = AiConfig::from_difficulty(AiDifficulty::Easy);
        let mut board = Board::new();
        board.place(Coord::new(1, 1), Player::Human);

        let first = AiAgent::with_seed(config, 42)
            .choose_move(&board)
            .expect("moves remain");
        let second = AiAgent::with_seed(config, 42)
            .choose_move(&board)
            .expect("moves remain");

        assert_eq!(first.coord, second.coord);
        assert_eq!(first.source, MoveSource::Random);
        assert_eq!(board.cell(first.coord), Some(Cell::Empty));
    }

    #[test]
    fn medium_agent_mixes_random_and_search_moves() {
        let config = AiConfig::from_difficulty(AiDifficulty::Medium);
        let mut board = Board::new();
        board.place(Coord::new(0, 0), Player::Human);

        let mut agent = AiAgent::with_seed(config, 1);
        let mut seen_random = false;
        let mut seen_search = false;
        for _ in 0..64 {
            let decision = agent.choose_move(&board).expect("moves remain");
            assert_eq!(board.cell(decision.coord), Some(Cell::Empty));
            match decision.source {
                MoveSource::Random => seen_random = true,
                MoveSource::Search => seen_search = true,
            }
        }
        assert!(seen_random && seen_search, "both paths should be exercised");
    }

    #[test]
    fn hard_agent_never_loses_when_moving_first() {
        fn explore(board: Board, computer_to_move: bool) {
            match outcome_of(&board) {
                GameOutcome::HumanWin => panic!("optimal computer lost: {board:?}"),
                GameOutcome::InProgress => {}
                _ => return,
            }

            if computer_to_move {
                let decision = best_move(&board).expect("in-progress board has moves");
                let mut next = board;
                next.place(decision.coord, Player::Computer);
                explore(next, false);
            } else {
                for coord in board.empty_cells() {
                    let mut next = board;
                    next.place(coord, Player::Human);
                    explore(next, true);
                }
            }
        }

        explore(Board::new(), true);
    }
}
