//! 游戏核心逻辑模块（棋盘、状态机、规则引擎）。

pub mod board;
pub mod rules;
pub mod state;

pub use board::{Board, Cell, Coord, Player, BOARD_SIZE};
pub use rules::{HumanMoveAction, RuleEngine, RuleError, RuleResolution};
pub use state::{outcome_of, GameEvent, GameOutcome, GameState, TurnState};
