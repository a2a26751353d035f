use serde::{Deserialize, Serialize};

use super::board::{Board, Player};

/// 对局结果。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameOutcome {
    #[default]
    InProgress,
    HumanWin,
    ComputerWin,
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }
}

/// 回合状态机。人类先手。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnState {
    #[default]
    WaitingForHuman,
    ComputerThinking,
    GameOver,
}

/// 游戏事件流。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MoveApplied { player: Player, row: u8, col: u8 },
    GameWon { winner: Player },
    GameDrawn,
    GameReset,
}

/// Evaluates a board in isolation. Win checks take precedence over the
/// full-board draw check.
pub fn outcome_of(board: &Board) -> GameOutcome {
    if board.has_winner(Player::Computer) {
        GameOutcome::ComputerWin
    } else if board.has_winner(Player::Human) {
        GameOutcome::HumanWin
    } else if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

/// 游戏整体状态。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub turn: TurnState,
    pub outcome: GameOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<GameEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, event: GameEvent) {
        self.event_log.push(event);
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// 当前应落子的一方；终局时为 `None`。
    pub fn to_move(&self) -> Option<Player> {
        match self.turn {
            TurnState::WaitingForHuman => Some(Player::Human),
            TurnState::ComputerThinking => Some(Player::Computer),
            TurnState::GameOver => None,
        }
    }

    /// Re-evaluates the board and stores a newly terminal outcome, moving the
    /// state machine to `GameOver`. Returns the outcome once terminal.
    pub fn evaluate_outcome(&mut self) -> Option<GameOutcome> {
        if self.outcome.is_terminal() {
            return Some(self.outcome);
        }
        let outcome = outcome_of(&self.board);
        if outcome.is_terminal() {
            self.outcome = outcome;
            self.turn = TurnState::GameOver;
            Some(outcome)
        } else {
            None
        }
    }

    /// 清空棋盘并回到初始状态（人类先手）。
    pub fn reset(&mut self) {
        self.board.clear();
        self.turn = TurnState::WaitingForHuman;
        self.outcome = GameOutcome::InProgress;
        self.event_log.clear();
    }
}
