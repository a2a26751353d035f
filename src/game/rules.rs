use serde::{Deserialize, Serialize};

use super::{
    board::{Cell, Coord, Player},
    state::{GameEvent, GameOutcome, GameState, TurnState},
};

/// 人类落子请求。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HumanMoveAction {
    pub row: u8,
    pub col: u8,
}

impl HumanMoveAction {
    pub fn coord(self) -> Coord {
        Coord::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    NotHumanTurn,
    NotComputerTurn,
    OutOfRange { row: u8, col: u8 },
    CellOccupied { row: u8, col: u8 },
    BoardFull,
    InvalidDifficulty { value: String },
}

/// 一次落子后的快照与事件集合。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOutcome>,
}

impl RuleResolution {
    pub fn new(state: GameState, mut events: Vec<GameEvent>) -> Self {
        let outcome = state.outcome.is_terminal().then_some(state.outcome);
        if let Some(outcome) = outcome {
            let has_event = events.iter().any(|event| {
                matches!(event, GameEvent::GameWon { .. } | GameEvent::GameDrawn)
            });
            if !has_event {
                events.push(terminal_event(outcome));
            }
        }

        Self {
            state,
            events,
            outcome,
        }
    }
}

fn terminal_event(outcome: GameOutcome) -> GameEvent {
    match outcome {
        GameOutcome::HumanWin => GameEvent::GameWon {
            winner: Player::Human,
        },
        GameOutcome::ComputerWin => GameEvent::GameWon {
            winner: Player::Computer,
        },
        _ => GameEvent::GameDrawn,
    }
}

/// 回合控制器：校验并应用双方的落子，驱动状态机。
#[derive(Debug, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    fn ensure_in_progress(state: &GameState) -> Result<(), RuleError> {
        if state.is_finished() {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn ensure_vacant(state: &GameState, coord: Coord) -> Result<(), RuleError> {
        match state.board.cell(coord) {
            None => Err(RuleError::OutOfRange {
                row: coord.row,
                col: coord.col,
            }),
            Some(Cell::Empty) => Ok(()),
            Some(_) => Err(RuleError::CellOccupied {
                row: coord.row,
                col: coord.col,
            }),
        }
    }

    /// Validation happens before any mutation, so a rejected move leaves the
    /// state untouched.
    fn apply_move(
        state: &mut GameState,
        coord: Coord,
        player: Player,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_in_progress(state)?;
        Self::ensure_vacant(state, coord)?;

        state.board.place(coord, player);

        let mut events = Vec::new();
        let move_event = GameEvent::MoveApplied {
            player,
            row: coord.row,
            col: coord.col,
        };
        state.record_event(move_event.clone());
        events.push(move_event);

        if let Some(outcome) = state.evaluate_outcome() {
            let event = terminal_event(outcome);
            state.record_event(event.clone());
            events.push(event);
        }

        Ok(events)
    }

    /// 处理人类落子；成功后轮到电脑（或终局）。
    pub fn submit_human_move(
        &mut self,
        state: &mut GameState,
        action: HumanMoveAction,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_in_progress(state)?;
        if state.turn != TurnState::WaitingForHuman {
            return Err(RuleError::NotHumanTurn);
        }

        let events = Self::apply_move(state, action.coord(), Player::Human)?;
        if !state.is_finished() {
            state.turn = TurnState::ComputerThinking;
        }
        Ok(events)
    }

    /// 应用难度策略选出的电脑落子；成功后轮回人类（或终局）。
    pub fn apply_computer_move(
        &mut self,
        state: &mut GameState,
        coord: Coord,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_in_progress(state)?;
        if state.turn != TurnState::ComputerThinking {
            return Err(RuleError::NotComputerTurn);
        }

        let events = Self::apply_move(state, coord, Player::Computer)?;
        if !state.is_finished() {
            state.turn = TurnState::WaitingForHuman;
        }
        Ok(events)
    }

    /// 任意状态下都可重置。
    pub fn reset(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        state.reset();
        let event = GameEvent::GameReset;
        state.record_event(event.clone());
        vec![event]
    }
}
