pub mod ai;
pub mod game;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{best_move, score, AiAgent, AiConfig, AiDecision, AiDifficulty, MoveSource};
pub use game::{
    outcome_of, Board, Cell, Coord, GameEvent, GameOutcome, GameState, HumanMoveAction, Player,
    RuleEngine, RuleError, RuleResolution, TurnState, BOARD_SIZE,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    web_sys::console::log_1(&"wasm_tictactoe core initialised".into());
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_difficulty(value: &str) -> Result<AiDifficulty, RuleError> {
    AiDifficulty::from_str(value).map_err(|_| RuleError::InvalidDifficulty {
        value: value.to_string(),
    })
}

fn make_resolution_json(resolution: RuleResolution) -> Result<String, JsValue> {
    serde_json::to_string(&resolution).map_err(serde_to_js_error)
}

fn resolution_from_events(state: &GameState, events: Vec<GameEvent>) -> RuleResolution {
    RuleResolution::new(state.clone(), events)
}

#[derive(Serialize)]
struct AiMoveResponse {
    decision: AiDecision,
    applied: RuleResolution,
}

/// 面向前端的游戏引擎；独占持有对局状态。
#[wasm_bindgen]
pub struct GameEngine {
    state: GameState,
    rules: RuleEngine,
    difficulty: AiDifficulty,
    agent: AiAgent,
}

#[wasm_bindgen]
impl GameEngine {
    /// 创建新引擎。难度缺省为 hard（与原版前端一致），可传入固定
    /// 随机种子以获得可复现的低难度行为。
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<String>, seed: Option<u64>) -> Result<GameEngine, JsValue> {
        let difficulty = match difficulty.as_deref() {
            Some(value) => parse_difficulty(value).map_err(to_js_error)?,
            None => AiDifficulty::Hard,
        };
        let config = AiConfig::from_difficulty(difficulty);
        let agent = match seed {
            Some(seed) => AiAgent::with_seed(config, seed),
            None => AiAgent::new(config),
        };
        Ok(GameEngine {
            state: GameState::new(),
            rules: RuleEngine::new(),
            difficulty,
            agent,
        })
    }

    /// 重置到初始状态（空棋盘、人类先手）。
    pub fn new_game(&mut self) -> Result<String, JsValue> {
        let events = self.rules.reset(&mut self.state);
        make_resolution_json(resolution_from_events(&self.state, events))
    }

    /// 人类在 (row, col) 落子。拒绝时返回序列化的 `RuleError`，
    /// 状态保持不变。
    pub fn submit_human_move(&mut self, row: u8, col: u8) -> Result<String, JsValue> {
        let events = self
            .rules
            .submit_human_move(&mut self.state, HumanMoveAction { row, col })
            .map_err(to_js_error)?;
        make_resolution_json(resolution_from_events(&self.state, events))
    }

    /// 由前端在展示延迟后调用：按当前难度选出并应用电脑落子。
    pub fn trigger_computer_move(&mut self) -> Result<String, JsValue> {
        if self.state.turn != TurnState::ComputerThinking {
            return Err(to_js_error(RuleError::NotComputerTurn));
        }

        let decision = self
            .agent
            .choose_move(&self.state.board)
            .ok_or_else(|| to_js_error(RuleError::BoardFull))?;
        let events = self
            .rules
            .apply_computer_move(&mut self.state, decision.coord)
            .map_err(to_js_error)?;

        let response = AiMoveResponse {
            decision,
            applied: resolution_from_events(&self.state, events),
        };
        serde_json::to_string(&response).map_err(serde_to_js_error)
    }

    /// 异步计算电脑落子但不应用，可附带延迟（对应原版的
    /// `setTimeout(aiMove, 500)`）。
    pub fn think_computer_move(&self, delay_ms: Option<u32>) -> Promise {
        let board = self.state.board;
        let config = AiConfig::from_difficulty(self.difficulty);
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let mut agent = AiAgent::new(config);
            let decision = agent.choose_move(&board);
            let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }

    /// 随时可调，下一次电脑落子起生效。
    pub fn set_difficulty(&mut self, level: &str) -> Result<(), JsValue> {
        let difficulty = parse_difficulty(level).map_err(to_js_error)?;
        self.difficulty = difficulty;
        self.agent.set_config(AiConfig::from_difficulty(difficulty));
        Ok(())
    }

    pub fn difficulty(&self) -> String {
        match self.difficulty {
            AiDifficulty::Easy => "easy".to_string(),
            AiDifficulty::Medium => "medium".to_string(),
            AiDifficulty::Hard => "hard".to_string(),
        }
    }

    /// 渲染用只读快照：棋盘、结果与轮次。
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.state = state;
        Ok(())
    }
}

/// 返回一个全新的对局状态，方便前端调试或初始化。
#[wasm_bindgen(js_name = "createGameState")]
pub fn create_game_state() -> Result<JsValue, JsValue> {
    to_value(&GameState::new()).map_err(JsValue::from)
}

/// 对传入棋盘做终局判定。
#[wasm_bindgen(js_name = "checkOutcome")]
pub fn check_outcome(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    to_value(&outcome_of(&board)).map_err(JsValue::from)
}

/// 无状态地为给定棋盘计算电脑落子。
#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(
    board: JsValue,
    difficulty: Option<String>,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    let difficulty = match difficulty.as_deref() {
        Some(value) => parse_difficulty(value).map_err(to_js_error)?,
        None => AiDifficulty::Hard,
    };
    let config = AiConfig::from_difficulty(difficulty);
    let mut agent = match seed {
        Some(seed) => AiAgent::with_seed(config, seed),
        None => AiAgent::new(config),
    };
    to_value(&agent.choose_move(&board)).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
