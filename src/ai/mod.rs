//! AI 算法模块（极大极小搜索与难度策略）。

pub mod minimax;

pub use minimax::{best_move, score, AiAgent, AiConfig, AiDecision, AiDifficulty, MoveSource};
