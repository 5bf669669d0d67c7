pub mod cards;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod equity;
pub mod error;
pub mod game_state;
pub mod hand_evaluator;
pub mod learner;
pub mod play;
pub mod policy;
pub mod session;
