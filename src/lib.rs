//! Apiary game core.
//!
//! Simulation and turn scheduling for a simultaneous-order strategy game
//! played by bees and hives on a hex grid. Exposes the board model, the order
//! resolver, the influence and win evaluator, the session scheduler, and the
//! tooling built on them (map generation, random bots, self-play).

pub mod board;
pub mod eval;
pub mod mapgen;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod selfplay;
pub mod session;
