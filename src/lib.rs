//! Grid snake: a tick-driven game core with a small terminal front end.
//!
//! [`game::GameState`] holds one session and advances it one tick at a time,
//! [`game_loop::GameLoop`] drives it on a fixed cadence and talks to a
//! [`score::HighScoreStore`]. Everything under [`renderer`] and [`ui`] only
//! reads [`game::Snapshot`]s.

pub mod app;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod game_loop;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
