// Library exports for testing
pub use entities::{Enemy, Entity, GameState, MoveIntent, Player};
pub use game::{Game, GameEvent};

pub mod app;
pub mod audio;
pub mod cars;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod highscore;
pub mod input;
pub mod renderer;
pub mod sprite;
pub mod storage;
pub mod timer;
