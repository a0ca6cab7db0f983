mod enemy;
mod entity;
mod game_state;
mod player;

// Re-export all public types
pub use enemy::Enemy;
pub use entity::Entity;
pub use game_state::GameState;
pub use player::{MoveIntent, Player};
