use super::entity::Entity;
use crate::config::GameConfig;

/// Horizontal intent derived from the held keys for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Entity,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let (x, y) = config.player_start;
        Self {
            body: Entity::new(x, y, config.player),
        }
    }

    pub fn x(&self) -> f32 {
        self.body.x
    }

    pub fn y(&self) -> f32 {
        self.body.y
    }

    pub fn move_left(&mut self, min_x: f32) {
        self.body.x = (self.body.x - self.body.speed).max(min_x);
    }

    pub fn move_right(&mut self, max_x: f32) {
        self.body.x = (self.body.x + self.body.speed).min(max_x);
    }

    /// Applies one frame of movement. Both keys held cancel out.
    pub fn steer(&mut self, intent: MoveIntent, max_x: f32) {
        match (intent.left, intent.right) {
            (true, false) => self.move_left(0.0),
            (false, true) => self.move_right(max_x),
            _ => {}
        }
    }

    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }
}
