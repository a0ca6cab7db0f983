use super::entity::Entity;
use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub body: Entity,
}

impl Enemy {
    /// Places a new enemy at `x` on the spawn line above the canvas
    pub fn spawn_at(x: f32, config: &GameConfig) -> Self {
        Self {
            body: Entity::new(x, config.enemy_spawn_y, config.enemy),
        }
    }

    pub fn update(&mut self) {
        self.body.y += self.body.speed;
    }

    /// True once the enemy has scrolled past the bottom edge plus `margin`
    pub fn is_off_screen(&self, canvas_height: f32, margin: f32) -> bool {
        self.body.y > canvas_height + margin
    }
}
