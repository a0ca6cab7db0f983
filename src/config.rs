use std::time::Duration;

/// Dimensions of an entity class. Every player/enemy of a class shares them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySpec {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

/// Tunables for one race. Units are canvas pixels, per-frame speeds and
/// wall-clock intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub player: EntitySpec,
    pub player_start: (f32, f32),
    pub enemy: EntitySpec,
    /// Enemies appear here, fully above the visible top edge
    pub enemy_spawn_y: f32,
    /// Enemies are dropped once their top passes `canvas_height + prune_margin`
    pub prune_margin: f32,
    pub spawn_interval: Duration,
    pub score_interval: Duration,
    pub loading_delay: Duration,
    pub frame_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 400.0,
            canvas_height: 600.0,
            player: EntitySpec {
                width: 50.0,
                height: 100.0,
                speed: 5.0,
            },
            player_start: (175.0, 480.0),
            enemy: EntitySpec {
                width: 50.0,
                height: 100.0,
                speed: 4.0,
            },
            enemy_spawn_y: -120.0,
            prune_margin: 20.0,
            spawn_interval: Duration::from_millis(1000),
            score_interval: Duration::from_millis(100),
            loading_delay: Duration::from_millis(1000),
            // ~60 FPS
            frame_interval: Duration::from_millis(16),
        }
    }
}

impl GameConfig {
    /// Largest x an entity of `width` may take without leaving the canvas
    pub fn max_x(&self, width: f32) -> f32 {
        (self.canvas_width - width).max(0.0)
    }

    /// Upper bound on live enemies given pruning: how many spawn periods it
    /// takes an enemy to cross from its spawn line to the prune line, plus one.
    pub fn max_live_enemies(&self, frame_interval: Duration) -> usize {
        let travel = self.canvas_height + self.prune_margin - self.enemy_spawn_y;
        let frames = (travel / self.enemy.speed).ceil() as u128 + 1;
        let lifetime_ms = frames * frame_interval.as_millis().max(1);
        (lifetime_ms / self.spawn_interval.as_millis().max(1)) as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_layout() {
        let config = GameConfig::default();
        assert_eq!(config.canvas_width, 400.0);
        assert_eq!(config.canvas_height, 600.0);
        assert_eq!(config.player_start, (175.0, 480.0));
        assert_eq!(config.max_x(config.player.width), 350.0);
    }

    #[test]
    fn test_max_x_never_negative() {
        let config = GameConfig::default();
        assert_eq!(config.max_x(1000.0), 0.0);
    }

    #[test]
    fn test_max_live_enemies_bound() {
        let config = GameConfig::default();
        // 740px at 4px/frame = 185 frames + 1, at 16ms is ~3s, so at most 3 or 4 alive
        assert_eq!(config.max_live_enemies(Duration::from_millis(16)), 3);
    }
}
