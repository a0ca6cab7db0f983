use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::cars::{Car, CarSelection};
use crate::config::GameConfig;
use crate::entities::{Enemy, GameState, MoveIntent, Player};
use crate::error::{GameError, Result};
use crate::highscore::Highscore;
use crate::timer::Ticker;

/// Something the glue layer may want to react to (sound, logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    LoadingStarted,
    RaceStarted,
    Crashed {
        score: u32,
        highscore: u32,
        new_highscore: bool,
    },
    ReturnedToMenu,
}

/// Everything that changes while playing. Timestamps are durations on a
/// monotonic clock chosen by the caller, so tests can drive a virtual one.
pub struct Game {
    config: GameConfig,
    state: GameState,
    player: Player,
    enemies: Vec<Enemy>,
    score: u32,
    highscore: Highscore,
    cars: CarSelection,
    rng: StdRng,
    loading_since: Option<Duration>,
    /// Both tickers exist only while Running
    score_ticker: Option<Ticker>,
    spawn_ticker: Option<Ticker>,
    new_highscore: bool,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig, highscore: Highscore, cars: CarSelection, rng: StdRng) -> Self {
        Self {
            player: Player::new(&config),
            config,
            state: GameState::Menu,
            enemies: Vec::new(),
            score: 0,
            highscore,
            cars,
            rng,
            loading_since: None,
            score_ticker: None,
            spawn_ticker: None,
            new_highscore: false,
            events: Vec::new(),
        }
    }

    pub fn with_seed(config: GameConfig, highscore: Highscore, seed: u64) -> Self {
        Self::new(
            config,
            highscore,
            CarSelection::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn highscore(&self) -> u32 {
        self.highscore.best()
    }

    /// Whether the last crash set a new highscore
    pub fn is_new_highscore(&self) -> bool {
        self.new_highscore
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn cars(&self) -> CarSelection {
        self.cars
    }

    /// Car choices can only change on the menu
    pub fn select_cars(&mut self, player: Car, opponent: Car) -> bool {
        if self.state != GameState::Menu {
            return false;
        }
        self.cars = CarSelection { player, opponent };
        true
    }

    /// How far through the loading delay we are, `0.0` outside Loading
    pub fn loading_progress(&self, now: Duration) -> f32 {
        match (self.state, self.loading_since) {
            (GameState::Loading, Some(since)) => {
                let elapsed = now.saturating_sub(since).as_secs_f32();
                (elapsed / self.config.loading_delay.as_secs_f32()).min(1.0)
            }
            _ => 0.0,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Menu -> Loading
    pub fn start(&mut self, now: Duration) -> Result<()> {
        self.transition(GameState::Loading, now)
    }

    /// GameOver -> Menu
    pub fn restart(&mut self, now: Duration) -> Result<()> {
        self.transition(GameState::Menu, now)
    }

    /// Places an enemy on the track outside the regular spawn cadence
    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Advances the game to `now`. Call once per frame.
    pub fn update(&mut self, now: Duration, intent: MoveIntent) {
        match self.state {
            GameState::Loading => {
                let since = self.loading_since.unwrap_or(now);
                if now.saturating_sub(since) >= self.config.loading_delay {
                    if let Err(err) = self.transition(GameState::Running, now) {
                        log::error!("Could not start race: {err}");
                    }
                }
            }
            GameState::Running => self.step(now, intent),
            GameState::Menu | GameState::GameOver => {}
        }
    }

    /// One frame of gameplay: score, spawn, move, prune, collide
    fn step(&mut self, now: Duration, intent: MoveIntent) {
        if let Some(ticker) = self.score_ticker.as_mut() {
            self.score += ticker.poll(now);
        }

        let spawns = self
            .spawn_ticker
            .as_mut()
            .map(|ticker| ticker.poll(now))
            .unwrap_or(0);
        for _ in 0..spawns {
            self.spawn_enemy();
        }

        let max_x = self.config.max_x(self.player.body.width);
        self.player.steer(intent, max_x);

        for enemy in &mut self.enemies {
            enemy.update();
        }

        let (height, margin) = (self.config.canvas_height, self.config.prune_margin);
        self.enemies.retain(|e| !e.is_off_screen(height, margin));

        if self.check_collisions() {
            if let Err(err) = self.transition(GameState::GameOver, now) {
                log::error!("Could not end race: {err}");
            }
        }
    }

    fn spawn_enemy(&mut self) {
        let max_x = self.config.max_x(self.config.enemy.width);
        let x = self.rng.random_range(0.0..=max_x);
        self.enemies.push(Enemy::spawn_at(x, &self.config));
    }

    /// True if the player overlaps any live enemy
    pub fn check_collisions(&self) -> bool {
        self.enemies
            .iter()
            .any(|enemy| self.player.body.intersects(&enemy.body))
    }

    fn transition(&mut self, to: GameState, now: Duration) -> Result<()> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(GameError::InvalidTransition { from, to });
        }
        log::info!("{from:?} -> {to:?}");
        self.state = to;

        match to {
            GameState::Loading => {
                self.loading_since = Some(now);
                self.events.push(GameEvent::LoadingStarted);
            }
            GameState::Running => {
                self.loading_since = None;
                self.reset_round();
                self.score_ticker = Some(Ticker::new(self.config.score_interval, now));
                self.spawn_ticker = Some(Ticker::new(self.config.spawn_interval, now));
                log::info!(
                    "Race started: {} vs {}",
                    self.cars.player,
                    self.cars.opponent
                );
                self.events.push(GameEvent::RaceStarted);
            }
            GameState::GameOver => {
                self.score_ticker = None;
                self.spawn_ticker = None;
                self.new_highscore = match self.highscore.submit(self.score) {
                    Ok(new_best) => new_best,
                    Err(err) => {
                        log::warn!("Could not save highscore: {err}");
                        self.highscore.best() == self.score
                    }
                };
                log::info!(
                    "Crashed with score {} (highscore {})",
                    self.score,
                    self.highscore.best()
                );
                self.events.push(GameEvent::Crashed {
                    score: self.score,
                    highscore: self.highscore.best(),
                    new_highscore: self.new_highscore,
                });
            }
            GameState::Menu => {
                self.reset_round();
                self.new_highscore = false;
                self.events.push(GameEvent::ReturnedToMenu);
            }
        }
        Ok(())
    }

    fn reset_round(&mut self) {
        self.score = 0;
        self.enemies.clear();
        self.player.reset(&self.config);
    }
}
