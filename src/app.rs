use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::cars::{Car, CarSelection};
use crate::game::{Game, GameEvent};
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::sprite::CarSprite;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    game: Game,
    /// Sprites resolved for the current car selection
    player_sprite: CarSprite,
    opponent_sprite: CarSprite,
    assets_dir: PathBuf,
    /// Frames info
    started_at: Instant,
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(game: Game, audio_manager: AudioManager, assets_dir: PathBuf) -> Self {
        let cars = game.cars();
        let now = Instant::now();
        Self {
            running: true,
            player_sprite: CarSprite::fallback(cars.player),
            opponent_sprite: CarSprite::fallback(cars.opponent),
            game,
            assets_dir,
            started_at: now,
            last_frame_time: now,
            fps: 0,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    /// Monotonic game clock
    fn now(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let frame_interval = self.game.config().frame_interval;
        while self.running {
            let frame_start = Instant::now();

            // Calculate FPS
            let frame_time = frame_start.duration_since(self.last_frame_time);
            self.last_frame_time = frame_start;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            // Render the frame
            let now = self.now();
            terminal.draw(|frame| {
                let config = self.game.config();
                let view = RenderView {
                    game_state: self.game.state(),
                    player: self.game.player(),
                    enemies: self.game.enemies(),
                    score: self.game.score(),
                    highscore: self.game.highscore(),
                    new_highscore: self.game.is_new_highscore(),
                    cars: self.game.cars(),
                    player_color: self.player_sprite.color,
                    opponent_color: self.opponent_sprite.color,
                    muted: self.audio_manager.is_muted(),
                    loading_progress: self.game.loading_progress(now),
                    canvas_width: config.canvas_width,
                    canvas_height: config.canvas_height,
                    area: frame.area(),
                    fps: self.fps,
                };
                self.renderer.render(frame, &view);
            })?;

            // Poll input events and get actions
            let state = self.game.state();
            self.input_manager.poll_events(state)?;
            if self.input_manager.had_interaction() {
                self.audio_manager.on_user_interaction();
            }
            let actions = self.input_manager.get_actions().to_vec();
            self.process_actions(&actions);

            // Update game state
            let intent = self.input_manager.move_intent(self.game.state());
            let now = self.now();
            self.game.update(now, intent);
            self.handle_events();

            // Sleep off the rest of the frame to hold ~60 FPS
            if let Some(rest) = frame_interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::ToggleMute => {
                    self.audio_manager.toggle_mute();
                }
                InputAction::Start => {
                    let now = self.now();
                    if let Err(err) = self.game.start(now) {
                        log::debug!("Ignoring start: {err}");
                    }
                }
                InputAction::Restart => {
                    let now = self.now();
                    if let Err(err) = self.game.restart(now) {
                        log::debug!("Ignoring restart: {err}");
                    }
                }
                InputAction::NextPlayerCar => {
                    self.cycle_cars(|cars| cars.player = cars.player.next())
                }
                InputAction::PreviousPlayerCar => {
                    self.cycle_cars(|cars| cars.player = cars.player.previous())
                }
                InputAction::NextOpponentCar => {
                    self.cycle_cars(|cars| cars.opponent = cars.opponent.next())
                }
                InputAction::PreviousOpponentCar => {
                    self.cycle_cars(|cars| cars.opponent = cars.opponent.previous())
                }
            }
        }
    }

    fn cycle_cars(&mut self, change: impl FnOnce(&mut CarSelection)) {
        let mut cars = self.game.cars();
        change(&mut cars);
        if self.game.select_cars(cars.player, cars.opponent) {
            self.player_sprite = CarSprite::fallback(cars.player);
            self.opponent_sprite = CarSprite::fallback(cars.opponent);
        }
    }

    /// Reacts to transitions reported by the game
    fn handle_events(&mut self) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::LoadingStarted => {
                    self.audio_manager.play_loading_sound();
                }
                GameEvent::RaceStarted => {
                    let cars = self.game.cars();
                    self.load_sprites(cars.player, cars.opponent);
                    self.audio_manager.play_game_music();
                }
                GameEvent::Crashed { .. } => {
                    self.input_manager.release_all();
                }
                GameEvent::ReturnedToMenu => {}
            }
        }
    }

    fn load_sprites(&mut self, player: Car, opponent: Car) {
        self.player_sprite = CarSprite::load(player, &self.assets_dir);
        self.opponent_sprite = if opponent == player {
            self.player_sprite
        } else {
            CarSprite::load(opponent, &self.assets_dir)
        };
    }
}
