use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::entities::{GameState, MoveIntent};

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Start,
    Restart,
    NextPlayerCar,
    PreviousPlayerCar,
    NextOpponentCar,
    PreviousOpponentCar,
    ToggleMute,
    Quit,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: bool,
    right: bool,
}

/// Manages input polling and translates raw key events into game actions
#[derive(Debug, Default)]
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    /// Set when any key was pressed since the last poll
    interacted: bool,
}

impl InputManager {
    /// Creates a new InputManager with default key state
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, game_state: GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();
        self.interacted = false;

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state);
            }
        }

        Ok(())
    }

    /// Processes a key event and updates key state and one-shot actions
    pub fn handle_key_event(&mut self, key_event: KeyEvent, game_state: GameState) {
        match key_event.kind {
            KeyEventKind::Press => {
                self.interacted = true;
                self.handle_key_press(key_event, game_state);
            }
            KeyEventKind::Repeat => self.handle_held_key(key_event.code),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    /// Handles key press events
    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: GameState) {
        // Check for quit keys first (works in any state)
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        if matches!(key_event.code, KeyCode::Char('m') | KeyCode::Char('M')) {
            self.oneshot_actions.push(InputAction::ToggleMute);
            return;
        }

        // State-specific one-shot actions
        let action = match game_state {
            GameState::Menu => match key_event.code {
                KeyCode::Enter | KeyCode::Char(' ') => Some(InputAction::Start),
                KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                    Some(InputAction::NextPlayerCar)
                }
                KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                    Some(InputAction::PreviousPlayerCar)
                }
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                    Some(InputAction::NextOpponentCar)
                }
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                    Some(InputAction::PreviousOpponentCar)
                }
                _ => None,
            },
            GameState::GameOver => match key_event.code {
                KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                    Some(InputAction::Restart)
                }
                _ => None,
            },
            GameState::Loading | GameState::Running => None,
        };
        if let Some(action) = action {
            self.oneshot_actions.push(action);
            return;
        }

        // Steering is remembered in every state so a key held through the
        // loading screen already counts on the first racing frame
        self.handle_held_key(key_event.code);
    }

    fn handle_held_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = true;
                self.key_state.right = false;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = true;
                self.key_state.left = false;
            }
            _ => {}
        }
    }

    /// Handles key release events
    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = false;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = false;
            }
            _ => {}
        }
    }

    /// One-shot actions collected by the last poll
    pub fn get_actions(&self) -> &[InputAction] {
        &self.oneshot_actions
    }

    /// Steering from held keys, only meaningful while racing
    pub fn move_intent(&self, game_state: GameState) -> MoveIntent {
        if !game_state.is_running() {
            return MoveIntent::default();
        }
        MoveIntent {
            left: self.key_state.left,
            right: self.key_state.right,
        }
    }

    /// Whether a key was pressed during the last poll
    pub fn had_interaction(&self) -> bool {
        self.interacted
    }

    /// Forgets held keys, used when a round ends
    pub fn release_all(&mut self) {
        self.key_state = KeyState::default();
    }
}
