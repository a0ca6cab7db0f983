/// Which screen the game is on. Only `Running` advances gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Loading,
    Running,
    GameOver,
}

impl GameState {
    /// The single legal successor of each state
    pub fn next(self) -> GameState {
        match self {
            GameState::Menu => GameState::Loading,
            GameState::Loading => GameState::Running,
            GameState::Running => GameState::GameOver,
            GameState::GameOver => GameState::Menu,
        }
    }

    pub fn can_transition_to(self, to: GameState) -> bool {
        self.next() == to
    }

    pub fn is_running(self) -> bool {
        self == GameState::Running
    }
}
