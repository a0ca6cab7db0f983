use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Painter, Shape},
    },
};

use crate::cars::CarSelection;
use crate::entities::{Enemy, Entity, GameState, Player};

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub score: u32,
    pub highscore: u32,
    pub new_highscore: bool,
    pub cars: CarSelection,
    pub player_color: Color,
    pub opponent_color: Color,
    pub muted: bool,
    pub loading_progress: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub area: Rect,
    pub fps: u32,
}

/// A solid rectangle in canvas units, already clipped to the canvas
struct FilledRect {
    left: f64,
    bottom: f64,
    right: f64,
    top: f64,
    color: Color,
}

impl Shape for FilledRect {
    fn draw(&self, painter: &mut Painter) {
        let (Some((x1, y1)), Some((x2, y2))) = (
            painter.get_point(self.left, self.bottom),
            painter.get_point(self.right, self.top),
        ) else {
            return;
        };
        for x in x1.min(x2)..=x1.max(x2) {
            for y in y1.min(y2)..=y1.max(y2) {
                painter.paint(x, y, self.color);
            }
        }
    }
}

/// Number of start lights on the loading screen
const START_LIGHTS: usize = 5;

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    /// Creates a new GameRenderer
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        match view.game_state {
            GameState::Menu => self.render_menu(frame, view),
            GameState::Loading => self.render_loading(frame, view),
            GameState::Running => self.render_game(frame, view),
            GameState::GameOver => self.render_game_over(frame, view),
        }
    }

    /// Largest area with the canvas aspect ratio that fits, centred.
    /// Terminal cells are about twice as tall as they are wide.
    fn track_area(area: Rect, view: &RenderView) -> Rect {
        let usable_height = area.height.saturating_sub(2);
        let ratio = view.canvas_width / view.canvas_height * 2.0;
        let mut height = usable_height;
        let mut width = (height as f32 * ratio).round() as u16 + 2;
        if width > area.width {
            width = area.width;
            height = ((width.saturating_sub(2)) as f32 / ratio).round() as u16;
        }
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + 1,
            width,
            height: height.min(usable_height),
        }
    }

    /// Converts an entity (y down) into a clipped canvas rectangle (y up)
    fn clip(entity: &Entity, view: &RenderView, color: Color) -> Option<FilledRect> {
        let (w, h) = (view.canvas_width as f64, view.canvas_height as f64);
        let left = (entity.x as f64).clamp(0.0, w);
        let right = (entity.right() as f64).clamp(0.0, w);
        let top = (h - entity.y as f64).clamp(0.0, h);
        let bottom = (h - entity.bottom() as f64).clamp(0.0, h);
        if right <= left || top <= bottom {
            return None;
        }
        Some(FilledRect {
            left,
            bottom,
            right,
            top,
            color,
        })
    }

    /// Renders the active racing screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let track = Self::track_area(area, view);
        let (w, h) = (view.canvas_width as f64, view.canvas_height as f64);

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::LEFT | Borders::RIGHT)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .marker(Marker::HalfBlock)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(|ctx| {
                if let Some(rect) = Self::clip(&view.player.body, view, view.player_color) {
                    ctx.draw(&rect);
                }
                for enemy in view.enemies {
                    if let Some(rect) = Self::clip(&enemy.body, view, view.opponent_color) {
                        ctx.draw(&rect);
                    }
                }
                ctx.layer();
                ctx.print(
                    10.0,
                    h - 30.0,
                    Line::from(format!("Score: {}", view.score)).white().bold(),
                );
            });
        frame.render_widget(canvas, track);

        // Stats overlay at the top
        let stats = Line::from(vec![
            Span::styled("Highscore: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.highscore),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Cars: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.enemies.len()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(stats), stats_area);

        let controls = Line::from(Span::styled(
            format!("[A/D or Arrows: Steer] {} [Q: Quit]", mute_hint(view.muted)),
            Style::default().fg(Color::DarkGray),
        ));
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Renders the title screen with car selection
    fn render_menu(&self, frame: &mut Frame, view: &RenderView) {
        let menu_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().cyan(),
            Line::from("║       DODGE  RACER        ║")
                .centered()
                .cyan()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().cyan(),
            Line::from(""),
            Line::from(format!("Highscore: {}", view.highscore))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from(vec![
                Span::raw("Your car:  "),
                Span::styled(
                    format!("< {} >", view.cars.player),
                    Style::default()
                        .fg(view.player_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
            .centered(),
            Line::from(vec![
                Span::raw("Opponents: "),
                Span::styled(
                    format!("< {} >", view.cars.opponent),
                    Style::default()
                        .fg(view.opponent_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
            .centered(),
            Line::from(""),
            Line::from("[A/D] Your car   [W/S] Opponents")
                .centered()
                .dark_gray(),
            Line::from(""),
            Line::from("Press Enter to start").centered().white().bold(),
            Line::from(mute_hint(view.muted)).centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        frame.render_widget(
            Paragraph::new(menu_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
    }

    /// Renders the start lights while the race is about to begin
    fn render_loading(&self, frame: &mut Frame, view: &RenderView) {
        let lit = ((view.loading_progress * START_LIGHTS as f32).ceil() as usize).min(START_LIGHTS);
        let lights: Vec<Span> = (0..START_LIGHTS)
            .map(|i| {
                if i < lit {
                    Span::styled(" ● ", Style::default().fg(Color::Red).bold())
                } else {
                    Span::styled(" ○ ", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();

        let loading_text = vec![
            Line::from(""),
            Line::from(""),
            Line::from(lights).centered(),
            Line::from(""),
            Line::from(format!("{} vs {}", view.cars.player, view.cars.opponent))
                .centered()
                .white(),
            Line::from(""),
            Line::from("Get ready...").centered().yellow().bold(),
        ];

        frame.render_widget(
            Paragraph::new(loading_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
    }

    /// Renders the game over screen
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let mut game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║        CRASHED!           ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Score: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("Highscore: {}", view.highscore))
                .centered()
                .cyan()
                .bold(),
        ];
        if view.new_highscore {
            game_over_text.push(Line::from("NEW HIGHSCORE!").centered().green().bold());
        }
        game_over_text.extend([
            Line::from(""),
            Line::from("Press R to return to the menu").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ]);

        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
    }
}

fn mute_hint(muted: bool) -> &'static str {
    if muted { "[M: Unmute]" } else { "[M: Mute]" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(view_state: GameState, score: u32, enemies: &[Enemy]) -> String {
        let config = GameConfig::default();
        let player = Player::new(&config);
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|frame| {
                let view = RenderView {
                    game_state: view_state,
                    player: &player,
                    enemies,
                    score,
                    highscore: 42,
                    new_highscore: true,
                    cars: CarSelection::default(),
                    player_color: Color::Blue,
                    opponent_color: Color::Rgb(255, 128, 0),
                    muted: false,
                    loading_progress: 0.5,
                    canvas_width: config.canvas_width,
                    canvas_height: config.canvas_height,
                    area: frame.area(),
                    fps: 60,
                };
                GameRenderer::new().render(frame, &view);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_menu_shows_highscore_and_cars() {
        let screen = draw(GameState::Menu, 0, &[]);
        assert!(screen.contains("Highscore: 42"));
        assert!(screen.contains("< RedBull >"));
        assert!(screen.contains("< McLaren >"));
        assert!(screen.contains("[M: Mute]"));
    }

    #[test]
    fn test_running_shows_score() {
        let config = GameConfig::default();
        let mut enemy = Enemy::spawn_at(0.0, &config);
        enemy.body.y = 100.0;
        let screen = draw(GameState::Running, 17, &[enemy]);
        assert!(screen.contains("Score: 17"));
        assert!(screen.contains("Highscore: 42"));
    }

    #[test]
    fn test_loading_lights() {
        let screen = draw(GameState::Loading, 0, &[]);
        assert_eq!(screen.matches('●').count(), 3);
        assert_eq!(screen.matches('○').count(), 2);
        assert!(screen.contains("RedBull vs McLaren"));
    }

    #[test]
    fn test_game_over_screen() {
        let screen = draw(GameState::GameOver, 9, &[]);
        assert!(screen.contains("Score: 9"));
        assert!(screen.contains("NEW HIGHSCORE!"));
    }

    #[test]
    fn test_clip_drops_offscreen_entities() {
        let config = GameConfig::default();
        let player = Player::new(&config);
        let enemy = Enemy::spawn_at(0.0, &config);
        let view = RenderView {
            game_state: GameState::Running,
            player: &player,
            enemies: &[],
            score: 0,
            highscore: 0,
            new_highscore: false,
            cars: CarSelection::default(),
            player_color: Color::Blue,
            opponent_color: Color::Red,
            muted: false,
            loading_progress: 0.0,
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            area: Rect::new(0, 0, 80, 40),
            fps: 0,
        };
        // enemy spawns fully above the canvas
        assert!(GameRenderer::clip(&enemy.body, &view, Color::Red).is_none());

        let rect = GameRenderer::clip(&player.body, &view, Color::Blue).unwrap();
        assert_eq!((rect.left, rect.right), (175.0, 225.0));
        assert_eq!((rect.bottom, rect.top), (20.0, 120.0));
    }
}
