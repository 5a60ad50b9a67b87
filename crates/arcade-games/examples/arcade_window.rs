//! All three games in one window, with a menu and a results screen.
//!
//! Run with:
//!   cargo run --example arcade_window --features renderer -p arcade-games
//!
//! Controls:
//!   1 / 2 / 3 or click -- pick a game from the menu
//!   Enter -- play the same game again
//!   Escape -- back to the menu
//!
//! High scores are kept in `arcade_highscores.json`, or wherever
//! `ARCADE_HIGHSCORES` points.

use std::path::PathBuf;

use arcade_engine::render::run_windowed;
use arcade_games::prelude::*;

const MENU_BUTTON_WIDTH: f64 = 300.0;
const MENU_BUTTON_HEIGHT: f64 = 60.0;
const MENU_TOP: f64 = 200.0;
const MENU_GAP: f64 = 20.0;

/// Menu and results screens around a [`Session`].
struct Arcade {
    session: Session,
    geometry: SurfaceGeometry,
}

impl Arcade {
    fn button(index: usize, width: f64) -> Rect {
        Rect::new(
            (width - MENU_BUTTON_WIDTH) / 2.0,
            MENU_TOP + index as f64 * (MENU_BUTTON_HEIGHT + MENU_GAP),
            MENU_BUTTON_WIDTH,
            MENU_BUTTON_HEIGHT,
        )
    }

    fn at_menu(&self) -> bool {
        self.session.current().is_none()
    }

    fn pick(&mut self, index: usize) {
        if let Some(kind) = GameKind::ALL.get(index) {
            self.session.start_kind(*kind);
        }
    }

    fn draw_menu(&self, surface: &mut dyn Surface) {
        let (width, _) = self.session.surface_size();
        surface.clear(Color::SKY);
        surface.fill_text(
            "ARCADE",
            width / 2.0,
            120.0,
            &TextStyle::new(Color::WHITE, 48.0).aligned(TextAlign::Center),
        );

        for (index, kind) in GameKind::ALL.iter().enumerate() {
            let button = Self::button(index, width);
            surface.fill_rect(button, Color::WHITE);
            surface.stroke_rect(button, Color::BLACK, 2.0);
            let label = format!(
                "{}. {}   (best {})",
                index + 1,
                kind.title(),
                self.session.scores().best(kind.id())
            );
            surface.fill_text(
                &label,
                button.x + button.width / 2.0,
                button.y + button.height / 2.0 + 6.0,
                &TextStyle::new(Color::BLACK, 18.0).aligned(TextAlign::Center),
            );
        }
    }

    fn draw_results(&self, surface: &mut dyn Surface, result: &GameResult) {
        let (width, height) = self.session.surface_size();
        surface.clear(Color::SKY);
        surface.set_alpha(0.7);
        surface.fill_rect(Rect::new(0.0, 0.0, width, height), Color::BLACK);
        surface.set_alpha(1.0);

        let center = TextStyle::new(Color::WHITE, 24.0).aligned(TextAlign::Center);
        let mut y = height / 2.0 - 60.0;
        for line in [
            "Game Over".to_owned(),
            format!("Score: {}", result.final_score),
            if result.new_high_score {
                "New high score!".to_owned()
            } else {
                format!("Best: {}", result.best)
            },
            "Enter to play again, Escape for menu".to_owned(),
        ] {
            surface.fill_text(&line, width / 2.0, y, &center);
            y += 40.0;
        }
    }
}

impl FrameHost for Arcade {
    fn device_event(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::KeyDown(Key::Escape) => {
                self.session.show_menu();
                return;
            }
            DeviceEvent::KeyDown(Key::Enter) if !self.session.engine().is_running() => {
                self.session.restart();
                return;
            }
            _ => {}
        }

        if !self.at_menu() {
            self.session.handle_event(event);
            return;
        }

        match event {
            DeviceEvent::KeyDown(Key::Other(code)) => {
                if let Some(digit) = code.strip_prefix("Digit") {
                    if let Ok(n) = digit.parse::<usize>() {
                        self.pick(n.wrapping_sub(1));
                    }
                }
            }
            DeviceEvent::PointerDown { .. } | DeviceEvent::TouchStart { .. } => {
                // Menu hits use the same surface mapping as the games.
                let mut scratch = InputState::new();
                let normalizer = InputNormalizer::new(self.geometry);
                if let Some(GameInput::Click { x, y }) = normalizer.normalize(&mut scratch, event) {
                    let (width, _) = self.session.surface_size();
                    let hit = Rect::new(x, y, 1.0, 1.0);
                    if let Some(index) =
                        (0..GameKind::ALL.len()).find(|&i| overlaps(&Self::button(i, width), &hit))
                    {
                        self.pick(index);
                    }
                }
            }
            _ => {}
        }
    }

    fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> bool {
        if self.at_menu() {
            self.draw_menu(surface);
            return true;
        }
        if self.session.frame(timestamp_ms, surface) {
            return true;
        }
        match self.session.last_result() {
            Some(result) if self.session.state() == LoopState::GameOver => {
                self.draw_results(surface, &result);
                true
            }
            _ => false,
        }
    }

    fn window_title(&self) -> String {
        self.session.window_title()
    }

    fn surface_size(&self) -> (f64, f64) {
        self.session.surface_size()
    }

    fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.geometry = geometry;
        self.session.set_geometry(geometry);
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let path = std::env::var_os("ARCADE_HIGHSCORES")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("arcade_highscores.json"));
    let scores = HighScores::load(path);

    let config = EngineConfig::default();
    let (width, height) = (config.width as u32, config.height as u32);
    let arcade = Arcade {
        session: Session::new(config, scores),
        geometry: SurfaceGeometry::default(),
    };
    run_windowed(arcade, width, height)
}
