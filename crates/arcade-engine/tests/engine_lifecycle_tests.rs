//! Integration tests for the engine loop driven through its public API.
//!
//! A small "dodger" game exercises every hook: keys move a paddle, clicks
//! score, falling blocks end the game on contact.

use arcade_engine::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Test game
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Dodger {
    paddle: Rect,
    block: Rect,
    updates: u32,
}

impl Game for Dodger {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn update(&mut self, ctx: &mut GameContext<'_>, delta_ms: f64) {
        self.updates += 1;
        if ctx.input().is_pressed(&Key::ArrowLeft) {
            self.paddle.x = clamp(self.paddle.x - 5.0, 0.0, ctx.width() - self.paddle.width);
        }
        if ctx.input().is_pressed(&Key::ArrowRight) {
            self.paddle.x = clamp(self.paddle.x + 5.0, 0.0, ctx.width() - self.paddle.width);
        }
        self.block.y += delta_ms * 0.5;
        if ctx.check_collision(&self.paddle, &self.block) {
            ctx.emit_particle(self.paddle.x, self.paddle.y, ParticleSpec::default());
            ctx.game_over();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.paddle, Color::RED);
        surface.fill_rect(self.block, Color::BLACK);
    }

    fn handle_click(&mut self, ctx: &mut GameContext<'_>, _x: f64, _y: f64) {
        ctx.add_score(5);
    }

    fn snapshot(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

fn dodger(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
    Box::new(Dodger {
        paddle: Rect::new(380.0, 550.0, 40.0, 10.0),
        block: Rect::new(100.0, 0.0, 20.0, 20.0),
        updates: 0,
    })
}

fn engine() -> Engine<ScoreBoard> {
    Engine::new(EngineConfig::default(), ScoreBoard::new())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn frame_draws_background_game_then_particles() {
    let mut engine = engine();
    engine.start_game(dodger, "Dodger");
    let mut list = DrawList::new();
    assert!(engine.tick(0.0, &mut list));

    let commands = list.commands();
    assert!(matches!(commands[0], DrawCommand::Clear { color } if color == Color::SKY));
    assert!(matches!(commands[1], DrawCommand::FillRect { color, .. } if color == Color::RED));
    assert!(matches!(commands[2], DrawCommand::FillRect { color, .. } if color == Color::BLACK));
    assert_eq!(commands.len(), 3);
}

#[test]
fn held_key_moves_paddle_every_frame() {
    let mut engine = engine();
    engine.start_game(dodger, "Dodger");
    engine.handle_event(&DeviceEvent::KeyDown(Key::ArrowLeft));
    engine.run_frames(10, 16.0);
    engine.handle_event(&DeviceEvent::KeyUp(Key::ArrowLeft));
    engine.run_frames(10, 16.0);

    let snapshot = engine.game_snapshot().unwrap();
    assert_eq!(snapshot["paddle"]["x"], serde_json::json!(330.0));
    assert_eq!(snapshot["updates"], serde_json::json!(20));
}

#[test]
fn on_screen_control_buttons_act_like_keys() {
    let mut engine = engine();
    engine.start_game(dodger, "Dodger");
    engine.handle_event(&DeviceEvent::ControlButton {
        button: ControlButton::Right,
        pressed: true,
    });
    assert!(engine.input().is_pressed(&Key::ArrowRight));
    engine.run_frames(4, 16.0);
    let snapshot = engine.game_snapshot().unwrap();
    assert_eq!(snapshot["paddle"]["x"], serde_json::json!(400.0));
}

#[test]
fn clicks_score_through_scaled_geometry() {
    let mut engine = engine();
    engine.set_geometry(SurfaceGeometry::new(10.0, 20.0, 2.0));
    engine.start_game(dodger, "Dodger");

    assert!(engine.handle_event(&DeviceEvent::PointerDown { x: 210.0, y: 220.0 }));
    assert_eq!(engine.input().pointer(), (100.0, 100.0));
    assert!(engine.input().pointer_active());
    engine.handle_event(&DeviceEvent::PointerUp);
    assert!(!engine.input().pointer_active());

    engine.handle_event(&DeviceEvent::TouchStart { x: 10.0, y: 20.0 });
    assert_eq!(engine.input().touch(), (0.0, 0.0));

    assert_eq!(engine.score(), 10);
    assert_eq!(engine.sink().score_label(), "Score: 10");
}

#[test]
fn collision_ends_the_game_once() {
    let mut engine = engine();
    engine.start_game(dodger, "Dodger");
    // Park the paddle under the block.
    engine.handle_event(&DeviceEvent::KeyDown(Key::ArrowLeft));
    engine.run_frames(60, 16.0);
    engine.handle_event(&DeviceEvent::KeyUp(Key::ArrowLeft));

    let worked = engine.run_frames(200, 16.0);
    assert!(worked < 200);
    assert_eq!(engine.state(), LoopState::GameOver);
    assert!(!engine.frame_requested());
    assert_eq!(engine.particles().len(), 1);
    assert_eq!(engine.sink().game_over_count(), 1);
    assert_eq!(engine.window_title(), "Dodger - Game Over (0)");

    // Further frames and input are ignored.
    assert_eq!(engine.run_frames(10, 16.0), 0);
    assert!(!engine.handle_event(&DeviceEvent::PointerDown { x: 1.0, y: 1.0 }));
    assert_eq!(engine.score(), 0);
}

#[test]
fn restart_after_game_over_starts_fresh() {
    let mut engine = engine();
    engine.start_game(dodger, "Dodger");
    engine.add_score(40);
    engine.game_over();
    assert_eq!(engine.sink_mut().take_game_over(), Some(40));

    engine.start_game(dodger, "Dodger");
    assert!(engine.is_running());
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.window_title(), "Dodger - Score: 0");
    assert_eq!(engine.run_frames(5, 16.0), 5);
}

#[test]
fn idle_engine_reports_plain_title() {
    let engine = engine();
    assert_eq!(engine.window_title(), "Arcade");
    assert_eq!(engine.surface_size(), (800.0, 600.0));
}
