//! Super Platformer: run right across a fixed level, collect coins, stomp
//! enemies, avoid spikes, and reach the goal past x = 3000.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use arcade_engine::arena::Arena;
use arcade_engine::collision::{GameObject, Rect};
use arcade_engine::game::{Capabilities, Game, GameContext};
use arcade_engine::input::Key;
use arcade_engine::particles::ParticleSpec;
use arcade_engine::surface::{Color, Surface, TextStyle};

pub const GRAVITY: f64 = 0.8;
pub const FRICTION: f64 = 0.85;
pub const RUN_SPEED: f64 = 5.0;
pub const JUMP_POWER: f64 = 15.0;
pub const STARTING_LIVES: u32 = 3;

/// Crossing this x wins the level.
pub const GOAL_X: f64 = 3000.0;
/// Falling below this y costs a life.
pub const FALL_LIMIT: f64 = 700.0;

const COIN_POINTS: u64 = 50;
const STOMP_POINTS: u64 = 100;
const STOMP_BOUNCE: f64 = -8.0;
/// The player's top must be this far above an enemy's top to count as a stomp.
const STOMP_MARGIN: f64 = 10.0;

const RESPAWN_Y: f64 = 300.0;
const RESPAWN_MIN_X: f64 = 100.0;
const RESPAWN_SETBACK: f64 = 200.0;

const PLAYER_COLOR: Color = Color::rgb(0xFF, 0x6B, 0x6B);
const GROUND_COLOR: Color = Color::rgb(0x8B, 0x45, 0x13);
const LEDGE_COLOR: Color = Color::rgb(0xA0, 0x52, 0x2D);
const ENEMY_COLOR: Color = Color::rgb(0x8B, 0x00, 0x00);
const RESPAWN_COLOR: Color = Color::rgb(0x4E, 0xCD, 0xC4);

// ---------------------------------------------------------------------------
// Level data
// ---------------------------------------------------------------------------

/// `(x, y, width, height)`; the first ten are ground, the rest ledges.
const PLATFORMS: [(f64, f64, f64, f64); 16] = [
    (0.0, 550.0, 300.0, 50.0),
    (400.0, 500.0, 200.0, 50.0),
    (700.0, 450.0, 150.0, 50.0),
    (950.0, 400.0, 200.0, 50.0),
    (1250.0, 350.0, 150.0, 50.0),
    (1500.0, 300.0, 200.0, 50.0),
    (1800.0, 400.0, 300.0, 50.0),
    (2200.0, 500.0, 200.0, 50.0),
    (2500.0, 450.0, 150.0, 50.0),
    (2750.0, 350.0, 300.0, 50.0),
    (500.0, 350.0, 100.0, 20.0),
    (800.0, 300.0, 100.0, 20.0),
    (1100.0, 250.0, 100.0, 20.0),
    (1600.0, 200.0, 100.0, 20.0),
    (1900.0, 250.0, 100.0, 20.0),
    (2300.0, 300.0, 100.0, 20.0),
];
const GROUND_PLATFORMS: usize = 10;

const COINS: [(f64, f64); 15] = [
    (450.0, 460.0),
    (520.0, 310.0),
    (750.0, 410.0),
    (820.0, 260.0),
    (1000.0, 360.0),
    (1120.0, 210.0),
    (1300.0, 310.0),
    (1550.0, 260.0),
    (1620.0, 160.0),
    (1850.0, 360.0),
    (1920.0, 210.0),
    (2250.0, 460.0),
    (2320.0, 260.0),
    (2550.0, 410.0),
    (2800.0, 310.0),
];
const COIN_SIZE: f64 = 20.0;

/// `(x, y, vx, min_x, max_x)`
const ENEMIES: [(f64, f64, f64, f64, f64); 6] = [
    (450.0, 460.0, 1.0, 400.0, 600.0),
    (750.0, 410.0, -1.0, 700.0, 850.0),
    (1000.0, 360.0, 1.0, 950.0, 1150.0),
    (1550.0, 260.0, -1.0, 1500.0, 1700.0),
    (1850.0, 360.0, 1.0, 1800.0, 2100.0),
    (2250.0, 460.0, -1.0, 2200.0, 2400.0),
];
const ENEMY_SIZE: f64 = 25.0;

const SPIKES: [(f64, f64); 7] = [
    (350.0, 530.0),
    (650.0, 480.0),
    (900.0, 380.0),
    (1200.0, 330.0),
    (1750.0, 280.0),
    (2150.0, 480.0),
    (2450.0, 430.0),
];
const SPIKE_SIZE: (f64, f64) = (30.0, 20.0);

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: GameObject,
    pub on_ground: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Rect,
    pub ground: bool,
}

/// Walks back and forth between `min_x` and `max_x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: GameObject,
    pub min_x: f64,
    pub max_x: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct Held {
    left: bool,
    right: bool,
    jump: bool,
}

// ---------------------------------------------------------------------------
// Platformer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platformer {
    width: f64,
    height: f64,
    player: Player,
    platforms: Vec<Platform>,
    coins: Arena<Rect>,
    enemies: Arena<Enemy>,
    spikes: Vec<Rect>,
    scroll_x: f64,
    game_time: f64,
    coins_collected: u32,
    lives: u32,
    held: Held,
}

impl Platformer {
    pub fn new(ctx: &mut GameContext<'_>) -> Self {
        let platforms = PLATFORMS
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h))| Platform {
                bounds: Rect::new(x, y, w, h),
                ground: i < GROUND_PLATFORMS,
            })
            .collect();
        let coins = COINS
            .iter()
            .map(|&(x, y)| Rect::new(x, y, COIN_SIZE, COIN_SIZE))
            .collect();
        let enemies = ENEMIES
            .iter()
            .map(|&(x, y, vx, min_x, max_x)| Enemy {
                body: GameObject {
                    vx,
                    ..GameObject::new(x, y, ENEMY_SIZE, ENEMY_SIZE).with_color(ENEMY_COLOR)
                },
                min_x,
                max_x,
            })
            .collect();
        let spikes = SPIKES
            .iter()
            .map(|&(x, y)| Rect::new(x, y, SPIKE_SIZE.0, SPIKE_SIZE.1))
            .collect();

        Self {
            width: ctx.width(),
            height: ctx.height(),
            player: Player {
                body: GameObject::new(100.0, 400.0, 30.0, 40.0).with_color(PLAYER_COLOR),
                on_ground: false,
            },
            platforms,
            coins,
            enemies,
            spikes,
            scroll_x: 0.0,
            game_time: 0.0,
            coins_collected: 0,
            lives: STARTING_LIVES,
            held: Held::default(),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn coins_collected(&self) -> u32 {
        self.coins_collected
    }

    pub fn coins_remaining(&self) -> usize {
        self.coins.len()
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies.len()
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    // -- per-tick phases ------------------------------------------------------

    fn move_player(&mut self, delta_ms: f64) {
        let p = &mut self.player;
        if self.held.left {
            p.body.vx = (p.body.vx - 1.0).max(-RUN_SPEED);
        }
        if self.held.right {
            p.body.vx = (p.body.vx + 1.0).min(RUN_SPEED);
        }
        if self.held.jump && p.on_ground {
            p.body.vy = -JUMP_POWER;
            p.on_ground = false;
        }
        if !self.held.left && !self.held.right {
            p.body.vx *= FRICTION;
        }

        p.body.vy += GRAVITY;
        p.body.update(delta_ms);
        p.on_ground = false;
    }

    fn patrol(&mut self, delta_ms: f64) {
        for mut enemy in self.enemies.iter_mut() {
            let enemy = &mut *enemy;
            enemy.body.update(delta_ms);
            if enemy.body.bounds.x <= enemy.min_x || enemy.body.bounds.x >= enemy.max_x {
                enemy.body.vx = -enemy.body.vx;
            }
        }
    }

    fn land_on_platforms(&mut self, ctx: &GameContext<'_>) {
        let p = &mut self.player;
        for platform in &self.platforms {
            let b = platform.bounds;
            if !ctx.check_collision(&p.body.bounds, &b) {
                continue;
            }
            if p.body.vy > 0.0 && p.body.bounds.y < b.y {
                p.body.bounds.y = b.y - p.body.bounds.height;
                p.body.vy = 0.0;
                p.on_ground = true;
            } else if p.body.vy < 0.0 && p.body.bounds.y > b.y {
                p.body.bounds.y = b.bottom();
                p.body.vy = 0.0;
            } else if p.body.vx > 0.0 {
                p.body.bounds.x = b.x - p.body.bounds.width;
            } else if p.body.vx < 0.0 {
                p.body.bounds.x = b.right();
            }
        }
    }

    fn collect_coins(&mut self, ctx: &mut GameContext<'_>) {
        let player = self.player.body.bounds;
        for mut coin in self.coins.iter_mut() {
            if !ctx.check_collision(&player, &*coin) {
                continue;
            }
            let (cx, cy) = coin.center();
            coin.kill();
            self.coins_collected += 1;
            ctx.add_score(COIN_POINTS);
            burst(ctx, cx, cy, Color::GOLD, 4.0, 5, 2.0);
        }
        self.coins.compact();
    }

    /// Returns `false` once the game has ended.
    fn fight_enemies(&mut self, ctx: &mut GameContext<'_>) -> bool {
        let mut hurt = false;
        for mut enemy in self.enemies.iter_mut() {
            let p = &self.player;
            if !p.body.overlaps(&enemy.body) {
                continue;
            }
            if p.body.vy > 0.0 && p.body.bounds.y < enemy.body.bounds.y - STOMP_MARGIN {
                let (cx, cy) = enemy.body.bounds.center();
                enemy.kill();
                self.player.body.vy = STOMP_BOUNCE;
                ctx.add_score(STOMP_POINTS);
                burst(ctx, cx, cy, ENEMY_COLOR, 3.0, 8, 3.0);
                debug!(x = cx, "enemy stomped");
            } else {
                hurt = true;
                break;
            }
        }
        self.enemies.compact();

        if hurt {
            return self.lose_life(ctx);
        }
        true
    }

    /// Returns `false` once the game has ended.
    fn touch_spikes(&mut self, ctx: &mut GameContext<'_>) -> bool {
        let player = self.player.body.bounds;
        if self.spikes.iter().any(|spike| ctx.check_collision(&player, spike)) {
            return self.lose_life(ctx);
        }
        true
    }

    /// Take a life and respawn, or end the game on the last one. Returns
    /// whether the game continues.
    fn lose_life(&mut self, ctx: &mut GameContext<'_>) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            ctx.game_over();
            return false;
        }

        let p = &mut self.player;
        p.body.bounds.x = (p.body.bounds.x - RESPAWN_SETBACK).max(RESPAWN_MIN_X);
        p.body.bounds.y = RESPAWN_Y;
        p.body.vx = 0.0;
        p.body.vy = 0.0;
        debug!(x = p.body.bounds.x, lives = self.lives, "player respawned");

        let (cx, cy) = p.body.bounds.center();
        burst(ctx, cx, cy, RESPAWN_COLOR, 6.0, 10, 4.0);
        true
    }

    /// Points for finishing: 100 per coin plus a time bonus that shrinks by
    /// one point every 100 ms and bottoms out at zero.
    pub fn finish_bonus(&self) -> u64 {
        let time_bonus = (1000.0 - self.game_time / 100.0).floor().max(0.0) as u64;
        u64::from(self.coins_collected) * 100 + time_bonus
    }

    // -- drawing --------------------------------------------------------------

    fn draw_clouds(&self, surface: &mut dyn Surface) {
        for i in 0..10 {
            let i = f64::from(i);
            let x = i * 300.0 - self.scroll_x * 0.3;
            if x > -100.0 && x < self.width + self.scroll_x + 100.0 {
                let y = 50.0 + i * 20.0;
                surface.fill_rect(Rect::new(x, y, 60.0, 30.0), Color::WHITE);
                surface.fill_rect(Rect::new(x + 20.0, y - 10.0, 60.0, 30.0), Color::WHITE);
                surface.fill_rect(Rect::new(x + 40.0, y, 60.0, 30.0), Color::WHITE);
            }
        }
    }

    fn draw_hud(&self, surface: &mut dyn Surface) {
        surface.fill_text(
            &format!("Lives: {}", self.lives),
            10.0,
            30.0,
            &TextStyle::new(PLAYER_COLOR, 16.0),
        );
        surface.fill_text(
            &format!("Coins: {}", self.coins_collected),
            10.0,
            60.0,
            &TextStyle::new(Color::GOLD, 16.0),
        );

        let progress = (self.player.body.bounds.x / GOAL_X).clamp(0.0, 1.0);
        let bar_y = self.height - 30.0;
        surface.fill_rect(Rect::new(10.0, bar_y, 200.0, 10.0), Color::rgb(0x33, 0x33, 0x33));
        surface.fill_rect(Rect::new(10.0, bar_y, 200.0 * progress, 10.0), RESPAWN_COLOR);
        surface.fill_text("Progress", 10.0, bar_y - 5.0, &TextStyle::new(Color::WHITE, 16.0));
    }
}

fn burst(
    ctx: &mut GameContext<'_>,
    x: f64,
    y: f64,
    color: Color,
    size: f64,
    count: usize,
    spread: f64,
) {
    for _ in 0..count {
        let vx = ctx.random_range(-spread, spread);
        let vy = ctx.random_range(-spread, spread);
        ctx.emit_particle(x, y, ParticleSpec::new(color, size, (vx, vy)));
    }
}

impl Game for Platformer {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATE | Capabilities::RENDER | Capabilities::INPUT
    }

    fn update(&mut self, ctx: &mut GameContext<'_>, delta_ms: f64) {
        self.game_time += delta_ms;

        self.move_player(delta_ms);
        self.patrol(delta_ms);
        self.scroll_x = (self.player.body.bounds.x - self.width / 3.0).max(0.0);

        self.land_on_platforms(ctx);
        self.collect_coins(ctx);
        if !self.fight_enemies(ctx) || !self.touch_spikes(ctx) {
            return;
        }

        if self.player.body.bounds.x > GOAL_X {
            let bonus = self.finish_bonus();
            info!(bonus, coins = self.coins_collected, "level complete");
            ctx.add_score(bonus);
            ctx.game_over();
            return;
        }

        if self.player.body.bounds.y > FALL_LIMIT {
            self.lose_life(ctx);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(-self.scroll_x, 0.0);

        self.draw_clouds(surface);

        let platform_edge = Color::rgb(0x65, 0x43, 0x21);
        for platform in &self.platforms {
            let color = if platform.ground {
                GROUND_COLOR
            } else {
                LEDGE_COLOR
            };
            surface.fill_rect(platform.bounds, color);
            surface.stroke_rect(platform.bounds, platform_edge, 2.0);
        }

        for coin in self.coins.iter() {
            surface.fill_rect(*coin, Color::GOLD);
            surface.fill_rect(
                Rect::new(coin.x + 5.0, coin.y + 5.0, 10.0, 10.0),
                Color::rgb(0xFF, 0xFF, 0x00),
            );
            surface.stroke_rect(*coin, Color::rgb(0xFF, 0xA5, 0x00), 2.0);
        }

        for enemy in self.enemies.iter() {
            enemy.body.render(surface);
            let b = enemy.body.bounds;
            surface.fill_rect(Rect::new(b.x + 5.0, b.y + 5.0, 6.0, 6.0), Color::WHITE);
            surface.fill_rect(Rect::new(b.x + 14.0, b.y + 5.0, 6.0, 6.0), Color::WHITE);
            surface.fill_rect(Rect::new(b.x + 7.0, b.y + 7.0, 2.0, 2.0), Color::BLACK);
            surface.fill_rect(Rect::new(b.x + 16.0, b.y + 7.0, 2.0, 2.0), Color::BLACK);
        }

        for spike in &self.spikes {
            surface.fill_rect(*spike, Color::rgb(0x66, 0x66, 0x66));
            let mut offset = 0.0;
            while offset < spike.width {
                surface.fill_rect(
                    Rect::new(spike.x + offset, spike.y - 5.0, 3.0, 5.0),
                    Color::rgb(0x44, 0x44, 0x44),
                );
                offset += 6.0;
            }
        }

        self.player.body.render(surface);
        let p = self.player.body.bounds;
        surface.fill_rect(Rect::new(p.x + 8.0, p.y + 8.0, 4.0, 4.0), Color::WHITE);
        surface.fill_rect(Rect::new(p.x + 18.0, p.y + 8.0, 4.0, 4.0), Color::WHITE);
        surface.fill_rect(Rect::new(p.x + 9.0, p.y + 9.0, 2.0, 2.0), Color::BLACK);
        surface.fill_rect(Rect::new(p.x + 19.0, p.y + 9.0, 2.0, 2.0), Color::BLACK);
        surface.fill_rect(Rect::new(p.x + 12.0, p.y + 20.0, 6.0, 3.0), Color::RED);

        surface.restore();
        self.draw_hud(surface);
    }

    fn handle_input(&mut self, _ctx: &mut GameContext<'_>, key: &Key, pressed: bool) {
        match key {
            Key::ArrowLeft => self.held.left = pressed,
            Key::ArrowRight => self.held.right = pressed,
            Key::Space | Key::ArrowUp => self.held.jump = pressed,
            _ => {}
        }
    }

    fn snapshot(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_engine::engine::{EngineConfig, GameHarness, LoopState};
    use arcade_engine::surface::{DrawCommand, DrawList};

    fn setup() -> (GameHarness, Platformer) {
        let mut harness = GameHarness::new(EngineConfig::default());
        let game = Platformer::new(&mut harness.context());
        (harness, game)
    }

    fn place(game: &mut Platformer, x: f64, y: f64, vy: f64) {
        game.player.body.bounds.x = x;
        game.player.body.bounds.y = y;
        game.player.body.vx = 0.0;
        game.player.body.vy = vy;
    }

    #[test]
    fn level_layout() {
        let (_, game) = setup();
        assert_eq!(game.platforms.len(), 16);
        assert_eq!(game.coins_remaining(), 15);
        assert_eq!(game.enemies_remaining(), 6);
        assert_eq!(game.spikes.len(), 7);
        assert_eq!(game.lives(), 3);
    }

    #[test]
    fn falls_onto_the_first_ground_platform() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        for _ in 0..60 {
            game.update(&mut ctx, 16.0);
        }
        assert_eq!(game.player().body.bounds.y, 510.0);
        assert!(game.player().on_ground);
        assert_eq!(game.player().body.vy, 0.0);
    }

    #[test]
    fn jump_only_from_the_ground() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        game.handle_input(&mut ctx, &Key::Space, true);
        game.update(&mut ctx, 16.0);
        // Mid-air on the first frame: gravity only.
        assert!(game.player().body.vy > 0.0);

        for _ in 0..60 {
            game.update(&mut ctx, 16.0);
            if game.player().body.vy < 0.0 {
                break;
            }
        }
        assert!((game.player().body.vy - (-JUMP_POWER + GRAVITY)).abs() < 1e-9);
        assert!(game.player().body.bounds.y < 510.0);
    }

    #[test]
    fn friction_slows_without_input() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        game.handle_input(&mut ctx, &Key::ArrowRight, true);
        for _ in 0..10 {
            game.update(&mut ctx, 16.0);
        }
        assert_eq!(game.player().body.vx, RUN_SPEED);
        game.handle_input(&mut ctx, &Key::ArrowRight, false);
        game.update(&mut ctx, 16.0);
        assert!((game.player().body.vx - RUN_SPEED * FRICTION).abs() < 1e-9);
    }

    #[test]
    fn coin_scores_and_counts() {
        let (mut harness, mut game) = setup();
        game.enemies.clear();
        place(&mut game, 750.0, 405.0, 0.0);
        game.update(&mut harness.context(), 16.0);
        assert_eq!(game.coins_collected(), 1);
        assert_eq!(game.coins_remaining(), 14);
        assert_eq!(harness.score(), 50);
        assert_eq!(harness.particles().len(), 5);
    }

    #[test]
    fn stomp_defeats_enemy_and_bounces() {
        let (mut harness, mut game) = setup();
        game.coins.clear();
        place(&mut game, 450.0, 430.0, 2.0);
        game.update(&mut harness.context(), 16.0);
        assert_eq!(game.enemies_remaining(), 5);
        assert_eq!(game.player().body.vy, STOMP_BOUNCE);
        assert_eq!(game.lives(), 3);
        assert_eq!(harness.score(), 100);
    }

    #[test]
    fn side_contact_with_enemy_costs_a_life() {
        let (mut harness, mut game) = setup();
        game.coins.clear();
        place(&mut game, 450.0, 455.0, 0.0);
        game.update(&mut harness.context(), 16.0);
        assert_eq!(game.lives(), 2);
        assert_eq!(game.enemies_remaining(), 6);
        assert_eq!(game.player().body.bounds.x, 250.0);
        assert_eq!(game.player().body.bounds.y, RESPAWN_Y);
    }

    #[test]
    fn falling_off_the_map_respawns_behind() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        place(&mut game, 320.0, 600.0, 0.0);
        for _ in 0..30 {
            game.update(&mut ctx, 16.0);
            if game.lives() < 3 {
                break;
            }
        }
        assert_eq!(game.lives(), 2);
        assert_eq!(game.player().body.bounds.x, 120.0);
        assert_eq!(game.player().body.bounds.y, RESPAWN_Y);
    }

    #[test]
    fn respawn_never_goes_left_of_start() {
        let (mut harness, mut game) = setup();
        place(&mut game, 150.0, 0.0, 0.0);
        game.lose_life(&mut harness.context());
        assert_eq!(game.player().body.bounds.x, 100.0);
    }

    #[test]
    fn spikes_on_last_life_end_the_game() {
        let (mut harness, mut game) = setup();
        game.lives = 1;
        place(&mut game, 355.0, 515.0, 0.0);
        game.update(&mut harness.context(), 16.0);
        assert_eq!(game.lives(), 0);
        assert_eq!(harness.state(), LoopState::GameOver);
    }

    #[test]
    fn reaching_the_goal_awards_bonus_and_ends() {
        let (mut harness, mut game) = setup();
        game.coins_collected = 2;
        place(&mut game, 3001.0, 100.0, 0.0);
        game.update(&mut harness.context(), 16.0);
        assert_eq!(harness.score(), 200 + 999);
        assert_eq!(harness.state(), LoopState::GameOver);
        assert_eq!(harness.board().game_over_count(), 1);
    }

    #[test]
    fn slow_finish_gets_no_time_bonus() {
        let (_, mut game) = setup();
        game.game_time = 200_000.0;
        game.coins_collected = 3;
        assert_eq!(game.finish_bonus(), 300);
    }

    #[test]
    fn enemies_patrol_with_their_velocity() {
        let (_, mut game) = setup();
        let before: Vec<GameObject> = game.enemies.iter().map(|e| e.body.clone()).collect();
        game.patrol(16.0);
        for (enemy, old) in game.enemies.iter().zip(&before) {
            assert_eq!(enemy.body.bounds.x, old.bounds.x + old.vx);
            assert_eq!(enemy.body.bounds.y, old.bounds.y);
        }

        if let Some(enemy) = game.enemies.get_mut(0) {
            enemy.body.bounds.x = enemy.max_x - 0.5;
            enemy.body.vx = 1.0;
        }
        game.patrol(16.0);
        assert_eq!(game.enemies.iter().next().unwrap().body.vx, -1.0);
    }

    #[test]
    fn player_and_enemies_draw_from_their_bodies() {
        let (_, game) = setup();
        let mut list = DrawList::new();
        game.render(&mut list);
        let fills: Vec<(Rect, Color)> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color, .. } => Some((*rect, *color)),
                _ => None,
            })
            .collect();
        assert!(fills.contains(&(game.player().body.bounds, PLAYER_COLOR)));
        let enemy = game.enemies.iter().next().unwrap();
        assert!(fills.contains(&(enemy.body.bounds, ENEMY_COLOR)));
    }

    #[test]
    fn camera_follows_a_third_in() {
        let (mut harness, mut game) = setup();
        place(&mut game, 1500.0, 100.0, 0.0);
        game.update(&mut harness.context(), 16.0);
        let expected = 1500.0 - 800.0 / 3.0;
        assert!((game.scroll_x() - expected).abs() < 1e-9);

        place(&mut game, 100.0, 100.0, 0.0);
        game.update(&mut harness.context(), 16.0);
        assert_eq!(game.scroll_x(), 0.0);
    }
}
