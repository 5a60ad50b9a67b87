//! Coin Rush: catch falling coins, dodge hazards, grab power-ups.
//!
//! Difficulty rises every ten seconds of play and shortens the coin and
//! hazard spawn intervals (counted in ticks) and speeds up what falls.
//! Three power-ups run on millisecond countdowns:
//!
//! - shield: hazards pass through the player
//! - magnet: coins within 100 px drift toward the player
//! - slow: hazards fall at 30% speed
//!
//! Picking up a power-up that is already active restarts its countdown.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use arcade_engine::arena::Arena;
use arcade_engine::collision::{GameObject, Rect};
use arcade_engine::game::{clamp, Capabilities, Game, GameContext};
use arcade_engine::input::Key;
use arcade_engine::particles::ParticleSpec;
use arcade_engine::surface::{Color, LinearGradient, Surface, TextAlign, TextStyle};

pub const PLAYER_SIZE: f64 = 40.0;
pub const PLAYER_SPEED: f64 = 8.0;
pub const STARTING_LIVES: u32 = 3;

/// Milliseconds of play per difficulty step.
pub const DIFFICULTY_STEP_MS: f64 = 10_000.0;

/// Ticks between coin spawns at difficulty 1. Hazards take twice as long.
const BASE_SPAWN_TICKS: f64 = 60.0;
const POWER_UP_SPAWN_TICKS: f64 = BASE_SPAWN_TICKS * 8.0;

const COIN_POINTS: u64 = 50;
const BONUS_COIN_POINTS: u64 = 100;
const BONUS_COIN_CHANCE: f64 = 0.1;

const MAGNET_RANGE: f64 = 100.0;
const MAGNET_PULL: f64 = 0.3 * 0.01;
const SLOW_FACTOR: f64 = 0.3;
const POWER_UP_FALL_SPEED: f64 = 2.0;

/// Pixels a click moves the player toward the pointer.
const CLICK_STEP: f64 = 15.0;

const PLAYER_COLOR: Color = Color::rgb(0x4E, 0xCD, 0xC4);
const COIN_COLOR: Color = Color::GOLD;
const BONUS_COIN_COLOR: Color = Color::rgb(0xFF, 0x6B, 0x6B);
const HAZARD_HIT_COLOR: Color = Color::RED;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Shield,
    Magnet,
    Slow,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Shield, PowerUpKind::Magnet, PowerUpKind::Slow];

    pub fn duration_ms(self) -> f64 {
        match self {
            PowerUpKind::Shield => 5000.0,
            PowerUpKind::Magnet => 3000.0,
            PowerUpKind::Slow => 4000.0,
        }
    }

    fn color(self) -> Color {
        match self {
            PowerUpKind::Shield => Color::rgb(0x00, 0xFF, 0x00),
            PowerUpKind::Magnet => Color::rgb(0xFF, 0x69, 0xB4),
            PowerUpKind::Slow => Color::SKY,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "\u{1F6E1}",
            PowerUpKind::Magnet => "\u{1F9F2}",
            PowerUpKind::Slow => "\u{23F0}",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::Magnet => "MAGNET",
            PowerUpKind::Slow => "SLOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Normal,
    Fast,
    Big,
}

impl HazardKind {
    fn size(self) -> f64 {
        match self {
            HazardKind::Normal => 30.0,
            HazardKind::Fast => 25.0,
            HazardKind::Big => 45.0,
        }
    }

    fn color(self) -> Color {
        match self {
            HazardKind::Normal => Color::rgb(0x8B, 0x00, 0x00),
            HazardKind::Fast => Color::rgb(0x4B, 0x00, 0x82),
            HazardKind::Big => Color::rgb(0x2F, 0x4F, 0x4F),
        }
    }
}

/// Builds a falling object: sized, colored, moving down at `vy` px/tick.
fn falling(x: f64, y: f64, size: f64, vy: f64, color: Color) -> GameObject {
    GameObject {
        vy,
        ..GameObject::new(x, y, size, size).with_color(color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub body: GameObject,
    pub bonus: bool,
}

impl Coin {
    /// Bonus coins are larger, red, and worth double.
    pub fn new(x: f64, y: f64, vy: f64, bonus: bool) -> Self {
        let (size, color) = if bonus {
            (25.0, BONUS_COIN_COLOR)
        } else {
            (20.0, COIN_COLOR)
        };
        Self {
            body: falling(x, y, size, vy, color),
            bonus,
        }
    }

    fn points(&self) -> u64 {
        if self.bonus {
            BONUS_COIN_POINTS
        } else {
            COIN_POINTS
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub body: GameObject,
    pub kind: HazardKind,
}

impl Hazard {
    pub fn new(kind: HazardKind, x: f64, y: f64, vy: f64) -> Self {
        Self {
            body: falling(x, y, kind.size(), vy, kind.color()),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: GameObject,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, x: f64, y: f64) -> Self {
        Self {
            body: falling(x, y, 25.0, POWER_UP_FALL_SPEED, kind.color()),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct Held {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    width: f64,
    height: f64,
    player: Rect,
    lives: u32,
    game_time: f64,
    difficulty: u32,
    coins: Arena<Coin>,
    hazards: Arena<Hazard>,
    power_ups: Arena<PowerUp>,
    coin_timer: u32,
    hazard_timer: u32,
    power_up_timer: u32,
    /// Remaining milliseconds per active power-up.
    effects: BTreeMap<PowerUpKind, f64>,
    held: Held,
}

impl Collector {
    pub fn new(ctx: &mut GameContext<'_>) -> Self {
        let (width, height) = (ctx.width(), ctx.height());
        Self {
            width,
            height,
            player: Rect::new(width / 2.0, height - 80.0, PLAYER_SIZE, PLAYER_SIZE),
            lives: STARTING_LIVES,
            game_time: 0.0,
            difficulty: 1,
            coins: Arena::new(),
            hazards: Arena::new(),
            power_ups: Arena::new(),
            coin_timer: 0,
            hazard_timer: 0,
            power_up_timer: 0,
            effects: BTreeMap::new(),
            held: Held::default(),
        }
    }

    pub fn player(&self) -> Rect {
        self.player
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    pub fn coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter()
    }

    pub fn hazards(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter()
    }

    pub fn power_ups(&self) -> impl Iterator<Item = &PowerUp> {
        self.power_ups.iter()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.effects.contains_key(&kind)
    }

    /// Milliseconds left on `kind`, zero when inactive.
    pub fn remaining(&self, kind: PowerUpKind) -> f64 {
        self.effects.get(&kind).copied().unwrap_or(0.0)
    }

    /// Start `kind`'s countdown from its full duration.
    pub fn activate(&mut self, kind: PowerUpKind) {
        self.effects.insert(kind, kind.duration_ms());
    }

    /// Spawn-interval multiplier for the current difficulty.
    fn spawn_factor(&self) -> f64 {
        (1.0 - f64::from(self.difficulty - 1) * 0.1).max(0.3)
    }

    // -- per-tick phases ------------------------------------------------------

    fn move_player(&mut self) {
        let mut vx = 0.0;
        let mut vy = 0.0;
        if self.held.left {
            vx -= PLAYER_SPEED;
        }
        if self.held.right {
            vx += PLAYER_SPEED;
        }
        if self.held.up {
            vy -= PLAYER_SPEED;
        }
        if self.held.down {
            vy += PLAYER_SPEED;
        }
        if vx != 0.0 && vy != 0.0 {
            vx *= std::f64::consts::FRAC_1_SQRT_2;
            vy *= std::f64::consts::FRAC_1_SQRT_2;
        }
        self.place_player(self.player.x + vx, self.player.y + vy);
    }

    fn place_player(&mut self, x: f64, y: f64) {
        self.player.x = clamp(x, 0.0, self.width - self.player.width);
        self.player.y = clamp(y, 0.0, self.height - self.player.height);
    }

    fn count_down_effects(&mut self, delta_ms: f64) {
        self.effects.retain(|kind, remaining| {
            *remaining -= delta_ms;
            if *remaining <= 0.0 {
                debug!(power_up = ?kind, "power-up expired");
            }
            *remaining > 0.0
        });
    }

    fn spawn(&mut self, ctx: &mut GameContext<'_>) {
        let factor = self.spawn_factor();

        self.coin_timer += 1;
        if f64::from(self.coin_timer) > BASE_SPAWN_TICKS * factor {
            self.spawn_coin(ctx);
            self.coin_timer = 0;
        }

        self.hazard_timer += 1;
        if f64::from(self.hazard_timer) > BASE_SPAWN_TICKS * 2.0 * factor {
            self.spawn_hazard(ctx);
            self.hazard_timer = 0;
        }

        self.power_up_timer += 1;
        if f64::from(self.power_up_timer) > POWER_UP_SPAWN_TICKS {
            self.spawn_power_up(ctx);
            self.power_up_timer = 0;
        }
    }

    fn spawn_coin(&mut self, ctx: &mut GameContext<'_>) {
        let x = ctx.random() * (self.width - 20.0);
        let vy = 2.0 + f64::from(self.difficulty) * 0.5;
        let bonus = ctx.chance(BONUS_COIN_CHANCE);
        self.coins.push(Coin::new(x, -20.0, vy, bonus));
    }

    fn spawn_hazard(&mut self, ctx: &mut GameContext<'_>) {
        let x = ctx.random() * (self.width - 30.0);
        let vy = 3.0 + f64::from(self.difficulty) * 0.7;
        let roll = ctx.random();
        let (kind, vy) = if roll < 0.2 {
            (HazardKind::Fast, vy * 1.5)
        } else if roll < 0.3 {
            (HazardKind::Big, vy * 0.7)
        } else {
            (HazardKind::Normal, vy)
        };
        self.hazards.push(Hazard::new(kind, x, -30.0, vy));
    }

    fn spawn_power_up(&mut self, ctx: &mut GameContext<'_>) {
        let kind = PowerUpKind::ALL[ctx.random_index(PowerUpKind::ALL.len())];
        let x = ctx.random() * (self.width - 25.0);
        self.power_ups.push(PowerUp::new(kind, x, -25.0));
    }

    fn fall(&mut self, delta_ms: f64) {
        let magnet = self.is_active(PowerUpKind::Magnet);
        let (px, py) = self.player.center();
        for mut coin in self.coins.iter_mut() {
            let coin = &mut *coin;
            coin.body.update(delta_ms);
            if magnet {
                let (cx, cy) = coin.body.bounds.center();
                let (dx, dy) = (px - cx, py - cy);
                let distance = dx.hypot(dy);
                if distance > 0.0 && distance < MAGNET_RANGE {
                    coin.body.bounds.x += dx / distance * MAGNET_PULL * distance;
                    coin.body.bounds.y += dy / distance * MAGNET_PULL * distance;
                }
            }
        }

        let slow = self.is_active(PowerUpKind::Slow);
        for mut hazard in self.hazards.iter_mut() {
            let body = &mut hazard.body;
            if slow {
                body.bounds.y += body.vy * SLOW_FACTOR;
            } else {
                body.update(delta_ms);
            }
        }

        for mut power_up in self.power_ups.iter_mut() {
            power_up.body.update(delta_ms);
        }
    }

    fn collide(&mut self, ctx: &mut GameContext<'_>) {
        let player = self.player;

        for mut slot in self.coins.iter_mut() {
            if !ctx.check_collision(&player, &slot.body.bounds) {
                continue;
            }
            let (cx, cy) = slot.body.bounds.center();
            ctx.add_score(slot.points());
            burst(ctx, cx, cy, slot.body.color, 4.0, 8, 3.0);
            slot.kill();
        }

        if !self.is_active(PowerUpKind::Shield) {
            for mut slot in self.hazards.iter_mut() {
                if !ctx.check_collision(&player, &slot.body.bounds) {
                    continue;
                }
                let hazard = &mut *slot;
                hazard.body.bounds.y = self.height + 100.0;
                self.lives = self.lives.saturating_sub(1);
                let (cx, cy) = player.center();
                burst(ctx, cx, cy, HAZARD_HIT_COLOR, 5.0, 12, 4.0);
                debug!(lives = self.lives, "hazard hit");
                if self.lives == 0 {
                    ctx.game_over();
                    return;
                }
            }
        }

        for mut slot in self.power_ups.iter_mut() {
            if !ctx.check_collision(&player, &slot.body.bounds) {
                continue;
            }
            let kind = slot.kind;
            let (cx, cy) = slot.body.bounds.center();
            self.effects.insert(kind, kind.duration_ms());
            burst(ctx, cx, cy, kind.color(), 6.0, 10, 4.0);
            slot.kill();
        }
    }

    fn clean_up(&mut self) {
        let limit = self.height + 50.0;
        self.coins.kill_where(|coin| coin.body.bounds.y >= limit);
        self.coins.compact();
        self.hazards.kill_where(|hazard| hazard.body.bounds.y >= limit);
        self.hazards.compact();
        self.power_ups.kill_where(|power_up| power_up.body.bounds.y >= limit);
        self.power_ups.compact();
    }

    // -- drawing --------------------------------------------------------------

    fn draw_hazard(surface: &mut dyn Surface, hazard: &Hazard) {
        hazard.body.render(surface);
        let b = hazard.body.bounds;
        match hazard.kind {
            HazardKind::Fast => {
                surface.fill_rect(Rect::new(b.x + 10.0, b.y + 5.0, 5.0, 15.0), Color::BLACK);
                surface.fill_rect(Rect::new(b.x + 5.0, b.y + 10.0, 15.0, 5.0), Color::BLACK);
            }
            HazardKind::Big => {
                for i in 0..3 {
                    for j in 0..3 {
                        let (ox, oy) = (f64::from(i) * 15.0 + 5.0, f64::from(j) * 15.0 + 5.0);
                        surface.fill_rect(Rect::new(b.x + ox, b.y + oy, 5.0, 5.0), Color::BLACK);
                    }
                }
            }
            HazardKind::Normal => {
                let mut offset = 0.0;
                while offset < b.width {
                    surface.fill_rect(Rect::new(b.x + offset, b.y, 3.0, b.height), Color::BLACK);
                    offset += 6.0;
                }
            }
        }
    }

    fn draw_player(&self, surface: &mut dyn Surface) {
        let p = self.player;
        if self.is_active(PowerUpKind::Shield) {
            surface.fill_rect(
                Rect::new(p.x - 5.0, p.y - 5.0, p.width + 10.0, p.height + 10.0),
                PowerUpKind::Shield.color(),
            );
        }
        surface.fill_rect(p, PLAYER_COLOR);
        surface.fill_rect(Rect::new(p.x + 10.0, p.y + 8.0, 6.0, 6.0), Color::WHITE);
        surface.fill_rect(Rect::new(p.x + 24.0, p.y + 8.0, 6.0, 6.0), Color::WHITE);
        surface.fill_rect(Rect::new(p.x + 12.0, p.y + 10.0, 2.0, 2.0), Color::BLACK);
        surface.fill_rect(Rect::new(p.x + 26.0, p.y + 10.0, 2.0, 2.0), Color::BLACK);
        surface.fill_rect(Rect::new(p.x + 15.0, p.y + 25.0, 10.0, 4.0), Color::RED);
    }

    fn draw_hud(&self, surface: &mut dyn Surface) {
        let style = |color| TextStyle::new(color, 16.0);
        surface.fill_text(
            &format!("Lives: {}", self.lives),
            10.0,
            30.0,
            &style(BONUS_COIN_COLOR),
        );
        surface.fill_text(
            &format!("Level: {}", self.difficulty),
            10.0,
            60.0,
            &style(PLAYER_COLOR),
        );

        let mut y = 90.0;
        for (kind, remaining) in &self.effects {
            let seconds = (remaining / 1000.0).ceil();
            surface.fill_text(
                &format!("{}: {seconds}s", kind.label()),
                10.0,
                y,
                &style(PowerUpKind::Shield.color()),
            );
            y += 25.0;
        }

        let total_seconds = (self.game_time / 1000.0).floor() as u64;
        surface.fill_text(
            &format!("{}:{:02}", total_seconds / 60, total_seconds % 60),
            self.width - 10.0,
            30.0,
            &style(Color::rgb(0x33, 0x33, 0x33)).aligned(TextAlign::Right),
        );
    }
}

/// `count` particles from `(x, y)` with velocities uniform in
/// `[-spread, spread)` on each axis.
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

impl Game for Collector {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn update(&mut self, ctx: &mut GameContext<'_>, delta_ms: f64) {
        self.game_time += delta_ms;
        let difficulty = 1 + (self.game_time / DIFFICULTY_STEP_MS).floor() as u32;
        if difficulty != self.difficulty {
            debug!(difficulty, game_time = self.game_time, "difficulty increased");
            self.difficulty = difficulty;
        }

        self.move_player();
        self.count_down_effects(delta_ms);
        self.spawn(ctx);
        self.fall(delta_ms);
        self.collide(ctx);
        self.clean_up();
    }

    fn render(&self, surface: &mut dyn Surface) {
        let background = LinearGradient::vertical(0.0, self.height)
            .with_stop(0.0, Color::SKY)
            .with_stop(1.0, Color::rgb(0x98, 0xFB, 0x98));
        surface.fill_gradient_rect(Rect::new(0.0, 0.0, self.width, self.height), &background);

        let border = Color::rgb(0xFF, 0xA5, 0x00);
        for coin in self.coins.iter() {
            coin.body.render(surface);
            let b = coin.body.bounds;
            if coin.bonus {
                surface.fill_rect(
                    Rect::new(b.x + 5.0, b.y + 5.0, b.width - 10.0, b.height - 10.0),
                    Color::rgb(0xFF, 0xFF, 0x00),
                );
            }
            surface.stroke_rect(b, border, 2.0);
        }

        for hazard in self.hazards.iter() {
            Self::draw_hazard(surface, hazard);
        }

        let symbol_style = TextStyle::new(Color::WHITE, 16.0).aligned(TextAlign::Center);
        for power_up in self.power_ups.iter() {
            power_up.body.render(surface);
            let b = power_up.body.bounds;
            let (cx, cy) = b.center();
            surface.fill_text(power_up.kind.symbol(), cx, cy + 5.0, &symbol_style);
            surface.stroke_rect(b, Color::WHITE, 2.0);
        }

        self.draw_player(surface);
        self.draw_hud(surface);
    }

    fn handle_input(&mut self, _ctx: &mut GameContext<'_>, key: &Key, pressed: bool) {
        match key {
            Key::ArrowLeft => self.held.left = pressed,
            Key::ArrowRight => self.held.right = pressed,
            Key::ArrowUp => self.held.up = pressed,
            Key::ArrowDown => self.held.down = pressed,
            _ => {}
        }
    }

    fn handle_click(&mut self, _ctx: &mut GameContext<'_>, x: f64, y: f64) {
        let (px, py) = self.player.center();
        let (dx, dy) = (x - px, y - py);
        let distance = dx.hypot(dy);
        if distance > 10.0 {
            self.place_player(
                self.player.x + dx / distance * CLICK_STEP,
                self.player.y + dy / distance * CLICK_STEP,
            );
        }
    }

    fn snapshot(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
