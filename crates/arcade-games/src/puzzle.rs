//! Block Puzzle: falling-block line clearing on a 10x20 grid.
//!
//! Pieces fall one row per drop interval, which shortens by 100 ms per level
//! (floor 100 ms). A level is ten cleared lines. Clearing 1-4 lines at once
//! scores 100/300/500/800 times the level; hard drops add 2 per row fallen.
//!
//! Held left/right repeat every 150 ms; held down soft-drops every 50 ms.
//! Rotation is clockwise and tries horizontal kicks of -1, +1, -2, +2 when
//! the rotated piece does not fit in place.
//!
//! Locking a piece clears lines and spawns the next piece exactly once. If
//! the spawned piece does not fit, the game ends and the piece is left
//! unplaced.

use serde::{Deserialize, Serialize};
use tracing::debug;

use arcade_engine::collision::Rect;
use arcade_engine::game::{Capabilities, Game, GameContext};
use arcade_engine::input::Key;
use arcade_engine::particles::ParticleSpec;
use arcade_engine::surface::{Color, Surface, TextAlign, TextStyle};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;
pub const BLOCK_SIZE: f64 = 25.0;
const BOARD_TOP: f64 = 50.0;

/// Column new pieces spawn in.
pub const SPAWN_X: i32 = (GRID_WIDTH / 2) as i32 - 1;

pub const BASE_DROP_INTERVAL_MS: f64 = 1000.0;
const MIN_DROP_INTERVAL_MS: f64 = 100.0;
const LINES_PER_LEVEL: u32 = 10;

const MOVE_REPEAT_MS: f64 = 150.0;
const SOFT_DROP_REPEAT_MS: f64 = 50.0;
const WALL_KICKS: [i32; 4] = [-1, 1, -2, 2];

/// Points per lines cleared at once, before the level multiplier.
const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];
const HARD_DROP_POINTS_PER_ROW: u64 = 2;
const PARTICLES_PER_CELL: usize = 5;

/// Block colors; cell value `n` uses `BLOCK_COLORS[n - 1]`.
pub const BLOCK_COLORS: [Color; 7] = [
    Color::rgb(0xFF, 0x6B, 0x6B),
    Color::rgb(0x4E, 0xCD, 0xC4),
    Color::rgb(0x45, 0xB7, 0xB8),
    Color::rgb(0x96, 0xCE, 0xB4),
    Color::rgb(0xFF, 0xEA, 0xA7),
    Color::rgb(0xDD, 0xA0, 0xDD),
    Color::rgb(0x98, 0xD8, 0xC8),
];

/// I, O, T, S, Z, J, L.
const SHAPES: [&[&[u8]]; 7] = [
    &[&[1, 1, 1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 1, 0], &[0, 1, 1]],
    &[&[1, 0, 0], &[1, 1, 1]],
    &[&[0, 0, 1], &[1, 1, 1]],
];

const TEXT_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A falling piece: a rectangular mask, a color index, and its top-left
/// grid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub cells: Vec<Vec<bool>>,
    /// 1-based index into [`BLOCK_COLORS`].
    pub color: u8,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    fn from_shape(shape: &[&[u8]], color: u8) -> Self {
        Self {
            cells: shape
                .iter()
                .map(|row| row.iter().map(|&c| c != 0).collect())
                .collect(),
            color,
            x: SPAWN_X,
            y: 0,
        }
    }

    /// Filled cells as `(column offset, row offset)`.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, &filled)| filled)
                .map(move |(col, _)| (col as i32, row as i32))
        })
    }

    /// This piece turned 90 degrees clockwise, anchored at the same corner.
    pub fn rotated(&self) -> Self {
        let rows = self.cells.len();
        let cols = self.cells.first().map_or(0, Vec::len);
        let cells = (0..cols)
            .map(|c| (0..rows).map(|r| self.cells[rows - 1 - r][c]).collect())
            .collect();
        Self {
            cells,
            ..self.clone()
        }
    }

    fn color(&self) -> Color {
        block_color(self.color)
    }
}

fn block_color(index: u8) -> Color {
    BLOCK_COLORS[usize::from(index.max(1) - 1) % BLOCK_COLORS.len()]
}

// ---------------------------------------------------------------------------
// Puzzle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct Repeat {
    held: bool,
    timer: f64,
}

impl Repeat {
    /// Advance by `delta_ms`; true when the hold has outlasted `delay_ms`.
    fn fire(&mut self, delta_ms: f64, delay_ms: f64) -> bool {
        if !self.held {
            self.timer = 0.0;
            return false;
        }
        self.timer += delta_ms;
        if self.timer > delay_ms {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    board_left: f64,
    /// Row-major, top row first; 0 is empty.
    grid: Vec<[u8; GRID_WIDTH]>,
    current: Option<Piece>,
    next: Piece,
    level: u32,
    lines: u32,
    drop_timer: f64,
    drop_interval: f64,
    pieces_locked: u32,
    left: Repeat,
    right: Repeat,
    down: Repeat,
}

impl Puzzle {
    pub fn new(ctx: &mut GameContext<'_>) -> Self {
        let next = Self::random_piece(ctx);
        let mut puzzle = Self {
            board_left: (ctx.width() - GRID_WIDTH as f64 * BLOCK_SIZE) / 2.0,
            grid: vec![[0; GRID_WIDTH]; GRID_HEIGHT],
            current: None,
            next,
            level: 1,
            lines: 0,
            drop_timer: 0.0,
            drop_interval: BASE_DROP_INTERVAL_MS,
            pieces_locked: 0,
            left: Repeat::default(),
            right: Repeat::default(),
            down: Repeat::default(),
        };
        puzzle.spawn(ctx);
        puzzle
    }

    fn random_piece(ctx: &mut GameContext<'_>) -> Piece {
        let shape = SHAPES[ctx.random_index(SHAPES.len())];
        let color = ctx.random_index(BLOCK_COLORS.len()) as u8 + 1;
        Piece::from_shape(shape, color)
    }

    // -- accessors ------------------------------------------------------------

    pub fn grid(&self) -> &[[u8; GRID_WIDTH]] {
        &self.grid
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval(&self) -> f64 {
        self.drop_interval
    }

    /// Pieces written into the grid so far.
    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Number of non-empty cells in the grid.
    pub fn filled_cells(&self) -> usize {
        self.grid.iter().flatten().filter(|&&c| c != 0).count()
    }

    // -- rules ----------------------------------------------------------------

    /// Whether `piece` fits with its origin at `(x, y)`. Cells above the top
    /// row are allowed.
    pub fn can_place(&self, piece: &Piece, x: i32, y: i32) -> bool {
        piece.filled().all(|(dx, dy)| {
            let (col, row) = (x + dx, y + dy);
            if col < 0 || col >= GRID_WIDTH as i32 || row >= GRID_HEIGHT as i32 {
                return false;
            }
            row < 0 || self.grid[row as usize][col as usize] == 0
        })
    }

    /// Shift the current piece. A blocked downward move locks the piece.
    /// Returns whether the piece moved.
    pub fn move_piece(&mut self, ctx: &mut GameContext<'_>, dx: i32, dy: i32) -> bool {
        if !ctx.is_running() {
            return false;
        }
        let Some(piece) = self.current.as_ref() else {
            return false;
        };
        let (x, y) = (piece.x + dx, piece.y + dy);
        if self.can_place(piece, x, y) {
            if let Some(piece) = self.current.as_mut() {
                piece.x = x;
                piece.y = y;
            }
            return true;
        }
        if dy > 0 {
            self.lock(ctx);
        }
        false
    }

    /// Rotate clockwise, kicking sideways if needed. Does nothing if no
    /// position fits.
    pub fn rotate(&mut self, ctx: &GameContext<'_>) {
        if !ctx.is_running() {
            return;
        }
        let Some(piece) = self.current.as_ref() else {
            return;
        };
        let mut rotated = piece.rotated();
        let fit = std::iter::once(0)
            .chain(WALL_KICKS)
            .find(|kick| self.can_place(&rotated, rotated.x + kick, rotated.y));
        if let Some(kick) = fit {
            rotated.x += kick;
            self.current = Some(rotated);
        }
    }

    /// Drop the current piece to the floor and lock it.
    pub fn hard_drop(&mut self, ctx: &mut GameContext<'_>) {
        if !ctx.is_running() {
            return;
        }
        let Some(piece) = self.current.as_ref() else {
            return;
        };
        let mut distance = 0;
        while self.can_place(piece, piece.x, piece.y + distance + 1) {
            distance += 1;
        }
        if let Some(piece) = self.current.as_mut() {
            piece.y += distance;
        }
        ctx.add_score(distance as u64 * HARD_DROP_POINTS_PER_ROW);
        self.lock(ctx);
    }

    /// Write the current piece into the grid, clear lines, spawn the next.
    fn lock(&mut self, ctx: &mut GameContext<'_>) {
        let Some(piece) = self.current.take() else {
            return;
        };
        for (dx, dy) in piece.filled() {
            let (col, row) = (piece.x + dx, piece.y + dy);
            if row >= 0 {
                self.grid[row as usize][col as usize] = piece.color;
            }
        }
        self.pieces_locked += 1;
        self.clear_lines(ctx);
        self.spawn(ctx);
        self.drop_timer = 0.0;
    }

    /// Promote the preview piece. Ends the game if it does not fit; the
    /// piece is kept as current but never written into the grid.
    fn spawn(&mut self, ctx: &mut GameContext<'_>) {
        let upcoming = Self::random_piece(ctx);
        let piece = std::mem::replace(&mut self.next, upcoming);
        let fits = self.can_place(&piece, piece.x, piece.y);
        self.current = Some(piece);
        if !fits {
            debug!(lines = self.lines, level = self.level, "spawn blocked");
            ctx.game_over();
        }
    }

    /// Remove full rows, shifting everything above down. Returns how many
    /// rows were removed.
    pub fn clear_lines(&mut self, ctx: &mut GameContext<'_>) -> u32 {
        let mut cleared = 0u32;
        let mut row = GRID_HEIGHT;
        while row > 0 {
            let index = row - 1;
            if self.grid[index].iter().all(|&c| c != 0) {
                self.burst_row(ctx, index);
                self.grid.remove(index);
                self.grid.insert(0, [0; GRID_WIDTH]);
                cleared += 1;
                // Same index again: it now holds the row from above.
            } else {
                row -= 1;
            }
        }

        if cleared > 0 {
            let points = LINE_SCORES[cleared.min(4) as usize] * u64::from(self.level);
            ctx.add_score(points);
            self.lines += cleared;

            let level = self.lines / LINES_PER_LEVEL + 1;
            if level > self.level {
                self.level = level;
                self.drop_interval = (BASE_DROP_INTERVAL_MS
                    - f64::from(level - 1) * 100.0)
                    .max(MIN_DROP_INTERVAL_MS);
                debug!(level, drop_interval_ms = self.drop_interval, "level up");
            }
        }
        cleared
    }

    fn burst_row(&self, ctx: &mut GameContext<'_>, row: usize) {
        for (col, &cell) in self.grid[row].iter().enumerate() {
            let x = self.board_left + col as f64 * BLOCK_SIZE + BLOCK_SIZE / 2.0;
            let y = BOARD_TOP + row as f64 * BLOCK_SIZE + BLOCK_SIZE / 2.0;
            for _ in 0..PARTICLES_PER_CELL {
                let vx = ctx.random_range(-5.0, 5.0);
                let vy = ctx.random_range(-5.0, 5.0);
                ctx.emit_particle(x, y, ParticleSpec::new(block_color(cell), 6.0, (vx, vy)));
            }
        }
    }

    fn ghost_row(&self, piece: &Piece) -> i32 {
        let mut y = piece.y;
        while self.can_place(piece, piece.x, y + 1) {
            y += 1;
        }
        y
    }

    // -- drawing --------------------------------------------------------------

    fn board_width(&self) -> f64 {
        GRID_WIDTH as f64 * BLOCK_SIZE
    }

    fn board_height(&self) -> f64 {
        GRID_HEIGHT as f64 * BLOCK_SIZE
    }

    fn cell_origin(&self, col: i32, row: i32) -> (f64, f64) {
        (
            self.board_left + f64::from(col) * BLOCK_SIZE,
            BOARD_TOP + f64::from(row) * BLOCK_SIZE,
        )
    }

    fn draw_block(surface: &mut dyn Surface, x: f64, y: f64, color: Color) {
        let inner = BLOCK_SIZE - 2.0;
        surface.fill_rect(Rect::new(x + 1.0, y + 1.0, inner, inner), color);

        let light = color.lighten(0.3);
        surface.fill_rect(Rect::new(x + 1.0, y + 1.0, inner, 4.0), light);
        surface.fill_rect(Rect::new(x + 1.0, y + 1.0, 4.0, inner), light);

        let dark = color.darken(0.3);
        surface.fill_rect(Rect::new(x + 1.0, y + BLOCK_SIZE - 5.0, inner, 4.0), dark);
        surface.fill_rect(Rect::new(x + BLOCK_SIZE - 5.0, y + 1.0, 4.0, inner), dark);
    }

    fn draw_piece_at(&self, surface: &mut dyn Surface, piece: &Piece, row: i32, alpha: f64) {
        surface.set_alpha(alpha);
        for (dx, dy) in piece.filled() {
            let (x, y) = self.cell_origin(piece.x + dx, row + dy);
            Self::draw_block(surface, x, y, piece.color());
        }
        surface.set_alpha(1.0);
    }

    fn draw_preview(&self, surface: &mut dyn Surface) {
        let x = self.board_left + self.board_width() + 20.0;
        let y = BOARD_TOP + 50.0;
        let frame = Rect::new(x, y, 100.0, 80.0);
        surface.fill_rect(frame, Color::WHITE);
        surface.stroke_rect(frame, TEXT_COLOR, 2.0);
        surface.fill_text(
            "NEXT",
            x + 50.0,
            y - 10.0,
            &TextStyle::new(TEXT_COLOR, 12.0).aligned(TextAlign::Center),
        );

        let size = 15.0;
        let cols = self.next.cells.first().map_or(0, Vec::len) as f64;
        let rows = self.next.cells.len() as f64;
        let left = x + 50.0 - cols * size / 2.0;
        let top = y + 40.0 - rows * size / 2.0;
        for (dx, dy) in self.next.filled() {
            surface.fill_rect(
                Rect::new(
                    left + f64::from(dx) * size,
                    top + f64::from(dy) * size,
                    size - 1.0,
                    size - 1.0,
                ),
                self.next.color(),
            );
        }
    }

    fn draw_hud(&self, surface: &mut dyn Surface) {
        let x = self.board_left + self.board_width() + 20.0;
        let mut y = BOARD_TOP + 180.0;
        let stats = TextStyle::new(TEXT_COLOR, 14.0);
        surface.fill_text(&format!("Level: {}", self.level), x, y, &stats);
        y += 25.0;
        surface.fill_text(&format!("Lines: {}", self.lines), x, y, &stats);
        y += 50.0;

        let help = TextStyle::new(TEXT_COLOR, 10.0);
        surface.fill_text("Controls:", x, y, &help);
        y += 20.0;
        for line in ["\u{2190} \u{2192} Move", "\u{2193} Soft Drop", "\u{2191} Rotate", "Space Hard Drop"] {
            surface.fill_text(line, x, y, &help);
            y += 15.0;
        }
    }
}

impl Game for Puzzle {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn update(&mut self, ctx: &mut GameContext<'_>, delta_ms: f64) {
        if self.current.is_none() {
            return;
        }

        if self.left.fire(delta_ms, MOVE_REPEAT_MS) {
            self.move_piece(ctx, -1, 0);
        }
        if self.right.fire(delta_ms, MOVE_REPEAT_MS) {
            self.move_piece(ctx, 1, 0);
        }
        if self.down.fire(delta_ms, SOFT_DROP_REPEAT_MS) {
            self.move_piece(ctx, 0, 1);
        }

        self.drop_timer += delta_ms;
        if self.drop_timer >= self.drop_interval {
            self.move_piece(ctx, 0, 1);
            self.drop_timer = 0.0;
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (self.board_width(), self.board_height());
        surface.fill_rect(
            Rect::new(0.0, 0.0, self.board_left * 2.0 + w, BOARD_TOP * 2.0 + h),
            Color::rgb(0xF0, 0xF0, 0xF0),
        );
        surface.stroke_rect(
            Rect::new(self.board_left - 3.0, BOARD_TOP - 3.0, w + 6.0, h + 6.0),
            TEXT_COLOR,
            3.0,
        );
        surface.fill_rect(Rect::new(self.board_left, BOARD_TOP, w, h), Color::WHITE);

        let grid_line = Color::rgb(0xDD, 0xDD, 0xDD);
        for col in 0..=GRID_WIDTH {
            let x = self.board_left + col as f64 * BLOCK_SIZE;
            surface.line((x, BOARD_TOP), (x, BOARD_TOP + h), grid_line, 1.0);
        }
        for row in 0..=GRID_HEIGHT {
            let y = BOARD_TOP + row as f64 * BLOCK_SIZE;
            surface.line((self.board_left, y), (self.board_left + w, y), grid_line, 1.0);
        }

        for (row, cells) in self.grid.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                if cell != 0 {
                    let (x, y) = self.cell_origin(col as i32, row as i32);
                    Self::draw_block(surface, x, y, block_color(cell));
                }
            }
        }

        if let Some(piece) = &self.current {
            self.draw_piece_at(surface, piece, piece.y, 0.8);
            let ghost = self.ghost_row(piece);
            if ghost > piece.y {
                self.draw_piece_at(surface, piece, ghost, 0.3);
            }
        }

        self.draw_preview(surface);
        self.draw_hud(surface);
    }

    fn handle_input(&mut self, ctx: &mut GameContext<'_>, key: &Key, pressed: bool) {
        if !pressed {
            match key {
                Key::ArrowLeft => self.left.held = false,
                Key::ArrowRight => self.right.held = false,
                Key::ArrowDown => self.down.held = false,
                _ => {}
            }
            return;
        }

        match key {
            Key::ArrowLeft => {
                if !self.left.held {
                    self.move_piece(ctx, -1, 0);
                }
                self.left.held = true;
            }
            Key::ArrowRight => {
                if !self.right.held {
                    self.move_piece(ctx, 1, 0);
                }
                self.right.held = true;
            }
            Key::ArrowDown => self.down.held = true,
            Key::ArrowUp => self.rotate(ctx),
            Key::Space => self.hard_drop(ctx),
            _ => {}
        }
    }

    fn handle_click(&mut self, ctx: &mut GameContext<'_>, x: f64, y: f64) {
        let center_x = self.board_left + self.board_width() / 2.0;
        let center_y = BOARD_TOP + self.board_height() / 2.0;
        if y < center_y {
            self.rotate(ctx);
        } else if x < center_x - 50.0 {
            self.move_piece(ctx, -1, 0);
        } else if x > center_x + 50.0 {
            self.move_piece(ctx, 1, 0);
        } else {
            self.hard_drop(ctx);
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

    fn setup() -> (GameHarness, Puzzle) {
        let mut harness = GameHarness::new(EngineConfig::default());
        let game = Puzzle::new(&mut harness.context());
        (harness, game)
    }

    fn piece(shape: usize) -> Piece {
        Piece::from_shape(SHAPES[shape], 1)
    }

    const I: usize = 0;
    const O: usize = 1;
    const T: usize = 2;

    #[test]
    fn first_piece_spawns_top_center() {
        let (harness, game) = setup();
        let current = game.current().unwrap();
        assert_eq!((current.x, current.y), (4, 0));
        assert_eq!(game.filled_cells(), 0);
        assert_eq!(game.grid().len(), GRID_HEIGHT);
        assert!((1..=7).contains(&current.color));
        assert_eq!(harness.state(), LoopState::Running);
    }

    #[test]
    fn rotation_is_clockwise() {
        let t = piece(T).rotated();
        assert_eq!(
            t.cells,
            vec![vec![true, false], vec![true, true], vec![true, false]]
        );
        let i = piece(I).rotated();
        assert_eq!(i.cells.len(), 4);
        assert!(i.cells.iter().all(|row| row == &vec![true]));
        assert_eq!(piece(O).rotated().cells, piece(O).cells);
    }

    #[test]
    fn rotation_kicks_off_the_wall() {
        let (mut harness, mut game) = setup();
        let mut vertical = piece(I).rotated();
        vertical.x = 8;
        game.current = Some(vertical);
        game.rotate(&harness.context());
        // x 8, 7 and 9 leave the bar past the right wall.
        let current = game.current().unwrap();
        assert_eq!(current.cells.len(), 1);
        assert_eq!(current.x, 6);
    }

    #[test]
    fn full_row_clears_and_rows_shift_down() {
        let (mut harness, mut game) = setup();
        game.grid[GRID_HEIGHT - 1] = [3; GRID_WIDTH];
        game.grid[GRID_HEIGHT - 2][0] = 5;
        let cleared = game.clear_lines(&mut harness.context());

        assert_eq!(cleared, 1);
        assert_eq!(game.grid().len(), GRID_HEIGHT);
        assert_eq!(game.grid()[0], [0; GRID_WIDTH]);
        assert_eq!(game.grid()[GRID_HEIGHT - 1][0], 5);
        assert_eq!(game.filled_cells(), 1);
        assert_eq!(harness.score(), 100);
        assert_eq!(harness.particles().len(), GRID_WIDTH * PARTICLES_PER_CELL);
    }

    #[test]
    fn four_lines_at_once_score_eight_hundred_times_level() {
        let (mut harness, mut game) = setup();
        game.level = 2;
        for row in GRID_HEIGHT - 4..GRID_HEIGHT {
            game.grid[row] = [1; GRID_WIDTH];
        }
        // A gap row between full rows is kept.
        game.grid[GRID_HEIGHT - 5] = [1; GRID_WIDTH];
        game.grid[GRID_HEIGHT - 5][9] = 0;

        assert_eq!(game.clear_lines(&mut harness.context()), 4);
        assert_eq!(harness.score(), 1600);
        assert_eq!(game.filled_cells(), GRID_WIDTH - 1);
        assert_eq!(game.grid()[GRID_HEIGHT - 1][9], 0);
    }

    #[test]
    fn tenth_line_levels_up() {
        let (mut harness, mut game) = setup();
        game.lines = 9;
        game.grid[GRID_HEIGHT - 1] = [2; GRID_WIDTH];
        game.clear_lines(&mut harness.context());
        assert_eq!(game.lines(), 10);
        assert_eq!(game.level(), 2);
        assert_eq!(game.drop_interval(), 900.0);
    }

    #[test]
    fn drop_interval_bottoms_out() {
        let (mut harness, mut game) = setup();
        game.lines = 199;
        game.grid[GRID_HEIGHT - 1] = [2; GRID_WIDTH];
        game.clear_lines(&mut harness.context());
        assert_eq!(game.level(), 21);
        assert_eq!(game.drop_interval(), 100.0);
    }

    #[test]
    fn soft_moves_until_blocked_lock_exactly_once() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        let upcoming = game.next_piece().clone();

        let mut steps = 0;
        while game.move_piece(&mut ctx, 0, 1) {
            steps += 1;
        }
        assert!(steps >= 16);
        assert_eq!(game.pieces_locked(), 1);
        assert_eq!(game.filled_cells(), 4);

        let current = game.current().unwrap();
        assert_eq!(current.cells, upcoming.cells);
        assert_eq!(current.color, upcoming.color);
        assert_eq!((current.x, current.y), (SPAWN_X, 0));
    }

    #[test]
    fn blocked_spawn_ends_game_without_placing() {
        let (mut harness, mut game) = setup();
        // Occupy the spawn area without completing any row.
        for row in 0..2 {
            for col in 3..8 {
                game.grid[row][col] = 4;
            }
        }
        let before = game.filled_cells();
        game.spawn(&mut harness.context());

        assert_eq!(harness.state(), LoopState::GameOver);
        assert_eq!(game.filled_cells(), before);
        assert_eq!(game.pieces_locked(), 0);

        // Nothing moves once the game is over.
        assert!(!game.move_piece(&mut harness.context(), 0, 1));
        assert_eq!(game.filled_cells(), before);
    }

    #[test]
    fn hard_drop_scores_two_per_row() {
        let (mut harness, mut game) = setup();
        let mut o = piece(O);
        o.x = 0;
        game.current = Some(o);
        game.hard_drop(&mut harness.context());

        assert_eq!(harness.score(), 18 * 2);
        assert_eq!(game.grid()[GRID_HEIGHT - 1][0], 1);
        assert_eq!(game.grid()[GRID_HEIGHT - 2][1], 1);
        assert_eq!(game.pieces_locked(), 1);
    }

    #[test]
    fn held_left_repeats_after_delay() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        let mut o = piece(O);
        o.x = 6;
        game.current = Some(o);

        game.handle_input(&mut ctx, &Key::ArrowLeft, true);
        assert_eq!(game.current().unwrap().x, 5);
        // Key repeat from the OS does not move again.
        game.handle_input(&mut ctx, &Key::ArrowLeft, true);
        assert_eq!(game.current().unwrap().x, 5);

        game.update(&mut ctx, 150.0);
        assert_eq!(game.current().unwrap().x, 5);
        game.update(&mut ctx, 1.0);
        assert_eq!(game.current().unwrap().x, 4);

        game.handle_input(&mut ctx, &Key::ArrowLeft, false);
        game.update(&mut ctx, 200.0);
        assert_eq!(game.current().unwrap().x, 4);
    }

    #[test]
    fn gravity_drops_one_row_per_interval() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        game.update(&mut ctx, 999.0);
        assert_eq!(game.current().unwrap().y, 0);
        game.update(&mut ctx, 1.0);
        assert_eq!(game.current().unwrap().y, 1);
    }

    #[test]
    fn click_zones() {
        let (mut harness, mut game) = setup();
        let mut ctx = harness.context();
        let mut t = piece(T);
        t.x = 4;
        game.current = Some(t);

        // Board spans x 275..525, y 50..550; center (400, 300).
        game.handle_click(&mut ctx, 100.0, 400.0);
        assert_eq!(game.current().unwrap().x, 3);
        game.handle_click(&mut ctx, 700.0, 400.0);
        assert_eq!(game.current().unwrap().x, 4);
        game.handle_click(&mut ctx, 400.0, 100.0);
        assert_eq!(game.current().unwrap().cells.len(), 3);
        game.handle_click(&mut ctx, 400.0, 400.0);
        assert_eq!(game.pieces_locked(), 1);
    }
}
