//! Game state and core simulation types
//!
//! [`GameState`] is the single authoritative session object. The game loop,
//! the solver and player intents all operate on it by reference; nothing
//! keeps a second copy that would need syncing.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::error::{GridError, SolveError};
use super::level::generate_level;
use super::rail::{RailPoint, map_position, perimeter_for};
use super::solver::solve;
use crate::settings::Settings;

/// Pixel and shooter colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelColor {
    /// Empty cell. Never a valid shooter color.
    #[default]
    None,
    Red,
    Green,
    Blue,
    Yellow,
    White,
    Purple,
    Orange,
}

impl PixelColor {
    /// Every color a shooter can carry
    pub const PLAYABLE: [PixelColor; 7] = [
        PixelColor::Red,
        PixelColor::Green,
        PixelColor::Blue,
        PixelColor::Yellow,
        PixelColor::White,
        PixelColor::Purple,
        PixelColor::Orange,
    ];

    pub fn is_playable(&self) -> bool {
        *self != PixelColor::None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PixelColor::None => "None",
            PixelColor::Red => "Red",
            PixelColor::Green => "Green",
            PixelColor::Blue => "Blue",
            PixelColor::Yellow => "Yellow",
            PixelColor::White => "White",
            PixelColor::Purple => "Purple",
            PixelColor::Orange => "Orange",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "empty" => Some(PixelColor::None),
            "red" => Some(PixelColor::Red),
            "green" => Some(PixelColor::Green),
            "blue" => Some(PixelColor::Blue),
            "yellow" => Some(PixelColor::Yellow),
            "white" => Some(PixelColor::White),
            "purple" => Some(PixelColor::Purple),
            "orange" => Some(PixelColor::Orange),
            _ => None,
        }
    }

    /// Single-character glyph used by text patterns
    pub fn glyph(&self) -> char {
        match self {
            PixelColor::None => '.',
            PixelColor::Red => 'R',
            PixelColor::Green => 'G',
            PixelColor::Blue => 'B',
            PixelColor::Yellow => 'Y',
            PixelColor::White => 'W',
            PixelColor::Purple => 'P',
            PixelColor::Orange => 'O',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph.to_ascii_uppercase() {
            '.' | ' ' => Some(PixelColor::None),
            'R' => Some(PixelColor::Red),
            'G' => Some(PixelColor::Green),
            'B' => Some(PixelColor::Blue),
            'Y' => Some(PixelColor::Yellow),
            'W' => Some(PixelColor::White),
            'P' => Some(PixelColor::Purple),
            'O' => Some(PixelColor::Orange),
            _ => None,
        }
    }
}

/// One grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub color: PixelColor,
    /// Inactive cells are cleared, whatever color they still store
    pub active: bool,
}

impl Cell {
    /// A cell is active exactly when it has a color
    pub fn new(row: usize, col: usize, color: PixelColor) -> Self {
        Self {
            row,
            col,
            color,
            active: color.is_playable(),
        }
    }
}

/// Square pixel grid, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridCells")]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

/// Unchecked serialized form of [`Grid`]
#[derive(Deserialize)]
struct GridCells {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridCells> for Grid {
    type Error = GridError;

    fn try_from(raw: GridCells) -> Result<Self, Self::Error> {
        let GridCells { size, cells } = raw;
        let expected = size * size;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                size,
                expected,
                found: cells.len(),
            });
        }
        for (index, cell) in cells.iter().enumerate() {
            if (cell.row, cell.col) != (index / size, index % size) {
                return Err(GridError::Misplaced {
                    index,
                    row: cell.row,
                    col: cell.col,
                });
            }
        }
        Ok(Self { size, cells })
    }
}

impl Grid {
    /// All-inactive grid
    pub fn empty(size: usize) -> Self {
        Self::from_fn(size, |_, _| PixelColor::None)
    }

    /// Build a grid by asking for each cell's color
    pub fn from_fn<F>(size: usize, mut color_at: F) -> Self
    where
        F: FnMut(usize, usize) -> PixelColor,
    {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(Cell::new(row, col, color_at(row, col)));
            }
        }
        Self { size, cells }
    }

    /// Parse rows of color glyphs (see [`PixelColor::glyph`])
    pub fn from_pattern(rows: &[&str]) -> Result<Self, GridError> {
        if rows.is_empty() {
            return Err(GridError::Empty);
        }
        let size = rows.len();
        let mut colors = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != size {
                return Err(GridError::NotSquare {
                    row,
                    len,
                    expected: size,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let color = PixelColor::from_glyph(glyph)
                    .ok_or(GridError::UnknownGlyph { glyph, row, col })?;
                colors.push(color);
            }
        }
        Ok(Self::from_fn(size, |row, col| colors[row * size + col]))
    }

    /// Render active cells as glyph rows; cleared cells print as `.`
    pub fn to_pattern(&self) -> Vec<String> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| {
                        let cell = &self.cells[row * self.size + col];
                        if cell.active { cell.color.glyph() } else { '.' }
                    })
                    .collect()
            })
            .collect()
    }

    /// Side length
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.size && col < self.size {
            self.cells.get(row * self.size + col)
        } else {
            None
        }
    }

    /// Clear a cell. Returns false if it was out of range or already clear.
    pub fn deactivate(&mut self, row: usize, col: usize) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        let cell = &mut self.cells[row * self.size + col];
        let was_active = cell.active;
        cell.active = false;
        was_active
    }

    /// Overwrite a cell's color; activity follows the color
    pub fn set_color(&mut self, row: usize, col: usize, color: PixelColor) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        self.cells[row * self.size + col] = Cell::new(row, col, color);
        true
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn active_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.active)
    }

    pub fn active_count(&self) -> usize {
        self.active_cells().count()
    }

    pub fn has_active(&self) -> bool {
        self.cells.iter().any(|c| c.active)
    }
}

/// Shooter lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShooterState {
    /// Waiting in an inventory lane
    Queued,
    /// Orbiting the rail
    Active,
    /// Out of ammo (dropped from the active set)
    Retired,
}

/// A colored, ammo-limited agent on the rail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shooter {
    /// Allocated in manifest order
    pub id: u32,
    pub color: PixelColor,
    pub ammo: u32,
    /// Starting ammo, for display ratio only
    pub max_ammo: u32,
    /// Rail coordinate in `[0, perimeter)`
    pub rail_position: f32,
    pub state: ShooterState,
    /// Cell centers crossed since the last hit
    #[serde(default)]
    pub misses: u32,
}

impl Shooter {
    pub fn queued(id: u32, color: PixelColor, ammo: u32) -> Self {
        Self {
            id,
            color,
            ammo,
            max_ammo: ammo,
            rail_position: 0.0,
            state: ShooterState::Queued,
            misses: 0,
        }
    }

    /// Went a full lap around a grid of `size` without hitting anything
    pub fn is_stalled(&self, size: usize) -> bool {
        self.misses as usize >= 4 * size
    }

    /// Where this shooter sits around a grid of `size`
    pub fn rail_point(&self, size: usize) -> RailPoint {
        map_position(self.rail_position, perimeter_for(size), size, size)
    }

    /// Remaining ammo as a fraction of the starting load
    pub fn ammo_ratio(&self) -> f32 {
        if self.max_ammo == 0 {
            0.0
        } else {
            self.ammo as f32 / self.max_ammo as f32
        }
    }
}

/// Parallel FIFO lanes of queued shooters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    lanes: Vec<VecDeque<Shooter>>,
}

impl Inventory {
    /// Deal shooters round-robin: the i-th goes to lane `i % lane_count`
    pub fn deal<I>(shooters: I, lane_count: usize) -> Self
    where
        I: IntoIterator<Item = Shooter>,
    {
        let lane_count = lane_count.max(1);
        let mut lanes = vec![VecDeque::new(); lane_count];
        for (i, shooter) in shooters.into_iter().enumerate() {
            lanes[i % lane_count].push_back(shooter);
        }
        Self { lanes }
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lane(&self, lane: usize) -> Option<&VecDeque<Shooter>> {
        self.lanes.get(lane)
    }

    /// Only the head of a lane may spawn
    pub fn head(&self, lane: usize) -> Option<&Shooter> {
        self.lanes.get(lane).and_then(|l| l.front())
    }

    pub fn pop(&mut self, lane: usize) -> Option<Shooter> {
        self.lanes.get_mut(lane).and_then(|l| l.pop_front())
    }

    pub fn queued_count(&self) -> usize {
        self.lanes.iter().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(|l| l.is_empty())
    }

    /// Empty every lane, keeping the lane count
    pub fn clear(&mut self) {
        for lane in &mut self.lanes {
            lane.clear();
        }
    }

    /// Lane whose head comes earliest in the solver's manifest
    pub fn earliest_lane(&self) -> Option<usize> {
        self.lanes
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.front().map(|s| (i, s.id)))
            .min_by_key(|&(_, id)| id)
            .map(|(i, _)| i)
    }

    pub fn to_vecs(&self) -> Vec<Vec<Shooter>> {
        self.lanes.iter().map(|l| l.iter().cloned().collect()).collect()
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Game loop running, spawns accepted
    Playing,
    /// Loop paused, grid open for painting
    Editing,
    /// Every pixel cleared
    Won,
    /// Inventory and rail empty with pixels left
    Lost,
}

/// Read-only view handed to presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub active_shooters: Vec<Shooter>,
    pub inventory_lanes: Vec<Vec<Shooter>>,
    pub score: u64,
    pub phase: SessionPhase,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Configuration this session was started with
    pub settings: Settings,
    pub grid: Grid,
    /// Active shooters in spawn order
    pub shooters: Vec<Shooter>,
    pub inventory: Inventory,
    pub score: u64,
    pub phase: SessionPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next shooter ID
    next_id: u32,
}

impl GameState {
    /// Start a session on a generated level
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SolveError> {
        let settings = settings.sanitized();
        let grid = generate_level(settings.grid_size, seed);
        Self::with_grid(settings, grid)
    }

    /// Start a session on a supplied grid
    pub fn with_grid(settings: Settings, grid: Grid) -> Result<Self, SolveError> {
        let settings = settings.sanitized();
        let lane_count = settings.lane_count;
        let mut state = Self {
            grid: Grid::empty(grid.size()),
            shooters: Vec::new(),
            inventory: Inventory::deal(Vec::new(), lane_count),
            score: 0,
            phase: SessionPhase::Editing,
            time_ticks: 0,
            next_id: 1,
            settings,
        };
        state.start_level(grid)?;
        Ok(state)
    }

    /// Rail length for the current grid
    pub fn perimeter(&self) -> f32 {
        perimeter_for(self.grid.size())
    }

    fn next_shooter_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Solve `grid`, deal the manifest into lanes, reset score and play.
    ///
    /// On failure the session is left exactly as it was.
    pub fn start_level(&mut self, grid: Grid) -> Result<(), SolveError> {
        let manifest = match solve(&grid, self.settings.solver_pass_limit) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::warn!("Level rejected: {}", err);
                return Err(err);
            }
        };

        let queued: Vec<Shooter> = manifest
            .iter()
            .map(|entry| {
                let id = self.next_shooter_id();
                Shooter::queued(id, entry.color, entry.ammo)
            })
            .collect();

        self.inventory = Inventory::deal(queued, self.settings.lane_count);
        self.shooters.clear();
        self.grid = grid;
        self.score = 0;
        self.phase = if self.grid.has_active() {
            SessionPhase::Playing
        } else {
            SessionPhase::Won
        };

        log::info!(
            "Level started: {} pixels, {} shooters over {} lanes",
            self.grid.active_count(),
            manifest.len(),
            self.inventory.lane_count()
        );
        Ok(())
    }

    /// Solve and play whatever is on the grid now
    pub fn play_custom_level(&mut self) -> Result<(), SolveError> {
        let grid = self.grid.clone();
        self.start_level(grid)
    }

    /// Pause play and open the grid for painting
    pub fn enter_editor(&mut self) {
        self.shooters.clear();
        self.inventory.clear();
        self.phase = SessionPhase::Editing;
        log::info!("Entered editor");
    }

    /// Leave the editor and play the edited grid
    pub fn exit_editor(&mut self) -> Result<(), SolveError> {
        if self.phase != SessionPhase::Editing {
            return Ok(());
        }
        self.play_custom_level()
    }

    /// Move the head of `lane` onto the rail.
    ///
    /// Ignored unless playing, the lane has a shooter and the rail has room.
    pub fn spawn(&mut self, lane: usize) -> bool {
        if self.phase != SessionPhase::Playing
            || self.shooters.len() >= self.settings.max_active_shooters
        {
            return false;
        }
        let Some(mut shooter) = self.inventory.pop(lane) else {
            return false;
        };
        shooter.state = ShooterState::Active;
        shooter.rail_position = 0.0;
        shooter.misses = 0;
        log::debug!(
            "Spawned shooter {} ({}, ammo {}) from lane {}",
            shooter.id,
            shooter.color.as_str(),
            shooter.ammo,
            lane
        );
        self.shooters.push(shooter);
        true
    }

    /// Paint a square brush of side `brush_size` centred on `(row, col)`.
    ///
    /// Editor only. Cells outside the grid are skipped.
    pub fn paint(&mut self, row: usize, col: usize, color: PixelColor, brush_size: usize) -> bool {
        if self.phase != SessionPhase::Editing || brush_size == 0 {
            return false;
        }
        let offset = (brush_size - 1) / 2;
        let row_start = row.saturating_sub(offset);
        let col_start = col.saturating_sub(offset);
        let row_end = row.saturating_add(brush_size - offset).min(self.grid.size());
        let col_end = col.saturating_add(brush_size - offset).min(self.grid.size());

        let mut painted = false;
        for r in row_start..row_end {
            for c in col_start..col_end {
                painted |= self.grid.set_color(r, c, color);
            }
        }
        painted
    }

    /// Wipe the grid to all-inactive (editor only)
    pub fn clear(&mut self) -> bool {
        if self.phase != SessionPhase::Editing {
            return false;
        }
        self.grid = Grid::empty(self.grid.size());
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            active_shooters: self.shooters.clone(),
            inventory_lanes: self.inventory.to_vecs(),
            score: self.score,
            phase: self.phase,
        }
    }
}
