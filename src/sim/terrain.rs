//! Destructible terrain
//!
//! A fixed-size occupancy grid. Generation overwrites the whole grid from a
//! 1D fractal-noise surface profile; explosions carve filled discs out of it.
//! Every read clamps its coordinates into the grid, so out-of-range queries
//! see the nearest boundary cell instead of failing.

use glam::Vec2;
use rand::Rng;

use crate::consts::TERRAIN_FIRST_SEED;
use crate::error::SimError;

/// Occupancy of a single terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Solid = 1,
}

/// The destructible ground, `width × height` cells, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainField {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TerrainField {
    /// Allocate an all-empty grid
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions { width, height });
        }
        let count = width
            .checked_mul(height)
            .ok_or(SimError::TerrainAllocation { cells: usize::MAX })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|_| SimError::TerrainAllocation { cells: count })?;
        cells.resize(count, Cell::Empty);

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid size as a vector (for camera clamping)
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Cell at `(x, y)` after clamping into the grid
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        let cx = (x.max(0) as usize).min(self.width - 1);
        let cy = (y.max(0) as usize).min(self.height - 1);
        self.cells[cy * self.width + cx]
    }

    /// Whether the (clamped) cell at `(x, y)` is ground
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == Cell::Solid
    }

    /// Whether the cell under a world-space point is ground.
    ///
    /// The point is clamped into the grid first, then truncated to a cell.
    pub fn is_solid_at(&self, point: Vec2) -> bool {
        let x = point.x.clamp(0.0, (self.width - 1) as f32);
        let y = point.y.clamp(0.0, (self.height - 1) as f32);
        // NaN survives clamp; `as` maps it to 0
        self.is_solid(x as i32, y as i32)
    }

    /// First solid row of a column (`height` if the column is empty)
    pub fn surface_height(&self, x: usize) -> usize {
        let x = x.min(self.width - 1);
        (0..self.height)
            .find(|&y| self.cells[y * self.width + x] == Cell::Solid)
            .unwrap_or(self.height)
    }

    /// Number of solid cells in the grid
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Solid).count()
    }

    /// Set every cell to `cell`
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Overwrite the whole grid from a per-column seed array.
    ///
    /// The first column's seed is forced to the midline so the map always
    /// opens on a mid-height ridge. Columns past the end of `seeds` use the
    /// midline value as well.
    pub fn generate(&mut self, seeds: &[f32], octaves: u32, bias: f32) {
        let mut column_seeds: Vec<f32> = (0..self.width)
            .map(|x| seeds.get(x).copied().unwrap_or(TERRAIN_FIRST_SEED))
            .collect();
        column_seeds[0] = TERRAIN_FIRST_SEED;

        let surface = perlin_noise_1d(&column_seeds, octaves, bias);
        let height = self.height as f32;

        for (x, &top) in surface.iter().enumerate() {
            let top = top * height;
            for y in 0..self.height {
                self.cells[y * self.width + x] = if y as f32 >= top {
                    Cell::Solid
                } else {
                    Cell::Empty
                };
            }
        }
    }

    /// Draw a fresh seed array from `rng` and regenerate
    pub fn generate_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R, octaves: u32, bias: f32) {
        let seeds: Vec<f32> = (0..self.width).map(|_| rng.random::<f32>()).collect();
        self.generate(&seeds, octaves, bias);
        log::info!(
            "Generated {}x{} terrain ({} octaves, bias {}), {} solid cells",
            self.width,
            self.height,
            octaves,
            bias,
            self.solid_count()
        );
    }

    /// Clear a filled disc of integer radius around `(xc, yc)`.
    ///
    /// Midpoint circle over one octant, filling the horizontal spans of all
    /// eight symmetric points. Cells outside the grid are skipped, so discs
    /// overlapping the map edge are clipped rather than rejected.
    pub fn carve_disc(&mut self, xc: i32, yc: i32, radius: i32) {
        if radius <= 0 {
            return;
        }

        let mut x = 0;
        let mut y = radius;
        let mut p = 3 - 2 * radius;

        while y >= x {
            self.clear_span(xc - x, xc + x, yc - y);
            self.clear_span(xc - y, xc + y, yc - x);
            self.clear_span(xc - x, xc + x, yc + y);
            self.clear_span(xc - y, xc + y, yc + x);

            if p < 0 {
                p += 4 * x + 6;
            } else {
                p += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
    }

    /// Empty cells `sx..=ex` on row `row`, skipping anything off the grid
    fn clear_span(&mut self, sx: i32, ex: i32, row: i32) {
        if row < 0 || row as usize >= self.height {
            return;
        }
        let row = row as usize;
        let start = sx.max(0);
        let end = ex.min(self.width as i32 - 1);
        for x in start..=end {
            self.cells[row * self.width + x as usize] = Cell::Empty;
        }
    }
}

/// 1D fractal noise over a seed array.
///
/// Octave `o` samples the seeds every `len >> o` entries and blends linearly
/// between neighbouring samples; each octave weighs `1 / bias` of the one
/// before. The result is normalized by the total weight, so it stays within
/// the range of the seeds.
pub fn perlin_noise_1d(seeds: &[f32], octaves: u32, bias: f32) -> Vec<f32> {
    let count = seeds.len();
    let mut output = Vec::with_capacity(count);

    for x in 0..count {
        let mut noise = 0.0;
        let mut scale_acc = 0.0;
        let mut scale = 1.0;

        for o in 0..octaves {
            let pitch = count.checked_shr(o).unwrap_or(0).max(1);
            let sample1 = (x / pitch) * pitch;
            let sample2 = (sample1 + pitch) % count;
            let blend = (x - sample1) as f32 / pitch as f32;
            let sample = (1.0 - blend) * seeds[sample1] + blend * seeds[sample2];

            scale_acc += scale;
            noise += sample * scale;
            scale /= bias;
        }

        output.push(if scale_acc > 0.0 { noise / scale_acc } else { 0.0 });
    }

    output
}
