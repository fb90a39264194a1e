//! Renders a pathviz grid into a pixel buffer: one solid square per cell,
//! with grey lines along each cell's top and left edges.

use pathviz_core::{CellState, GRID_LINE, Grid};

const BACKGROUND: u32 = 0xFF00_0000;

pub(crate) struct GridRenderer {
    /// Width (and height) of the pixel buffer.
    side: usize,
    cell_width: usize,
    /// `0xFFRRGGBB` pixels, row-major, `side * side`.
    pixels: Vec<u32>,
    /// State each cell was last drawn with, to skip unchanged cells.
    drawn: Vec<Option<CellState>>,
}

impl GridRenderer {
    pub fn new() -> Self {
        Self {
            side: 0,
            cell_width: 0,
            pixels: Vec::new(),
            drawn: Vec::new(),
        }
    }

    /// Pixel buffer width (and height).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Draw every cell whose state changed since the last call.
    pub fn draw(&mut self, grid: &Grid) {
        let side = grid.pixel_width() as usize;
        let cell_width = grid.cell_width() as usize;
        if side != self.side || cell_width != self.cell_width || self.drawn.len() != grid.len() {
            self.side = side;
            self.cell_width = cell_width;
            self.pixels.clear();
            self.pixels.resize(side * side, BACKGROUND);
            self.drawn.clear();
            self.drawn.resize(grid.len(), None);
        }

        for (i, cell) in grid.iter().enumerate() {
            if self.drawn[i] == Some(cell.state()) {
                continue;
            }
            let origin = grid.pixel_origin(cell.pos());
            self.draw_cell(origin.x as usize, origin.y as usize, cell.state());
            self.drawn[i] = Some(cell.state());
        }
    }

    fn draw_cell(&mut self, x0: usize, y0: usize, state: CellState) {
        let w = self.cell_width;
        let fill = state.color().to_pixel();
        let line = GRID_LINE.to_pixel();
        for dy in 0..w {
            let row_start = (y0 + dy) * self.side + x0;
            let Some(row) = self.pixels.get_mut(row_start..row_start + w) else {
                continue;
            };
            if dy == 0 {
                row.fill(line);
            } else {
                row.fill(fill);
                row[0] = line;
            }
        }
    }

    /// Copy the internal pixel buffer into a surface buffer of the given size.
    pub fn blit_to_buffer(&self, buf: &mut [u32], buf_width: usize, buf_height: usize) {
        let copy_w = self.side.min(buf_width);
        let copy_h = self.side.min(buf_height);

        if buf_width > self.side || buf_height > self.side {
            buf.fill(BACKGROUND);
        }

        for y in 0..copy_h {
            let src_start = y * self.side;
            let dst_start = y * buf_width;
            let src_end = src_start + copy_w;
            let dst_end = dst_start + copy_w;
            if src_end <= self.pixels.len() && dst_end <= buf.len() {
                buf[dst_start..dst_end].copy_from_slice(&self.pixels[src_start..src_end]);
            }
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.side + x]
    }
}
