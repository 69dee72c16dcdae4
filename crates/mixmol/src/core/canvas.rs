//! Character-grid canvas for text previews
//!
//! Maps continuous layout coordinates onto a fixed grid of terminal cells.
//! Terminal cells are roughly twice as tall as they are wide, so the vertical
//! scale is doubled by default.

use unicode_width::UnicodeWidthChar;

use super::geometry::Point;

/// Widest grid a canvas allocates, in columns
pub const MAX_CANVAS_COLS: usize = 480;
/// Tallest grid a canvas allocates, in rows
pub const MAX_CANVAS_ROWS: usize = 240;

/// Fixed-size character grid
#[derive(Debug, Clone)]
pub struct PlotCanvas {
    pub cols: usize,
    pub rows: usize,
    /// Layout units per column
    pub x_scale: f64,
    /// Layout units per row
    pub y_scale: f64,
    grid: Vec<Vec<char>>,
}

impl PlotCanvas {
    /// Create a canvas covering a `width` × `height` layout area
    ///
    /// Areas too large for the grid caps get a coarser scale instead of a
    /// bigger grid.
    pub fn for_area(width: f64, height: f64, x_scale: f64) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        let x_scale = if x_scale.is_finite() && x_scale > 0.0 { x_scale } else { 1.0 };
        let x_scale = x_scale
            .max(width / MAX_CANVAS_COLS as f64)
            .max(height / (2.0 * MAX_CANVAS_ROWS as f64));
        let y_scale = x_scale * 2.0;
        let cols = ((width / x_scale).ceil().max(1.0) as usize).min(MAX_CANVAS_COLS);
        let rows = ((height / y_scale).ceil().max(1.0) as usize).min(MAX_CANVAS_ROWS);
        Self {
            cols,
            rows,
            x_scale,
            y_scale,
            grid: vec![vec![' '; cols]; rows],
        }
    }

    /// Cell containing a layout point, clamped to the grid
    pub fn cell(&self, point: Point) -> (usize, usize) {
        let col = (point.x / self.x_scale).round().max(0.0) as usize;
        let row = (point.y / self.y_scale).round().max(0.0) as usize;
        (col.min(self.cols - 1), row.min(self.rows - 1))
    }

    /// Set a cell; writes outside the grid are ignored
    pub fn set_char(&mut self, col: usize, row: usize, c: char) {
        if row < self.rows && col < self.cols {
            self.grid[row][col] = c;
        }
    }

    pub fn get_char(&self, col: usize, row: usize) -> char {
        if row < self.rows && col < self.cols {
            self.grid[row][col]
        } else {
            ' '
        }
    }

    /// Set a cell only if it is blank
    pub fn set_if_blank(&mut self, col: usize, row: usize, c: char) {
        if self.get_char(col, row) == ' ' {
            self.set_char(col, row, c);
        }
    }

    /// Draw a straight bond between two cells, leaving both endpoints alone
    pub fn draw_bond(&mut self, from: (usize, usize), to: (usize, usize), ascii: bool) {
        let (x0, y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let glyph = bond_glyph(x1 - x0, y1 - y0, ascii);

        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            if (x, y) != (x0, y0) && (x, y) != (x1, y1) {
                self.set_if_blank(x as usize, y as usize, glyph);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Write text starting at a cell, clipped at the right edge
    ///
    /// Wide characters occupy two cells; the second cell is left as a
    /// zero-width placeholder so column math stays aligned.
    pub fn draw_text(&mut self, col: usize, row: usize, text: &str) {
        let mut x = col;
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if x + w > self.cols {
                break;
            }
            self.set_char(x, row, c);
            if w == 2 {
                self.set_char(x + 1, row, '\0');
            }
            x += w;
        }
    }
}

/// Pick the character that best follows a line's slope
fn bond_glyph(dx: i64, dy: i64, ascii: bool) -> char {
    let (adx, ady) = (dx.abs(), dy.abs());
    if ady * 2 <= adx {
        if ascii { '-' } else { '─' }
    } else if adx * 2 <= ady {
        if ascii { '|' } else { '│' }
    } else if (dx > 0) == (dy > 0) {
        if ascii { '\\' } else { '╲' }
    } else if ascii {
        '/'
    } else {
        '╱'
    }
}

impl std::fmt::Display for PlotCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let s: String = row.iter().filter(|c| **c != '\0').collect();
                s.trim_end().to_string()
            })
            .collect();

        while rows.first().is_some_and(|row| row.is_empty()) {
            rows.remove(0);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        write!(f, "{}", rows.join("\n"))
    }
}
