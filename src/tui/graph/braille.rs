//! A dot bitmap packed into braille glyphs, two dots wide and four tall per cell.

const BLANK: u32 = 0x2800;

/// Bit for each dot of a cell, indexed by `[dy][dx]`.
const DOT_BITS: [[u32; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

#[derive(Debug, Clone)]
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    dots: Vec<bool>,
}

impl BrailleCanvas {
    /// A canvas of `width` x `height` dots.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![false; width * height],
        }
    }

    /// Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x] = true;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.dots[y * self.width + x]
    }

    /// The glyph for cell (`cx`, `cy`) in character coordinates.
    pub fn glyph(&self, cx: usize, cy: usize) -> char {
        let (x, y) = (cx * 2, cy * 4);
        let mut code = BLANK;
        for (dy, bits) in DOT_BITS.iter().enumerate() {
            for (dx, bit) in bits.iter().enumerate() {
                if self.get(x + dx, y + dy) {
                    code |= bit;
                }
            }
        }
        char::from_u32(code).unwrap_or(' ')
    }

    /// One string per character row.
    pub fn rows(&self) -> Vec<String> {
        let cols = self.width.div_ceil(2);
        let rows = self.height.div_ceil(4);
        (0..rows)
            .map(|cy| (0..cols).map(|cx| self.glyph(cx, cy)).collect())
            .collect()
    }
}
