
use glam::DVec2;

/// Bitmap resolution of the built-in glyphs, in cells per side.
pub const GLYPH_GRID: usize = 5;

/// 5×5 bitmap for a letter, one row per string, `' '` meaning empty. Unknown
/// characters fall back to a full block so a stroke target always exists.
pub fn letter_grid(character: char) -> [&'static str; GLYPH_GRID] {
    match character.to_ascii_uppercase() {
        'A' => ["  X  ", " X X ", "XXXXX", "X   X", "X   X"],
        'B' => ["XXXX ", "X   X", "XXXX ", "X   X", "XXXX "],
        'C' => [" XXX ", "X    ", "X    ", "X    ", " XXX "],
        'D' => ["XXXX ", "X   X", "X   X", "X   X", "XXXX "],
        'E' => ["XXXXX", "X    ", "XXXX ", "X    ", "XXXXX"],
        'F' => ["XXXXX", "X    ", "XXXX ", "X    ", "X    "],
        'G' => [" XXX ", "X    ", "X  XX", "X   X", " XXX "],
        'H' => ["X   X", "X   X", "XXXXX", "X   X", "X   X"],
        'I' => ["XXXXX", "  X  ", "  X  ", "  X  ", "XXXXX"],
        'J' => ["XXXXX", "   X ", "   X ", "X  X ", " XX  "],
        'K' => ["X   X", "X  X ", "XXX  ", "X  X ", "X   X"],
        'L' => ["X    ", "X    ", "X    ", "X    ", "XXXXX"],
        'M' => ["X   X", "XX XX", "X X X", "X   X", "X   X"],
        'N' => ["X   X", "XX  X", "X X X", "X  XX", "X   X"],
        'O' => [" XXX ", "X   X", "X   X", "X   X", " XXX "],
        'P' => ["XXXX ", "X   X", "XXXX ", "X    ", "X    "],
        'Q' => [" XXX ", "X   X", "X   X", "X  X ", " XX X"],
        'R' => ["XXXX ", "X   X", "XXXX ", "X  X ", "X   X"],
        'S' => [" XXX ", "X    ", " XXX ", "    X", " XXX "],
        'T' => ["XXXXX", "  X  ", "  X  ", "  X  ", "  X  "],
        'U' => ["X   X", "X   X", "X   X", "X   X", " XXX "],
        'V' => ["X   X", "X   X", "X   X", " X X ", "  X  "],
        'W' => ["X   X", "X   X", "X X X", "XX XX", "X   X"],
        'X' => ["X   X", " X X ", "  X  ", " X X ", "X   X"],
        'Y' => ["X   X", " X X ", "  X  ", "  X  ", "  X  "],
        'Z' => ["XXXXX", "   X ", "  X  ", " X   ", "XXXXX"],
        _ => ["XXXXX"; GLYPH_GRID],
    }
}

/// Decomposes a letter into axis-aligned convex cells, one square per filled
/// grid slot, with corners in counterclockwise order starting at the top-left
/// (y grows downward). The whole glyph spans `scale × scale`.
pub fn letter_cells(character: char, scale: f64) -> Vec<[DVec2; 4]> {
    let grid = letter_grid(character);
    let cell = scale / GLYPH_GRID as f64;
    let mut cells = Vec::new();

    for (row, line) in grid.iter().enumerate() {
        for (column, slot) in line.bytes().enumerate() {
            if slot == b' ' {
                continue;
            }

            let x = column as f64 * cell;
            let y = row as f64 * cell;

            cells.push([
                DVec2::new(x, y),
                DVec2::new(x + cell, y),
                DVec2::new(x + cell, y + cell),
                DVec2::new(x, y + cell),
            ]);
        }
    }

    cells
}
