#[cfg(test)]
mod tests;

use glam::DVec2;
use crate::glyph::letter_cells;
use crate::hierarchy::{Hierarchy, TraceStep};
use crate::mesh::{ConvexMesh, MeshError};

/// One convex cell of a rasterized glyph, with its prebuilt hierarchy and the
/// stroke state the practice loop tracks per frame.
#[derive(Clone, Debug)]
pub struct CellGoal {
    polygon: Vec<DVec2>,
    hierarchy: Hierarchy,
    completed: bool,
    highlighted: bool,
}

impl CellGoal {
    pub fn new(polygon: Vec<DVec2>) -> Result<Self, MeshError> {
        let mesh = ConvexMesh::from_convex_polygon(&polygon)?;

        Ok(Self {
            polygon,
            hierarchy: Hierarchy::build(mesh),
            completed: false,
            highlighted: false,
        })
    }

    pub fn polygon(&self) -> &[DVec2] {
        &self.polygon
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn centroid(&self) -> DVec2 {
        self.polygon.iter().fold(DVec2::ZERO, |acc, &p| acc + p) / self.polygon.len() as f64
    }

    pub fn intersects_stroke(&self, from: DVec2, to: DVec2) -> bool {
        self.hierarchy.intersects_segment(from, to)
    }

    /// Step-by-step descent record for the debug overlay.
    pub fn trace(&self, from: DVec2, to: DVec2) -> Vec<TraceStep> {
        self.hierarchy.trace_intersection(from, to)
    }

    /// Advances the cell with one frame of stroke movement. A touching stroke
    /// highlights the cell; a touching stroke while inking completes it.
    /// Returns true only on the frame the cell becomes completed.
    pub fn update(&mut self, from: DVec2, to: DVec2, inking: bool) -> bool {
        if self.completed {
            return false;
        }

        if self.intersects_stroke(from, to) {
            self.highlighted = true;

            if inking {
                self.completed = true;
                return true;
            }
        } else {
            self.highlighted = false;
        }

        false
    }
}

/// All cells of one letter, placed at a world-space origin.
#[derive(Clone, Debug)]
pub struct LetterGoal {
    character: char,
    cells: Vec<CellGoal>,
}

impl LetterGoal {
    pub fn new(character: char, origin: DVec2, scale: f64) -> Result<Self, MeshError> {
        let cells = letter_cells(character, scale)
            .into_iter()
            .map(|corners| CellGoal::new(corners.iter().map(|&p| p + origin).collect()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { character, cells })
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn cells(&self) -> &[CellGoal] {
        &self.cells
    }

    /// Returns true if any cell became completed this frame.
    pub fn update(&mut self, from: DVec2, to: DVec2, inking: bool) -> bool {
        let mut any = false;

        for cell in &mut self.cells {
            if cell.update(from, to, inking) {
                any = true;
            }
        }

        any
    }

    pub fn is_completed(&self) -> bool {
        self.cells.iter().all(CellGoal::completed)
    }
}

/// A whole practice word: letters laid out left to right on a baseline,
/// centered when the layout is narrower than the view.
#[derive(Clone, Debug)]
pub struct WordGoal {
    letters: Vec<LetterGoal>,
    width: f64,
}

impl WordGoal {
    /// Letters advance by `1.5 × scale`, spaces by `scale`. When the word is
    /// wider than `view_width` it is left-aligned with a fixed margin instead
    /// of centered.
    pub fn new(word: &str, baseline: f64, view_width: f64, scale: f64) -> Result<Self, MeshError> {
        let letter_advance = scale * 1.5;
        let space_advance = scale;

        let layout_width: f64 = word
            .chars()
            .map(|c| if c == ' ' { space_advance } else { letter_advance })
            .sum();

        let start_x = if layout_width < view_width {
            ((view_width - layout_width) / 2.0).floor()
        } else {
            50.0
        };

        let mut letters = Vec::new();
        let mut x = start_x;

        for character in word.chars() {
            if character == ' ' {
                x += space_advance;
                continue;
            }

            letters.push(LetterGoal::new(character, DVec2::new(x, baseline), scale)?);
            x += letter_advance;
        }

        Ok(Self {
            letters,
            width: (layout_width + 100.0).max(view_width),
        })
    }

    pub fn letters(&self) -> &[LetterGoal] {
        &self.letters
    }

    /// Scrollable width of the word, never smaller than the view.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns true if any cell became completed this frame.
    pub fn update(&mut self, from: DVec2, to: DVec2, inking: bool) -> bool {
        let mut any = false;

        for letter in &mut self.letters {
            if letter.update(from, to, inking) {
                any = true;
            }
        }

        any
    }

    pub fn is_completed(&self) -> bool {
        self.letters.iter().all(LetterGoal::is_completed)
    }

    /// Completed cells as a percentage of all cells, 0 for an empty word.
    pub fn progress(&self) -> f64 {
        let mut total = 0usize;
        let mut completed = 0usize;

        for letter in &self.letters {
            for cell in letter.cells() {
                total += 1;

                if cell.completed() {
                    completed += 1;
                }
            }
        }

        if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        }
    }

    /// Whether `point` lies on any cell of the word.
    pub fn contains_point(&self, point: DVec2) -> bool {
        self.letters
            .iter()
            .flat_map(|letter| letter.cells())
            .any(|cell| cell.intersects_stroke(point, point))
    }

    /// The cell whose centroid is nearest to `point`.
    pub fn closest_cell(&self, point: DVec2) -> Option<&CellGoal> {
        self.letters
            .iter()
            .flat_map(|letter| letter.cells())
            .min_by(|a, b| {
                a.centroid()
                    .distance_squared(point)
                    .total_cmp(&b.centroid().distance_squared(point))
            })
    }
}
