use assert2::check;
use glam::DVec2;
use crate::goal::{CellGoal, LetterGoal, WordGoal};
use crate::mesh::MeshError;

fn v(x: f64, y: f64) -> DVec2 {
    DVec2::new(x, y)
}

fn square_cell() -> CellGoal {
    CellGoal::new(vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)]).unwrap()
}

#[test]
fn cell_rejects_short_polygons() {
    let error = CellGoal::new(vec![v(0.0, 0.0), v(1.0, 0.0)]).unwrap_err();

    check!(error == MeshError::InsufficientPoints(2));
}

#[test]
fn cell_highlight_and_completion() {
    let mut cell = square_cell();

    check!(!cell.update(v(-5.0, 5.0), v(15.0, 5.0), false), "Hovering must not complete the cell.");
    check!(cell.highlighted() && !cell.completed());

    check!(cell.update(v(-5.0, 5.0), v(15.0, 5.0), true), "Inking across the cell completes it.");
    check!(cell.completed());

    check!(
        !cell.update(v(-5.0, 5.0), v(15.0, 5.0), true),
        "A completed cell must not report completion again."
    );
}

#[test]
fn cell_clears_highlight_on_miss() {
    let mut cell = square_cell();

    cell.update(v(-5.0, 5.0), v(15.0, 5.0), false);
    check!(cell.highlighted());

    cell.update(v(20.0, 20.0), v(30.0, 30.0), false);
    check!(!cell.highlighted());
}

#[test]
fn cell_centroid() {
    check!(square_cell().centroid() == v(5.0, 5.0));
}

#[test]
fn letter_tracks_its_cells() {
    let mut letter = LetterGoal::new('I', v(0.0, 0.0), 50.0).unwrap();

    check!(letter.character() == 'I');
    check!(letter.cells().len() == 13);
    check!(!letter.is_completed());

    // A point stroke inside the top-left cell completes exactly that cell.
    check!(letter.update(v(5.0, 5.0), v(5.0, 5.0), true));
    check!(letter.cells()[0].completed());
    check!(!letter.is_completed());
}

#[test]
fn word_layout() {
    let word = WordGoal::new("A B", 0.0, 800.0, 50.0).unwrap();

    check!(word.letters().len() == 2, "Spaces advance the cursor without creating a letter.");
    check!(word.width() == 800.0, "A short word still spans the full view.");

    let wide = WordGoal::new("AAA", 0.0, 100.0, 50.0).unwrap();

    check!(wide.width() == 325.0, "A wide word extends past the view plus margin.");
}

#[test]
fn word_centers_its_letters() {
    let word = WordGoal::new("I", 100.0, 800.0, 50.0).unwrap();

    // Layout is 75 wide, so the letter starts at floor((800 - 75) / 2).
    let first_corner = word.letters()[0].cells()[0].polygon()[0];

    check!(first_corner == v(362.0, 100.0));
}

#[test]
fn word_progress_runs_to_completion() {
    let mut word = WordGoal::new("I", 0.0, 800.0, 50.0).unwrap();

    check!(word.progress() == 0.0);
    check!(!word.is_completed());

    let centroids = word
        .letters()
        .iter()
        .flat_map(|letter| letter.cells())
        .map(|cell| cell.centroid())
        .collect::<Vec<_>>();

    for centroid in centroids {
        word.update(centroid, centroid, true);
    }

    check!(word.progress() == 100.0);
    check!(word.is_completed());
}

#[test]
fn word_point_coverage() {
    let word = WordGoal::new("I", 0.0, 800.0, 50.0).unwrap();
    let inside = word.letters()[0].cells()[0].centroid();

    check!(word.contains_point(inside));
    check!(!word.contains_point(v(-1000.0, -1000.0)));
}

#[test]
fn word_closest_cell() {
    let word = WordGoal::new("I", 0.0, 800.0, 50.0).unwrap();
    let target = word.letters()[0].cells()[3].centroid();
    let closest = word.closest_cell(target).unwrap();

    check!(closest.centroid() == target);
}

#[test]
fn empty_word() {
    let word = WordGoal::new("", 0.0, 800.0, 50.0).unwrap();

    check!(word.letters().is_empty());
    check!(word.progress() == 0.0);
    check!(word.is_completed(), "An empty word has nothing left to complete.");
    check!(word.closest_cell(v(0.0, 0.0)).is_none());
}
