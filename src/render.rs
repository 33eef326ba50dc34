use std::collections::BTreeSet;

use crate::common::{Coord, Direction};
use crate::map::Map;

fn grid_rows(map: &Map) -> Vec<Vec<char>> {
    map.to_string()
        .lines()
        .map(|line| line.chars().collect())
        .collect()
}

fn draw(mut rows: Vec<Vec<char>>, path: &[Coord]) -> String {
    for pair in path.windows(2) {
        let (x, y) = pair[1];
        if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = Direction::between(pair[0], pair[1]).arrow();
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Grid text with every path cell after the first replaced by the arrow of
/// the move that entered it.
pub fn render_path(map: &Map, path: &[Coord]) -> String {
    draw(grid_rows(map), path)
}

/// Same as [`render_path`], with cells outside `explored` drawn as `.`.
pub fn render_search(map: &Map, path: &[Coord], explored: &BTreeSet<Coord>) -> String {
    let mut rows = grid_rows(map);
    for (y, row) in rows.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            if !explored.contains(&(x, y)) {
                *cell = '.';
            }
        }
    }
    draw(rows, path)
}
