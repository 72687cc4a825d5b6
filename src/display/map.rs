// src/display/map.rs
//! ASCII route sketch framed by a map region

use crate::geo::{Coordinate, MapRegion};

const PATH: char = '*';
const START: char = 'S';
const FINISH: char = 'F';

/// Plot a route into `height` rows of `width` characters.
///
/// The polyline is drawn with `*`, the first point is marked `S` and the
/// last `F`. Points outside the region are clamped to the border.
pub fn sketch_route(route: &[Coordinate], region: &MapRegion, width: usize, height: usize) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut grid = vec![vec![' '; width]; height];
    let cells: Vec<(usize, usize)> = route.iter().map(|c| to_cell(c, region, width, height)).collect();

    for pair in cells.windows(2) {
        draw_segment(&mut grid, pair[0], pair[1]);
    }
    if let Some(&(row, col)) = cells.last() {
        grid[row][col] = FINISH;
    }
    if let Some(&(row, col)) = cells.first() {
        grid[row][col] = START;
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn to_cell(coord: &Coordinate, region: &MapRegion, width: usize, height: usize) -> (usize, usize) {
    let x = fraction(coord.longitude - region.min_longitude(), region.longitude_delta);
    let y = fraction(region.max_latitude() - coord.latitude, region.latitude_delta);

    let col = (x * (width - 1) as f64).round() as usize;
    let row = (y * (height - 1) as f64).round() as usize;
    (row.min(height - 1), col.min(width - 1))
}

fn fraction(offset: f64, span: f64) -> f64 {
    if span > 0.0 {
        (offset / span).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

fn draw_segment(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize)) {
    let (r0, c0) = (from.0 as f64, from.1 as f64);
    let (r1, c1) = (to.0 as f64, to.1 as f64);
    let steps = (r1 - r0).abs().max((c1 - c0).abs()) as usize;

    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
        let row = (r0 + (r1 - r0) * t).round() as usize;
        let col = (c0 + (c1 - c0) * t).round() as usize;
        grid[row][col] = PATH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::frame_route;

    #[test]
    fn test_single_point_is_centered() {
        let route = [Coordinate::new(45.0, 7.0)];
        let region = frame_route(&route).unwrap();
        let sketch = sketch_route(&route, &region, 11, 5);

        assert_eq!(sketch.len(), 5);
        assert_eq!(sketch[2], "     S     ");
    }

    #[test]
    fn test_straight_line_east() {
        let route = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.05),
            Coordinate::new(0.0, 0.1),
        ];
        let region = frame_route(&route).unwrap();
        let sketch = sketch_route(&route, &region, 21, 3);

        let middle = &sketch[1];
        assert!(middle.starts_with(' '));
        assert!(middle.contains('S'));
        assert!(middle.contains('F'));
        assert!(middle.find('S').unwrap() < middle.find('F').unwrap());
        assert!(middle.contains("****"));
        assert!(sketch[0].trim().is_empty());
    }

    #[test]
    fn test_zero_size() {
        let route = [Coordinate::new(1.0, 1.0)];
        let region = frame_route(&route).unwrap();
        assert!(sketch_route(&route, &region, 0, 4).is_empty());
    }

    #[test]
    fn test_empty_route_draws_nothing() {
        let region = frame_route(&[Coordinate::new(1.0, 1.0)]).unwrap();
        let sketch = sketch_route(&[], &region, 4, 2);
        assert!(sketch.iter().all(|row| row.trim().is_empty()));
    }
}
