//! Cell-complex counts and the lattice-vertex census.
//!
//! Each material pixel is a closed unit square. The complex is the union of
//! those squares: `F` is the number of squares, `E` the number of distinct unit
//! sides and `V` the number of distinct lattice corners.

use serde::{Deserialize, Serialize};
use topo_core::BinaryImage;

/// Side neighbours; the first two close a shared edge once per pair.
const SIDES: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Vertex, edge and face counts of the material complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

impl CellCounts {
    /// `V - E + F`.
    pub fn euler(&self) -> i64 {
        self.vertices as i64 - self.edges as i64 + self.faces as i64
    }
}

/// Count the cells of the material complex.
pub fn count_cells(image: &BinaryImage) -> CellCounts {
    let mut faces = 0;
    let mut edges = 0;

    for y in 0..image.height() {
        for x in 0..image.width() {
            if !image.get(x, y) {
                continue;
            }
            faces += 1;

            for (dx, dy) in SIDES {
                let neighbor = image.at(x as i64 + dx, y as i64 + dy);
                if !neighbor || dx + dy > 0 {
                    edges += 1;
                }
            }
        }
    }

    let mut vertices = 0;
    for_each_vertex(image, |quad| {
        if quad.iter().any(|&p| p) {
            vertices += 1;
        }
    });

    CellCounts {
        vertices,
        edges,
        faces,
    }
}

/// Histogram of the 2x2 pixel neighbourhoods around every lattice vertex.
///
/// `qN` counts vertices touching exactly N material pixels, except that the
/// two diagonal two-pixel patterns are counted in `qd` instead of `q2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VertexCensus {
    pub q1: usize,
    pub q2: usize,
    pub q3: usize,
    pub q4: usize,
    pub qd: usize,
}

impl VertexCensus {
    /// Euler number for 8-connected material (4-connected pore).
    ///
    /// Equal to `V - E + F` of the closed-square complex.
    pub fn euler_8(&self) -> f64 {
        (self.q1 as f64 - self.q3 as f64 - 2.0 * self.qd as f64) / 4.0
    }

    /// Euler number for 4-connected material (8-connected pore).
    pub fn euler_4(&self) -> f64 {
        (self.q1 as f64 - self.q3 as f64 + 2.0 * self.qd as f64) / 4.0
    }
}

/// Classify every lattice vertex of the image, including the outer frame.
pub fn vertex_census(image: &BinaryImage) -> VertexCensus {
    let mut census = VertexCensus::default();

    for_each_vertex(image, |[nw, ne, sw, se]| {
        let count = [nw, ne, sw, se].iter().filter(|&&p| p).count();
        match count {
            1 => census.q1 += 1,
            2 if (nw && se) || (ne && sw) => census.qd += 1,
            2 => census.q2 += 1,
            3 => census.q3 += 1,
            4 => census.q4 += 1,
            _ => {}
        }
    });

    census
}

/// Visit the four pixels `[nw, ne, sw, se]` around each of the
/// `(width + 1) * (height + 1)` lattice vertices.
fn for_each_vertex<F>(image: &BinaryImage, mut visit: F)
where
    F: FnMut([bool; 4]),
{
    for vy in 0..=image.height() as i64 {
        for vx in 0..=image.width() as i64 {
            visit([
                image.at(vx - 1, vy - 1),
                image.at(vx, vy - 1),
                image.at(vx - 1, vy),
                image.at(vx, vy),
            ]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(rows: &[&str]) -> BinaryImage {
        BinaryImage::from_art(rows).unwrap()
    }

    fn counts(v: usize, e: usize, f: usize) -> CellCounts {
        CellCounts {
            vertices: v,
            edges: e,
            faces: f,
        }
    }

    #[test]
    fn test_single_pixel() {
        assert_eq!(count_cells(&art(&["#"])), counts(4, 4, 1));
    }

    #[test]
    fn test_square_block() {
        let cells = count_cells(&art(&["##", "##"]));
        assert_eq!(cells, counts(9, 12, 4));
        assert_eq!(cells.euler(), 1);
    }

    #[test]
    fn test_full_rectangle() {
        let cells = count_cells(&BinaryImage::filled(4, 3, true).unwrap());
        assert_eq!(cells, counts(20, 31, 12));
        assert_eq!(cells.euler(), 1);
    }

    #[test]
    fn test_all_pore_is_empty() {
        assert_eq!(count_cells(&BinaryImage::filled(3, 3, false).unwrap()), counts(0, 0, 0));
        assert_eq!(
            vertex_census(&BinaryImage::filled(3, 3, false).unwrap()),
            VertexCensus::default()
        );
    }

    #[test]
    fn test_ring() {
        let cells = count_cells(&art(&["###", "#.#", "###"]));
        assert_eq!(cells, counts(16, 24, 8));
        assert_eq!(cells.euler(), 0);
    }

    #[test]
    fn test_diagonal_pixels_share_corners() {
        let cells = count_cells(&art(&["#..", ".#.", "..#"]));
        assert_eq!(cells, counts(10, 12, 3));
        assert_eq!(cells.euler(), 1);
    }

    #[test]
    fn test_diamond_encloses_a_four_connected_hole() {
        let img = art(&[".#.", "#.#", ".#."]);
        let cells = count_cells(&img);
        assert_eq!(cells, counts(12, 16, 4));
        assert_eq!(cells.euler(), 0);

        let census = vertex_census(&img);
        assert_eq!(
            census,
            VertexCensus {
                q1: 8,
                q2: 0,
                q3: 0,
                q4: 0,
                qd: 4
            }
        );
        assert_eq!(census.euler_8(), 0.0);
        assert_eq!(census.euler_4(), 4.0);
    }

    #[test]
    fn test_census_matches_cell_counts() {
        for rows in [
            vec!["#"],
            vec!["##", "##"],
            vec!["###", "#.#", "###"],
            vec!["#####", "#...#", "#.#.#", "#...#", "#####"],
            vec!["##.##", "#..##"],
        ] {
            let img = art(&rows);
            assert_eq!(
                vertex_census(&img).euler_8(),
                count_cells(&img).euler() as f64,
                "{img}"
            );
        }
    }

    #[test]
    fn test_nested_census() {
        let census = vertex_census(&art(&[
            "#####",
            "#...#",
            "#.#.#",
            "#...#",
            "#####",
        ]));
        assert_eq!(census.q1, 8);
        assert_eq!(census.q2, 24);
        assert_eq!(census.q3, 4);
        assert_eq!(census.euler_8(), 1.0);
    }
}
