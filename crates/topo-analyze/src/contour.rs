//! Border following and Freeman chain coding.
//!
//! Borders are traced on the label grid produced by
//! [`label_components`](crate::label::label_components), one component at a
//! time: the outer border first, then the border of each of its holes. The
//! tracer is an 8-connected border follower that turns counter-clockwise (on
//! screen) around each border pixel, so outer borders and hole borders run in
//! opposite senses.

use topo_core::{BinaryImage, Result, TopoError};
use tracing::{trace, warn};

use crate::label::{label_components, Labeling};

/// Direction offsets `(dx, dy)` indexed by Freeman code.
/// 0=E, 1=NE, 2=N, 3=NW, 4=W, 5=SW, 6=S, 7=SE (y grows downward)
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),   // 0: E
    (1, -1),  // 1: NE
    (0, -1),  // 2: N
    (-1, -1), // 3: NW
    (-1, 0),  // 4: W
    (-1, 1),  // 5: SW
    (0, 1),   // 6: S
    (1, 1),   // 7: SE
];

/// One of the eight Freeman directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction8 {
    East = 0,
    NorthEast = 1,
    North = 2,
    NorthWest = 3,
    West = 4,
    SouthWest = 5,
    South = 6,
    SouthEast = 7,
}

impl Direction8 {
    pub const ALL: [Direction8; 8] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// Direction for a code, taken modulo 8.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> (i64, i64) {
        DIRECTIONS[self.index()]
    }

    /// Direction of a unit step between 8-adjacent pixels.
    pub fn from_step(dx: i64, dy: i64) -> Option<Self> {
        DIRECTIONS
            .iter()
            .position(|&d| d == (dx, dy))
            .map(Self::from_index)
    }

    /// The Freeman code digit.
    pub fn symbol(self) -> char {
        char::from(b'0' + self as u8)
    }
}

/// Which side of a component a border separates it from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

/// A traced border: a closed sequence of 8-adjacent pixels.
///
/// The last point is adjacent to the first; the closing step is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Label of the component the border belongs to.
    pub component: u32,
    pub kind: BorderKind,
    pub points: Vec<(u32, u32)>,
}

impl Contour {
    /// Area enclosed by the pixel-centre polygon (shoelace formula).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut sum = 0.0f64;
        for i in 0..n {
            let (x1, y1) = self.points[i];
            let (x2, y2) = self.points[(i + 1) % n];
            sum += (x1 as f64) * (y2 as f64);
            sum -= (x2 as f64) * (y1 as f64);
        }

        sum.abs() / 2.0
    }

    /// Freeman code of the closed border, including the step from the last
    /// point back to the first.
    pub fn chain_code(&self) -> String {
        let n = self.points.len();
        if n < 2 {
            return String::new();
        }

        (0..n)
            .filter_map(|i| {
                let (x1, y1) = self.points[i];
                let (x2, y2) = self.points[(i + 1) % n];
                Direction8::from_step(x2 as i64 - x1 as i64, y2 as i64 - y1 as i64)
            })
            .map(Direction8::symbol)
            .collect()
    }
}

/// Follow the border of component `label` starting at `start`.
///
/// `background` must point from `start` to a non-member pixel; the border is
/// followed with that pixel on its outside. Returns the border pixels in
/// traversal order, or just `[start]` for an isolated pixel.
pub fn trace_border(
    labeling: &Labeling,
    label: u32,
    start: (u32, u32),
    background: Direction8,
) -> Vec<(u32, u32)> {
    let inside = |p: (i64, i64)| labeling.is_member(label, p.0, p.1);
    let step = |p: (i64, i64), dir: usize| {
        let (dx, dy) = Direction8::from_index(dir).offset();
        (p.0 + dx, p.1 + dy)
    };

    let origin = (start.0 as i64, start.1 as i64);
    let bg = background.index();

    // Clockwise from the background neighbour: the first member found is the
    // pixel the border arrives from when it closes.
    let Some(mut dir) = (1..8)
        .map(|k| (bg + 8 - k) % 8)
        .find(|&d| inside(step(origin, d)))
    else {
        return vec![start];
    };
    let last = step(origin, dir);

    let mut points = vec![start];
    let mut current = origin;
    let limit = 4 * labeling.labels().len() + 8;

    loop {
        // Counter-clockwise from just past the pixel we came from; that pixel
        // itself (k = 8) is always a member.
        let next_dir = (1..=8)
            .map(|k| (dir + k) % 8)
            .find(|&d| inside(step(current, d)))
            .unwrap_or(dir);
        let next = step(current, next_dir);

        if next == origin && current == last {
            break;
        }

        points.push((next.0 as u32, next.1 as u32));
        current = next;
        dir = (next_dir + 4) % 8;

        // Safety: prevent infinite loops
        if points.len() > limit {
            warn!(label, ?start, "border did not close; truncating");
            break;
        }
    }

    points
}

/// Trace every border of a labeled image.
///
/// Components are visited in label order. Each contributes its outer border,
/// then the borders of its holes in row-major order of the hole seeds.
pub fn find_contours(labeling: &Labeling) -> Vec<Contour> {
    let mut contours = Vec::with_capacity(labeling.components().len() + labeling.holes().len());

    for component in labeling.components() {
        contours.push(Contour {
            component: component.label,
            kind: BorderKind::Outer,
            points: trace_border(labeling, component.label, component.seed, Direction8::West),
        });

        for hole in labeling.holes_of(component.label) {
            // The pixel above a hole's first pixel is always on the component.
            let start = (hole.seed.0, hole.seed.1.saturating_sub(1));
            contours.push(Contour {
                component: component.label,
                kind: BorderKind::Hole,
                points: trace_border(labeling, component.label, start, Direction8::South),
            });
        }
    }

    contours
}

/// Freeman chain codes of every usable border of an image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreemanChain {
    /// One F8 code per border, in tracing order.
    pub codes: Vec<String>,
    /// Borders with fewer than two points (isolated pixels).
    pub skipped: usize,
    /// Borders that enclose no area (one-pixel-wide strokes).
    pub flat: usize,
}

impl FreemanChain {
    /// All codes concatenated.
    pub fn code(&self) -> String {
        self.codes.concat()
    }

    /// Total number of direction symbols.
    pub fn len(&self) -> usize {
        self.codes.iter().map(String::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(String::is_empty)
    }
}

/// Trace an image and encode its borders.
pub fn freeman_chain(image: &BinaryImage) -> FreemanChain {
    freeman_chain_from(&label_components(image))
}

/// Encode the borders of an already labeled image.
pub fn freeman_chain_from(labeling: &Labeling) -> FreemanChain {
    let mut chain = FreemanChain::default();

    for (index, contour) in find_contours(labeling).iter().enumerate() {
        match encode_contour(index, contour) {
            Ok(Some(code)) => chain.codes.push(code),
            Ok(None) => {
                trace!(index, points = contour.points.len(), "skipping flat contour");
                chain.flat += 1;
            }
            Err(err) => {
                warn!(%err, "skipping contour");
                chain.skipped += 1;
            }
        }
    }

    chain
}

fn encode_contour(index: usize, contour: &Contour) -> Result<Option<String>> {
    if contour.points.len() < 2 {
        return Err(TopoError::EmptyContour {
            index,
            points: contour.points.len(),
        });
    }

    if contour.area() <= 0.0 {
        return Ok(None);
    }

    Ok(Some(contour.chain_code()))
}
