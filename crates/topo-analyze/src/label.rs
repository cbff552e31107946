//! Connected-component labeling and per-component hole counting.
//!
//! Both material components and holes use 8-connectivity. Holes are scoped to
//! the bounding box of the component that encloses them, so a hole always
//! belongs to exactly one component.

use topo_core::{BinaryImage, Bounds};

/// Offsets of the 8-connected neighbourhood.
const NEIGHBORS_8: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A maximal 8-connected region of material pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Label in the label grid (1-based; 0 is background).
    pub label: u32,
    /// First pixel of the component in row-major order.
    pub seed: (u32, u32),
    pub bounds: Bounds,
    pub pixel_count: usize,
}

/// A region of non-member pixels enclosed by a single component.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    /// Label of the enclosing component.
    pub component: u32,
    /// First pixel of the hole in row-major order.
    pub seed: (u32, u32),
    /// Pixels in the hole, including any nested components it contains.
    pub pixel_count: usize,
}

/// Zeroth and first Betti numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BettiNumbers {
    pub beta0: usize,
    pub beta1: usize,
}

impl BettiNumbers {
    /// Euler-Poincaré characteristic `β0 - β1`.
    pub fn euler(&self) -> i64 {
        self.beta0 as i64 - self.beta1 as i64
    }
}

/// Result of labeling an image: label grid, components and their holes.
#[derive(Debug, Clone)]
pub struct Labeling {
    width: u32,
    height: u32,
    labels: Vec<u32>,
    components: Vec<Component>,
    holes: Vec<Hole>,
}

impl Labeling {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major label grid; 0 marks pore.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Components in row-major order of their seed pixel.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// All holes, grouped by component and in row-major order within each.
    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    /// Holes enclosed by one component.
    pub fn holes_of(&self, label: u32) -> impl Iterator<Item = &Hole> + '_ {
        self.holes.iter().filter(move |h| h.component == label)
    }

    pub fn label_at(&self, x: u32, y: u32) -> u32 {
        self.labels[(y * self.width + x) as usize]
    }

    /// Whether the signed coordinate lies inside the grid and belongs to `label`.
    #[inline]
    pub fn is_member(&self, label: u32, x: i64, y: i64) -> bool {
        x >= 0
            && y >= 0
            && x < self.width as i64
            && y < self.height as i64
            && self.labels[(y as u32 * self.width + x as u32) as usize] == label
    }

    pub fn betti(&self) -> BettiNumbers {
        BettiNumbers {
            beta0: self.components.len(),
            beta1: self.holes.len(),
        }
    }
}

/// Compute β0 and β1 of an image.
pub fn betti_numbers(image: &BinaryImage) -> BettiNumbers {
    label_components(image).betti()
}

/// Label the material components of an image and find the holes of each.
pub fn label_components(image: &BinaryImage) -> Labeling {
    let width = image.width();
    let height = image.height();

    // A pore border keeps the exterior background a single connected region.
    let padded = image.padded(1);
    let (padded_labels, regions) = label_regions(padded.pixels(), padded.width(), padded.height());

    let mut labels = vec![0u32; (width * height) as usize];
    for y in 0..height {
        let src = ((y + 1) * padded.width() + 1) as usize;
        let dst = (y * width) as usize;
        labels[dst..dst + width as usize]
            .copy_from_slice(&padded_labels[src..src + width as usize]);
    }

    let components: Vec<Component> = regions
        .into_iter()
        .map(|r| Component {
            label: r.label,
            seed: (r.seed.0 - 1, r.seed.1 - 1),
            bounds: Bounds::new(r.bounds.x - 1, r.bounds.y - 1, r.bounds.width, r.bounds.height),
            pixel_count: r.pixel_count,
        })
        .collect();

    let holes = components
        .iter()
        .flat_map(|c| find_holes(&labels, width, height, c))
        .collect();

    Labeling {
        width,
        height,
        labels,
        components,
        holes,
    }
}

/// A labeled region of a mask.
#[derive(Debug)]
struct Region {
    label: u32,
    seed: (u32, u32),
    bounds: Bounds,
    pixel_count: usize,
    touches_border: bool,
}

/// Label the 8-connected `true` regions of a mask in row-major seed order.
fn label_regions(mask: &[bool], width: u32, height: u32) -> (Vec<u32>, Vec<Region>) {
    let mut labels = vec![0u32; mask.len()];
    let mut regions = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            if mask[idx] && labels[idx] == 0 {
                let label = regions.len() as u32 + 1;
                regions.push(flood_fill(mask, width, height, x, y, label, &mut labels));
            }
        }
    }

    (labels, regions)
}

/// Flood fill one 8-connected region from a seed pixel.
fn flood_fill(
    mask: &[bool],
    width: u32,
    height: u32,
    start_x: u32,
    start_y: u32,
    label: u32,
    labels: &mut [u32],
) -> Region {
    let mut stack = vec![(start_x, start_y)];
    let mut bounds = Bounds::at(start_x, start_y);
    let mut pixel_count = 0usize;
    let mut touches_border = false;

    while let Some((x, y)) = stack.pop() {
        let idx = (y * width + x) as usize;

        if labels[idx] != 0 || !mask[idx] {
            continue;
        }

        labels[idx] = label;
        bounds.expand_to(x, y);
        pixel_count += 1;

        if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
            touches_border = true;
        }

        for (dx, dy) in NEIGHBORS_8 {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx >= 0 && nx < width as i64 && ny >= 0 && ny < height as i64 {
                stack.push((nx as u32, ny as u32));
            }
        }
    }

    Region {
        label,
        seed: (start_x, start_y),
        bounds,
        pixel_count,
        touches_border,
    }
}

/// Find the holes of one component inside its bounding box grown by one pixel.
///
/// Every pixel of the window that is not part of the component (pore, pixels
/// outside the image, or pixels of other components) is complement. Complement
/// regions that reach the window border are exterior; the rest are holes.
fn find_holes(labels: &[u32], width: u32, height: u32, component: &Component) -> Vec<Hole> {
    let bounds = component.bounds;
    let origin_x = bounds.x as i64 - 1;
    let origin_y = bounds.y as i64 - 1;
    let window_w = bounds.width + 2;
    let window_h = bounds.height + 2;

    let mut complement = Vec::with_capacity((window_w * window_h) as usize);
    for wy in 0..window_h {
        for wx in 0..window_w {
            let gx = origin_x + wx as i64;
            let gy = origin_y + wy as i64;
            let member = gx >= 0
                && gy >= 0
                && gx < width as i64
                && gy < height as i64
                && labels[(gy as u32 * width + gx as u32) as usize] == component.label;
            complement.push(!member);
        }
    }

    let (_, regions) = label_regions(&complement, window_w, window_h);

    regions
        .into_iter()
        .filter(|r| !r.touches_border)
        .map(|r| Hole {
            component: component.label,
            seed: (
                (origin_x + r.seed.0 as i64) as u32,
                (origin_y + r.seed.1 as i64) as u32,
            ),
            pixel_count: r.pixel_count,
        })
        .collect()
}
