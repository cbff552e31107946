//! Deterministic shape builders for integration tests.

#![allow(dead_code)]

use topo_analyze::BinaryImage;

/// A mutable pixel grid that shapes are painted onto.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    fn paint(mut self, value: bool, inside: impl Fn(i64, i64) -> bool) -> Self {
        for y in 0..self.height {
            for x in 0..self.width {
                if inside(x as i64, y as i64) {
                    self.pixels[(y * self.width + x) as usize] = value;
                }
            }
        }
        self
    }

    /// Closed disk `(x - cx)^2 + (y - cy)^2 <= r^2`.
    pub fn disk(self, cx: i64, cy: i64, r: i64) -> Self {
        self.paint(true, move |x, y| in_disk(x, y, cx, cy, r))
    }

    pub fn clear_disk(self, cx: i64, cy: i64, r: i64) -> Self {
        self.paint(false, move |x, y| in_disk(x, y, cx, cy, r))
    }

    /// Half-open rectangle `[x0, x1) x [y0, y1)`.
    pub fn rect(self, x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        self.paint(true, move |x, y| x >= x0 && x < x1 && y >= y0 && y < y1)
    }

    pub fn clear_rect(self, x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        self.paint(false, move |x, y| x >= x0 && x < x1 && y >= y0 && y < y1)
    }

    pub fn build(self) -> BinaryImage {
        BinaryImage::new(self.width, self.height, self.pixels).unwrap()
    }
}

fn in_disk(x: i64, y: i64, cx: i64, cy: i64, r: i64) -> bool {
    (x - cx).pow(2) + (y - cy).pow(2) <= r * r
}

/// A filled disk centred in a square image with a 5-pixel margin.
pub fn disk(radius: i64) -> BinaryImage {
    let size = (2 * radius + 11) as u32;
    let c = radius + 5;
    Canvas::new(size, size).disk(c, c, radius).build()
}

/// A ring between two concentric radii.
pub fn annulus(outer: i64, inner: i64) -> BinaryImage {
    let size = (2 * outer + 11) as u32;
    let c = outer + 5;
    Canvas::new(size, size)
        .disk(c, c, outer)
        .clear_disk(c, c, inner)
        .build()
}

/// Hole centres used by [`disk_with_holes`].
pub const HOLE_CENTRES: [(i64, i64); 5] = [(20, 20), (40, 20), (20, 40), (40, 40), (30, 30)];

/// A radius-25 disk in a 60x60 image with `k` radius-4 holes punched out.
pub fn disk_with_holes(k: usize) -> BinaryImage {
    HOLE_CENTRES
        .iter()
        .take(k)
        .fold(Canvas::new(60, 60).disk(30, 30, 25), |canvas, &(x, y)| {
            canvas.clear_disk(x, y, 4)
        })
        .build()
}

/// Disk centres used by [`separate_disks`].
pub const DISK_CENTRES: [(i64, i64); 5] = [(10, 10), (30, 10), (50, 10), (10, 40), (40, 45)];

/// `n` disjoint radius-6 disks in a 60x60 image.
pub fn separate_disks(n: usize) -> BinaryImage {
    DISK_CENTRES
        .iter()
        .take(n)
        .fold(Canvas::new(60, 60), |canvas, &(x, y)| canvas.disk(x, y, 6))
        .build()
}
