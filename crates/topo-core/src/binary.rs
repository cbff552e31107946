//! Binary material/pore images.
//!
//! A [`BinaryImage`] is the only input the invariant engine accepts. It is a
//! dense, row-major grid where `true` marks a material pixel and `false` a
//! pore pixel. Coordinates are `(x, y)` = (column, row) with the origin at the
//! top-left corner and `y` growing downward.

use std::fmt;

use crate::errors::{Result, TopoError};

/// Threshold used to reduce floating-point levels to material (`> 0.5`).
pub const DEFAULT_LEVEL_THRESHOLD: f32 = 0.5;

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// A 1x1 box around a single pixel.
    pub fn at(x: u32, y: u32) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Expand bounds to include a point.
    pub fn expand_to(&mut self, px: u32, py: u32) {
        let x2 = self.x + self.width;
        let y2 = self.y + self.height;

        self.x = self.x.min(px);
        self.y = self.y.min(py);
        self.width = x2.max(px + 1) - self.x;
        self.height = y2.max(py + 1) - self.y;
    }
}

/// A 2-D grid of material (`true`) and pore (`false`) pixels.
///
/// Construction validates the shape; once built the image is never mutated
/// by the engine. Operations that need a modified grid (padding, morphology)
/// return a new image.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryImage {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl BinaryImage {
    /// Build an image from a row-major pixel buffer.
    pub fn new(width: u32, height: u32, pixels: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TopoError::shape(format!(
                "image is {width}x{height}; both dimensions must be non-zero"
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                TopoError::shape(format!("{width}x{height} overflows the pixel count"))
            })?;

        if pixels.len() != expected {
            return Err(TopoError::shape(format!(
                "buffer holds {} pixels, expected {width}x{height} = {expected}",
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// An image where every pixel has the same value.
    pub fn filled(width: u32, height: u32, material: bool) -> Result<Self> {
        let len = (width as usize).saturating_mul(height as usize);
        Self::new(width, height, vec![material; len])
    }

    /// Build an image from boolean rows. Rows must all have the same length.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        collect_rows(rows, |_, _, &value| Ok(value))
    }

    /// Build an image from floating-point rows, thresholding each level with
    /// `level > threshold`. Non-finite levels are rejected.
    pub fn from_levels<R: AsRef<[f32]>>(rows: &[R], threshold: f32) -> Result<Self> {
        collect_rows(rows, |x, y, &level| {
            if level.is_finite() {
                Ok(level > threshold)
            } else {
                Err(TopoError::InvalidImageValues {
                    x,
                    y,
                    value: level.to_string(),
                })
            }
        })
    }

    /// Build an image from a strictly binary buffer: every value must be 0 or 1.
    pub fn from_binary_values(width: u32, height: u32, values: &[u8]) -> Result<Self> {
        let mut pixels = Vec::with_capacity(values.len());

        for (idx, &value) in values.iter().enumerate() {
            match value {
                0 => pixels.push(false),
                1 => pixels.push(true),
                other => {
                    let w = width.max(1) as usize;
                    return Err(TopoError::InvalidImageValues {
                        x: (idx % w) as u32,
                        y: (idx / w) as u32,
                        value: other.to_string(),
                    });
                }
            }
        }

        Self::new(width, height, pixels)
    }

    /// Build an image from text rows: `#` or `1` is material, `.` or `0` is pore.
    pub fn from_art<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let chars: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();
        collect_rows(&chars, |x, y, &c| match c {
            '#' | '1' => Ok(true),
            '.' | '0' => Ok(false),
            other => Err(TopoError::InvalidImageValues {
                x,
                y,
                value: format!("{other:?}"),
            }),
        })
    }

    /// Decode an encoded raster (PNG) and threshold its gray levels with
    /// `gray > threshold`.
    pub fn decode(bytes: &[u8], threshold: u8) -> Result<Self> {
        let img =
            image::load_from_memory(bytes).map_err(|e| TopoError::ImageDecode(e.to_string()))?;

        let gray = img.to_luma8();
        let (width, height) = gray.dimensions();
        let pixels = gray.pixels().map(|p| p.0[0] > threshold).collect();

        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel buffer.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Pixel value at `(x, y)`. Panics if the coordinate is out of bounds.
    pub fn get(&self, x: u32, y: u32) -> bool {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[(y * self.width + x) as usize]
    }

    /// Pixel value at a signed coordinate; anything outside the grid is pore.
    #[inline]
    pub fn at(&self, x: i64, y: i64) -> bool {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            self.pixels[(y as u32 * self.width + x as u32) as usize]
        } else {
            false
        }
    }

    /// Number of material pixels.
    pub fn material_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// `Some(value)` if every pixel holds the same value.
    pub fn uniform_value(&self) -> Option<bool> {
        let first = self.pixels[0];
        self.pixels.iter().all(|&p| p == first).then_some(first)
    }

    /// A copy surrounded by `border` rows/columns of pore.
    pub fn padded(&self, border: u32) -> Self {
        let width = self.width + 2 * border;
        let height = self.height + 2 * border;
        let mut pixels = vec![false; (width * height) as usize];

        for y in 0..self.height {
            let src = (y * self.width) as usize;
            let dst = ((y + border) * width + border) as usize;
            pixels[dst..dst + self.width as usize]
                .copy_from_slice(&self.pixels[src..src + self.width as usize]);
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// A same-shaped image whose pixels are computed from their coordinates.
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(f(x, y));
            }
        }

        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

impl fmt::Display for BinaryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.pixels.chunks(self.width as usize) {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for BinaryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("material", &self.material_count())
            .finish()
    }
}

/// Collect rectangular rows into an image, converting each cell with `convert`.
fn collect_rows<R, T, F>(rows: &[R], mut convert: F) -> Result<BinaryImage>
where
    R: AsRef<[T]>,
    F: FnMut(u32, u32, &T) -> Result<bool>,
{
    let height = u32::try_from(rows.len()).map_err(|_| TopoError::shape("too many rows"))?;
    let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    let width = u32::try_from(width).map_err(|_| TopoError::shape("rows are too long"))?;

    let mut pixels = Vec::with_capacity(width as usize * height as usize);

    for (y, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != width as usize {
            return Err(TopoError::shape(format!(
                "row {y} has {} cells, expected {width}",
                row.len()
            )));
        }

        for (x, cell) in row.iter().enumerate() {
            pixels.push(convert(x as u32, y as u32, cell)?);
        }
    }

    BinaryImage::new(width, height, pixels)
}
