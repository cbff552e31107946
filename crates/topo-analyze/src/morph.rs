//! Morphological preprocessing.
//!
//! - **Dilate**: grow material
//! - **Erode**: shrink material
//! - **Open**: erode then dilate (removes isolated specks)
//! - **Close**: dilate then erode (fills pinholes and cracks)
//!
//! All operations use a square kernel. Kernel pixels outside the image are
//! ignored, so material touching the image edge is not eroded by it.

use topo_core::BinaryImage;

/// Whether `test` holds for any in-bounds pixel of the kernel centred on `(x, y)`.
fn any_in_kernel(
    image: &BinaryImage,
    x: u32,
    y: u32,
    kernel_size: u32,
    test: impl Fn(bool) -> bool,
) -> bool {
    let half = (kernel_size / 2) as i64;
    let (w, h) = (image.width() as i64, image.height() as i64);

    for ky in -half..=half {
        for kx in -half..=half {
            let nx = x as i64 + kx;
            let ny = y as i64 + ky;
            if nx >= 0 && nx < w && ny >= 0 && ny < h && test(image.get(nx as u32, ny as u32)) {
                return true;
            }
        }
    }

    false
}

/// Dilate: a pixel becomes material if any kernel neighbour is material.
pub fn dilate(image: &BinaryImage, kernel_size: u32) -> BinaryImage {
    image.map(|x, y| any_in_kernel(image, x, y, kernel_size, |p| p))
}

/// Erode: a pixel stays material only if every in-bounds kernel neighbour is.
pub fn erode(image: &BinaryImage, kernel_size: u32) -> BinaryImage {
    image.map(|x, y| image.get(x, y) && !any_in_kernel(image, x, y, kernel_size, |p| !p))
}

pub fn open(image: &BinaryImage, kernel_size: u32) -> BinaryImage {
    dilate(&erode(image, kernel_size), kernel_size)
}

pub fn close(image: &BinaryImage, kernel_size: u32) -> BinaryImage {
    erode(&dilate(image, kernel_size), kernel_size)
}

/// Opening followed by closing.
pub fn denoise(image: &BinaryImage, kernel_size: u32) -> BinaryImage {
    close(&open(image, kernel_size), kernel_size)
}
