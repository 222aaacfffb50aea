//! Grid layout engine.
//!
//! Pure function of its inputs: tiles go into cells in row-major order,
//! each resized to exactly one cell. Cells left over when there are
//! fewer tiles than cells keep the black background.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::error::Result;
use crate::models::{CellSize, GridSpec};

/// Canvas colour behind unfilled cells.
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// A composed collage, owned by the caller.
#[derive(Debug, Clone)]
pub struct Collage {
    image: RgbImage,
    grid: GridSpec,
    cell: CellSize,
}

impl Collage {
    /// Width in pixels (`cols * cell width`).
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels (`rows * cell height`).
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Top-left pixel of the cell at `(row, col)`.
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (col * self.cell.width, row * self.cell.height)
    }

    /// Write the collage to disk; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Arrange `images` on a `grid` of `cell`-sized tiles.
///
/// Image `i` lands in cell `(i / cols, i % cols)`. Images beyond the
/// grid's capacity are ignored.
pub fn compose(images: &[DynamicImage], grid: GridSpec, cell: CellSize) -> Collage {
    let mut canvas = RgbImage::from_pixel(
        grid.cols() * cell.width,
        grid.rows() * cell.height,
        BACKGROUND_COLOR,
    );

    for (index, image) in (0u32..).zip(images) {
        let Some((row, col)) = grid.cell_of(index) else {
            debug!("Dropping {} images beyond grid capacity", images.len() as u32 - index);
            break;
        };
        let tile = fit_to_cell(image, cell);
        imageops::replace(
            &mut canvas,
            &tile,
            i64::from(col * cell.width),
            i64::from(row * cell.height),
        );
    }

    Collage {
        image: canvas,
        grid,
        cell,
    }
}

/// Resize to exactly the cell size, ignoring aspect ratio.
fn fit_to_cell(image: &DynamicImage, cell: CellSize) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == (cell.width, cell.height) {
        return rgb;
    }
    imageops::resize(&rgb, cell.width, cell.height, FilterType::Triangle)
}
