use std::{fs, path::Path};

use anyhow::Context;
use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::grid::{Grid, Point};

/// Build a `rows` x `rows` barrier layout from an image.
///
/// The image is sampled at the center of every cell; dark pixels become barriers. Non-square
/// images are stretched to fit.
pub fn parse_img(img: &DynamicImage, rows: usize) -> Result<Grid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    if width == 0 || height == 0 {
        anyhow::bail!("image has no pixels");
    }

    let mut grid = Grid::build(rows, Grid::DEFAULT_WIDTH)?;

    for row in 0..rows {
        for col in 0..rows {
            let x = ((2 * col + 1) * width) / (2 * rows);
            let y = ((2 * row + 1) * height) / (2 * rows);
            let p = img.get_pixel(x as u32, y as u32);

            if p.0[0] < 128 {
                grid.set_barrier(Point { row, col })?;
            }
        }
    }

    Ok(grid)
}

/// Load a grid from disk.
///
/// `.txt` files are read as the ASCII layout understood by `Grid::from_str`, anything else is
/// opened as an image and sampled into `rows` rows.
pub fn load_map(path: &Path, rows: usize) -> Result<Grid, anyhow::Error> {
    debug!("loading map from {}", path.display());

    let is_text = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    if is_text {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let grid = text
            .parse::<Grid>()
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(grid)
    } else {
        let img =
            image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        parse_img(&img, rows)
    }
}

#[cfg(test)]
mod test {

    use image::{GrayImage, Luma};

    use super::*;
    use crate::grid::CellKind;

    #[test]
    fn test_parse_img() {
        // a 4x4 image with a black left column
        let img = GrayImage::from_fn(4, 4, |x, _| if x == 0 { Luma([0]) } else { Luma([255]) });
        let grid = parse_img(&DynamicImage::ImageLuma8(img), 4).unwrap();

        assert_eq!(grid.count(CellKind::Barrier), 4);
        assert_eq!(grid.kind(Point { row: 2, col: 0 }), CellKind::Barrier);
        assert_eq!(grid.kind(Point { row: 2, col: 1 }), CellKind::Empty);
    }

    #[test]
    fn test_parse_img_resamples() {
        // an 8x8 image sampled into 2x2 cells keeps the dark top-left quadrant
        let img = GrayImage::from_fn(8, 8, |x, y| {
            if x < 4 && y < 4 {
                Luma([10])
            } else {
                Luma([200])
            }
        });
        let grid = parse_img(&DynamicImage::ImageLuma8(img), 2).unwrap();
        assert_eq!(grid.to_string(), "#.\n..\n");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_map(Path::new("does/not/exist.txt"), 10).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.txt"));
    }
}
