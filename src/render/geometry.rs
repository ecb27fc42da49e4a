//! Output grid geometry: fit the image into a character grid with aspect skew.
//!
//! ## Why skew?
//!
//! A character cell in a proportional-ish monospace rendering is roughly 7:4
//! tall. Mapping image pixels 1:1 to cells would squash the picture
//! vertically, so the column count is widened by the skew factor to
//! compensate. The default 1.75 matches the original edition's typesetting.

use crate::error::RenderError;

/// Dimensions of the output character grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub cols: u32,
    pub rows: u32,
}

impl GridSize {
    /// Compute the grid for a `width`×`height` image.
    ///
    /// `max_side` bounds the larger pre-skew dimension; `skew` widens the
    /// column count to correct for tall character cells. Both outputs are
    /// clamped to at least 1 so extreme aspect ratios still produce a grid.
    ///
    /// # Errors
    /// [`RenderError::DegenerateImage`] when either source dimension is 0.
    pub fn compute(width: u32, height: u32, max_side: u32, skew: f64) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::DegenerateImage { width, height });
        }

        let ratio = (max_side as f64 / width as f64).min(max_side as f64 / height as f64);
        let cols = (width as f64 * skew * ratio).round().max(1.0) as u32;
        let rows = (height as f64 * ratio).round().max(1.0) as u32;
        Ok(Self { cols, rows })
    }

    /// Total cell count, the cost bound of the whole transform.
    pub fn cells(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_reference_case() {
        // ratio = min(40/80, 40/40) = 0.5 → cols = 80*1.75*0.5 = 70, rows = 20.
        let g = GridSize::compute(80, 40, 40, 1.75).unwrap();
        assert_eq!(g, GridSize { cols: 70, rows: 20 });
    }

    #[test]
    fn square_image_fills_max_side() {
        let g = GridSize::compute(100, 100, 40, 1.75).unwrap();
        assert_eq!(g.rows, 40);
        assert_eq!(g.cols, 70); // 100 * 1.75 * 0.4
    }

    #[test]
    fn zero_dimension_is_degenerate() {
        assert_eq!(
            GridSize::compute(0, 50, 40, 1.75).unwrap_err(),
            RenderError::DegenerateImage {
                width: 0,
                height: 50
            }
        );
        assert!(GridSize::compute(50, 0, 40, 1.75).is_err());
    }

    #[test]
    fn single_pixel_image_yields_a_grid() {
        let g = GridSize::compute(1, 1, 40, 1.75).unwrap();
        assert_eq!(g.rows, 40);
        assert_eq!(g.cols, 70);
    }

    #[test]
    fn extreme_aspect_clamps_to_one() {
        // ratio = 40/4000 = 0.01 → raw cols = 1*1.75*0.01 = 0.0175 → clamp.
        let g = GridSize::compute(1, 4000, 40, 1.75).unwrap();
        assert_eq!(g.cols, 1);
        assert_eq!(g.rows, 40);
    }

    #[test]
    fn doubling_max_side_never_shrinks() {
        for &(w, h) in &[(80u32, 40u32), (33, 97), (1, 1), (640, 480)] {
            let a = GridSize::compute(w, h, 40, 1.75).unwrap();
            let b = GridSize::compute(w, h, 80, 1.75).unwrap();
            assert!(b.cols >= a.cols && b.rows >= a.rows, "{w}x{h}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn cols_to_rows_ratio_tracks_skewed_aspect() {
        let g = GridSize::compute(300, 200, 40, 1.75).unwrap();
        let got = g.cols as f64 / g.rows as f64;
        let want = (300.0 / 200.0) * 1.75;
        assert!((got - want).abs() < 0.1, "got {got}, want ~{want}");
    }
}
