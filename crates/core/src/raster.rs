//! In-memory RGBA8 pixel buffers and blend compositing.
//!
//! A [`Raster`] stores straight (non-premultiplied) alpha, row-major. All
//! compositing goes through one Porter-Duff source-over formula with a
//! separable blend function `B(s, d)` chosen by [`BlendMode`]:
//!
//! ```text
//! out_a   = sa + da * (1 - sa)
//! out_pre = sa * (1 - da) * sc + da * (1 - sa) * dc + sa * da * B(sc, dc)
//! out_c   = out_pre / out_a
//! ```
//!
//! Channel math is f64; results are rounded back to 8 bits after every
//! operation, the same quantization a PNG write and read-back would apply.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::ArtError;

/// Separable blend function applied where source and destination overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Plain source-over.
    #[default]
    Normal,
    /// `s + d - s * d`: lightens; white stays white, black takes the source.
    Screen,
    /// `s * d`: darkens; white takes the source.
    Multiply,
}

impl BlendMode {
    /// Applies the blend function to straight channel values in [0, 1].
    pub fn blend(self, s: f64, d: f64) -> f64 {
        match self {
            BlendMode::Normal => s,
            BlendMode::Screen => s + d - s * d,
            BlendMode::Multiply => s * d,
        }
    }
}

/// A width x height straight-alpha RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a fully transparent raster.
    ///
    /// Returns `ArtError::InvalidDimensions` if a side is zero or the byte
    /// length would overflow `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self, ArtError> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Creates a raster with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, ArtError> {
        let len = byte_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wraps an existing straight-alpha RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ArtError> {
        let len = byte_len(width, height)?;
        if pixels.len() != len {
            return Err(ArtError::Io(format!(
                "RGBA buffer has {} bytes, expected {len} for {width}x{height}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Composites `src` over `self` with the given blend mode.
    ///
    /// Returns `ArtError::DimensionMismatch` unless both rasters are the same size.
    pub fn composite(&mut self, src: &Raster, mode: BlendMode) -> Result<(), ArtError> {
        if self.width != src.width || self.height != src.height {
            return Err(ArtError::DimensionMismatch {
                lhs_w: self.width as usize,
                lhs_h: self.height as usize,
                rhs_w: src.width as usize,
                rhs_h: src.height as usize,
            });
        }
        for (d, s) in self.pixels.chunks_exact_mut(4).zip(src.pixels.chunks_exact(4)) {
            blend_pixel(d, [s[0], s[1], s[2], s[3]], mode);
        }
        Ok(())
    }

    /// Composites an opaque page-sized fill of `color` over `self`.
    pub fn fill_blend(&mut self, color: Srgb, mode: BlendMode) {
        let src = color.to_rgba8();
        for d in self.pixels.chunks_exact_mut(4) {
            blend_pixel(d, src, mode);
        }
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, ArtError> {
    if width == 0 || height == 0 {
        return Err(ArtError::InvalidDimensions);
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(ArtError::InvalidDimensions)
}

fn blend_pixel(d: &mut [u8], s: [u8; 4], mode: BlendMode) {
    let sa = f64::from(s[3]) / 255.0;
    let da = f64::from(d[3]) / 255.0;
    if sa == 0.0 {
        return;
    }
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let sc = f64::from(s[c]) / 255.0;
        let dc = f64::from(d[c]) / 255.0;
        let pre = sa * (1.0 - da) * sc + da * (1.0 - sa) * dc + sa * da * mode.blend(sc, dc);
        d[c] = to_u8(pre / out_a);
    }
    d[3] = to_u8(out_a);
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(pixels: &[[u8; 4]], width: u32) -> Raster {
        let height = pixels.len() as u32 / width;
        Raster::from_rgba8(width, height, pixels.concat()).unwrap()
    }

    fn all_pixels(r: &Raster) -> Vec<[u8; 4]> {
        r.pixels()
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect()
    }

    #[test]
    fn new_is_transparent() {
        let r = Raster::new(3, 2).unwrap();
        assert_eq!(r.pixels().len(), 24);
        assert!(r.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_zero_and_mismatched_buffers() {
        assert!(matches!(Raster::new(0, 4), Err(ArtError::InvalidDimensions)));
        assert!(Raster::from_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let r = Raster::filled(2, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(r.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(r.pixel(2, 0), None);
    }

    #[test]
    fn blend_functions_at_extremes() {
        assert_eq!(BlendMode::Screen.blend(0.0, 0.4), 0.4);
        assert_eq!(BlendMode::Screen.blend(1.0, 0.4), 1.0);
        assert_eq!(BlendMode::Multiply.blend(1.0, 0.4), 0.4);
        assert_eq!(BlendMode::Multiply.blend(0.0, 0.4), 0.0);
        assert_eq!(BlendMode::Normal.blend(0.7, 0.4), 0.7);
    }

    #[test]
    fn screen_then_multiply_on_two_by_two() {
        let base = [
            [0, 0, 0, 255],
            [255, 255, 255, 255],
            [128, 128, 128, 255],
            [0, 0, 0, 0],
        ];
        let mut a = raster(&base, 2);
        a.fill_blend(Srgb::from_rgb8(103, 179, 70), BlendMode::Screen);
        assert_eq!(
            all_pixels(&a),
            vec![
                [103, 179, 70, 255],
                [255, 255, 255, 255],
                [179, 217, 163, 255],
                [103, 179, 70, 255],
            ]
        );

        let mut b = raster(&base, 2);
        b.fill_blend(Srgb::from_rgb8(67, 80, 96), BlendMode::Screen);
        assert_eq!(b.pixel(1, 1), Some([67, 80, 96, 255]));
        assert_eq!(b.pixel(0, 1), Some([161, 168, 176, 255]));

        a.composite(&b, BlendMode::Multiply).unwrap();
        assert_eq!(
            all_pixels(&a),
            vec![
                [27, 56, 26, 255],
                [255, 255, 255, 255],
                [113, 143, 113, 255],
                [27, 56, 26, 255],
            ]
        );
    }

    #[test]
    fn normal_half_alpha_over_opaque_and_transparent() {
        let src = raster(&[[255, 0, 0, 128], [255, 0, 0, 128]], 2);
        let mut dst = raster(&[[0, 0, 255, 255], [0, 0, 0, 0]], 2);
        dst.composite(&src, BlendMode::Normal).unwrap();
        assert_eq!(all_pixels(&dst), vec![[128, 0, 127, 255], [255, 0, 0, 128]]);
    }

    #[test]
    fn transparent_source_leaves_destination() {
        let mut dst = Raster::filled(2, 2, [10, 20, 30, 255]).unwrap();
        let before = dst.clone();
        dst.composite(&Raster::new(2, 2).unwrap(), BlendMode::Multiply)
            .unwrap();
        assert_eq!(dst, before);
    }

    #[test]
    fn opaque_normal_source_replaces_destination() {
        let mut dst = Raster::filled(2, 1, [10, 20, 30, 255]).unwrap();
        let src = Raster::filled(2, 1, [200, 100, 50, 255]).unwrap();
        dst.composite(&src, BlendMode::Normal).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn composite_rejects_size_mismatch() {
        let mut a = Raster::new(2, 2).unwrap();
        let b = Raster::new(3, 2).unwrap();
        assert!(matches!(
            a.composite(&b, BlendMode::Normal),
            Err(ArtError::DimensionMismatch {
                lhs_w: 2,
                rhs_w: 3,
                ..
            })
        ));
    }

    #[test]
    fn blend_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&BlendMode::Multiply).unwrap(),
            "\"multiply\""
        );
        assert_eq!(BlendMode::default(), BlendMode::Normal);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn screen_never_darkens_and_multiply_never_lightens(
                d in prop::array::uniform3(any::<u8>()),
                s in prop::array::uniform3(any::<u8>()),
            ) {
                let dst = Raster::filled(1, 1, [d[0], d[1], d[2], 255]).unwrap();
                let color = Srgb::from_rgb8(s[0], s[1], s[2]);

                let mut screened = dst.clone();
                screened.fill_blend(color, BlendMode::Screen);
                let mut multiplied = dst.clone();
                multiplied.fill_blend(color, BlendMode::Multiply);

                let (sp, mp) = (screened.pixel(0, 0).unwrap(), multiplied.pixel(0, 0).unwrap());
                for c in 0..3 {
                    prop_assert!(sp[c] >= d[c].max(s[c]));
                    prop_assert!(mp[c] <= d[c].min(s[c]));
                }
                prop_assert_eq!(sp[3], 255);
                prop_assert_eq!(mp[3], 255);
            }
        }
    }
}
