//! Conversion between the rasterizer's premultiplied pixels and straight RGBA8.
//!
//! Always available (no feature gate) so the surface can produce a
//! [`Raster`](duotone_core::Raster) without pulling in PNG support.

/// Converts premultiplied RGBA8 bytes to straight alpha, rounding to nearest.
///
/// Fully transparent pixels become `[0, 0, 0, 0]`.
pub fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    premul
        .chunks_exact(4)
        .flat_map(|px| {
            let a = u16::from(px[3]);
            if a == 0 {
                return [0u8; 4];
            }
            let unpremul = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
            [unpremul(px[0]), unpremul(px[1]), unpremul(px[2]), px[3]]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_pixels_are_unchanged() {
        let px = [12, 200, 255, 255, 0, 0, 0, 255];
        assert_eq!(unpremultiply_rgba8(&px), px.to_vec());
    }

    #[test]
    fn transparent_pixels_clear_color() {
        assert_eq!(unpremultiply_rgba8(&[0, 0, 0, 0]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn half_alpha_white_unpremultiplies_to_white() {
        assert_eq!(unpremultiply_rgba8(&[128, 128, 128, 128]), vec![255, 255, 255, 128]);
    }

    #[test]
    fn trailing_partial_pixel_is_dropped() {
        assert_eq!(unpremultiply_rgba8(&[1, 2, 3, 255, 9]).len(), 4);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn premultiply_then_unpremultiply_stays_close(
                r: u8, g: u8, b: u8, a in 32u8..=255,
            ) {
                let premul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
                let back = unpremultiply_rgba8(&[premul(r), premul(g), premul(b), a]);
                // Quantization error grows as alpha shrinks.
                let tolerance = i16::from(255 / a) + 1;
                for (orig, got) in [r, g, b].iter().zip(&back) {
                    prop_assert!((i16::from(*orig) - i16::from(*got)).abs() <= tolerance,
                        "{orig} vs {got} at alpha {a}");
                }
                prop_assert_eq!(back[3], a);
            }
        }
    }
}
