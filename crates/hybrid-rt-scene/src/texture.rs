//! RGBA8 textures with repeat addressing and nearest-neighbor lookup.

use hybrid_rt_math::Vec3;
use serde::{Deserialize, Serialize};

const WHITE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// A row-major, 4-channel, 8-bit texture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Texel data, `width * height * 4` bytes, RGBA order.
    pub rgba8: Vec<u8>,
}

impl Texture {
    /// Create a texture from raw RGBA8 data.
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba8,
        }
    }

    /// A single-color texture of the given size.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let texels = width as usize * height as usize;
        let mut rgba8 = Vec::with_capacity(texels * 4);
        for _ in 0..texels {
            rgba8.extend_from_slice(&rgba);
        }
        Self::new(width, height, rgba8)
    }

    /// Whether the texture has no usable texels: a zero dimension or a
    /// pixel buffer too short for its declared size.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0
            || self.height == 0
            || self.rgba8.len() < self.width as usize * self.height as usize * 4
    }

    /// Sample the RGB channels at `(u, v)`, normalized to [0, 1].
    ///
    /// Coordinates wrap (repeat addressing) and the lookup is
    /// nearest-neighbor. Degenerate textures sample as opaque white.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        if self.is_degenerate() {
            return WHITE;
        }

        let u = wrap(u);
        let v = wrap(v);
        let x = ((u * (self.width - 1) as f32) as usize).min(self.width as usize - 1);
        let y = ((v * (self.height - 1) as f32) as usize).min(self.height as usize - 1);

        let idx = (y * self.width as usize + x) * 4;
        Vec3::new(
            self.rgba8[idx] as f32 / 255.0,
            self.rgba8[idx + 1] as f32 / 255.0,
            self.rgba8[idx + 2] as f32 / 255.0,
        )
    }
}

/// Sample an optional texture. A missing texture samples as opaque white.
pub fn sample_texture(texture: Option<&Texture>, u: f32, v: f32) -> Vec3 {
    texture.map_or(WHITE, |t| t.sample(u, v))
}

/// Fractional part mapped into [0, 1).
#[inline]
fn wrap(x: f32) -> f32 {
    let f = x - x.trunc();
    if f < 0.0 {
        f + 1.0
    } else {
        f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x2 texture where texel (x, y) has red = 10*x and green = 100*y.
    fn gradient() -> Texture {
        let mut rgba8 = Vec::new();
        for y in 0..2u8 {
            for x in 0..4u8 {
                rgba8.extend_from_slice(&[10 * x, 100 * y, 7, 255]);
            }
        }
        Texture::new(4, 2, rgba8)
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(0.25), 0.25);
        assert_eq!(wrap(1.5), 0.5);
        assert_eq!(wrap(-0.25), 0.75);
        assert_eq!(wrap(2.0), 0.0);
    }

    #[test]
    fn test_sample_nearest() {
        let tex = gradient();
        let c = tex.sample(0.0, 0.0);
        assert_eq!(c, Vec3::new(0.0, 0.0, 7.0 / 255.0));

        // u = 0.7 -> floor(0.7 * 3) = 2, v = 0.99 -> floor(0.99 * 1) = 0
        let c = tex.sample(0.7, 0.99);
        assert_eq!(c.x, 20.0 / 255.0);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn test_sample_repeat() {
        let tex = gradient();
        for v in [0.0, 0.3, 0.6] {
            assert_eq!(tex.sample(1.5, v), tex.sample(0.5, v));
            assert_eq!(tex.sample(-0.5, v), tex.sample(0.5, v));
        }
    }

    #[test]
    fn test_degenerate_is_white() {
        let empty = Texture::default();
        let short = Texture::new(4, 4, vec![0; 8]);
        for (u, v) in [(0.0, 0.0), (0.5, 0.5), (-3.2, 7.9)] {
            assert_eq!(empty.sample(u, v), WHITE);
            assert_eq!(short.sample(u, v), WHITE);
            assert_eq!(sample_texture(None, u, v), WHITE);
        }
    }

    #[test]
    fn test_alpha_ignored() {
        let tex = Texture::solid(2, 2, [255, 0, 0, 0]);
        assert_eq!(sample_texture(Some(&tex), 0.3, 0.3), Vec3::new(1.0, 0.0, 0.0));
    }
}
