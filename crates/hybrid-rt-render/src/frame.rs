//! Frame driver: one primary ray per pixel, shaded into an RGBA8 buffer.

use std::time::Instant;

use hybrid_rt_math::Vec3;
use hybrid_rt_raytrace::Bvh;
use hybrid_rt_scene::Scene;
use rayon::prelude::*;

use crate::{shade, RenderError, RenderSettings, Result};

/// Row-major RGBA8 image, four bytes per pixel, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl Framebuffer {
    /// Allocate a zeroed framebuffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(RenderError::OutOfMemory { width, height })?;
        let mut rgba8 = Vec::new();
        rgba8
            .try_reserve_exact(len)
            .map_err(|_| RenderError::OutOfMemory { width, height })?;
        rgba8.resize(len, 0);
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Consume the framebuffer, returning its RGBA8 bytes.
    pub fn into_rgba8(self) -> Vec<u8> {
        self.rgba8
    }

    /// RGB8 copy with alpha dropped.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.rgba8
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// The pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba8[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Clamp each channel to [0, 1] and scale to 8 bits, truncating. Alpha is opaque.
pub fn quantize(color: Vec3) -> [u8; 4] {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    [q(color.x), q(color.y), q(color.z), 255]
}

/// Build a BVH for `scene` and render one frame.
pub fn render(scene: &Scene, settings: &RenderSettings) -> Result<Framebuffer> {
    settings.validate()?;
    let mut framebuffer = Framebuffer::new(settings.width, settings.height)?;
    let bvh = Bvh::build_with(scene, &settings.bvh)?;
    render_with_bvh(&bvh, settings, &mut framebuffer)?;
    Ok(framebuffer)
}

/// Render into an existing framebuffer using a prebuilt BVH.
///
/// The framebuffer must match `settings.width` x `settings.height`.
pub fn render_with_bvh(
    bvh: &Bvh<'_>,
    settings: &RenderSettings,
    framebuffer: &mut Framebuffer,
) -> Result<()> {
    settings.validate()?;
    if framebuffer.width != settings.width || framebuffer.height != settings.height {
        return Err(RenderError::InvalidDimensions {
            width: framebuffer.width,
            height: framebuffer.height,
        });
    }

    let start = Instant::now();
    tracing::info!(
        width = settings.width,
        height = settings.height,
        triangles = bvh.triangle_indices().len(),
        "rendering frame"
    );
    let scene = bvh.scene();
    let params = settings.shading_params();
    let (width, height) = (settings.width, settings.height);
    let row_bytes = width as usize * 4;

    let shade_row = |(y, row): (usize, &mut [u8])| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let ray = settings
                .camera
                .ray_for_pixel(x as u32, y as u32, width, height);
            let hit = bvh.trace(&ray, settings.t_min, f32::INFINITY);
            px.copy_from_slice(&quantize(shade(scene, hit.as_ref(), &params)));
        }
    };

    if settings.parallel {
        framebuffer
            .rgba8
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(&shade_row);
    } else {
        framebuffer
            .rgba8
            .chunks_mut(row_bytes)
            .enumerate()
            .for_each(&shade_row);
    }

    tracing::info!(
        parallel = settings.parallel,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "frame rendered"
    );
    Ok(())
}
