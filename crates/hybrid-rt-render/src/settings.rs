//! Render configuration.

use hybrid_rt_math::{normalize_or_zero, Point3, Vec3};
use hybrid_rt_raytrace::{BvhOptions, Ray};
use serde::{Deserialize, Serialize};

use crate::{RenderError, Result, ShadingParams};

/// Pinhole camera looking down +z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position.
    pub position: Point3,
    /// Distance from the eye to the image plane spanning [-1, 1] on both axes.
    pub focal_length: f32,
    /// Scale the horizontal extent by `width / height` so pixels stay square.
    pub aspect_correct: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, -3.0),
            focal_length: 1.5,
            aspect_correct: false,
        }
    }
}

impl Camera {
    /// Primary ray through the center of pixel `(x, y)`.
    ///
    /// Rows run top to bottom. Both axes map to [-1, 1] on the image plane
    /// unless [`Self::aspect_correct`] widens the horizontal extent.
    pub fn ray_for_pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let ndc_x = (x as f32 + 0.5) / width as f32;
        let ndc_y = (y as f32 + 0.5) / height as f32;
        let mut px = 2.0 * ndc_x - 1.0;
        if self.aspect_correct {
            px *= width as f32 / height as f32;
        }
        let py = 1.0 - 2.0 * ndc_y;
        let direction = normalize_or_zero(Vec3::new(px, py, self.focal_length));
        Ray::new(self.position, direction)
    }
}

/// Everything needed to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Camera placement.
    pub camera: Camera,
    /// Direction the light travels (normalized at use).
    pub light_direction: Vec3,
    /// Constant ambient term.
    pub ambient: f32,
    /// Scale of the additive `(1 - roughness)` gloss term.
    pub gloss_strength: f32,
    /// Color of pixels whose ray hits nothing.
    pub background: Vec3,
    /// Lower bound of the ray window; the upper bound is infinite.
    pub t_min: f32,
    /// Shade rows on the rayon thread pool.
    pub parallel: bool,
    /// Acceleration structure construction.
    pub bvh: BvhOptions,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            camera: Camera::default(),
            light_direction: Vec3::new(1.0, 1.0, -1.0),
            ambient: 0.08,
            gloss_strength: 0.04,
            background: Vec3::new(0.03, 0.03, 0.05),
            t_min: 1e-3,
            parallel: true,
            bvh: BvhOptions::default(),
        }
    }
}

impl RenderSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.camera.focal_length.is_finite() && self.camera.focal_length > 0.0) {
            return Err(RenderError::InvalidSettings(
                "camera.focal_length must be positive".into(),
            ));
        }
        let light = &self.light_direction;
        if !light.iter().all(|c| c.is_finite()) || light.norm() == 0.0 {
            return Err(RenderError::InvalidSettings(
                "light_direction must be a nonzero vector".into(),
            ));
        }
        if !(self.t_min.is_finite() && self.t_min >= 0.0) {
            return Err(RenderError::InvalidSettings(
                "t_min must be finite and non-negative".into(),
            ));
        }
        if !self.ambient.is_finite() || !self.gloss_strength.is_finite() {
            return Err(RenderError::InvalidSettings(
                "ambient and gloss_strength must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Shading constants derived from these settings.
    pub fn shading_params(&self) -> ShadingParams {
        ShadingParams {
            light_direction: normalize_or_zero(self.light_direction),
            ambient: self.ambient,
            gloss_strength: self.gloss_strength,
            background: self.background,
        }
    }
}
