//! Progressive accumulation.
//!
//! Each call launches one jittered pass and folds it into a running average
//! with weight `1 / (n + 1)`. The average restarts whenever the camera, a
//! light, or the output size changes, so moving anything never smears old
//! samples into the new view.

use glint_core::{Color, Light, Texture};
use glint_math::{Pose, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::kernel::KernelLaunch;
use crate::renderer::{trace_pixel, FrameBuffer, SceneSnapshot};
use crate::RayCamera;

/// Accumulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorConfig {
    /// Offset each pass by a random sub-pixel amount; off means pixel centers
    pub jitter: bool,
    /// RNG seed for reproducible jitter; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            jitter: true,
            seed: None,
        }
    }
}

/// Inputs whose change invalidates accumulated samples.
#[derive(Debug, Clone, PartialEq)]
struct InputSnapshot {
    camera: Pose,
    lights: Vec<Light>,
    ambient: Color,
    background: Color,
    /// Address of the environment texture; swapping skies resets
    environment: Option<usize>,
}

impl InputSnapshot {
    fn capture(camera: Pose, scene: &SceneSnapshot) -> Self {
        Self {
            camera,
            lights: scene.lights.to_vec(),
            ambient: scene.ambient,
            background: scene.background,
            environment: scene
                .environment
                .map(|sky| sky as *const Texture as usize),
        }
    }
}

/// Running average of jittered passes.
pub struct ProgressiveAccumulator {
    kernel: Box<dyn KernelLaunch>,
    config: AccumulatorConfig,
    rng: StdRng,
    sample_count: u32,
    accumulated: FrameBuffer,
    pass: FrameBuffer,
    previous: Option<InputSnapshot>,
    last_offset: Vec2,
}

impl ProgressiveAccumulator {
    pub fn new(kernel: Box<dyn KernelLaunch>, config: AccumulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            kernel,
            config,
            rng,
            sample_count: 0,
            accumulated: FrameBuffer::new(0, 0),
            pass: FrameBuffer::new(0, 0),
            previous: None,
            last_offset: Vec2::splat(0.5),
        }
    }

    /// Passes folded into the current average.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Current average; empty before the first pass.
    pub fn frame(&self) -> &FrameBuffer {
        &self.accumulated
    }

    /// Sub-pixel offset used by the most recent pass.
    pub fn last_offset(&self) -> Vec2 {
        self.last_offset
    }

    pub fn kernel_name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    /// Discard accumulated samples; the next pass starts a new average.
    pub fn reset(&mut self) {
        self.sample_count = 0;
    }

    /// Render one pass at `display_size` and fold it into the average.
    pub fn accumulate<C: RayCamera + ?Sized>(
        &mut self,
        camera: &C,
        scene: &SceneSnapshot,
        display_size: (u32, u32),
    ) -> RenderResult<&FrameBuffer> {
        if !self.kernel.is_available() {
            return Err(RenderError::KernelUnavailable(self.kernel.name()));
        }
        let (width, height) = display_size;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution {
                width,
                height,
                scale: 1,
            });
        }

        let inputs = InputSnapshot::capture(camera.pose(), scene);
        if self.previous.as_ref() != Some(&inputs) {
            if self.sample_count > 0 {
                log::debug!("Render inputs changed after {} samples, resetting", self.sample_count);
            }
            self.sample_count = 0;
            self.previous = Some(inputs);
        }

        if self.accumulated.size() != display_size {
            log::info!("Allocating {}x{} accumulation buffer", width, height);
            self.accumulated = FrameBuffer::new(width, height);
            self.pass = FrameBuffer::new(width, height);
            self.sample_count = 0;
        }

        let offset = if self.config.jitter {
            Vec2::new(self.rng.gen::<f32>(), self.rng.gen::<f32>())
        } else {
            Vec2::splat(0.5)
        };
        self.last_offset = offset;

        let kernel = |x: u32, y: u32| {
            let ray = camera.ray(x as f32 + offset.x, y as f32 + offset.y, width, height);
            trace_pixel(&ray, scene)
        };
        self.kernel.launch(&mut self.pass, &kernel)?;

        if self.sample_count == 0 {
            self.accumulated.pixels.copy_from_slice(&self.pass.pixels);
        } else {
            let weight = 1.0 / (self.sample_count as f32 + 1.0);
            for (average, &sample) in self.accumulated.pixels.iter_mut().zip(&self.pass.pixels) {
                *average = average.lerp(sample, weight);
            }
        }
        self.sample_count += 1;

        Ok(&self.accumulated)
    }
}
