//! Host for the synchronous renderer.
//!
//! Owns the prepared proxies and the last frame. In static mode it renders
//! once at start; in live mode every update renders a new frame.

use glint_core::Scene;

use crate::error::RenderResult;
use crate::geometry::{prepare_geometry, Primitive};
use crate::renderer::{render_frame, FrameBuffer, RenderConfig, RenderMode, SceneSnapshot};
use crate::{Intersector, RayCamera};

pub struct RayTracer {
    config: RenderConfig,
    primitives: Vec<Primitive>,
    frame: Option<FrameBuffer>,
    frames_rendered: u64,
}

impl RayTracer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            primitives: Vec::new(),
            frame: None,
            frames_rendered: 0,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn mode(&self) -> RenderMode {
        self.config.mode
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Intersector over the prepared proxies.
    pub fn intersector(&self) -> Intersector<'_> {
        Intersector::new(&self.primitives)
    }

    /// Last rendered frame.
    pub fn frame(&self) -> Option<&FrameBuffer> {
        self.frame.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Prepare proxies for `scene`; in static mode also render the frame.
    pub fn start<C: RayCamera + ?Sized>(
        &mut self,
        scene: &Scene,
        camera: &C,
        display_size: (u32, u32),
    ) -> RenderResult<()> {
        self.config.resolution(display_size)?;
        self.primitives = prepare_geometry(scene, self.config.proxy_shape);
        self.frame = None;

        if self.config.mode == RenderMode::Static {
            self.render(scene, camera, display_size)?;
        }
        Ok(())
    }

    /// Per-tick hook: renders in live mode, otherwise returns the cached frame.
    pub fn update<C: RayCamera + ?Sized>(
        &mut self,
        scene: &Scene,
        camera: &C,
        display_size: (u32, u32),
    ) -> RenderResult<Option<&FrameBuffer>> {
        if self.config.mode == RenderMode::Live {
            self.render(scene, camera, display_size)?;
        }
        Ok(self.frame.as_ref())
    }

    /// Render a frame now, regardless of mode.
    pub fn render<C: RayCamera + ?Sized>(
        &mut self,
        scene: &Scene,
        camera: &C,
        display_size: (u32, u32),
    ) -> RenderResult<&FrameBuffer> {
        let intersector = Intersector::new(&self.primitives);
        let snapshot = SceneSnapshot::from_config(&intersector, scene, &self.config);
        let frame = render_frame(camera, &snapshot, display_size, &self.config)?;

        self.frames_rendered += 1;
        Ok(&*self.frame.insert(frame))
    }
}
