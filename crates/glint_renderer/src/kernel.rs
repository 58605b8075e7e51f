//! Parallel kernel launchers.
//!
//! A kernel is a per-pixel function `(x, y) -> Color`. Launchers decide how
//! the pixels of a pass are spread over threads; each pixel is written by
//! exactly one invocation.

use std::sync::Arc;

use glint_core::Color;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::error::{RenderError, RenderResult};
use crate::FrameBuffer;

/// Per-pixel kernel evaluated by a launcher.
pub type PixelKernel<'a> = dyn Fn(u32, u32) -> Color + Sync + 'a;

/// Capability to run a per-pixel kernel over a whole frame.
pub trait KernelLaunch: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the launcher can run on this machine.
    fn is_available(&self) -> bool {
        true
    }

    /// Evaluate `kernel` for every pixel of `target`.
    fn launch(&self, target: &mut FrameBuffer, kernel: &PixelKernel<'_>) -> RenderResult<()>;
}

/// Row-parallel launcher on a rayon pool.
#[derive(Clone, Default)]
pub struct RayonKernel {
    /// Dedicated pool; `None` runs on rayon's global pool.
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl RayonKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher with its own pool of `threads` workers.
    pub fn with_threads(threads: usize) -> RenderResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("glint-worker-{i}"))
            .build()?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    pub fn thread_count(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl KernelLaunch for RayonKernel {
    fn name(&self) -> &'static str {
        "rayon"
    }

    fn launch(&self, target: &mut FrameBuffer, kernel: &PixelKernel<'_>) -> RenderResult<()> {
        // max(1) guards zero-width frames; there are no rows to split then.
        let width = target.width as usize;
        let rows = target.pixels.par_chunks_mut(width.max(1));
        let job = move || {
            rows.enumerate().for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = kernel(x as u32, y as u32);
                }
            })
        };

        match &self.pool {
            Some(pool) => pool.install(job),
            None => job(),
        }
        Ok(())
    }
}

/// Tile-parallel launcher: spiral-ordered buckets rendered on rayon and
/// copied back into the frame.
#[derive(Debug, Clone, Copy)]
pub struct BucketKernel {
    pub bucket_size: u32,
}

impl BucketKernel {
    pub fn new(bucket_size: u32) -> Self {
        Self { bucket_size }
    }
}

impl Default for BucketKernel {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_SIZE)
    }
}

impl KernelLaunch for BucketKernel {
    fn name(&self) -> &'static str {
        "bucket"
    }

    fn launch(&self, target: &mut FrameBuffer, kernel: &PixelKernel<'_>) -> RenderResult<()> {
        let buckets = generate_buckets(target.width, target.height, self.bucket_size);
        let results: Vec<BucketResult> = buckets
            .par_iter()
            .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, kernel)))
            .collect();

        for result in &results {
            result.write_to(target);
        }
        Ok(())
    }
}

/// Plain nested loop on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialKernel;

impl KernelLaunch for SerialKernel {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn launch(&self, target: &mut FrameBuffer, kernel: &PixelKernel<'_>) -> RenderResult<()> {
        for y in 0..target.height {
            for x in 0..target.width {
                target.set(x, y, kernel(x, y));
            }
        }
        Ok(())
    }
}

/// Launcher by name, as accepted on the command line.
pub fn kernel_by_name(name: &str, threads: Option<usize>) -> RenderResult<Box<dyn KernelLaunch>> {
    match name {
        "rayon" => Ok(Box::new(match threads {
            Some(threads) => RayonKernel::with_threads(threads)?,
            None => RayonKernel::new(),
        })),
        "bucket" => Ok(Box::new(BucketKernel::default())),
        "serial" => Ok(Box::new(SerialKernel)),
        _ => Err(RenderError::UnknownKernel(name.to_string())),
    }
}
