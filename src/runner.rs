//! Worker orchestration: spread the requested sample count over a pool of
//! workers, each rendering into its own buffer with its own generator, and
//! fold the buffers once at the end.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Pinhole;
use crate::pathtracer::Pathtracer;
use crate::samplebuffer::SampleBuffer;
use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("the scene has no camera")]
    NoCamera,
    #[error("failed to build the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Render `sample_count` full passes of the scene's first camera over
/// `workers` parallel workers. Worker i draws its samples from a
/// generator seeded with `seed + i`, so a fixed seed renders a fixed
/// image regardless of scheduling.
pub fn render_parallel(
    scene: &Scene,
    width: u32,
    height: u32,
    sample_count: u32,
    workers: usize,
    seed: u64,
) -> Result<SampleBuffer, RenderError> {
    let camera = scene.cameras().first().ok_or(RenderError::NoCamera)?;
    let pinhole = Pinhole::new(camera, width as f32 / height as f32);
    let tracer = Pathtracer::new(scene);

    // spread the samples evenly, earlier workers take the remainder
    let base = sample_count / workers as u32;
    let remainder = sample_count % workers as u32;
    let shares: Vec<u32> = (0..workers as u32)
        .map(|i| base + u32::from(i < remainder))
        .collect();

    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;

    let start = Instant::now();
    let buffers: Vec<SampleBuffer> = pool.install(|| {
        shares
            .into_par_iter()
            .enumerate()
            .map(|(worker, share)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(worker as u64));
                let mut buffer = SampleBuffer::new(width, height);
                for _ in 0..share {
                    tracer.render(&pinhole, &mut buffer, &mut rng);
                }
                tracing::debug!(worker, samples = share, "worker finished");
                buffer
            })
            .collect()
    });

    let mut result = SampleBuffer::new(width, height);
    for buffer in &buffers {
        result.append(buffer);
    }

    tracing::info!(
        samples = result.samples(),
        workers,
        elapsed = ?start.elapsed(),
        "render finished"
    );

    Ok(result)
}
