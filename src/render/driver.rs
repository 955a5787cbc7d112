//! Fixed worker-pool render driver: strides canvas rows across threads, shading each pixel with
//! [`shading::shoot`] and writing the result into a [`Canvas`].
//!
//! Grounded on the source library's `dmnsn_render_scene_concurrent`: each worker owns row indices
//! `{thread, thread + n, thread + 2n, …}` (n = thread count), and within a row iterates every
//! column left to right, shooting one primary ray per pixel with a fresh `reclevel`/`ior`/
//! `adc_value` budget. No cross-pixel coordination exists beyond the BVH's own last-hit cache.

use std::sync::{Arc, Mutex};
use std::thread;

use nalgebra::RealField;
use num_traits::ToPrimitive;

use crate::{
    error::{RenderError, Result},
    render::{Canvas, Future},
    scene::Scene,
    shading,
    traits::FallibleNumeric,
};

/// Render `scene` into `canvas`, blocking the calling thread until every pixel is written.
///
/// `canvas` should already be sized to the region `scene` is configured to render (see
/// `Scene::region_x`/`region_y`/`outer_width`/`outer_height`); the camera computes each ray as if
/// sampling the full `outer_width x outer_height` image, offset by `(region_x, region_y)`.
///
/// # Errors
///
/// Returns [`RenderError::InvalidThreadCount`] if `nthreads` is zero, or propagates the first
/// error any worker encountered (a shading failure, or a NaN/non-finite result written to the
/// canvas, which indicates a bug rather than a recoverable condition).
pub fn render<T>(scene: &Scene<T>, canvas: &mut Canvas<T>, nthreads: usize) -> Result<()>
where
    T: RealField + Copy + ToPrimitive + Send + Sync,
{
    if nthreads == 0 {
        return Err(RenderError::InvalidThreadCount { nthreads }.into());
    }

    let future = Future::new(nthreads);
    future.set_total(canvas.height());

    let width = canvas.width();
    let rows = canvas.rows_mut();
    let mut buckets: Vec<Vec<(usize, &mut [crate::shading::TColor<T>])>> = (0..nthreads).map(|_| Vec::new()).collect();
    for (row, pixels) in rows.into_iter().enumerate() {
        buckets[row % nthreads].push((row, pixels));
    }

    let outcome = thread::scope(|scope| {
        let handles: Vec<_> = buckets
            .into_iter()
            .map(|rows| scope.spawn(|| worker_render_rows(scene, &future, width, rows)))
            .collect();

        let mut first_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => first_error.get_or_insert(err),
                Err(_) => return Some(RenderError::WorkerPanicked),
            };
        }
        first_error
    });

    future.finish(outcome);
    match outcome {
        Some(RenderError::Cancelled) | None => Ok(()),
        Some(err) => Err(err.into()),
    }
}

/// Dispatch `scene`'s render onto a background thread and return immediately with a handle to
/// track its progress, pause/resume it, or wait for it to finish.
///
/// Unlike [`render`], the canvas is shared behind a [`Mutex`] rather than split into disjoint
/// borrows, since the dispatching thread must outlive this call; each worker locks it once per
/// row, briefly, to write that row's pixels.
#[must_use]
pub fn render_async<T>(scene: Arc<Scene<T>>, canvas: Arc<Mutex<Canvas<T>>>, nthreads: usize) -> Arc<Future>
where
    T: RealField + Copy + ToPrimitive + Send + Sync + 'static,
{
    let future = Future::new(nthreads.max(1));
    let handle = future.clone();

    if nthreads == 0 {
        handle.finish(Some(RenderError::InvalidThreadCount { nthreads }));
        return future;
    }

    thread::spawn(move || {
        let (width, height) = {
            let guard = canvas.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            (guard.width(), guard.height())
        };
        future.set_total(height);

        let outcome = thread::scope(|scope| {
            let handles: Vec<_> = (0..nthreads)
                .map(|thread_index| {
                    let scene = &scene;
                    let canvas = &canvas;
                    let future = &future;
                    scope.spawn(move || worker_render_rows_locked(scene, &canvas, future, thread_index, nthreads, width, height))
                })
                .collect();

            let mut first_error = None;
            for h in handles {
                match h.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => first_error.get_or_insert(err),
                    Err(_) => return Some(RenderError::WorkerPanicked),
                };
            }
            first_error
        });

        future.finish(outcome);
    });

    handle
}

/// Render every row in `rows` (each a `(canvas row index, mutable pixel slice)` pair already owned
/// exclusively by this worker) into `canvas`'s pixel storage, checkpointing after each row.
fn worker_render_rows<T>(scene: &Scene<T>, future: &Future, width: usize, rows: Vec<(usize, &mut [shading::TColor<T>])>) -> Result<()>
where
    T: RealField + Copy + ToPrimitive,
{
    for (row, pixels) in rows {
        for (col, pixel) in pixels.iter_mut().enumerate().take(width) {
            *pixel = shade_pixel(scene, row, col)?;
        }
        future.checkpoint()?;
        future.increment();
    }
    Ok(())
}

/// Same loop as [`worker_render_rows`], but for the `render_async` path: rows are striped
/// `{thread, thread + n, thread + 2n, …}` and each row is written under a brief canvas lock.
fn worker_render_rows_locked<T>(
    scene: &Scene<T>,
    canvas: &Mutex<Canvas<T>>,
    future: &Future,
    thread_index: usize,
    nthreads: usize,
    width: usize,
    height: usize,
) -> Result<()>
where
    T: RealField + Copy + ToPrimitive,
{
    let mut row = thread_index;
    while row < height {
        let mut pixels = Vec::with_capacity(width);
        for col in 0..width {
            pixels.push(shade_pixel(scene, row, col)?);
        }

        {
            let mut guard = canvas.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            for (col, pixel) in pixels.into_iter().enumerate() {
                guard.set_pixel(row, col, pixel);
            }
        }

        future.checkpoint()?;
        future.increment();
        row += nthreads;
    }
    Ok(())
}

/// Shade one output pixel: generate its primary ray (offset into the scene's configured region)
/// and shoot it with a fresh recursion/ior/adc budget.
///
/// # Errors
///
/// Returns [`RenderError::InfiniteNormal`] if the generated primary ray itself is degenerate (a
/// non-finite direction, which can only arise from a malformed camera or upstream geometry), or
/// [`RenderError::NanColorWritten`] if shading produced a non-finite color.
fn shade_pixel<T>(scene: &Scene<T>, row: usize, col: usize) -> Result<shading::TColor<T>>
where
    T: RealField + Copy + ToPrimitive,
{
    let pixel_index = [row + scene.region_y, col + scene.region_x];
    let ray = scene.camera.generate_ray(pixel_index)?;
    if !ray.direction.x.is_finite() || !ray.direction.y.is_finite() || !ray.direction.z.is_finite() {
        return Err(RenderError::InfiniteNormal { row, col }.into());
    }

    let one = T::try_from_u8(1)?;
    let color = shading::shoot(scene, &ray, scene.reclimit, one, one)?;
    if color.is_nan() {
        return Err(RenderError::NanColorWritten { row, col }.into());
    }
    Ok(color)
}
