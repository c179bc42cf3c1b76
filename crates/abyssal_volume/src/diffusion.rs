//! # Diffusion Solver
//!
//! Implicit diffusion by fixed-count Gauss-Seidel relaxation.
//!
//! ## Scheme
//!
//! Each interior cell is solved for
//!
//! ```text
//! x[i,j,k] = (x0[i,j,k] + a * (sum of the 6 axis neighbors in x)) / (1 + 6a)
//! a        = time_step * rate * (size - 2)^3
//! ```
//!
//! The scheme is implicit, so it is stable for any `time_step`. Neighbors
//! are read from `x` while it is being written: cells earlier in the sweep
//! already hold their new value. That read-after-write is what makes this
//! Gauss-Seidel rather than Jacobi, and the sweep order is part of the
//! result. Do not parallelize or double-buffer the sweep.
//!
//! ## Boundaries
//!
//! After every sweep the six faces copy the layer one cell inward
//! (zero-gradient). Only face interiors are resolved; the 12 edges and 8
//! corners of the cube are never written.

use crate::error::{VolumeError, VolumeResult};
use crate::volume::Volume;

/// Smallest volume with an interior cell.
pub const MIN_DIFFUSION_SIZE: usize = 3;

/// Relaxation solver for implicit diffusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionSolver {
    /// Diffusion rate.
    rate: f64,
    /// Time step of one `diffuse` call.
    time_step: f64,
    /// Relaxation sweeps per `diffuse` call.
    iterations: u32,
}

impl DiffusionSolver {
    /// Sweeps per call unless configured otherwise.
    pub const DEFAULT_ITERATIONS: u32 = 15;

    /// Creates a solver with the default sweep count.
    #[must_use]
    pub const fn new(rate: f64, time_step: f64) -> Self {
        Self {
            rate,
            time_step,
            iterations: Self::DEFAULT_ITERATIONS,
        }
    }

    /// Sets the number of relaxation sweeps per call.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Diffusion rate.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Time step.
    #[must_use]
    pub const fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Sweeps per call.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Coupling coefficient `a` for a volume of edge length `size`.
    #[must_use]
    pub fn coefficient(&self, size: usize) -> f64 {
        let inner = size.saturating_sub(2) as f64;
        self.time_step * self.rate * inner * inner * inner
    }

    /// Relaxes `x` toward the implicit diffusion of `x0`, in place.
    ///
    /// `x0` is the reference state and is only read.
    ///
    /// # Errors
    ///
    /// - [`VolumeError::VolumeTooSmall`] if the volume has no interior
    /// - [`VolumeError::VolumeMismatch`] if `x0` differs in size
    pub fn diffuse(&self, x: &mut Volume, x0: &Volume) -> VolumeResult<()> {
        let n = x.size();
        if n < MIN_DIFFUSION_SIZE {
            return Err(VolumeError::VolumeTooSmall {
                size: n,
                minimum: MIN_DIFFUSION_SIZE,
            });
        }
        if x0.size() != n {
            return Err(VolumeError::VolumeMismatch {
                expected: n,
                actual: x0.size(),
            });
        }

        let a = self.coefficient(n);
        let denominator = 1.0 + 6.0 * a;
        // Neighbor strides in the flat buffer.
        let sy = n;
        let sz = n * n;

        let reference = x0.as_slice();
        for sweep in 0..self.iterations {
            let cells = x.as_mut_slice();
            for i in 1..n - 1 {
                for j in 1..n - 1 {
                    for k in 1..n - 1 {
                        let idx = i + sy * j + sz * k;
                        let neighbors = cells[idx - 1]
                            + cells[idx + 1]
                            + cells[idx - sy]
                            + cells[idx + sy]
                            + cells[idx - sz]
                            + cells[idx + sz];
                        cells[idx] = (reference[idx] + a * neighbors) / denominator;
                    }
                }
            }
            resolve_edges(x);
            tracing::trace!("Diffusion sweep {} of {} done", sweep + 1, self.iterations);
        }

        Ok(())
    }
}

/// Copies each face's interior from the layer one cell inward.
///
/// Edges and corners of the cube are left as they are. Volumes smaller than
/// [`MIN_DIFFUSION_SIZE`] have no face interior and are left untouched.
pub fn resolve_edges(x: &mut Volume) {
    let n = x.size();
    if n < MIN_DIFFUSION_SIZE {
        return;
    }
    let last = n - 1;

    // Third-axis faces: z = 0 and z = n - 1.
    for j in 1..last {
        for i in 1..last {
            copy_cell(x, (i, j, 1), (i, j, 0));
            copy_cell(x, (i, j, last - 1), (i, j, last));
        }
    }

    // Second-axis faces: y = 0 and y = n - 1.
    for k in 1..last {
        for i in 1..last {
            copy_cell(x, (i, 1, k), (i, 0, k));
            copy_cell(x, (i, last - 1, k), (i, last, k));
        }
    }

    // First-axis faces: x = 0 and x = n - 1.
    for k in 1..last {
        for j in 1..last {
            copy_cell(x, (1, j, k), (0, j, k));
            copy_cell(x, (last - 1, j, k), (last, j, k));
        }
    }
}

#[inline]
fn copy_cell(x: &mut Volume, from: (usize, usize, usize), to: (usize, usize, usize)) {
    let src = x.index(from.0, from.1, from.2);
    let dst = x.index(to.0, to.1, to.2);
    let cells = x.as_mut_slice();
    cells[dst] = cells[src];
}
