//! # Volume Pipeline Properties
//!
//! Cross-module guarantees: field shape, diffusion smoothing, boundary
//! stability, surface carving and the exported byte layout.

use abyssal_volume::{
    add_floor, apply_waves, export, resolve_edges, DiffusionSolver, HeightMap, NoiseField,
    NoiseFieldParams, NoiseSeed, PerlinNoise, Volume, WaveSpec,
};

/// Deterministic rough field with no spatial coherence.
fn rough_volume(size: usize) -> Volume {
    Volume::from_fn(size, |x, y, z| ((x * 73 + y * 151 + z * 283) % 17) as f64 * 10.0).unwrap()
}

/// Population variance over the cells the solver writes.
fn interior_variance(volume: &Volume) -> f64 {
    let n = volume.size();
    let mut values = Vec::new();
    for z in 1..n - 1 {
        for y in 1..n - 1 {
            for x in 1..n - 1 {
                values.extend(volume.get(x, y, z));
            }
        }
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64
}

/// Test: every size yields a cubic grid and an honest maximum.
#[test]
fn test_generate_shape_and_maximum() {
    let field = NoiseField::new(PerlinNoise::new(NoiseSeed::new(42)));

    for size in 3..10 {
        let (volume, max) = field
            .generate(&NoiseFieldParams {
                size,
                frequency: 3.3,
                base_value: 128.0,
                value_offset: 10.0,
            })
            .unwrap();

        assert_eq!(volume.size(), size);
        assert_eq!(volume.len(), size * size * size);
        assert!(
            volume.as_slice().iter().all(|&v| v <= max),
            "max {max} is below some cell for size {size}"
        );
        assert!(volume.as_slice().contains(&max));
    }
}

/// Test: diffusion never increases interior variance.
#[test]
fn test_diffusion_reduces_variance() {
    for rate in [0.001, 0.05, 1.0] {
        let mut volume = rough_volume(8);
        resolve_edges(&mut volume);
        let solver = DiffusionSolver::new(rate, 1.0);

        let mut previous = interior_variance(&volume);
        for round in 0..3 {
            let reference = volume.clone();
            solver.diffuse(&mut volume, &reference).unwrap();

            let variance = interior_variance(&volume);
            println!("rate {rate}, round {round}: variance {previous:.3} -> {variance:.3}");
            assert!(
                variance <= previous,
                "variance grew from {previous} to {variance} at rate {rate}"
            );
            previous = variance;
        }
    }
}

/// Test: the solver stays bounded for huge time steps.
#[test]
fn test_diffusion_is_unconditionally_stable() {
    let mut volume = rough_volume(6);
    let (lo, hi) = (volume.min(), volume.max());
    let reference = volume.clone();

    DiffusionSolver::new(1.0e6, 1.0e6)
        .diffuse(&mut volume, &reference)
        .unwrap();

    for &v in volume.as_slice() {
        assert!(v.is_finite());
        assert!(v >= lo - 1e-9 && v <= hi + 1e-9, "{v} escaped [{lo}, {hi}]");
    }
}

/// Test: boundary resolution is idempotent right after a solve.
#[test]
fn test_resolve_edges_idempotent_after_diffusion() {
    let mut volume = rough_volume(7);
    let reference = volume.clone();
    DiffusionSolver::new(0.02, 1.0)
        .with_iterations(1)
        .diffuse(&mut volume, &reference)
        .unwrap();

    let before = volume.clone();
    resolve_edges(&mut volume);

    assert_eq!(volume, before);
}

/// Test: a flat height map carves exactly the top layer.
#[test]
fn test_flat_waves_fill_top_layer_only() {
    let mut volume = rough_volume(5);
    let original = volume.clone();
    let map = HeightMap::new(5, 5).unwrap();

    apply_waves(&mut volume, &map, 0.0).unwrap();

    for z in 0..5 {
        for y in 0..5 {
            for x in 0..5 {
                let expected = if y == 4 { Some(0.0) } else { original.get(x, y, z) };
                assert_eq!(volume.get(x, y, z), expected, "cell ({x}, {y}, {z})");
            }
        }
    }
}

/// Test: the 2x2x2 export order, worked out by hand.
#[test]
fn test_export_byte_positions() {
    // [[[1,2],[3,4]],[[5,6],[7,8]]] indexed [x][y][z]
    let nested = [[[1.0, 2.0], [3.0, 4.0]], [[5.0, 6.0], [7.0, 8.0]]];
    let volume = Volume::from_fn(2, |x, y, z| nested[x][y][z]).unwrap();

    let buffer = export(&volume);

    // byte i + 2 * (j + 2 * k) holds cell (i, j, k)
    assert_eq!(buffer.as_bytes(), &[1, 5, 3, 7, 2, 6, 4, 8]);
}

/// Test: a silent noise provider exports the base value everywhere.
#[test]
fn test_zero_noise_round_trip() {
    let field = NoiseField::new(|_: f64, _: f64, _: f64| 0.0);
    let (volume, max) = field
        .generate(&NoiseFieldParams {
            size: 6,
            frequency: 15.0,
            base_value: 7.0,
            value_offset: 10.0,
        })
        .unwrap();

    assert_eq!(max, 7.0);
    let buffer = export(&volume);
    assert_eq!(buffer.len(), 216);
    assert!(buffer.as_bytes().iter().all(|&b| b == 7));
}

/// Test: the whole chain on a small grid.
#[test]
fn test_full_chain() {
    let size = 24;
    let field = NoiseField::new(PerlinNoise::new(NoiseSeed::new(7)));
    let (mut volume, _) = field
        .generate(&NoiseFieldParams {
            size,
            frequency: 15.0,
            base_value: 128.0,
            value_offset: 10.0,
        })
        .unwrap();

    let solver = DiffusionSolver::new(5.0, 1.0);
    for _ in 0..2 {
        let reference = volume.clone();
        solver.diffuse(&mut volume, &reference).unwrap();
    }

    add_floor(&mut volume, 255.0);
    let mut map = HeightMap::new(size, size).unwrap();
    for wave in [
        WaveSpec::new(0.05, 1.5, [0.1, 1.0]),
        WaveSpec::new(0.15, 2.0, [-0.1, 1.0]),
        WaveSpec::new(0.08, 1.2, [1.0, 1.0]),
    ] {
        map.accumulate(&wave).unwrap();
    }
    apply_waves(&mut volume, &map, 0.0).unwrap();

    let bytes = export(&volume);
    assert_eq!(bytes.len(), size * size * size);

    for z in 0..size {
        for x in 0..size {
            assert_eq!(bytes.as_bytes()[volume.index(x, 0, z)], 255, "floor at ({x}, {z})");
            assert_eq!(bytes.as_bytes()[volume.index(x, size - 1, z)], 0, "top at ({x}, {z})");
        }
    }

    // Density below the carved surface stays near the base value.
    let middle = bytes.as_bytes()[volume.index(size / 2, size / 2, size / 2)];
    assert!((110..=146).contains(&middle), "unexpected density byte {middle}");
}
