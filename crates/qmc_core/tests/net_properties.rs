//! Property tests for digital-net enumeration.
//!
//! Covers:
//! - Full-cycle return to the shifted start point
//! - Sobol dimension 0 covering every multiple of `2^-m` once per cycle
//! - Gray-code order of the plain van der Corput matrix
//! - One-dimensional stratification of every Sobol coordinate
//! - Agreement between incremental Gray-code updates and the direct
//!   matrix-vector product

use proptest::prelude::*;
use qmc_core::{
    build_sobol_matrix, build_sobol_matrix_as, DigitalNet, DigitalShift, GeneratingMatrix,
    NetWord, SobolSeed,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// First rows of the Joe-Kuo new-joe-kuo-6.21201 table.
fn seeds() -> Vec<SobolSeed> {
    vec![
        SobolSeed::new(1, 0, vec![1]),
        SobolSeed::new(2, 1, vec![1, 3]),
        SobolSeed::new(3, 1, vec![1, 3, 1]),
        SobolSeed::new(3, 2, vec![1, 1, 1]),
        SobolSeed::new(4, 1, vec![1, 1, 3, 3]),
        SobolSeed::new(4, 4, vec![1, 3, 5, 13]),
        SobolSeed::new(5, 2, vec![1, 1, 5, 5, 17]),
    ]
}

fn reverse_bits(k: u64, m: u32) -> u64 {
    k.reverse_bits() >> (64 - m)
}

/// Direct product `C * gray(k)`, XOR of the rows selected by the Gray code.
fn direct_point<U: NetWord>(matrix: &GeneratingMatrix<U>, k: u64, dim: usize) -> U {
    let gray = k ^ (k >> 1);
    let mut acc = U::zero();
    for bit in 0..matrix.precision() as usize {
        if (gray >> bit) & 1 == 1 {
            acc ^= matrix.row(bit, dim);
        }
    }
    acc
}

#[test]
fn test_van_der_corput_column_distinct_fractions() {
    let m = 10;
    let mut net = DigitalNet::new(build_sobol_matrix(&seeds(), 4, m).unwrap());
    let points = net.points(1 << m).unwrap();

    let mut numerators: Vec<u64> = points
        .chunks_exact(4)
        .map(|p| (p[0] * (1u64 << m) as f64) as u64)
        .collect();
    for (p, &n) in points.chunks_exact(4).zip(&numerators) {
        assert_eq!(p[0], n as f64 / (1u64 << m) as f64, "not a multiple of 2^-m");
    }
    numerators.sort_unstable();
    assert_eq!(numerators, (0..1u64 << m).collect::<Vec<_>>());
}

#[test]
fn test_identity_matrix_visits_van_der_corput_points() {
    let m = 8;
    let mut net = DigitalNet::new(GeneratingMatrix::<u32>::van_der_corput(m).unwrap());
    net.initialise();
    for k in 0..1u64 << m {
        let gray = k ^ (k >> 1);
        let expected = reverse_bits(gray, m) as f64 / (1u64 << m) as f64;
        assert_eq!(net.get_point(0), expected, "k = {}", k);
        net.next_point().unwrap();
    }
}

#[test]
fn test_all_dimensions_stratify_one_dimensional_projections() {
    // Every one-dimensional projection of a Sobol net hits each interval
    // [i/2^m, (i+1)/2^m) exactly once.
    let m = 9;
    let s = 8;
    let mut net = DigitalNet::new(build_sobol_matrix(&seeds(), s, m).unwrap());
    let points = net.points(1 << m).unwrap();
    for dim in 0..s {
        let mut hits = vec![0u32; 1 << m];
        for p in points.chunks_exact(s) {
            hits[(p[dim] * (1u64 << m) as f64) as usize] += 1;
        }
        assert!(hits.iter().all(|&h| h == 1), "dimension {}", dim);
    }
}

#[test]
fn test_32_and_64_bit_nets_agree_on_leading_bits() {
    let m = 12;
    let mut wide = DigitalNet::new(build_sobol_matrix(&seeds(), 5, m).unwrap());
    let mut narrow = DigitalNet::new(build_sobol_matrix_as::<u32>(&seeds(), 5, m).unwrap());
    wide.initialise();
    narrow.initialise();
    for _ in 0..1u64 << m {
        for (w, n) in wide.point_words().iter().zip(narrow.point_words()) {
            assert_eq!((w >> 32) as u32, *n);
        }
        wide.next_point().unwrap();
        narrow.next_point().unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Calling `next_point` exactly `2^m` times returns to the shifted start.
    #[test]
    fn prop_cycle_returns_to_start(
        seed in any::<u64>(),
        s in 1usize..8,
        m in 1u32..11,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut net = DigitalNet::new(build_sobol_matrix(&seeds(), s, m).unwrap());
        net.set_digital_shift(DigitalShift::random(s, &mut rng)).unwrap();
        net.initialise();
        let start = net.point_words().to_vec();

        for _ in 0..1u64 << m {
            net.next_point().unwrap();
        }
        prop_assert_eq!(net.point_words(), start.as_slice());
    }

    /// Incremental updates equal the direct matrix-vector product.
    #[test]
    fn prop_incremental_matches_direct(
        shift_seed in any::<u64>(),
        s in 1usize..8,
        m in 1u32..10,
    ) {
        let mut rng = StdRng::seed_from_u64(shift_seed);
        let matrix = build_sobol_matrix(&seeds(), s, m).unwrap();
        let shift = DigitalShift::<u64>::random(s, &mut rng);
        let mut net = DigitalNet::new(matrix.clone());
        net.set_digital_shift(shift.clone()).unwrap();
        net.initialise();

        for k in 0..1u64 << m {
            for dim in 0..s {
                let expected = direct_point(&matrix, k, dim) ^ shift.values()[dim];
                prop_assert_eq!(net.point_words()[dim], expected);
            }
            net.next_point().unwrap();
        }
    }

    /// A digital shift keeps every coordinate inside `[0, 1)`.
    #[test]
    fn prop_shifted_points_in_unit_cube(seed in any::<u64>(), m in 1u32..9) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut net = DigitalNet::new(build_sobol_matrix(&seeds(), 6, m).unwrap());
        net.set_random_shift(&mut rng);
        net.initialise();
        let mut buf = [0.0; 6];
        for _ in 0..1u64 << m {
            net.fill_point(&mut buf).unwrap();
            prop_assert!(buf.iter().all(|x| (0.0..1.0).contains(x)));
            net.next_point().unwrap();
        }
    }
}
