//! Randomized checks of the rolling-row and banded matchers against the
//! two-dimensional reference grid.

use proptest::prelude::*;
use speakerid_dtw::{distance, reference_distance, warping_path, euclidean, FeatureSequence, Mode};

fn sequence(dim: usize, max_len: usize) -> impl Strategy<Value = FeatureSequence> {
    prop::collection::vec(prop::collection::vec(-10.0f32..10.0, dim), 1..max_len)
        .prop_map(|frames| FeatureSequence::from_frames(frames).unwrap())
}

fn pair() -> impl Strategy<Value = (FeatureSequence, FeatureSequence)> {
    (1usize..5).prop_flat_map(|dim| (sequence(dim, 16), sequence(dim, 16)))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rolling_full_matches_reference((a, b) in pair()) {
        let streamed = distance(&a, &b, Mode::Full).unwrap();
        let reference = reference_distance(&a, &b).unwrap();
        prop_assert!(close(streamed, reference), "streamed {} != reference {}", streamed, reference);
    }

    #[test]
    fn full_is_symmetric((a, b) in pair()) {
        let ab = distance(&a, &b, Mode::Full).unwrap();
        let ba = distance(&b, &a, Mode::Full).unwrap();
        prop_assert!(close(ab, ba));
    }

    #[test]
    fn banded_never_below_full((a, b) in pair(), r in 0usize..6) {
        let full = distance(&a, &b, Mode::Full).unwrap();
        let banded = distance(&a, &b, Mode::Banded).unwrap();
        let window = distance(&a, &b, Mode::Window(r)).unwrap();
        prop_assert!(banded.is_finite());
        prop_assert!(banded >= full - 1e-9, "banded {} < full {}", banded, full);
        prop_assert!(window >= full - 1e-9, "window {} < full {}", window, full);
        // Widening the band can only help.
        prop_assert!(window <= banded + 1e-9);
    }

    #[test]
    fn wide_window_equals_full((a, b) in pair()) {
        let r = a.len().max(b.len());
        let full = distance(&a, &b, Mode::Full).unwrap();
        let window = distance(&a, &b, Mode::Window(r)).unwrap();
        prop_assert!(close(full, window));
    }

    #[test]
    fn self_distance_is_zero(a in (1usize..14).prop_flat_map(|d| sequence(d, 20))) {
        for mode in [Mode::Full, Mode::Banded, Mode::Window(2)] {
            prop_assert_eq!(distance(&a, &a, mode).unwrap(), 0.0);
        }
    }

    #[test]
    fn equal_lengths_zero_band_is_diagonal(
        (a, b) in (1usize..5, 1usize..12).prop_flat_map(|(dim, len)| {
            let frames = prop::collection::vec(prop::collection::vec(-10.0f32..10.0, dim), len);
            (frames.clone(), frames)
        })
    ) {
        let a = FeatureSequence::from_frames(a).unwrap();
        let b = FeatureSequence::from_frames(b).unwrap();
        let diagonal: f64 = a.frames().zip(b.frames()).map(|(x, y)| euclidean(x, y)).sum();
        let banded = distance(&a, &b, Mode::Banded).unwrap();
        prop_assert!(close(banded, diagonal));
    }

    #[test]
    fn path_cost_matches_distance((a, b) in pair()) {
        let path = warping_path(&a, &b).unwrap();
        prop_assert_eq!(path.steps.first().copied(), Some((0, 0)));
        prop_assert_eq!(path.steps.last().copied(), Some((a.len() - 1, b.len() - 1)));
        for w in path.steps.windows(2) {
            let (di, dj) = (w[1].0 - w[0].0, w[1].1 - w[0].1);
            prop_assert!((di, dj) == (1, 1) || (di, dj) == (1, 0) || (di, dj) == (0, 1));
        }
        let cost: f64 = path.steps.iter().map(|&(i, j)| euclidean(a.frame(i), b.frame(j))).sum();
        prop_assert!(close(cost, path.distance));
        prop_assert!(close(path.distance, distance(&a, &b, Mode::Full).unwrap()));
    }
}
