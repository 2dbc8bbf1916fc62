use approx::assert_relative_eq;
use kestrel_geometry::robust_cost::{TukeyWeightFunction, WeightFunction};
use kestrel_geometry::{AlignerConfig, PoseAligner};
use kestrel_lie::{Matrix6, Vector6, SE3};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn gauss_newton<W: WeightFunction>(
    aligner: &PoseAligner<'_, W>,
    initial: SE3,
    max_iterations: usize,
) -> SE3 {
    let mut estimate = initial;
    for _ in 0..max_iterations {
        let mut h = Matrix6::zeros();
        let mut g = Vector6::zeros();
        aligner.evaluate_error_accumulate(&estimate, &mut h, &mut g);
        let Some(dx) = h.lu().solve(&g) else {
            break;
        };
        estimate = aligner.update(&estimate, &dx);
        if dx.norm() < 1e-12 {
            break;
        }
    }
    estimate
}

/// `n` trajectory pairs related by `t_a_b`, with every fifth `T_W_B` replaced by a random
/// pose.
fn contaminated_trajectories(n: usize, t_a_b: &SE3, seed: u64) -> (Vec<SE3>, Vec<SE3>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let t_w_a: Vec<SE3> = (0..n).map(|_| SE3::from_rng(&mut rng)).collect();
    let t_w_b = t_w_a
        .iter()
        .enumerate()
        .map(|(i, a)| {
            if i % 5 == 0 {
                SE3::from_rng(&mut rng)
            } else {
                *a * *t_a_b
            }
        })
        .collect();
    (t_w_a, t_w_b)
}

#[test]
fn recovers_transform_with_outliers() {
    init_logger();
    let t_a_b = SE3::exp(&Vector6::new(0.2, -0.3, 0.1, 0.3, 0.2, -0.4));
    let (t_w_a, t_w_b) = contaminated_trajectories(100, &t_a_b, 7);
    let aligner = PoseAligner::new(&t_w_a, &t_w_b, 0.01, 0.01).unwrap();

    let initial = aligner.update(&t_a_b, &Vector6::new(0.05, 0.05, -0.05, 0.05, -0.05, 0.05));
    let estimate = gauss_newton(&aligner, initial, 30);

    let error = estimate.rminus(&t_a_b);
    assert!(error.norm() < 1e-2, "alignment error {error}");
    assert!(aligner.evaluate_error(&estimate) < aligner.evaluate_error(&initial));

    // outliers end up with small weights, inliers with full weight
    let weights = aligner.weights(&estimate);
    for (i, w) in weights.iter().enumerate() {
        if i % 5 == 0 {
            assert!(*w < 0.5, "outlier {i} has weight {w}");
        } else {
            assert_relative_eq!(*w, 1.0);
        }
    }
}

#[test]
fn tukey_rejects_outliers() {
    init_logger();
    let t_a_b = SE3::exp(&Vector6::new(-0.1, 0.4, 0.2, -0.2, 0.1, 0.3));
    let (t_w_a, t_w_b) = contaminated_trajectories(50, &t_a_b, 8);
    let config = AlignerConfig::new()
        .with_sigma_pos(0.01)
        .with_sigma_rot(0.01)
        .with_robust_scale(10.0);
    let aligner = PoseAligner::<TukeyWeightFunction>::with_config(&t_w_a, &t_w_b, config).unwrap();

    let initial = aligner.update(&t_a_b, &Vector6::new(0.02, -0.02, 0.02, 0.02, 0.0, -0.02));
    let estimate = gauss_newton(&aligner, initial, 30);
    assert!(estimate.rminus(&t_a_b).norm() < 1e-6);
}

#[test]
fn parallel_matches_serial() {
    init_logger();
    let t_a_b = SE3::exp(&Vector6::new(0.2, -0.3, 0.1, 0.3, 0.2, -0.4));
    let (t_w_a, t_w_b) = contaminated_trajectories(500, &t_a_b, 9);
    let aligner = PoseAligner::new(&t_w_a, &t_w_b, 0.05, 0.02).unwrap();

    let mut rng = StdRng::seed_from_u64(10);
    let estimate = SE3::exp(&Vector6::from_fn(|_, _| rng.random_range(-0.5..0.5)));

    let (mut h_serial, mut g_serial) = (Matrix6::zeros(), Vector6::zeros());
    let cost_serial = aligner.evaluate_error_accumulate(&estimate, &mut h_serial, &mut g_serial);

    let (mut h_parallel, mut g_parallel) = (Matrix6::zeros(), Vector6::zeros());
    let cost_parallel = aligner.evaluate_error_parallel(&estimate, &mut h_parallel, &mut g_parallel);

    assert_relative_eq!(cost_serial, cost_parallel, max_relative = 1e-10);
    assert_relative_eq!(aligner.evaluate_error(&estimate), cost_serial, max_relative = 1e-10);
    for (a, b) in h_serial.iter().zip(h_parallel.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6, max_relative = 1e-10);
    }
    for (a, b) in g_serial.iter().zip(g_parallel.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6, max_relative = 1e-10);
    }
}

#[test]
fn mismatched_lengths_are_rejected() {
    let (t_w_a, t_w_b) = contaminated_trajectories(10, &SE3::IDENTITY, 11);
    let result = PoseAligner::new(&t_w_a[..3], &t_w_b, 0.1, 0.1);
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains('3') && message.contains("10"), "{message}");
}
