use approx::{assert_abs_diff_eq, assert_relative_eq};

use softmax_grad::check::{matrix_rel_error, numerical_gradient, rel_error};
use softmax_grad::{
    softmax_loss, softmax_loss_naive, softmax_loss_vectorized, softmax_loss_vectorized_array,
    Matrix, SoftmaxError, SoftmaxProblem, Strategy,
};

#[test]
fn implementations_agree_on_random_problems() {
    for (seed, (n, d, c)) in [(2, 3, 4), (17, 5, 3), (40, 20, 10), (1, 1, 1), (64, 8, 2)]
        .into_iter()
        .enumerate()
    {
        for reg in [0.0, 1e-3, 2.5] {
            let p = SoftmaxProblem::random(n, d, c, reg, seed as u64);
            // Larger weights than the generator's default so scores are not all ~0.
            let w = p.weights.map(|x| x * 1e4);

            let (loss_n, grad_n) = softmax_loss_naive(&w, &p.inputs, &p.labels, reg).unwrap();
            let (loss_v, grad_v) = softmax_loss_vectorized(&w, &p.inputs, &p.labels, reg).unwrap();

            assert!(rel_error(loss_n, loss_v) < 1e-7, "loss {loss_n} vs {loss_v}");
            assert!(matrix_rel_error(&grad_n, &grad_v).unwrap() < 1e-7);
        }
    }
}

#[test]
fn array_entry_point_matches_matrix_entry_point() {
    let p = SoftmaxProblem::random(30, 6, 4, 0.2, 5);
    let (loss, grad) = softmax_loss_vectorized(&p.weights, &p.inputs, &p.labels, p.reg).unwrap();
    let (loss_a, grad_a) = softmax_loss_vectorized_array(
        p.weights.to_array().view(),
        p.inputs.to_array().view(),
        &p.labels,
        p.reg,
    )
    .unwrap();

    assert_eq!(loss, loss_a);
    assert_eq!(grad, Matrix::from_array(grad_a.view()));
}

#[test]
fn analytic_gradient_matches_finite_differences() {
    let p = SoftmaxProblem::random(25, 4, 3, 0.7, 8);
    let w = p.weights.map(|x| x * 5e3);

    for strategy in Strategy::ALL {
        let (_, analytic) = softmax_loss(strategy, &w, &p.inputs, &p.labels, p.reg).unwrap();
        for h in [1e-4, 1e-5, 1e-6] {
            let numerical = numerical_gradient(|w| p.loss_at(strategy, w), &w, h).unwrap();
            for (a, b) in analytic.data.iter().flatten().zip(numerical.data.iter().flatten()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn concrete_two_class_example() {
    let w = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]]);
    let x = Matrix::from_data(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
    let y = [0, 1];
    let e = std::f64::consts::E;

    for strategy in Strategy::ALL {
        let (loss, grad) = softmax_loss(strategy, &w, &x, &y, 0.0).unwrap();
        assert_relative_eq!(loss, -(e / (e + 1.0)).ln(), max_relative = 1e-12);
        assert_abs_diff_eq!(loss, 0.3133, epsilon = 1e-4);
        assert_eq!(grad.shape(), (3, 2));
        assert_abs_diff_eq!(grad.data[0][0], -0.5 / (e + 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(grad.data[1][1], -0.5 / (e + 1.0), epsilon = 1e-12);
        assert_eq!(grad.data[2], vec![0.0, 0.0]);
    }
}

#[test]
fn zero_row_contributes_log_c() {
    let p = SoftmaxProblem::random(1, 6, 7, 0.0, 4);
    let w = p.weights.map(|x| x * 1e4);
    let zeros = Matrix::zeros(1, 6);

    for strategy in Strategy::ALL {
        let (loss, grad) = softmax_loss(strategy, &w, &zeros, &[3], 0.0).unwrap();
        assert!(!loss.is_nan());
        assert_relative_eq!(loss, 7.0_f64.ln(), max_relative = 1e-12);
        assert!(grad.data.iter().flatten().all(|g| *g == 0.0));
    }
}

#[test]
fn constant_score_shift_changes_nothing() {
    let p = SoftmaxProblem::random(12, 4, 5, 0.0, 21);
    let w = p.weights.map(|x| x * 1e4);
    let (base_loss, base_grad) = softmax_loss_naive(&w, &p.inputs, &p.labels, 0.0).unwrap();

    // A constant-one feature whose weight row is k for every class adds k to every score.
    for k in [-50.0, 3.0, 800.0] {
        let mut x_aug = p.inputs.clone();
        for row in x_aug.data.iter_mut() {
            row.push(1.0);
        }
        x_aug.cols += 1;
        let mut w_aug = w.clone();
        w_aug.data.push(vec![k; w.cols]);
        w_aug.rows += 1;

        for strategy in Strategy::ALL {
            let (loss, grad) = softmax_loss(strategy, &w_aug, &x_aug, &p.labels, 0.0).unwrap();
            assert_relative_eq!(loss, base_loss, max_relative = 1e-9);
            for d in 0..w.rows {
                for c in 0..w.cols {
                    assert_abs_diff_eq!(grad.data[d][c], base_grad.data[d][c], epsilon = 1e-9);
                }
            }
        }
    }
}

#[test]
fn regularization_is_additive_and_monotonic() {
    let p = SoftmaxProblem::random(15, 5, 4, 0.0, 13);
    let w = p.weights.map(|x| x * 1e3);
    let sum_sq = w.sum_squares();

    for strategy in Strategy::ALL {
        let (data_loss, data_grad) = softmax_loss(strategy, &w, &p.inputs, &p.labels, 0.0).unwrap();

        let mut previous = data_loss;
        for reg in [0.1, 0.5, 1.0, 10.0] {
            let (loss, grad) = softmax_loss(strategy, &w, &p.inputs, &p.labels, reg).unwrap();
            assert_relative_eq!(loss, data_loss + 0.5 * reg * sum_sq, max_relative = 1e-12);
            assert!(loss > previous);
            previous = loss;

            for d in 0..w.rows {
                for c in 0..w.cols {
                    let expected = data_grad.data[d][c] + reg * w.data[d][c];
                    assert_abs_diff_eq!(grad.data[d][c], expected, epsilon = 1e-12);
                }
            }
        }
    }
}

#[test]
fn bad_inputs_fail_fast_in_both_implementations() {
    let w = Matrix::zeros(3, 2);
    let x = Matrix::zeros(2, 3);

    for strategy in Strategy::ALL {
        let narrow = Matrix::zeros(2, 2);
        assert!(matches!(
            softmax_loss(strategy, &w, &narrow, &[0, 1], 0.0),
            Err(SoftmaxError::ShapeMismatch(_))
        ));
        assert!(matches!(
            softmax_loss(strategy, &w, &x, &[0], 0.0),
            Err(SoftmaxError::ShapeMismatch(_))
        ));
        assert!(matches!(
            softmax_loss(strategy, &w, &Matrix::zeros(0, 3), &[], 0.0),
            Err(SoftmaxError::EmptyBatch)
        ));
        assert!(matches!(
            softmax_loss(strategy, &Matrix::zeros(3, 0), &x, &[0, 0], 0.0),
            Err(SoftmaxError::NoClasses)
        ));
        assert!(matches!(
            softmax_loss(strategy, &w, &x, &[0, 2], 0.0),
            Err(SoftmaxError::LabelOutOfRange { index: 1, label: 2, classes: 2 })
        ));
        assert!(matches!(
            softmax_loss(strategy, &w, &x, &[0, 1], -0.1),
            Err(SoftmaxError::InvalidRegularization(_))
        ));
    }
}

#[test]
fn inconsistent_matrix_fails_in_both_implementations() {
    // Declares one row of two entries but carries an extra row.
    let w = Matrix { rows: 1, cols: 2, data: vec![vec![0.5, -0.5], vec![10.0, 10.0]] };
    let x = Matrix::from_data(vec![vec![1.0]]);
    // Declares two weight rows but holds one.
    let short = Matrix { rows: 2, cols: 2, data: vec![vec![0.1, 0.2]] };
    let x2 = Matrix::from_data(vec![vec![1.0, 1.0]]);
    // Row 1 of the inputs is too short.
    let ragged = Matrix { rows: 2, cols: 2, data: vec![vec![1.0, 2.0], vec![3.0]] };

    for strategy in Strategy::ALL {
        assert!(matches!(
            softmax_loss(strategy, &w, &x, &[0], 1.0),
            Err(SoftmaxError::ShapeMismatch(_))
        ));
        assert!(matches!(
            softmax_loss(strategy, &short, &x2, &[1], 0.0),
            Err(SoftmaxError::ShapeMismatch(_))
        ));
        assert!(matches!(
            softmax_loss(strategy, &Matrix::zeros(2, 2), &ragged, &[0, 1], 0.0),
            Err(SoftmaxError::RaggedRows { row: 1, len: 1, expected: 2 })
        ));
    }
}

#[test]
fn infinite_reg_is_rejected() {
    let w = Matrix::zeros(2, 3);
    let x = Matrix::from_data(vec![vec![1.0, 0.0]]);
    for strategy in Strategy::ALL {
        assert!(matches!(
            softmax_loss(strategy, &w, &x, &[2], f64::INFINITY),
            Err(SoftmaxError::InvalidRegularization(_))
        ));
    }
}
