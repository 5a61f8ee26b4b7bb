use mixfill::cluster::{Gmm, Init, Step};
use mixfill::{Error, Imputer, Mask, Missing};
use ndarray::Array2;
use proptest::prelude::*;

/// Small matrices in [-10, 10] with roughly a quarter of entries missing (`NaN`).
fn partial_matrix() -> impl Strategy<Value = Array2<f64>> {
    (2usize..16, 1usize..4).prop_flat_map(|(n, d)| {
        prop::collection::vec((-10.0f64..10.0, prop::bool::weighted(0.25)), n * d).prop_map(
            move |cells| {
                let flat = cells
                    .into_iter()
                    .map(|(v, missing)| if missing { f64::NAN } else { v })
                    .collect();
                Array2::from_shape_vec((n, d), flat).unwrap()
            },
        )
    })
}

fn dense_matrix() -> impl Strategy<Value = Array2<f64>> {
    (2usize..16, 1usize..4).prop_flat_map(|(n, d)| {
        prop::collection::vec(-10.0f64..10.0, n * d)
            .prop_map(move |flat| Array2::from_shape_vec((n, d), flat).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fit_outputs_are_distributions(x in partial_matrix(), k in 1usize..4) {
        let fit = Gmm::new(k).with_report_every(0).fit(x.view()).unwrap();

        for row in fit.responsibilities.rows() {
            prop_assert!((row.sum() - 1.0).abs() < 1e-9, "row sums to {}", row.sum());
        }
        prop_assert!(fit.weights.iter().all(|&p| p >= 0.0));
        prop_assert!((fit.weights.sum() - 1.0).abs() < 1e-9);
        prop_assert!(fit.variances.iter().all(|&v| v >= 0.25));
        prop_assert!(fit.log_likelihood.is_finite());
        prop_assert!(fit.bic <= fit.log_likelihood);
    }

    #[test]
    fn prop_log_likelihood_is_monotone(x in partial_matrix(), k in 1usize..4) {
        let mut run = Gmm::new(k).with_report_every(0).start(x.view()).unwrap();
        let mut previous = f64::NEG_INFINITY;
        loop {
            let step = run.step();
            let ll = run.log_likelihood();
            prop_assert!(
                ll >= previous - 1e-9 * ll.abs().max(1.0),
                "log-likelihood dropped from {} to {}", previous, ll
            );
            previous = ll;
            if step == Step::Converged {
                break;
            }
        }
    }

    #[test]
    fn prop_imputation_is_identity_on_dense_input(x in dense_matrix(), k in 1usize..4) {
        let out = Imputer::new(Gmm::new(k).with_report_every(0)).impute(x.view()).unwrap();
        prop_assert_eq!(out.n_filled, 0);
        prop_assert_eq!(out.filled, x);
    }

    #[test]
    fn prop_imputation_leaves_nothing_missing(x in partial_matrix(), k in 1usize..4) {
        let mask = Mask::from_data(x.view(), Missing::Nan);
        let imputer = Imputer::new(Gmm::new(k).with_report_every(0));
        if let Some(j) = mask.empty_column() {
            prop_assert_eq!(imputer.impute(x.view()), Err(Error::EmptyColumn(j)));
            return Ok(());
        }
        let missing = mask.missing_count();
        let out = imputer.impute(x.view()).unwrap();
        prop_assert_eq!(out.n_filled, missing);
        prop_assert!(out.filled.iter().all(|v| !v.is_nan()));
        for (a, b) in x.iter().zip(out.filled.iter()) {
            if !a.is_nan() {
                prop_assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn prop_random_init_is_reproducible(x in dense_matrix(), seed in any::<u64>()) {
        let gmm = Gmm::new(2).with_init(Init::Random).with_seed(seed).with_report_every(0);
        prop_assert_eq!(gmm.fit(x.view()).unwrap(), gmm.fit(x.view()).unwrap());
    }
}
