use mixfill::cluster::{Gmm, Init};
use mixfill::metrics::rmse;
use mixfill::{Imputation, Imputer, Missing};
use ndarray::Array2;
use rand::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Progress lines from the estimator go through `tracing`; RUST_LOG=debug shows more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Two taste groups over 8 items; each user rates about half of them.
    let mut rng = StdRng::seed_from_u64(7);
    let gold = Array2::from_shape_fn((40, 8), |(i, j)| {
        let base = if i % 2 == 0 {
            1.0 + (j % 5) as f64
        } else {
            5.0 - (j % 5) as f64
        };
        (base + rng.random_range(-0.5..0.5)).clamp(1.0, 5.0)
    });
    let mut sparse = gold.clone();
    for v in sparse.iter_mut() {
        if rng.random::<f64>() < 0.5 {
            *v = 0.0;
        }
    }

    // The caller picks K and the seed; keep the best BIC.
    let mut best: Option<(f64, Imputation)> = None;
    for k in 1..=4 {
        for seed in 0..3 {
            let gmm = Gmm::new(k)
                .with_missing(Missing::Sentinel(0.0))
                .with_init(if seed == 0 { Init::Grid } else { Init::Shuffle })
                .with_seed(seed);
            let out = Imputer::new(gmm).impute(sparse.view())?;
            println!(
                "k={k} seed={seed} iters={} log_likelihood={:.3} bic={:.3}",
                out.fit.n_iter(),
                out.log_likelihood,
                out.bic
            );
            let better = match &best {
                Some((b, _)) => out.bic > *b,
                None => true,
            };
            if better {
                best = Some((out.bic, out));
            }
        }
    }

    if let Some((bic, out)) = best {
        println!(
            "best: k={} bic={bic:.3} filled={} rmse={:.4}",
            out.fit.weights.len(),
            out.n_filled,
            rmse(out.filled.view(), gold.view())?
        );
    }
    Ok(())
}
