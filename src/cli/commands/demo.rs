//! Demo command implementation
//!
//! Fits a standardize → k-NN → inverse-target pipeline on a small built-in
//! dataset, sweeps the learner's `k` through `update`, and reports which
//! components retrained at each step.

use ndarray::{Array1, Array2};

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::composite::{CompositeCache, CompositeFit, CompositeModel, TransformedTargetPipeline};
use crate::config::DemoArgs;
use crate::data::Data;
use crate::models::{KnnRegressor, Standardizer, UnivariateStandardizer};
use crate::tuning::{make_range, GridSearch, RangeOptions};

type DemoPipeline = TransformedTargetPipeline<Standardizer, KnnRegressor, UnivariateStandardizer>;

/// Outcome of one `update` call
#[derive(Debug, Clone, PartialEq)]
pub struct SweepStep {
    pub label: String,
    pub k: usize,
    pub mse: f64,
    pub retrained: Vec<&'static str>,
}

/// Deterministic regression problem: 16 rows, 2 features
pub fn demo_data() -> (Data, Data) {
    let n = 16;
    let x = Array2::from_shape_fn((n, 2), |(i, j)| {
        let i = i as f64;
        if j == 0 {
            i
        } else {
            (i * 7.0) % 5.0 * 10.0
        }
    });
    let y = Array1::from_shape_fn(n, |i| {
        let i = i as f64;
        0.5 * i * i + (i % 3.0)
    });
    (Data::Table(x), Data::Vector(y))
}

/// Configuration edit applied before one `update`
enum Change {
    Learner(KnnRegressor),
    UnscaledFeatures,
}

impl Change {
    fn apply(self, pipe: &DemoPipeline) -> String {
        match self {
            Change::Learner(learner) => {
                let label = format!("k={}", learner.k);
                *pipe.learner.borrow_mut() = learner;
                label
            }
            Change::UnscaledFeatures => {
                pipe.transformer.borrow_mut().scale = false;
                "unscaled features".to_string()
            }
        }
    }
}

fn generations(fit: &CompositeFit, cache: &CompositeCache) -> Result<Vec<u64>, String> {
    cache
        .components()
        .iter()
        .map(|c| fit.network().generation(c.trainable).map_err(|e| e.to_string()))
        .collect()
}

fn training_mse(pipe: &DemoPipeline, fit: &CompositeFit, x: &Data, y: &Data) -> Result<f64, String> {
    let predicted = pipe
        .predict(fit, x.clone())
        .map_err(|e| format!("Predict error: {e}"))?;
    match (predicted.as_vector(), y.as_vector()) {
        (Some(p), Some(y)) => Ok((p - y).mapv(|d| d * d).mean().unwrap_or(0.0)),
        _ => Err("pipeline did not produce vector predictions".to_string()),
    }
}

/// Run the sweep and return one step per `update`
pub fn sweep(max_k: i64, resolution: usize, verbosity: i32) -> Result<Vec<SweepStep>, String> {
    let (x, y) = demo_data();
    let pipe: DemoPipeline = TransformedTargetPipeline::new(
        Standardizer::default(),
        KnnRegressor::default(),
        UnivariateStandardizer::default(),
    );
    let (mut fit, mut cache, _) = pipe
        .fit(verbosity, x.clone(), y.clone())
        .map_err(|e| format!("Fit error: {e}"))?;

    let candidates = {
        let learner = pipe.learner.borrow();
        let k = make_range(&*learner, "k", RangeOptions::bounds(1i64, max_k))
            .map_err(|e| format!("Range error: {e}"))?;
        GridSearch::new(vec![k], resolution)
            .candidates(&*learner)
            .map_err(|e| format!("Grid error: {e}"))?
    };

    let mut changes: Vec<Change> = candidates.into_iter().map(Change::Learner).collect();
    changes.push(Change::UnscaledFeatures);

    let mut steps = Vec::with_capacity(changes.len());
    for change in changes {
        let before = generations(&fit, &cache)?;
        let label = change.apply(&pipe);
        let report = pipe
            .update(verbosity, &mut fit, &mut cache, x.clone(), y.clone())
            .map_err(|e| format!("Update error: {e}"))?;

        let after = generations(&fit, &cache)?;
        let retrained = cache
            .components()
            .iter()
            .zip(before.iter().zip(&after))
            .filter(|(_, (b, a))| b != a)
            .map(|(c, _)| c.name)
            .collect();
        let k = report
            .get("k")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_default() as usize;
        steps.push(SweepStep {
            label,
            k,
            mse: training_mse(&pipe, &fit, &x, &y)?,
            retrained,
        });
    }
    Ok(steps)
}

pub fn run_demo(args: DemoArgs, level: LogLevel) -> Result<(), String> {
    let steps = sweep(args.max_k, args.resolution, level.verbosity())?;

    log(level, LogLevel::Normal, "Transformed-target k-NN sweep:");
    for step in &steps {
        let retrained = if step.retrained.is_empty() {
            "nothing".to_string()
        } else {
            step.retrained.join(", ")
        };
        log(
            level,
            LogLevel::Normal,
            &format!(
                "  {:<18} k={:<3} mse={:>10.4}  retrained: {retrained}",
                step.label, step.k, step.mse
            ),
        );
    }
    Ok(())
}
