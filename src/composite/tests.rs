//! Tests for the composite model adapter

use ndarray::array;

use super::*;
use crate::data::Data;
use crate::model::shared;
use crate::models::{ConstantRegressor, KnnRegressor, Standardizer, UnivariateStandardizer};
use crate::network::NetworkError;

type Pipe = TransformedTargetPipeline<Standardizer, KnnRegressor, UnivariateStandardizer>;

fn pipe() -> Pipe {
    TransformedTargetPipeline::new(
        Standardizer::default(),
        KnnRegressor {
            k: 2,
            ..Default::default()
        },
        UnivariateStandardizer::default(),
    )
}

fn x() -> Data {
    Data::from(array![
        [0.0, 10.0],
        [1.0, 30.0],
        [2.0, 20.0],
        [3.0, 50.0],
        [4.0, 40.0],
        [5.0, 60.0]
    ])
}

fn y() -> Data {
    Data::from_slice(&[1.0, 4.0, 9.0, 16.0, 25.0, 36.0])
}

fn frozen(fit: &CompositeFit, cache: &CompositeCache) -> [bool; 3] {
    ["transformer", "learner", "target"].map(|name| {
        let id = cache.trainable(name).expect("cached component");
        fit.network().is_frozen(id).expect("known")
    })
}

fn generations(fit: &CompositeFit, cache: &CompositeCache) -> [u64; 3] {
    ["transformer", "learner", "target"].map(|name| {
        let id = cache.trainable(name).expect("cached component");
        fit.network().generation(id).expect("known")
    })
}

// -------------------------------------------------------------------------
// fit / predict
// -------------------------------------------------------------------------

#[test]
fn test_fit_trains_every_component_once() {
    let p = pipe();
    let (fit, cache, report) = p.fit(0, x(), y()).expect("fit");
    assert_eq!(generations(&fit, &cache), [1, 1, 1]);
    assert_eq!(frozen(&fit, &cache), [false, false, false]);
    assert_eq!(report["k"], 2);
    assert_eq!(report["n_train"], 6);
    assert_eq!(cache.components().len(), 3);
    assert_eq!(cache.learner(), cache.trainable("learner").expect("cached"));
}

#[test]
fn test_cache_snapshots_configuration() {
    let p = pipe();
    let (_fit, cache, _) = p.fit(0, x(), y()).expect("fit");
    let learner = cache
        .components()
        .iter()
        .find(|c| c.name == "learner")
        .expect("cached");
    assert_eq!(learner.snapshot["k"], 2);
    assert_eq!(learner.snapshot["metric"], "euclidean");
}

#[test]
fn test_predict_on_new_rows() {
    let p = pipe();
    let (fit, _cache, _) = p.fit(0, x(), y()).expect("fit");
    let yhat = p
        .predict(&fit, Data::from(array![[0.0, 10.0], [5.0, 60.0]]))
        .expect("predict");
    assert_eq!(yhat.nrows(), 2);
    // training source is left untouched
    assert_eq!(fit.network().source_data(fit.x()).expect("source"), &x());
    assert_eq!(fit.network().source_data(fit.y()).expect("source"), &y());
}

#[test]
fn test_predict_on_training_rows_matches_call() {
    let p = pipe();
    let (fit, _cache, _) = p.fit(0, x(), y()).expect("fit");
    let direct = fit.network().call(fit.output()).expect("fitted");
    assert_eq!(p.predict(&fit, x()).expect("predict"), direct);
}

#[test]
fn test_fit_failure_propagates() {
    let p = pipe();
    p.learner.borrow_mut().k = 0;
    let err = p.fit(0, x(), y()).expect_err("k = 0 is invalid");
    assert!(matches!(
        err,
        CompositeError::Network(NetworkError::Model {
            model: "KnnRegressor",
            ..
        })
    ));
}

// -------------------------------------------------------------------------
// Freeze propagation
// -------------------------------------------------------------------------

#[test]
fn test_update_feature_transform_only() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    p.transformer.borrow_mut().scale = false;
    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    assert_eq!(frozen(&fit, &cache), [false, false, true]);
    assert_eq!(generations(&fit, &cache), [2, 2, 1]);
}

#[test]
fn test_update_learner_only() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    p.learner.borrow_mut().k = 3;
    let report = p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    assert_eq!(frozen(&fit, &cache), [true, false, true]);
    assert_eq!(generations(&fit, &cache), [1, 2, 1]);
    assert_eq!(report["k"], 3);
}

#[test]
fn test_update_target_only_retrains_learner() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    p.target.borrow_mut().center = false;
    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    assert_eq!(frozen(&fit, &cache), [true, false, false]);
}

#[test]
fn test_update_everything_changed() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    p.transformer.borrow_mut().center = false;
    p.learner.borrow_mut().k = 1;
    p.target.borrow_mut().scale = false;
    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    assert_eq!(frozen(&fit, &cache), [false, false, false]);
    assert_eq!(generations(&fit, &cache), [2, 2, 2]);
}

#[test]
fn test_update_is_idempotent() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    let before = p.predict(&fit, x()).expect("predict");

    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    let report = p.update(0, &mut fit, &mut cache, x(), y()).expect("update");

    assert_eq!(frozen(&fit, &cache), [true, true, true]);
    assert_eq!(generations(&fit, &cache), [1, 1, 1]);
    assert_eq!(p.predict(&fit, x()).expect("predict"), before);
    assert_eq!(report["k"], 2);
}

#[test]
fn test_update_commits_snapshots() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    p.learner.borrow_mut().k = 4;
    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    assert_eq!(frozen(&fit, &cache), [true, true, true]);
    assert_eq!(generations(&fit, &cache), [1, 2, 1]);
}

#[test]
fn test_update_with_reverted_config_retrains() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    let original = p.predict(&fit, x()).expect("predict");

    p.learner.borrow_mut().k = 1;
    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    p.learner.borrow_mut().k = 2;
    p.update(0, &mut fit, &mut cache, x(), y()).expect("update");

    assert_eq!(frozen(&fit, &cache), [true, false, true]);
    assert_eq!(p.predict(&fit, x()).expect("predict"), original);
}

#[test]
fn test_update_rebinds_replaced_handle() {
    let mut p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    p.learner = shared(KnnRegressor {
        k: 1,
        ..Default::default()
    });
    let report = p.update(0, &mut fit, &mut cache, x(), y()).expect("update");
    assert_eq!(report["k"], 1);
    assert_eq!(frozen(&fit, &cache), [true, false, true]);
}

#[test]
fn test_update_with_new_data_refits() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    let x2 = x().select_rows(&[0, 1, 2, 3]).expect("in bounds");
    let y2 = y().select_rows(&[0, 1, 2, 3]).expect("in bounds");
    let report = p.update(0, &mut fit, &mut cache, x2.clone(), y2).expect("update");
    assert_eq!(generations(&fit, &cache), [1, 1, 1]);
    assert_eq!(frozen(&fit, &cache), [false, false, false]);
    assert_eq!(report["n_train"], 4);
    assert_eq!(fit.network().source_data(fit.x()).expect("source"), &x2);
}

#[test]
fn test_failed_update_keeps_previous_fit() {
    let p = pipe();
    let (mut fit, mut cache, _) = p.fit(0, x(), y()).expect("fit");
    let before = p.predict(&fit, x()).expect("predict");

    p.learner.borrow_mut().k = 0;
    let err = p
        .update(0, &mut fit, &mut cache, x(), y())
        .expect_err("k = 0 is invalid");
    assert!(matches!(
        err,
        CompositeError::Network(NetworkError::Model {
            model: "KnnRegressor",
            ..
        })
    ));

    // the learner keeps its last good fit and the cache its last snapshot
    assert_eq!(p.predict(&fit, x()).expect("predict"), before);
    assert_eq!(generations(&fit, &cache), [1, 1, 1]);
    let learner = cache
        .components()
        .iter()
        .find(|c| c.name == "learner")
        .expect("cached");
    assert_eq!(learner.snapshot["k"], 2);

    p.learner.borrow_mut().k = 3;
    let report = p.update(0, &mut fit, &mut cache, x(), y()).expect("retry");
    assert_eq!(report["k"], 3);
    assert_eq!(generations(&fit, &cache), [1, 2, 1]);
}

#[test]
fn test_negative_verbosity_is_silent() {
    let p = pipe();
    let ((), lines) = crate::test_logs::capture(|| {
        let (mut fit, mut cache, _) = p.fit(-5, x(), y()).expect("fit");
        p.learner.borrow_mut().k = 3;
        p.update(-5, &mut fit, &mut cache, x(), y()).expect("update");
    });
    assert!(lines.is_empty(), "unexpected logs: {lines:?}");
}

// -------------------------------------------------------------------------
// Custom composites
// -------------------------------------------------------------------------

/// Declares two components but only wires one
#[derive(Debug)]
struct Mismatched {
    learner: crate::model::Shared<ConstantRegressor>,
    spare: crate::model::Shared<ConstantRegressor>,
}

impl CompositeModel for Mismatched {
    fn components(&self) -> Vec<(&'static str, SharedModel)> {
        vec![
            ("learner", self.learner.clone() as SharedModel),
            ("spare", self.spare.clone() as SharedModel),
        ]
    }

    fn build(&self, network: &mut Network, x: NodeId, y: NodeId) -> Result<Wiring> {
        let learner = network.trainable(self.learner.clone(), &[x, y])?;
        let output = network.predict(learner, x)?;
        Ok(Wiring {
            output,
            trainables: vec![learner],
            learner: 0,
        })
    }
}

#[test]
fn test_component_mismatch_rejected() {
    let composite = Mismatched {
        learner: shared(ConstantRegressor::default()),
        spare: shared(ConstantRegressor::default()),
    };
    let err = composite.fit(0, x(), y()).expect_err("mismatch");
    assert_eq!(
        err,
        CompositeError::ComponentMismatch {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn test_free_functions_match_trait_methods() {
    let p = pipe();
    let (fit_a, _, report_a) = super::fit(&p, 0, x(), y()).expect("fit");
    let (fit_b, _, report_b) = p.fit(0, x(), y()).expect("fit");
    assert_eq!(report_a, report_b);
    assert_eq!(
        super::predict(&p, &fit_a, x()).expect("predict"),
        p.predict(&fit_b, x()).expect("predict")
    );
}
