//! Fit / update / predict lifecycle for composite models

use std::collections::HashSet;
use std::rc::Rc;

use serde_json::Value;
use tracing::info;

use super::error::{CompositeError, Result};
use super::CompositeModel;
use crate::data::Data;
use crate::model::Report;
use crate::network::{Network, NodeId, TrainableId};

/// Fitted composite: the network and its entry/exit nodes
#[derive(Debug)]
pub struct CompositeFit {
    network: Network,
    x: NodeId,
    y: NodeId,
    output: NodeId,
}

impl CompositeFit {
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Source node holding the training features
    pub fn x(&self) -> NodeId {
        self.x
    }

    /// Source node holding the training targets
    pub fn y(&self) -> NodeId {
        self.y
    }

    /// Final learning node (the fitted model)
    pub fn output(&self) -> NodeId {
        self.output
    }
}

/// One cached component
#[derive(Debug, Clone)]
pub struct CachedComponent {
    pub name: &'static str,
    pub trainable: TrainableId,
    /// Hyperparameters as they were at the last fit or update
    pub snapshot: Value,
}

/// State carried from one `fit`/`update` to the next
#[derive(Debug, Clone)]
pub struct CompositeCache {
    components: Vec<CachedComponent>,
    learner: TrainableId,
}

impl CompositeCache {
    pub fn components(&self) -> &[CachedComponent] {
        &self.components
    }

    /// Trainable node of the named component
    pub fn trainable(&self, name: &str) -> Option<TrainableId> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.trainable)
    }

    /// Trainable node whose report is surfaced
    pub fn learner(&self) -> TrainableId {
        self.learner
    }
}

/// Build the network, fit it through, and snapshot every component
pub fn fit<C>(
    composite: &C,
    verbosity: i32,
    x: Data,
    y: Data,
) -> Result<(CompositeFit, CompositeCache, Report)>
where
    C: CompositeModel + ?Sized,
{
    let mut network = Network::new();
    let x = network.source(x);
    let y = network.source(y);
    let wiring = composite.build(&mut network, x, y)?;

    let components = composite.components();
    if components.len() != wiring.trainables.len() {
        return Err(CompositeError::ComponentMismatch {
            expected: components.len(),
            got: wiring.trainables.len(),
        });
    }

    network.fit(wiring.output, verbosity - 1)?;

    let cached = components
        .iter()
        .zip(&wiring.trainables)
        .map(|((name, model), &trainable)| -> Result<CachedComponent> {
            Ok(CachedComponent {
                name: *name,
                trainable,
                snapshot: model.borrow().snapshot()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let learner = *wiring
        .trainables
        .get(wiring.learner)
        .ok_or(CompositeError::ComponentMismatch {
            expected: wiring.learner + 1,
            got: wiring.trainables.len(),
        })?;
    let report = network.report(learner)?.clone();

    let fit = CompositeFit {
        network,
        x,
        y,
        output: wiring.output,
    };
    let cache = CompositeCache {
        components: cached,
        learner,
    };
    Ok((fit, cache, report))
}

/// Retrain only what changed since the cache was taken.
///
/// A component is frozen iff its own hyperparameters and those of every
/// component upstream of it are unchanged. If the training data differs
/// from the data the network was built on, the composite is refit from
/// scratch.
///
/// `fitted` and `cache` are updated in place. On error the caller keeps
/// them: nodes retrained before the failure hold their new fits, the rest
/// hold their previous ones, and the cached snapshots are left untouched so
/// a retry sees the same changes again.
pub fn update<C>(
    composite: &C,
    verbosity: i32,
    fitted: &mut CompositeFit,
    cache: &mut CompositeCache,
    x: Data,
    y: Data,
) -> Result<Report>
where
    C: CompositeModel + ?Sized,
{
    let data_changed = fitted.network.source_data(fitted.x)? != &x
        || fitted.network.source_data(fitted.y)? != &y;
    if data_changed {
        if verbosity > 0 {
            info!("training data changed; refitting composite from scratch");
        }
        let (new_fit, new_cache, report) = fit(composite, verbosity, x, y)?;
        *fitted = new_fit;
        *cache = new_cache;
        return Ok(report);
    }

    let components = composite.components();
    if components.len() != cache.components.len() {
        return Err(CompositeError::ComponentMismatch {
            expected: cache.components.len(),
            got: components.len(),
        });
    }

    let output = fitted.output;
    let network = &mut fitted.network;

    // current snapshots, rebinding any configuration the caller replaced
    let mut changed = HashSet::new();
    let mut snapshots = Vec::with_capacity(components.len());
    for ((name, model), cached) in components.iter().zip(&cache.components) {
        if !Rc::ptr_eq(&network.model(cached.trainable)?, model) {
            network.replace_model(cached.trainable, model.clone())?;
        }
        let snapshot = model.borrow().snapshot()?;
        if snapshot != cached.snapshot {
            if verbosity > 0 {
                info!(component = *name, trainable = %cached.trainable, "hyperparameters changed");
            }
            changed.insert(cached.trainable);
        }
        snapshots.push(snapshot);
    }

    for cached in &cache.components {
        network.thaw(cached.trainable)?;
    }
    for cached in &cache.components {
        let upstream = network.tape(cached.trainable)?;
        if upstream.iter().all(|t| !changed.contains(t)) {
            network.freeze(cached.trainable)?;
        }
    }

    network.fit(output, verbosity - 1)?;

    for (cached, snapshot) in cache.components.iter_mut().zip(snapshots) {
        cached.snapshot = snapshot;
    }
    Ok(network.report(cache.learner)?.clone())
}

/// Evaluate the fitted composite on new features; no training side effect
pub fn predict<C>(_composite: &C, fit: &CompositeFit, x_new: Data) -> Result<Data>
where
    C: CompositeModel + ?Sized,
{
    Ok(fit.network.call_with(fit.output, &[(fit.x, x_new)])?)
}
