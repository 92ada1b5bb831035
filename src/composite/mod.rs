//! Composite models backed by learning networks
//!
//! A [`CompositeModel`] declares its sub-configurations and wires them into
//! a [`Network`]. The adapter functions give it the usual model lifecycle:
//!
//! - [`fit`] builds the network once and trains it through
//! - [`update`] retrains only the components whose hyperparameters (or
//!   upstream hyperparameters) changed since the last call
//! - [`predict`] evaluates the fitted network on new features
//!
//! ```
//! use entramado::composite::{CompositeModel, TransformedTargetPipeline};
//! use entramado::data::Data;
//! use entramado::models::{KnnRegressor, Standardizer, UnivariateStandardizer};
//!
//! let pipe = TransformedTargetPipeline::new(
//!     Standardizer::default(),
//!     KnnRegressor { k: 1, ..Default::default() },
//!     UnivariateStandardizer::default(),
//! );
//! let x = Data::from_rows(&[vec![0.0], vec![1.0], vec![2.0]]).expect("rectangular");
//! let y = Data::from_slice(&[10.0, 20.0, 30.0]);
//!
//! let (mut fit, mut cache, _report) = pipe.fit(0, x.clone(), y.clone())?;
//! pipe.learner.borrow_mut().k = 2;
//! pipe.update(0, &mut fit, &mut cache, x, y)?;
//! let yhat = pipe.predict(&fit, Data::from_rows(&[vec![0.1]]).expect("rectangular"))?;
//! assert_eq!(yhat.nrows(), 1);
//! # Ok::<(), entramado::composite::CompositeError>(())
//! ```

mod adapter;
mod error;
mod pipeline;

#[cfg(test)]
mod tests;

pub use adapter::{fit, predict, update, CachedComponent, CompositeCache, CompositeFit};
pub use error::{CompositeError, Result};
pub use pipeline::TransformedTargetPipeline;

use crate::data::Data;
use crate::model::{Report, SharedModel};
use crate::network::{Network, NodeId, TrainableId};

/// Nodes created by [`CompositeModel::build`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wiring {
    /// Final learning node; evaluating it yields predictions
    pub output: NodeId,
    /// One trainable per entry of [`CompositeModel::components`], same order
    pub trainables: Vec<TrainableId>,
    /// Index into `trainables` of the node whose report is returned
    pub learner: usize,
}

/// Aggregate of shared sub-configurations that trains as one model
pub trait CompositeModel {
    /// Named sub-configurations, upstream first
    fn components(&self) -> Vec<(&'static str, SharedModel)>;

    /// Wire the components into `network` on top of the sources `x` and `y`
    fn build(&self, network: &mut Network, x: NodeId, y: NodeId) -> Result<Wiring>;

    fn fit(&self, verbosity: i32, x: Data, y: Data) -> Result<(CompositeFit, CompositeCache, Report)> {
        adapter::fit(self, verbosity, x, y)
    }

    fn update(
        &self,
        verbosity: i32,
        fit: &mut CompositeFit,
        cache: &mut CompositeCache,
        x: Data,
        y: Data,
    ) -> Result<Report> {
        adapter::update(self, verbosity, fit, cache, x, y)
    }

    fn predict(&self, fit: &CompositeFit, x: Data) -> Result<Data> {
        adapter::predict(self, fit, x)
    }
}
