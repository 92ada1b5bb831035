//! Feature transform, learner, and inverse target transform

use super::error::Result;
use super::{CompositeModel, Wiring};
use crate::model::{shared, Model, Shared, SharedModel};
use crate::network::{Network, NodeId};

/// Learner trained on transformed features and transformed targets, whose
/// predictions are mapped back through the target transformer.
///
/// ```text
/// X ──transformer──► Xs ─┐
///                        ├─► learner ──predict(Xs)──► ẑ ──target⁻¹──► ŷ
/// y ──target───────► ys ─┘
/// ```
#[derive(Debug)]
pub struct TransformedTargetPipeline<F, L, T> {
    pub transformer: Shared<F>,
    pub learner: Shared<L>,
    pub target: Shared<T>,
}

impl<F, L, T> TransformedTargetPipeline<F, L, T>
where
    F: Model + 'static,
    L: Model + 'static,
    T: Model + 'static,
{
    pub fn new(transformer: F, learner: L, target: T) -> Self {
        Self {
            transformer: shared(transformer),
            learner: shared(learner),
            target: shared(target),
        }
    }
}

impl<F, L, T> CompositeModel for TransformedTargetPipeline<F, L, T>
where
    F: Model + 'static,
    L: Model + 'static,
    T: Model + 'static,
{
    fn components(&self) -> Vec<(&'static str, SharedModel)> {
        vec![
            ("transformer", self.transformer.clone() as SharedModel),
            ("target", self.target.clone() as SharedModel),
            ("learner", self.learner.clone() as SharedModel),
        ]
    }

    fn build(&self, network: &mut Network, x: NodeId, y: NodeId) -> Result<Wiring> {
        let feature = network.trainable(self.transformer.clone(), &[x])?;
        let xs = network.transform(feature, x)?;
        let target = network.trainable(self.target.clone(), &[y])?;
        let ys = network.transform(target, y)?;
        let learner = network.trainable(self.learner.clone(), &[xs, ys])?;
        let zhat = network.predict(learner, xs)?;
        let output = network.inverse_transform(target, zhat)?;
        Ok(Wiring {
            output,
            trainables: vec![feature, target, learner],
            learner: 2,
        })
    }
}
