//! Graph node types

use std::fmt;

use crate::data::Data;
use crate::model::{Fitted, ModelError, Report, SharedModel};

/// Handle to a learning node within one [`Network`](super::Network)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Handle to a trainable node within one [`Network`](super::Network)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainableId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for TrainableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Operation a derived node applies with its trainable's fit result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Transform,
    Predict,
    InverseTransform,
}

impl Operation {
    pub(crate) fn apply(self, fitted: &dyn Fitted, data: &Data) -> Result<Data, ModelError> {
        match self {
            Operation::Transform => fitted.transform(data),
            Operation::Predict => fitted.predict(data),
            Operation::InverseTransform => fitted.inverse_transform(data),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Transform => "transform",
            Operation::Predict => "predict",
            Operation::InverseTransform => "inverse_transform",
        };
        f.write_str(name)
    }
}

/// Lazily evaluated call-graph node
#[derive(Debug, Clone)]
pub enum LearningNode {
    /// Raw data, replaceable per call
    Source { data: Data },
    /// `operation` applied with `trainable`'s current fit result to the
    /// value of `input`
    Derived {
        operation: Operation,
        trainable: TrainableId,
        input: NodeId,
    },
}

impl LearningNode {
    pub fn is_source(&self) -> bool {
        matches!(self, LearningNode::Source { .. })
    }
}

/// Fit status of a trainable node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainableState {
    Unfit,
    Fit,
}

/// A model configuration bound to its training arguments
#[derive(Debug)]
pub struct TrainableNode {
    pub(crate) model: SharedModel,
    pub(crate) args: Vec<NodeId>,
    pub(crate) fitted: Option<Box<dyn Fitted>>,
    pub(crate) report: Report,
    pub(crate) frozen: bool,
    pub(crate) generation: u64,
}

impl TrainableNode {
    pub(crate) fn new(model: SharedModel, args: Vec<NodeId>) -> Self {
        Self {
            model,
            args,
            fitted: None,
            report: Report::new(),
            frozen: false,
            generation: 0,
        }
    }

    /// Shared configuration handle
    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    /// Training arguments, in order
    pub fn args(&self) -> &[NodeId] {
        &self.args
    }

    pub fn state(&self) -> TrainableState {
        if self.fitted.is_some() {
            TrainableState::Fit
        } else {
            TrainableState::Unfit
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of successful fits
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report from the most recent fit
    pub fn report(&self) -> &Report {
        &self.report
    }

    pub(crate) fn name(&self) -> &'static str {
        self.model.borrow().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shared;
    use crate::models::Standardizer;

    #[test]
    fn test_ids_display() {
        assert_eq!(NodeId(3).to_string(), "n3");
        assert_eq!(TrainableId(0).to_string(), "t0");
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Transform.to_string(), "transform");
        assert_eq!(Operation::Predict.to_string(), "predict");
        assert_eq!(Operation::InverseTransform.to_string(), "inverse_transform");
    }

    #[test]
    fn test_trainable_node_starts_unfit() {
        let node = TrainableNode::new(shared(Standardizer::default()), vec![NodeId(0)]);
        assert_eq!(node.state(), TrainableState::Unfit);
        assert!(!node.is_frozen());
        assert_eq!(node.generation(), 0);
        assert!(node.report().is_empty());
        assert_eq!(node.args(), &[NodeId(0)]);
        assert_eq!(node.name(), "Standardizer");
    }

    #[test]
    fn test_source_node() {
        let node = LearningNode::Source {
            data: Data::from_slice(&[1.0]),
        };
        assert!(node.is_source());
        let derived = LearningNode::Derived {
            operation: Operation::Predict,
            trainable: TrainableId(0),
            input: NodeId(0),
        };
        assert!(!derived.is_source());
    }
}
