//! Learning network arena
//!
//! Nodes are only ever appended and may only reference nodes that already
//! exist, so every network is acyclic by construction.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::error::{NetworkError, Result};
use super::node::{LearningNode, NodeId, Operation, TrainableId, TrainableNode, TrainableState};
use crate::data::Data;
use crate::model::{Report, SharedModel};

/// Entry point for [`Network::tape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Nothing,
    Node(NodeId),
    Trainable(TrainableId),
}

impl From<NodeId> for Entry {
    fn from(id: NodeId) -> Self {
        Entry::Node(id)
    }
}

impl From<TrainableId> for Entry {
    fn from(id: TrainableId) -> Self {
        Entry::Trainable(id)
    }
}

/// DAG of source, derived and trainable nodes
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<LearningNode>,
    trainables: Vec<TrainableNode>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Add a source node holding `data`
    pub fn source(&mut self, data: Data) -> NodeId {
        self.push_node(LearningNode::Source { data })
    }

    /// Bind a shared model configuration to its training arguments
    pub fn trainable(&mut self, model: SharedModel, args: &[NodeId]) -> Result<TrainableId> {
        for &arg in args {
            self.node(arg)?;
        }
        let id = TrainableId(self.trainables.len());
        self.trainables.push(TrainableNode::new(model, args.to_vec()));
        Ok(id)
    }

    /// Lazy `transform` of `input` by `trainable`; nothing is computed
    pub fn transform(&mut self, trainable: TrainableId, input: NodeId) -> Result<NodeId> {
        self.derived(Operation::Transform, trainable, input)
    }

    /// Lazy `predict` on `input` by `trainable`; nothing is computed
    pub fn predict(&mut self, trainable: TrainableId, input: NodeId) -> Result<NodeId> {
        self.derived(Operation::Predict, trainable, input)
    }

    /// Lazy `inverse_transform` of `input` by `trainable`; nothing is computed
    pub fn inverse_transform(&mut self, trainable: TrainableId, input: NodeId) -> Result<NodeId> {
        self.derived(Operation::InverseTransform, trainable, input)
    }

    fn derived(
        &mut self,
        operation: Operation,
        trainable: TrainableId,
        input: NodeId,
    ) -> Result<NodeId> {
        self.trainable_node(trainable)?;
        self.node(input)?;
        Ok(self.push_node(LearningNode::Derived {
            operation,
            trainable,
            input,
        }))
    }

    fn push_node(&mut self, node: LearningNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&LearningNode> {
        self.nodes.get(id.0).ok_or(NetworkError::UnknownNode(id))
    }

    pub fn trainable_node(&self, id: TrainableId) -> Result<&TrainableNode> {
        self.trainables
            .get(id.0)
            .ok_or(NetworkError::UnknownTrainable(id))
    }

    fn trainable_node_mut(&mut self, id: TrainableId) -> Result<&mut TrainableNode> {
        self.trainables
            .get_mut(id.0)
            .ok_or(NetworkError::UnknownTrainable(id))
    }

    /// Number of learning nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All trainable ids, in creation order
    pub fn trainable_ids(&self) -> impl Iterator<Item = TrainableId> {
        (0..self.trainables.len()).map(TrainableId)
    }

    pub fn model(&self, id: TrainableId) -> Result<SharedModel> {
        Ok(self.trainable_node(id)?.model.clone())
    }

    /// Swap the configuration of a trainable node; its fit result is kept
    /// until the next fit
    pub fn replace_model(&mut self, id: TrainableId, model: SharedModel) -> Result<()> {
        self.trainable_node_mut(id)?.model = model;
        Ok(())
    }

    pub fn state(&self, id: TrainableId) -> Result<TrainableState> {
        Ok(self.trainable_node(id)?.state())
    }

    pub fn is_frozen(&self, id: TrainableId) -> Result<bool> {
        Ok(self.trainable_node(id)?.frozen)
    }

    pub fn generation(&self, id: TrainableId) -> Result<u64> {
        Ok(self.trainable_node(id)?.generation)
    }

    pub fn report(&self, id: TrainableId) -> Result<&Report> {
        Ok(&self.trainable_node(id)?.report)
    }

    /// Data stored in a source node
    pub fn source_data(&self, id: NodeId) -> Result<&Data> {
        match self.node(id)? {
            LearningNode::Source { data } => Ok(data),
            LearningNode::Derived { .. } => Err(NetworkError::NotSource(id)),
        }
    }

    /// Replace the data stored in a source node
    pub fn set_source(&mut self, id: NodeId, data: Data) -> Result<()> {
        match self.nodes.get_mut(id.0) {
            Some(LearningNode::Source { data: stored }) => {
                *stored = data;
                Ok(())
            }
            Some(LearningNode::Derived { .. }) => Err(NetworkError::NotSource(id)),
            None => Err(NetworkError::UnknownNode(id)),
        }
    }

    // -------------------------------------------------------------------------
    // Freeze / thaw
    // -------------------------------------------------------------------------

    /// Make subsequent fits of `id` no-ops; the fit result is retained
    pub fn freeze(&mut self, id: TrainableId) -> Result<()> {
        self.trainable_node_mut(id)?.frozen = true;
        Ok(())
    }

    /// Re-enable fitting of `id` without refitting it
    pub fn thaw(&mut self, id: TrainableId) -> Result<()> {
        self.trainable_node_mut(id)?.frozen = false;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    /// Trainable nodes upstream of `entry`, de-duplicated, upstream first.
    ///
    /// A trainable entry includes itself as the last element.
    pub fn tape(&self, entry: impl Into<Entry>) -> Result<Vec<TrainableId>> {
        let mut walk = TapeWalk::default();
        match entry.into() {
            Entry::Nothing => {}
            Entry::Node(id) => walk.node(self, id)?,
            Entry::Trainable(id) => walk.trainable(self, id)?,
        }
        Ok(walk.tape)
    }

    /// Source nodes upstream of `id` (including `id` itself if it is a source)
    pub fn sources(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut walk = TapeWalk::default();
        walk.node(self, id)?;
        Ok(walk.sources)
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Evaluate `id` with the current fit results
    pub fn call(&self, id: NodeId) -> Result<Data> {
        self.call_with(id, &[])
    }

    /// Evaluate `id`, reading `data` in place of each listed source node.
    ///
    /// The stored source data is not modified. Per-node evaluation is only
    /// logged during training, where a verbosity is known.
    pub fn call_with(&self, id: NodeId, substitutions: &[(NodeId, Data)]) -> Result<Data> {
        let mut eval = Evaluation::new(substitutions, 0);
        for (source, _) in substitutions {
            self.source_data(*source)?;
        }
        eval.node(self, id)
    }

    // -------------------------------------------------------------------------
    // Training
    // -------------------------------------------------------------------------

    /// Fit-through training: fit every unfrozen trainable upstream of `id`,
    /// upstream first, each once.
    pub fn fit(&mut self, id: NodeId, verbosity: i32) -> Result<()> {
        let tape = self.tape(id)?;
        self.fit_tape(&tape, verbosity)
    }

    /// Fit `id` after fitting every unfrozen trainable it depends on
    pub fn fit_trainable(&mut self, id: TrainableId, verbosity: i32) -> Result<()> {
        let tape = self.tape(id)?;
        self.fit_tape(&tape, verbosity)
    }

    fn fit_tape(&mut self, tape: &[TrainableId], verbosity: i32) -> Result<()> {
        for &id in tape {
            self.fit_one(id, verbosity)?;
        }
        Ok(())
    }

    fn fit_one(&mut self, id: TrainableId, verbosity: i32) -> Result<()> {
        let node = self.trainable_node(id)?;
        let name = node.name();
        if node.frozen {
            if verbosity > 0 {
                info!(trainable = %id, model = name, "not retraining frozen node");
            }
            return Ok(());
        }
        if verbosity > 0 {
            info!(trainable = %id, model = name, generation = node.generation, "training");
        }

        let mut eval = Evaluation::new(&[], verbosity);
        let args = node
            .args
            .iter()
            .map(|&arg| eval.node(self, arg))
            .collect::<Result<Vec<_>>>()?;
        let outcome = node
            .model
            .borrow()
            .fit(verbosity - 1, &args)
            .map_err(|source| NetworkError::Model {
                trainable: id,
                model: name,
                source,
            })?;

        let node = self.trainable_node_mut(id)?;
        node.fitted = Some(outcome.fitted);
        node.report = outcome.report;
        node.generation += 1;
        Ok(())
    }
}

/// Depth-first collection of trainables and sources
#[derive(Default)]
struct TapeWalk {
    visited: HashSet<NodeId>,
    seen: HashSet<TrainableId>,
    tape: Vec<TrainableId>,
    sources: Vec<NodeId>,
}

impl TapeWalk {
    fn node(&mut self, network: &Network, id: NodeId) -> Result<()> {
        if !self.visited.insert(id) {
            return Ok(());
        }
        match network.node(id)? {
            LearningNode::Source { .. } => self.sources.push(id),
            LearningNode::Derived {
                trainable, input, ..
            } => {
                self.node(network, *input)?;
                self.trainable(network, *trainable)?;
            }
        }
        Ok(())
    }

    fn trainable(&mut self, network: &Network, id: TrainableId) -> Result<()> {
        if self.seen.contains(&id) {
            return Ok(());
        }
        for &arg in &network.trainable_node(id)?.args {
            self.node(network, arg)?;
        }
        self.seen.insert(id);
        self.tape.push(id);
        Ok(())
    }
}

/// One depth-first evaluation; each node is computed at most once
struct Evaluation<'a> {
    substitutions: HashMap<NodeId, &'a Data>,
    memo: HashMap<NodeId, Data>,
    verbosity: i32,
}

impl<'a> Evaluation<'a> {
    fn new(substitutions: &'a [(NodeId, Data)], verbosity: i32) -> Self {
        Self {
            substitutions: substitutions.iter().map(|(id, data)| (*id, data)).collect(),
            memo: HashMap::new(),
            verbosity,
        }
    }

    fn node(&mut self, network: &Network, id: NodeId) -> Result<Data> {
        if let Some(data) = self.memo.get(&id) {
            return Ok(data.clone());
        }
        let value = match network.node(id)? {
            LearningNode::Source { data } => {
                self.substitutions.get(&id).copied().unwrap_or(data).clone()
            }
            LearningNode::Derived {
                operation,
                trainable,
                input,
            } => {
                let input = self.node(network, *input)?;
                let node = network.trainable_node(*trainable)?;
                let fitted = node.fitted.as_deref().ok_or_else(|| NetworkError::NotFit {
                    trainable: *trainable,
                    model: node.name(),
                })?;
                if self.verbosity > 1 {
                    debug!(node = %id, %operation, trainable = %trainable, "evaluating");
                }
                operation
                    .apply(fitted, &input)
                    .map_err(|source| NetworkError::Model {
                        trainable: *trainable,
                        model: node.name(),
                        source,
                    })?
            }
        };
        self.memo.insert(id, value.clone());
        Ok(value)
    }
}
