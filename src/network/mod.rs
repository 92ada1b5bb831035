//! Learning networks
//!
//! A [`Network`] is an arena of learning nodes and trainable nodes:
//!
//! ```text
//!   source(X) ──► transform(t0) ──► predict(t1) ──► output
//!        │                              ▲
//!        └──────► t0 (Standardizer)     │
//!   source(y) ──────────────────► t1 (KnnRegressor)
//! ```
//!
//! Derived nodes are lazy: building them computes nothing, and calling them
//! re-reads the *current* fit result of their trainable. [`Network::fit`]
//! trains every unfrozen trainable upstream of a node exactly once, in
//! dependency order.
//!
//! # Example
//!
//! ```
//! use entramado::data::Data;
//! use entramado::model::shared;
//! use entramado::models::{KnnRegressor, Standardizer};
//! use entramado::network::Network;
//!
//! let mut net = Network::new();
//! let x = net.source(Data::from_rows(&[vec![0.0], vec![1.0], vec![2.0]]).unwrap());
//! let y = net.source(Data::from_slice(&[0.0, 1.0, 2.0]));
//!
//! let std = net.trainable(shared(Standardizer::default()), &[x])?;
//! let xs = net.transform(std, x)?;
//! let knn = net.trainable(shared(KnnRegressor { k: 1, ..Default::default() }), &[xs, y])?;
//! let yhat = net.predict(knn, xs)?;
//!
//! net.fit(yhat, 0)?;
//! assert_eq!(net.call(yhat)?, Data::from_slice(&[0.0, 1.0, 2.0]));
//! # Ok::<(), entramado::network::NetworkError>(())
//! ```

mod error;
mod graph;
mod node;


pub use error::{NetworkError, Result};
pub use graph::{Entry, Network};
pub use node::{LearningNode, NodeId, Operation, TrainableId, TrainableNode, TrainableState};
