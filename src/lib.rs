//! Fruit collecting on a small grid: an interactive variant steered by the player
//! and a greedy one that walks to the nearest fruit by breadth-first search.

pub mod agent;
pub mod configuration;
pub mod cues;
pub mod environment;
pub mod error;
pub mod fruit;
pub mod graph;
pub mod policy;
pub mod report;
pub mod session;

pub use agent::Agent;
pub use configuration::{FruitValues, GameConfiguration};
pub use cues::{Cue, Cues, LogCues};
pub use environment::{Field, Movement, Pos};
pub use error::{Error, Result};
pub use fruit::{Fruit, FruitKind, FruitSet};
pub use graph::Graph;
pub use policy::{GreedyPolicy, HumanControlPolicy, Policy, PolicyContext, Variant};
pub use session::{Session, SessionEvent, SessionState};
