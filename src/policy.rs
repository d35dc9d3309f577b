use std::fmt;

use log::debug;

use crate::agent::Agent;
use crate::environment::{Field, Movement, Pos};
use crate::fruit::{Fruit, FruitSet};
use crate::graph::Graph;

/// Everything a policy may look at when picking the agent's move for a tick.
pub struct PolicyContext<'a> {
    pub field: &'a Field,
    pub graph: &'a Graph,
    pub agent: &'a Agent,
    pub fruits: &'a FruitSet,
}

pub trait Policy: fmt::Debug {
    /// Movement for this tick, if any. `input` is the directional input received
    /// since the last tick; autonomous policies ignore it.
    fn next_movement(&mut self, ctx: &PolicyContext, input: Option<Movement>) -> Option<Movement>;

    // Whether the agent driven by this policy records its trail.
    fn keeps_trail(&self) -> bool {
        false
    }
}

/// Which way the agent is driven, chosen once per session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    Interactive,
    Greedy,
}

impl Variant {
    pub fn policy(self) -> Box<dyn Policy> {
        match self {
            Variant::Interactive => Box::new(HumanControlPolicy),
            Variant::Greedy => Box::new(GreedyPolicy::default()),
        }
    }
}

#[derive(Debug, Default)]
pub struct HumanControlPolicy;

impl HumanControlPolicy {
    pub fn movement_for_key(key: char) -> Option<Movement> {
        match key {
            'w' => Some(Movement::Up),
            's' => Some(Movement::Down),
            'a' => Some(Movement::Left),
            'd' => Some(Movement::Right),
            _ => None,
        }
    }
}

impl Policy for HumanControlPolicy {
    fn next_movement(&mut self, _ctx: &PolicyContext, input: Option<Movement>) -> Option<Movement> {
        input
    }

    fn keeps_trail(&self) -> bool {
        true
    }
}

/// Always heads for the fruit with the shortest path from the agent.
#[derive(Debug, Default)]
pub struct GreedyPolicy {
    target: Option<Pos>,
}

impl Policy for GreedyPolicy {
    fn next_movement(&mut self, ctx: &PolicyContext, _input: Option<Movement>) -> Option<Movement> {
        let here = ctx.agent.pos();
        let target = nearest_fruit(ctx.graph, here, ctx.fruits)?.pos;
        if self.target != Some(target) {
            debug!("Greedy target {:?} -> {:?} (agent at {:?})", self.target, target, here);
            self.target = Some(target);
        }
        Movement::towards(here, target)
    }
}

// Fruit at the smallest graph distance from `from`. On ties the earliest fruit in
// the set wins. Unreachable fruits are skipped.
pub fn nearest_fruit<'a>(graph: &Graph, from: Pos, fruits: &'a FruitSet) -> Option<&'a Fruit> {
    fruits
        .iter()
        .filter_map(|fruit| graph.distance(from, fruit.pos).map(|distance| (distance, fruit)))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, fruit)| fruit)
}
