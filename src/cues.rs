//! Fire-and-forget sound cues. The session emits them; how (or whether) they are
//! played is up to the sink handed to it.

use std::fmt;

use crate::fruit::FruitKind;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cue {
    Fruit(FruitKind),
    Win,
}

pub trait Cues: fmt::Debug {
    fn play(&mut self, cue: Cue);
}

/// Sink that only writes cues to the log.
#[derive(Debug, Default)]
pub struct LogCues;

impl Cues for LogCues {
    fn play(&mut self, cue: Cue) {
        log::trace!("Cue {:?}", cue);
    }
}
