use log::{debug, info};
use rand::rngs::StdRng;
use serde::Serialize;

use crate::agent::Agent;
use crate::configuration::GameConfiguration;
use crate::cues::{Cue, Cues};
use crate::environment::{Field, Movement, Pos};
use crate::error::Result;
use crate::fruit::{Fruit, FruitSet};
use crate::graph::Graph;
use crate::policy::{Policy, PolicyContext};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    Running,
    /// The countdown ran out during the last tick and a fresh batch was dealt.
    AttemptLost,
    AllAttemptsExhausted,
    Won,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::AllAttemptsExhausted | SessionState::Won)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Moved { to: Pos },
    FruitCollected(Fruit),
    AttemptLost { attempts_left: u32 },
    GameOver { score: u32 },
    Won { score: u32 },
}

/// One game, from the first batch of fruit until it is won or every attempt is
/// spent. Advanced one fixed-length frame at a time by [`Session::tick`].
#[derive(Debug)]
pub struct Session {
    configuration: GameConfiguration,
    field: Field,
    graph: Graph,
    agent: Agent,
    fruits: FruitSet,
    policy: Box<dyn Policy>,
    cues: Box<dyn Cues>,
    rng: StdRng,
    time_remaining: f64,
    attempts_remaining: u32,
    state: SessionState,
    ticks: u64,
    collected: u32,
}

impl Session {
    pub fn new(
        configuration: GameConfiguration,
        policy: Box<dyn Policy>,
        cues: Box<dyn Cues>,
        mut rng: StdRng,
    ) -> Result<Self> {
        configuration.validate()?;
        let field = configuration.field();
        let graph = Graph::build(&field);
        let agent = Agent::new(&field, policy.keeps_trail());
        let fruits = FruitSet::generate(
            &field,
            &configuration.fruit_values,
            configuration.fruit_batch,
            &mut rng,
        );
        info!(
            "New {}x{} session with {:?}, {} fruits",
            field.rows(),
            field.cols(),
            policy,
            fruits.len()
        );
        Ok(Self {
            time_remaining: configuration.start_time,
            attempts_remaining: configuration.attempts,
            configuration,
            field,
            graph,
            agent,
            fruits,
            policy,
            cues,
            rng,
            state: SessionState::Running,
            ticks: 0,
            collected: 0,
        })
    }

    /// Replaces the current batch of fruit.
    pub fn with_fruits(mut self, fruits: FruitSet) -> Self {
        self.fruits = fruits;
        self
    }

    pub fn tick(&mut self, input: Option<Movement>) -> Vec<SessionEvent> {
        if self.state.is_terminal() {
            return Vec::new();
        }
        self.state = SessionState::Running;
        self.ticks += 1;
        let mut events = Vec::new();

        let ctx = PolicyContext {
            field: &self.field,
            graph: &self.graph,
            agent: &self.agent,
            fruits: &self.fruits,
        };
        if let Some(movement) = self.policy.next_movement(&ctx, input) {
            if self.agent.r#move(&self.field, movement) {
                events.push(SessionEvent::Moved { to: self.agent.pos() });
            }
        }

        for fruit in self.fruits.collect_at(self.agent.pos()) {
            self.agent.add_score(fruit.value);
            self.collected += 1;
            info!(
                "Collected {} worth {} at {:?}, score {}",
                fruit.kind,
                fruit.value,
                fruit.pos,
                self.agent.score()
            );
            self.cues.play(Cue::Fruit(fruit.kind));
            events.push(SessionEvent::FruitCollected(fruit));
        }

        self.time_remaining -= self.configuration.frame_interval();

        if self.time_remaining <= 0.0 {
            self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
            self.time_remaining = self.configuration.start_time;
            if self.attempts_remaining == 0 {
                info!("Game over after {} ticks, score {}", self.ticks, self.score());
                self.state = SessionState::AllAttemptsExhausted;
                events.push(SessionEvent::GameOver { score: self.score() });
            } else {
                self.fruits = FruitSet::generate(
                    &self.field,
                    &self.configuration.fruit_values,
                    self.configuration.fruit_batch,
                    &mut self.rng,
                );
                info!("Attempt lost, {} left", self.attempts_remaining);
                self.state = SessionState::AttemptLost;
                events.push(SessionEvent::AttemptLost {
                    attempts_left: self.attempts_remaining,
                });
            }
        } else if self.fruits.is_empty() {
            info!("Won after {} ticks, score {}", self.ticks, self.score());
            self.state = SessionState::Won;
            self.cues.play(Cue::Win);
            events.push(SessionEvent::Won { score: self.score() });
        }

        debug!("Tick {} -> {:?}", self.ticks, events);
        events
    }

    /// Ticks without input until the session ends or `max_ticks` ticks have run in
    /// total, returning the state it stopped in.
    pub fn run_to_end(&mut self, max_ticks: u64) -> SessionState {
        while !self.state.is_terminal() && self.ticks < max_ticks {
            self.tick(None);
        }
        self.state
    }

    pub fn configuration(&self) -> &GameConfiguration {
        &self.configuration
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn fruits(&self) -> &FruitSet {
        &self.fruits
    }

    pub fn score(&self) -> u32 {
        self.agent.score()
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn fruits_collected(&self) -> u32 {
        self.collected
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use test_log::test;

    use super::*;
    use crate::configuration::FruitValues;
    use crate::fruit::FruitKind;
    use crate::policy::Variant;

    #[derive(Debug, Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<Cue>>>);

    impl Cues for Recorder {
        fn play(&mut self, cue: Cue) {
            self.0.borrow_mut().push(cue);
        }
    }

    // Four ticks per attempt, with an exactly representable frame interval.
    fn short_game() -> GameConfiguration {
        GameConfiguration {
            start_time: 1.0,
            tick_rate: 4,
            ..Default::default()
        }
    }

    fn session(configuration: GameConfiguration, variant: Variant, cells: &[(usize, usize, FruitKind)]) -> (Session, Recorder) {
        let values = FruitValues::default();
        let fruits: Vec<Fruit> = cells
            .iter()
            .map(|(row, col, kind)| Fruit::new(Pos::new(*row, *col), *kind, &values))
            .collect();
        let recorder = Recorder::default();
        let session = Session::new(
            configuration,
            variant.policy(),
            Box::new(recorder.clone()),
            StdRng::seed_from_u64(3),
        )
        .unwrap()
        .with_fruits(fruits.into());
        (session, recorder)
    }

    #[test]
    fn new_session_uses_the_configuration() {
        let session = Session::new(
            GameConfiguration::default(),
            Variant::Interactive.policy(),
            Box::new(crate::cues::LogCues),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(session.configuration(), &GameConfiguration::default());
        assert_eq!(session.fruits().len(), 10);
        assert_eq!(session.attempts_remaining(), 3);
        assert_eq!(session.time_remaining(), 60.0);
        assert_eq!(session.agent().pos(), Pos::new(5, 5));
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn unplayable_configurations_are_refused() {
        let bad = [
            GameConfiguration { rows: 0, ..Default::default() },
            GameConfiguration { cols: 0, ..Default::default() },
            GameConfiguration { tick_rate: 0, ..Default::default() },
        ];
        for configuration in bad.iter() {
            let result = Session::new(
                configuration.clone(),
                Variant::Greedy.policy(),
                Box::new(crate::cues::LogCues),
                StdRng::seed_from_u64(1),
            );
            assert!(
                matches!(result, Err(crate::error::Error::InvalidConfiguration(_))),
                "{:?}",
                configuration
            );
        }
    }

    #[test]
    fn stepping_onto_a_fruit_collects_it() {
        let (mut session, recorder) = session(
            GameConfiguration::default(),
            Variant::Interactive,
            &[(4, 5, FruitKind::Mango), (0, 0, FruitKind::Apple)],
        );

        let events = session.tick(Some(Movement::Up));
        let mango = Fruit::new(Pos::new(4, 5), FruitKind::Mango, &FruitValues::default());
        assert_eq!(
            events,
            vec![
                SessionEvent::Moved { to: Pos::new(4, 5) },
                SessionEvent::FruitCollected(mango),
            ]
        );
        assert_eq!(session.score(), 20);
        assert_eq!(session.fruits().len(), 1);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(*recorder.0.borrow(), vec![Cue::Fruit(FruitKind::Mango)]);
        assert_eq!(session.agent().trail(), &[Pos::new(4, 5)]);
    }

    #[test]
    fn fruits_sharing_a_cell_are_collected_together() {
        let (mut session, _) = session(
            GameConfiguration::default(),
            Variant::Interactive,
            &[(5, 6, FruitKind::Apple), (5, 6, FruitKind::Blueberry), (9, 9, FruitKind::Apple)],
        );
        session.tick(Some(Movement::Right));
        assert_eq!(session.score(), 25);
        assert_eq!(session.fruits_collected(), 2);
        assert_eq!(session.fruits().len(), 1);
    }

    #[test]
    fn collecting_the_last_fruit_wins() {
        let (mut session, recorder) = session(
            GameConfiguration::default(),
            Variant::Greedy,
            &[(5, 6, FruitKind::Blueberry)],
        );
        let events = session.tick(None);
        assert_eq!(events.last(), Some(&SessionEvent::Won { score: 15 }));
        assert_eq!(session.state(), SessionState::Won);
        assert_eq!(
            *recorder.0.borrow(),
            vec![Cue::Fruit(FruitKind::Blueberry), Cue::Win]
        );

        // terminal sessions no longer change
        assert!(session.tick(Some(Movement::Up)).is_empty());
        assert_eq!(session.ticks(), 1);
        assert_eq!(session.agent().pos(), Pos::new(5, 6));
    }

    #[test]
    fn countdown_loses_an_attempt_and_deals_new_fruit() {
        let (mut session, _) = session(short_game(), Variant::Interactive, &[(0, 0, FruitKind::Apple)]);

        for _ in 0..3 {
            assert!(session.tick(None).is_empty());
            assert_eq!(session.state(), SessionState::Running);
        }
        assert_eq!(session.time_remaining(), 0.25);

        let events = session.tick(None);
        assert!(events.contains(&SessionEvent::AttemptLost { attempts_left: 2 }));
        assert_eq!(session.state(), SessionState::AttemptLost);
        assert_eq!(session.attempts_remaining(), 2);
        assert_eq!(session.time_remaining(), 1.0);
        assert_eq!(session.fruits().len(), 10);

        session.tick(None);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn default_attempt_lasts_3601_ticks() {
        // 1/60 is inexact; the countdown is still a hair above zero after 3600 ticks.
        let (mut session, _) = session(
            GameConfiguration::default(),
            Variant::Interactive,
            &[(0, 0, FruitKind::Apple)],
        );
        let mut lost_at = None;
        while lost_at.is_none() && session.ticks() < 4000 {
            if session.tick(None).contains(&SessionEvent::AttemptLost { attempts_left: 2 }) {
                lost_at = Some(session.ticks());
            }
        }
        assert_eq!(lost_at, Some(3601));
        assert_eq!(session.time_remaining(), 60.0);
    }

    #[test]
    fn running_out_of_attempts_ends_the_game_with_the_score_kept() {
        let (mut session, _) = session(
            short_game(),
            Variant::Interactive,
            &[(5, 6, FruitKind::Mango), (0, 0, FruitKind::Apple)],
        );
        session.tick(Some(Movement::Right));
        assert_eq!(session.score(), 20);
        session.tick(Some(Movement::Right));

        let mut lost = 0;
        let mut game_over = None;
        while !session.state().is_terminal() {
            for event in session.tick(None) {
                match event {
                    SessionEvent::AttemptLost { .. } => lost += 1,
                    SessionEvent::GameOver { score } => game_over = Some(score),
                    _ => {},
                }
            }
        }

        assert_eq!(lost, 2);
        assert_eq!(session.ticks(), 12);
        assert_eq!(session.state(), SessionState::AllAttemptsExhausted);
        assert_eq!(session.attempts_remaining(), 0);
        assert!(session.score() >= 20);
        assert_eq!(game_over, Some(session.score()));
    }

    #[test]
    fn timeout_takes_precedence_over_winning_in_the_same_tick() {
        let (mut session, recorder) = session(short_game(), Variant::Interactive, &[(5, 6, FruitKind::Apple)]);
        for _ in 0..3 {
            session.tick(None);
        }
        let events = session.tick(Some(Movement::Right));
        assert!(events.contains(&SessionEvent::AttemptLost { attempts_left: 2 }));
        assert!(!events.iter().any(|event| matches!(event, SessionEvent::Won { .. })));
        assert_eq!(session.state(), SessionState::AttemptLost);
        assert_eq!(session.score(), 10);
        assert_eq!(session.fruits().len(), 10);
        assert!(!recorder.0.borrow().contains(&Cue::Win));
    }

    #[test]
    fn greedy_run_collects_every_fruit() {
        let (mut session, _) = session(
            GameConfiguration::default(),
            Variant::Greedy,
            &[
                (0, 0, FruitKind::Apple),
                (9, 9, FruitKind::Mango),
                (5, 7, FruitKind::Blueberry),
                (2, 5, FruitKind::Apple),
            ],
        );
        assert_eq!(session.run_to_end(10_000), SessionState::Won);
        assert_eq!(session.score(), 10 + 20 + 15 + 10);
        assert_eq!(session.fruits_collected(), 4);
        assert!(session.agent().trail().is_empty());
        // (5,5)->(5,7): 2, ->(2,5): 5, ->(0,0): 7, ->(9,9): 18
        assert_eq!(session.ticks(), 32);
    }
}
