//! A game run wired to its level source and storage
//!
//! The browser loads levels asynchronously and drives [`GameState`] directly;
//! everything else (native demo, tests) goes through a `Session`, which
//! answers load requests synchronously.

use crate::highscores::Highscore;
use crate::levels::LevelSource;
use crate::persistence::Storage;
use crate::sim::{GameEvent, GameMode, GameState, TickInput, tick};
use crate::tuning::Tuning;

pub struct Session<L: LevelSource, S: Storage> {
    state: GameState,
    levels: L,
    storage: S,
    highscore: Highscore,
}

impl<L: LevelSource, S: Storage> Session<L, S> {
    /// Start a run and load its first level
    pub fn new(seed: u64, mode: GameMode, tuning: Tuning, levels: L, storage: S) -> Self {
        let highscore = Highscore::load(&storage);
        let state = GameState::new(seed, mode, tuning).with_highscore(highscore.best);
        let mut session = Self {
            state,
            levels,
            storage,
            highscore,
        };
        session.resolve_load();
        session
    }

    /// Play through the whole campaign of `levels`
    pub fn campaign(seed: u64, levels: L, storage: S) -> Self {
        let len = levels.campaign_len();
        Self::new(
            seed,
            GameMode::Campaign { levels: len },
            Tuning::default(),
            levels,
            storage,
        )
    }

    /// Play a single named custom level
    pub fn custom(seed: u64, name: impl Into<String>, levels: L, storage: S) -> Self {
        Self::new(
            seed,
            GameMode::Custom { name: name.into() },
            Tuning::default(),
            levels,
            storage,
        )
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn highscore(&self) -> u64 {
        self.highscore.best
    }

    /// Advance one tick. The primary action restarts a finished run.
    /// Returns the events of this tick.
    pub fn frame(&mut self, input: &TickInput) -> &[GameEvent] {
        if self.state.is_over() && input.primary_action {
            self.state.restart();
        }

        tick(&mut self.state, input);
        self.resolve_load();
        self.persist_highscore();

        &self.state.events
    }

    fn resolve_load(&mut self) {
        if let Some(level) = self.state.take_load_request() {
            let result = self.levels.load(&level);
            self.state.complete_load(result);
        }
    }

    fn persist_highscore(&mut self) {
        let best = self.state.events.iter().find_map(|event| match event {
            GameEvent::NewHighscore(score) => Some(*score),
            _ => None,
        });
        if let Some(score) = best {
            if self.highscore.record(score) {
                if let Err(err) = self.highscore.save(&mut self.storage) {
                    log::warn!("Could not save highscore: {}", err);
                }
            }
        }
    }
}
