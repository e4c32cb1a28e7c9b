//! Level progression
//!
//! A cleared level asks for the next layout and waits. Loading is a suspend
//! point: the driver takes the request with [`GameState::take_load_request`],
//! fetches the layout however it can, then hands the outcome back through
//! [`GameState::complete_load`].

use super::bonus::BonusPolicy;
use super::grid::BrickGrid;
use super::state::{GameEvent, GameMode, GamePhase, GameState, ScreenShake, Victory};
use crate::error::LevelError;
use crate::levels::{LevelId, LevelLayout};

impl GameState {
    /// The level the game is waiting for, if any (whether or not it was
    /// already handed out)
    pub fn pending_level(&self) -> Option<LevelId> {
        match &self.phase {
            GamePhase::Loading { level, .. } => Some(level.clone()),
            GamePhase::Transitioning { next, .. } => Some(LevelId::Campaign(*next)),
            _ => None,
        }
    }

    /// Hand out the pending load request. Returns `None` when nothing is
    /// pending or the request was already taken.
    pub fn take_load_request(&mut self) -> Option<LevelId> {
        match &mut self.phase {
            GamePhase::Loading { level, requested } if !*requested => {
                *requested = true;
                Some(level.clone())
            }
            GamePhase::Transitioning { next, requested } if !*requested => {
                *requested = true;
                Some(LevelId::Campaign(*next))
            }
            _ => None,
        }
    }

    /// Deliver the outcome of a load request
    pub fn complete_load(&mut self, result: Result<LevelLayout, LevelError>) {
        match self.phase.clone() {
            GamePhase::Loading { level, .. } => {
                let layout = match result {
                    Ok(layout) => layout,
                    Err(err) => {
                        log::warn!("Failed to load {}: {}; using a full grid", level, err);
                        self.events.push(GameEvent::LevelLoadFailed {
                            level: level.clone(),
                            reason: err.to_string(),
                        });
                        LevelLayout::full()
                    }
                };
                if let LevelId::Campaign(index) = level {
                    self.level_index = index;
                }
                self.start_level(level, &layout);
            }
            GamePhase::Transitioning { next, .. } => {
                let level = LevelId::Campaign(next);
                match result {
                    Ok(layout) => {
                        self.level_index = next;
                        self.start_level(level, &layout);
                    }
                    Err(err) => {
                        log::warn!("Failed to load {}: {}", level, err);
                        self.events.push(GameEvent::LevelLoadFailed {
                            level,
                            reason: err.to_string(),
                        });
                        self.phase = GamePhase::Playing;
                    }
                }
            }
            phase => log::debug!("Ignoring level load in phase {:?}", phase),
        }
    }

    fn start_level(&mut self, level: LevelId, layout: &LevelLayout) {
        self.grid.load(layout);
        self.reset_for_level();
        self.popups.clear();
        self.phase = GamePhase::Playing;
        log::info!("Playing {} ({} bricks)", level, layout.brick_count());
        self.events.push(GameEvent::LevelLoaded(level));
    }

    /// Move past a cleared level: request the next campaign layout, or end
    /// the run in victory. Does nothing unless the game is Playing, so a
    /// pending transition cannot be started twice.
    pub fn advance_level(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.events.push(GameEvent::LevelCleared {
            level: self.level_index,
        });

        let campaign_len = match &self.mode {
            GameMode::Campaign { levels } => Some(*levels),
            GameMode::Custom { .. } => None,
        };
        match campaign_len {
            None => self.finish(GamePhase::Won(Victory::CustomLevelComplete)),
            Some(levels) => {
                let next = self.level_index + 1;
                if next < levels {
                    log::info!("Level {} cleared", self.level_index + 1);
                    self.phase = GamePhase::Transitioning {
                        next,
                        requested: false,
                    };
                } else {
                    self.finish(GamePhase::Won(Victory::CampaignComplete));
                }
            }
        }
        true
    }

    /// Enter a terminal phase and settle the highscore
    pub(crate) fn finish(&mut self, phase: GamePhase) {
        match &phase {
            GamePhase::Won(victory) => {
                log::info!("Won ({:?}) with {} points", victory, self.score);
                self.events.push(GameEvent::Won {
                    victory: *victory,
                    score: self.score,
                });
            }
            GamePhase::Lost => {
                log::info!("Game over with {} points", self.score);
                self.events.push(GameEvent::Lost { score: self.score });
            }
            _ => {}
        }
        self.phase = phase;

        if self.score > self.highscore {
            self.highscore = self.score;
            self.events.push(GameEvent::NewHighscore(self.score));
        }
    }

    /// Start the run over from its first level. The highscore is kept.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Loading {
            level: self.mode.first_level(),
            requested: false,
        };
        self.level_index = 0;
        self.score = 0;
        self.time_ticks = 0;
        self.grid = BrickGrid::new();
        self.bonus = BonusPolicy::new(&self.tuning);
        self.shake = ScreenShake::default();
        self.popups.clear();
        self.reset_for_level();
        log::info!("Restarting from {}", self.mode.first_level());
    }
}
