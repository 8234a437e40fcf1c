//! Frame-driven session driver
//!
//! `GameLoop` owns the session state and runs one `tick` per frame. The
//! caller (a `requestAnimationFrame` callback in the browser, a plain loop in
//! tests) drives it with `FrameTicket`s: each ticket is tied to a scheduling
//! generation, and stopping, restarting or finishing a session bumps the
//! generation so frames scheduled earlier become no-ops.

use thiserror::Error;

use crate::api::{PlayerName, ScoreSubmission, ValidationError};
use crate::highscores::HighScore;
use crate::platform::KeyValueStore;
use crate::settings::{ConfigError, GameConfig};
use crate::sim::{GameEvent, GamePhase, GameState, tick};
use crate::submission::{Confirmation, Feedback, SubmissionError};

/// Permission to run one frame of the current schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

/// Why a session could not be (re)started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("Error: Player name not set for restart.")]
    NoPlayer,
    #[error(transparent)]
    InvalidName(#[from] ValidationError),
}

/// End-of-session results, produced exactly once per finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Session counter value this summary belongs to
    pub session: u64,
    pub score: u32,
    pub new_high_score: bool,
    /// Present when submission is enabled and a player name is set
    pub submission: Option<ScoreSubmission>,
}

/// Result of handing a frame to the loop
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Still playing; schedule the next frame with `ticket`
    Continue {
        ticket: FrameTicket,
        events: Vec<GameEvent>,
    },
    /// The session ended during this frame; schedule nothing
    Finished {
        events: Vec<GameEvent>,
        summary: SessionSummary,
    },
    /// The ticket was revoked; nothing ran
    Cancelled,
}

/// Session driver: state, schedule, high score and submission feedback
#[derive(Debug)]
pub struct GameLoop<S: KeyValueStore> {
    state: GameState,
    storage: S,
    high_score: HighScore,
    generation: u64,
    session: u64,
    feedback: Option<Feedback>,
}

impl<S: KeyValueStore> GameLoop<S> {
    /// Build a driver for `config`; tuning the paddle cannot fit is rejected
    pub fn new(config: GameConfig, seed: u64, storage: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let high_score = HighScore::load(&storage);
        Ok(Self {
            state: GameState::new(config, seed),
            storage,
            high_score,
            generation: 0,
            session: 0,
            feedback: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.value
    }

    /// Latest user-facing message (submission outcome or start error)
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Start a session for a newly entered name
    pub fn start(&mut self, raw_name: &str, now_ms: f64) -> Result<FrameTicket, StartError> {
        match PlayerName::parse(raw_name) {
            Ok(name) => Ok(self.begin(name, now_ms)),
            Err(e) => {
                let text = match e {
                    ValidationError::EmptyName => "Please enter your name.".to_string(),
                    ref other => other.to_string(),
                };
                self.feedback = Some(Feedback::failure(text));
                Err(e.into())
            }
        }
    }

    /// Play again with the current player's name
    pub fn restart(&mut self, now_ms: f64) -> Result<FrameTicket, StartError> {
        match self.state.player_name.clone() {
            Some(name) => Ok(self.begin(name, now_ms)),
            None => {
                let err = StartError::NoPlayer;
                self.feedback = Some(Feedback::failure(err.to_string()));
                Err(err)
            }
        }
    }

    /// Abandon the session and forget the player
    pub fn new_player(&mut self) {
        self.stop();
        self.state.reset();
        self.feedback = None;
    }

    /// Revoke every outstanding ticket
    pub fn stop(&mut self) {
        self.generation += 1;
    }

    /// Issue a fresh ticket for the running session after a `stop`
    ///
    /// Returns `None` unless a session is playing. Tickets issued before the
    /// call stay revoked.
    pub fn resume(&mut self) -> Option<FrameTicket> {
        if !self.state.is_playing() {
            return None;
        }
        self.stop();
        log::info!("Session {} resumed", self.session);
        Some(FrameTicket {
            generation: self.generation,
        })
    }

    pub fn pointer_moved(&mut self, pointer_x: f32) {
        self.state.pointer_moved(pointer_x);
    }

    /// Run one frame at `now_ms` if `ticket` is still valid
    pub fn on_frame(&mut self, ticket: FrameTicket, now_ms: f64) -> FrameOutcome {
        if ticket.generation != self.generation || !self.state.is_playing() {
            return FrameOutcome::Cancelled;
        }

        let events = tick(&mut self.state, now_ms);

        if self.state.phase == GamePhase::GameOver {
            self.stop();
            let summary = self.finish();
            FrameOutcome::Finished { events, summary }
        } else {
            FrameOutcome::Continue { ticket, events }
        }
    }

    /// Record how a submission went; results for older sessions are ignored
    pub fn submission_settled(
        &mut self,
        session: u64,
        result: &Result<Confirmation, SubmissionError>,
    ) -> Option<&Feedback> {
        if session != self.session {
            log::debug!("Ignoring submission result for stale session {}", session);
            return None;
        }
        self.feedback = Some(Feedback::from_result(result));
        self.feedback.as_ref()
    }

    fn begin(&mut self, name: PlayerName, now_ms: f64) -> FrameTicket {
        self.stop();
        self.session += 1;
        self.feedback = None;
        log::info!("Session {} started for {}", self.session, name);
        self.state.start(name, now_ms);
        FrameTicket {
            generation: self.generation,
        }
    }

    fn finish(&mut self) -> SessionSummary {
        let score = self.state.score;
        let new_high_score = self.high_score.record(score, &mut self.storage);

        let submission = if self.state.config.submit_scores {
            self.state
                .player_name
                .as_ref()
                .and_then(|name| match ScoreSubmission::new(name.as_str(), score) {
                    Ok(submission) => Some(submission),
                    Err(e) => {
                        log::warn!("Final score not submittable: {}", e);
                        None
                    }
                })
        } else {
            None
        };

        log::info!(
            "Game over: session {} scored {} (high score {})",
            self.session,
            score,
            self.high_score.value
        );

        SessionSummary {
            session: self.session,
            score,
            new_high_score,
            submission,
        }
    }
}
