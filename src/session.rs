//! A running game between a human and (optionally) the computer, with the
//! computer's move computed off-thread after a short delay.
//!
//! Every request carries the session generation it was issued under. Resetting
//! the session bumps the generation, so a reply computed for an abandoned game is
//! recognised as stale and discarded instead of being applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::ai::Difficulty;
use crate::config::SessionConfig;
use crate::engine::Engine;
use crate::error::MoveError;
use crate::game::{Board, GameOutcome, GameState, Player};

/// Granularity at which a pending delay notices a reset.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// A snapshot handed to the worker when the computer is on turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerRequest {
    pub generation: u64,
    pub board: Board,
    pub player: Player,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerReply {
    pub generation: u64,
    /// Position the column was chosen for.
    pub board: Board,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Applied { column: usize, outcome: GameOutcome },
    /// The game moved on (reset, a different position, already over, or not
    /// the computer's turn).
    Stale,
}

pub struct GameSession {
    state: GameState,
    computer: Option<Player>,
    difficulty: Difficulty,
    generation: Arc<AtomicU64>,
}

impl GameSession {
    pub fn new(config: &SessionConfig) -> Self {
        GameSession {
            state: GameState::initial(),
            computer: config.computer_player(),
            difficulty: config.difficulty,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn computer(&self) -> Option<Player> {
        self.computer
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Shared counter a [`ComputerWorker`] watches to drop abandoned requests.
    pub fn generation_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.generation)
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.state.is_terminal() && self.computer == Some(self.state.current_player())
    }

    /// Start a new game. Outstanding computer requests become stale.
    ///
    /// Returns a request straight away when the computer moves first.
    pub fn reset(&mut self) -> Option<ComputerRequest> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state = GameState::initial();
        info!(generation, "new game");
        self.pending_request()
    }

    /// Start a new game with different opponent settings.
    pub fn restart(
        &mut self,
        computer: Option<Player>,
        difficulty: Difficulty,
    ) -> Option<ComputerRequest> {
        self.computer = computer;
        self.difficulty = difficulty;
        self.reset()
    }

    /// Apply a human move. Returns the computer's request if it is now on turn.
    pub fn play(&mut self, column: usize) -> Result<Option<ComputerRequest>, MoveError> {
        if self.is_computer_turn() {
            return Err(MoveError::ComputerTurn);
        }
        self.state.apply_move_mut(column)?;
        self.log_outcome();
        Ok(self.pending_request())
    }

    /// The request for the current position, if the computer is on turn.
    pub fn pending_request(&self) -> Option<ComputerRequest> {
        if !self.is_computer_turn() {
            return None;
        }
        Some(ComputerRequest {
            generation: self.generation(),
            board: *self.state.board(),
            player: self.state.current_player(),
            difficulty: self.difficulty,
        })
    }

    /// Apply a worker reply after checking it still belongs to this game and
    /// was computed for the current position.
    pub fn apply_computer_reply(&mut self, reply: ComputerReply) -> ReplyOutcome {
        let current = self.generation();
        if reply.generation != current
            || reply.board != *self.state.board()
            || !self.is_computer_turn()
        {
            debug!(
                reply_generation = reply.generation,
                current_generation = current,
                "discarding stale computer reply"
            );
            return ReplyOutcome::Stale;
        }
        let Some(column) = reply.column else {
            return ReplyOutcome::Stale;
        };
        match self.state.apply_move_mut(column) {
            Ok(()) => {
                self.log_outcome();
                ReplyOutcome::Applied {
                    column,
                    outcome: self.state.outcome(),
                }
            }
            Err(err) => {
                debug!(column, %err, "computer reply rejected");
                ReplyOutcome::Stale
            }
        }
    }

    fn log_outcome(&self) {
        match self.state.outcome() {
            GameOutcome::Winner(player) => info!(%player, "game won"),
            GameOutcome::Draw => info!("game drawn"),
            GameOutcome::InProgress => {}
        }
    }
}

/// Background thread that answers [`ComputerRequest`]s after a delay.
///
/// A request whose generation is outdated when the delay ends is dropped
/// without searching.
pub struct ComputerWorker {
    requests: Option<mpsc::Sender<ComputerRequest>>,
    replies: mpsc::Receiver<ComputerReply>,
    handle: Option<JoinHandle<()>>,
}

impl ComputerWorker {
    pub fn spawn(mut engine: Engine, delay: Duration, generation: Arc<AtomicU64>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<ComputerRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<ComputerReply>();

        let handle = thread::spawn(move || {
            for request in request_rx {
                if !wait_unless_cancelled(delay, &generation, request.generation) {
                    debug!(generation = request.generation, "dropping cancelled request");
                    continue;
                }
                let column = engine.compute_computer_move(
                    &request.board,
                    request.difficulty,
                    request.player,
                );
                let reply = ComputerReply {
                    generation: request.generation,
                    board: request.board,
                    column,
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
        });

        ComputerWorker {
            requests: Some(request_tx),
            replies: reply_rx,
            handle: Some(handle),
        }
    }

    /// Queue a request. Returns false if the worker has shut down.
    pub fn submit(&self, request: ComputerRequest) -> bool {
        self.requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok())
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ComputerReply> {
        self.replies.recv_timeout(timeout).ok()
    }
}

impl Drop for ComputerWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Sleep for `delay`, returning false early if `generation` moves off `expected`.
fn wait_unless_cancelled(delay: Duration, generation: &AtomicU64, expected: u64) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if generation.load(Ordering::SeqCst) != expected {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}
