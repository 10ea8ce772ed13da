//! The sync actor: one Tokio task per joined lobby.
//!
//! Channel traffic, caller commands, and the round timer all funnel
//! through one `select!` loop, so lobby state is only ever touched from
//! one place. Callers hold a cheap-to-clone [`SyncHandle`] and watch a
//! [`SyncEvent`] stream.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Instant};

use trivium_bank::Question;
use trivium_protocol::{AnswerStatus, Inbound, Member, Outbound, RoomCode};
use trivium_session::Status;

use crate::{Channel, ChannelEvent, MultiplayerSession, SyncConfig, SyncError};

// ---------------------------------------------------------------------------
// Events and views
// ---------------------------------------------------------------------------

/// What the session reports to its watcher (typically a UI).
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The roster changed; this is the full new roster in server order.
    RosterChanged(Vec<Member>),
    /// A round started with this question.
    RoundStarted { question: Question },
    /// The local player's round resolved (answer or timeout).
    RoundResolved { status: Status, score: i32 },
    /// Another member's result came in.
    ScoreUpdate {
        username: String,
        score: i32,
        status: AnswerStatus,
        answer: String,
    },
    /// Every member has resolved; the host may advance.
    RoundOver,
    /// The game reached its end.
    GameOver,
    /// The host closed the lobby; the session is over.
    LobbyClosed,
    /// The connection dropped and came back; the roster will refresh.
    Reconnected,
    /// The connection is gone for good.
    Offline,
}

/// A point-in-time snapshot of the lobby, for rendering.
#[derive(Debug, Clone)]
pub struct LobbyView {
    pub code: RoomCode,
    pub is_host: bool,
    pub members: Vec<Member>,
    pub current_question: Option<Question>,
    pub status: Status,
    pub score: i32,
    pub round_over: bool,
    pub may_progress: bool,
    pub finished: bool,
}

// ---------------------------------------------------------------------------
// Commands and handle
// ---------------------------------------------------------------------------

enum SyncCommand {
    SubmitAnswer {
        answer: String,
        reply: oneshot::Sender<Result<Status, SyncError>>,
    },
    Advance {
        reply: oneshot::Sender<Result<(), SyncError>>,
    },
    Leave {
        reply: oneshot::Sender<()>,
    },
    View {
        reply: oneshot::Sender<LobbyView>,
    },
}

/// Handle to a running sync session.
#[derive(Clone)]
pub struct SyncHandle {
    code: RoomCode,
    sender: mpsc::Sender<SyncCommand>,
}

impl SyncHandle {
    /// The lobby this handle belongs to.
    pub fn code(&self) -> RoomCode {
        self.code
    }

    /// Submits the local player's answer for the live round.
    ///
    /// Returns the resulting status (`Correct` or `Incorrect`).
    pub async fn submit_answer(
        &self,
        answer: impl Into<String>,
    ) -> Result<Status, SyncError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SyncCommand::SubmitAnswer {
                answer: answer.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SyncError::Unavailable)?;
        reply_rx.await.map_err(|_| SyncError::Unavailable)?
    }

    /// Host only: asks the server to start the next round.
    pub async fn advance(&self) -> Result<(), SyncError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SyncCommand::Advance { reply: reply_tx })
            .await
            .map_err(|_| SyncError::Unavailable)?;
        reply_rx.await.map_err(|_| SyncError::Unavailable)?
    }

    /// Leaves the lobby and stops the session task.
    ///
    /// Never fails: leaving an already-dead session is a no-op.
    pub async fn leave(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .sender
            .send(SyncCommand::Leave { reply: reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
    }

    /// Snapshot of the current lobby state.
    pub async fn view(&self) -> Result<LobbyView, SyncError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SyncCommand::View { reply: reply_tx })
            .await
            .map_err(|_| SyncError::Unavailable)?;
        reply_rx.await.map_err(|_| SyncError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// The actor
// ---------------------------------------------------------------------------

/// When there is no live round the timer branch pends forever, letting
/// `select!` serve the other branches.
async fn round_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// One thing the `select!` loop has to deal with.
enum Turn {
    Command(Option<SyncCommand>),
    Channel(ChannelEvent),
    RoundTimeout,
}

/// The session actor. Constructed and spawned by [`SyncSession::join`].
pub struct SyncSession<C: Channel> {
    channel: C,
    lobby: MultiplayerSession,
    config: SyncConfig,
    commands: mpsc::Receiver<SyncCommand>,
    events: mpsc::UnboundedSender<SyncEvent>,
    /// Armed while a round is live; `None` disarms the timer branch.
    deadline: Option<Instant>,
}

impl<C: Channel> SyncSession<C> {
    /// Joins lobby `code` as `user` over an already-connected channel.
    ///
    /// Emits `JOIN_LOBBY` and waits for the server's verdict: a roster
    /// on success, [`SyncError::InvalidLobby`] on rejection, or
    /// [`SyncError::JoinTimeout`] if the server never answers. On
    /// success the actor task is spawned and a handle plus the event
    /// stream are returned.
    pub async fn join(
        mut channel: C,
        code: RoomCode,
        user: impl Into<String>,
        is_host: bool,
        config: SyncConfig,
    ) -> Result<(SyncHandle, mpsc::UnboundedReceiver<SyncEvent>), SyncError>
    {
        let user = user.into();
        emit_join(&mut channel, code, &user).await?;

        let members =
            timeout(config.join_timeout, await_roster(&mut channel, code, &user))
                .await
                .map_err(|_| SyncError::JoinTimeout)??;

        let mut lobby = MultiplayerSession::new(code, user, is_host);
        lobby.replace_members(members);
        tracing::info!(
            %code,
            is_host,
            members = lobby.members().len(),
            "joined lobby"
        );

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let session = SyncSession {
            channel,
            lobby,
            config,
            commands: cmd_rx,
            events: event_tx,
            deadline: None,
        };
        tokio::spawn(session.run());

        Ok((
            SyncHandle {
                code,
                sender: cmd_tx,
            },
            event_rx,
        ))
    }

    async fn run(mut self) {
        loop {
            // Branch handlers only build a `Turn`; the real work happens
            // below, once the unfinished branch futures are dropped and
            // `self` is free again.
            let turn = tokio::select! {
                command = self.commands.recv() => Turn::Command(command),
                event = self.channel.next_event() => Turn::Channel(event),
                _ = round_deadline(self.deadline) => Turn::RoundTimeout,
            };

            let stop = match turn {
                Turn::Command(Some(command)) => {
                    self.handle_command(command).await
                }
                // Every handle dropped: leave quietly.
                Turn::Command(None) => {
                    self.leave().await;
                    true
                }
                Turn::Channel(event) => self.handle_channel(event).await,
                Turn::RoundTimeout => {
                    self.handle_round_timeout().await;
                    false
                }
            };
            if stop {
                break;
            }
        }
        tracing::debug!(code = %self.lobby.code(), "sync session stopped");
    }

    /// Returns `true` when the session should stop.
    async fn handle_command(&mut self, command: SyncCommand) -> bool {
        match command {
            SyncCommand::SubmitAnswer { answer, reply } => {
                let _ = reply.send(self.submit_answer(answer).await);
                false
            }
            SyncCommand::Advance { reply } => {
                let _ = reply.send(self.advance().await);
                false
            }
            SyncCommand::Leave { reply } => {
                self.leave().await;
                let _ = reply.send(());
                true
            }
            SyncCommand::View { reply } => {
                let _ = reply.send(self.view());
                false
            }
        }
    }

    /// Returns `true` when the session should stop.
    async fn handle_channel(&mut self, event: ChannelEvent) -> bool {
        match event {
            ChannelEvent::Message { name, payload } => {
                match Inbound::decode(&name, payload) {
                    Ok(message) => return self.handle_inbound(message).await,
                    Err(error) => {
                        tracing::warn!(%error, "dropping bad frame");
                    }
                }
                false
            }
            ChannelEvent::Reconnected => {
                // The server has forgotten us. Re-join for a fresh
                // roster instead of assuming continuity.
                let code = self.lobby.code();
                let user = self.lobby.local_name().to_string();
                if let Err(error) =
                    emit_join(&mut self.channel, code, &user).await
                {
                    tracing::warn!(%error, "re-join after reconnect failed");
                }
                self.emit_event(SyncEvent::Reconnected);
                false
            }
            ChannelEvent::Offline => {
                tracing::warn!(code = %self.lobby.code(), "connection lost");
                self.deadline = None;
                self.emit_event(SyncEvent::Offline);
                false
            }
            ChannelEvent::Closed => true,
        }
    }

    /// Returns `true` when the session should stop.
    async fn handle_inbound(&mut self, message: Inbound) -> bool {
        match message {
            Inbound::LobbyJoined { members }
            | Inbound::LobbyLeft { members } => {
                self.lobby.replace_members(members);
                self.emit_event(SyncEvent::RosterChanged(
                    self.lobby.members().to_vec(),
                ));
            }
            Inbound::LobbyClosed => {
                tracing::info!(code = %self.lobby.code(), "lobby closed");
                self.deadline = None;
                self.emit_event(SyncEvent::LobbyClosed);
                self.channel.close().await;
                return true;
            }
            Inbound::NextQuestion { question, members } => {
                // GAME_OVER is terminal. A duplicated or reordered
                // NEXT_QUESTION after it must not restart play.
                if self.lobby.is_finished() {
                    tracing::warn!(
                        code = %self.lobby.code(),
                        "NEXT_QUESTION after game over, ignoring"
                    );
                    return false;
                }
                self.lobby.begin_round(question.clone(), members);
                self.deadline =
                    Some(Instant::now() + self.config.answer_window);
                self.emit_event(SyncEvent::RosterChanged(
                    self.lobby.members().to_vec(),
                ));
                self.emit_event(SyncEvent::RoundStarted { question });
            }
            Inbound::RoundOver => {
                self.lobby.mark_round_over();
                self.emit_event(SyncEvent::RoundOver);
            }
            Inbound::ScoreUpdate {
                username,
                score,
                status,
                answer,
            } => {
                // Updates can arrive before or after ROUND_OVER; apply
                // whenever. Unknown names raced a leave — drop them,
                // the next roster snapshot reconciles.
                if self.lobby.apply_score_update(
                    &username,
                    score,
                    status,
                    answer.clone(),
                ) {
                    self.emit_event(SyncEvent::ScoreUpdate {
                        username,
                        score,
                        status,
                        answer,
                    });
                } else {
                    tracing::debug!(
                        %username,
                        "score update for unknown member, ignoring"
                    );
                }
            }
            Inbound::GameOver => {
                self.lobby.mark_finished();
                self.deadline = None;
                self.emit_event(SyncEvent::GameOver);
            }
            Inbound::InvalidLobby => {
                // Only meaningful during join; after that it is noise.
                tracing::warn!("INVALID_LOBBY after join, ignoring");
            }
        }
        false
    }

    async fn submit_answer(
        &mut self,
        answer: String,
    ) -> Result<Status, SyncError> {
        if self.lobby.is_finished() {
            return Err(SyncError::GameFinished);
        }
        if !self.lobby.round_live() {
            return Err(SyncError::NoActiveRound);
        }

        let correct = self
            .lobby
            .current_question()
            .is_some_and(|q| q.check_answer(&answer));
        let awarded = self.lobby.resolve_answer(correct);
        self.deadline = None;

        let status = self.lobby.status();
        tracing::info!(
            code = %self.lobby.code(),
            correct,
            awarded,
            score = self.lobby.score(),
            "answer submitted"
        );

        self.send_result().await?;
        self.emit_event(SyncEvent::RoundResolved {
            status,
            score: self.lobby.score(),
        });
        Ok(status)
    }

    async fn advance(&mut self) -> Result<(), SyncError> {
        if self.lobby.is_finished() {
            return Err(SyncError::GameFinished);
        }
        if !self.lobby.may_progress() {
            return Err(SyncError::CannotAdvance);
        }
        let (name, payload) = Outbound::NextQuestion {
            code: self.lobby.code(),
        }
        .encode();
        self.channel.emit(name, payload).await
    }

    /// The local round expired. Resolve as timed out and report the
    /// unchanged score so the server can finish the round.
    async fn handle_round_timeout(&mut self) {
        self.deadline = None;
        if self.lobby.is_finished() || !self.lobby.round_live() {
            return;
        }
        tracing::info!(code = %self.lobby.code(), "answer window elapsed");
        self.lobby.resolve_timeout();

        if let Err(error) = self.send_result().await {
            tracing::warn!(%error, "could not report timed-out round");
        }
        self.emit_event(SyncEvent::RoundResolved {
            status: Status::TimedOut,
            score: self.lobby.score(),
        });
    }

    /// Exactly one RESULT per round leaves through here, guarded by the
    /// lobby's resolved flag.
    async fn send_result(&mut self) -> Result<(), SyncError> {
        let (name, payload) = Outbound::Result {
            code: self.lobby.code(),
            score: self.lobby.score(),
        }
        .encode();
        self.channel.emit(name, payload).await
    }

    async fn leave(&mut self) {
        self.deadline = None;
        let (name, payload) = Outbound::LeaveLobby {
            code: self.lobby.code(),
        }
        .encode();
        // Best effort: the server also notices the socket going away.
        if let Err(error) = self.channel.emit(name, payload).await {
            tracing::debug!(%error, "leave notice not delivered");
        }
        self.channel.close().await;
    }

    fn view(&self) -> LobbyView {
        LobbyView {
            code: self.lobby.code(),
            is_host: self.lobby.is_host(),
            members: self.lobby.members().to_vec(),
            current_question: self.lobby.current_question().cloned(),
            status: self.lobby.status(),
            score: self.lobby.score(),
            round_over: self.lobby.round_over(),
            may_progress: self.lobby.may_progress(),
            finished: self.lobby.is_finished(),
        }
    }

    fn emit_event(&self, event: SyncEvent) {
        // A dropped watcher is fine; state queries still work.
        let _ = self.events.send(event);
    }
}

async fn emit_join<C: Channel>(
    channel: &mut C,
    code: RoomCode,
    user: &str,
) -> Result<(), SyncError> {
    let (name, payload) = Outbound::JoinLobby {
        code,
        user: user.to_string(),
    }
    .encode();
    channel.emit(name, payload).await
}

/// Waits for the server to accept or reject our join.
async fn await_roster<C: Channel>(
    channel: &mut C,
    code: RoomCode,
    user: &str,
) -> Result<Vec<Member>, SyncError> {
    loop {
        match channel.next_event().await {
            ChannelEvent::Message { name, payload } => {
                match Inbound::decode(&name, payload) {
                    Ok(Inbound::LobbyJoined { members }) => {
                        return Ok(members);
                    }
                    Ok(Inbound::InvalidLobby) => {
                        return Err(SyncError::InvalidLobby);
                    }
                    Ok(other) => {
                        tracing::debug!(
                            ?other,
                            "ignoring message before join confirmation"
                        );
                    }
                    Err(error) => {
                        tracing::warn!(%error, "dropping bad frame");
                    }
                }
            }
            ChannelEvent::Reconnected => {
                emit_join(channel, code, user).await?;
            }
            ChannelEvent::Offline | ChannelEvent::Closed => {
                return Err(SyncError::Disconnected);
            }
        }
    }
}
