//! The engine: one process-scoped owner tying the layers together.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use trivium_bank::{Category, QuestionBank};
use trivium_protocol::RoomCode;
use trivium_session::SessionManager;
use trivium_store::{FsStore, StateKey};
use trivium_sync::{
    SyncConfig, SyncEvent, SyncHandle, SyncSession, WebSocketChannel,
};

use crate::{TriviumError, TtsSettings};

/// Everything a Trivium front end talks to.
///
/// Owns the store, the question bank, and the session manager, and is
/// the construction point for multiplayer sessions. One per process;
/// there are no globals anywhere below this.
pub struct Engine {
    store: Arc<FsStore>,
    bank: QuestionBank,
    sessions: SessionManager,
    sync_config: SyncConfig,
}

impl Engine {
    /// Builds an engine rooted at `data_dir`, loading any persisted
    /// user-authored categories and resuming any solo session on disk.
    pub fn new(
        data_dir: impl Into<PathBuf>,
        base_categories: Vec<Category>,
    ) -> Result<Self, TriviumError> {
        let store = Arc::new(FsStore::new(data_dir)?);
        let bank =
            QuestionBank::with_user_from_store(base_categories, &store);
        let sessions = SessionManager::new(Arc::clone(&store));
        Ok(Self {
            store,
            bank,
            sessions,
            sync_config: SyncConfig::default(),
        })
    }

    /// Overrides the multiplayer tunables.
    pub fn with_sync_config(mut self, config: SyncConfig) -> Self {
        self.sync_config = config;
        self
    }

    /// The question bank (category listing, user-authored sets).
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut QuestionBank {
        &mut self.bank
    }

    /// Solo session lifecycle and board operations.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// Starts a solo game over `category_count` random categories with
    /// full boards, replacing any game in progress.
    pub fn start_solo_random(
        &mut self,
        category_count: usize,
    ) -> Result<(), TriviumError> {
        let categories = self.bank.select_categories(
            category_count,
            false,
            Some(trivium_session::QUESTIONS_PER_CATEGORY),
        )?;
        self.sessions.start_solo(&self.bank, &categories)?;
        Ok(())
    }

    /// Starts a solo game over explicitly chosen categories.
    pub fn start_solo(
        &mut self,
        categories: &[Category],
    ) -> Result<(), TriviumError> {
        self.sessions.start_solo(&self.bank, categories)?;
        Ok(())
    }

    /// Connects to a lobby server and joins the lobby named by
    /// `code_input`, as host or guest.
    ///
    /// `code_input` is raw user input; a malformed code fails here with
    /// a validation error before anything touches the network.
    pub async fn connect_multiplayer(
        &self,
        url: &str,
        token: &str,
        code_input: &str,
        user: &str,
        is_host: bool,
    ) -> Result<(SyncHandle, mpsc::UnboundedReceiver<SyncEvent>), TriviumError>
    {
        let code = RoomCode::parse(code_input)?;
        let channel =
            WebSocketChannel::connect(url, token, &self.sync_config).await?;
        let joined = SyncSession::join(
            channel,
            code,
            user,
            is_host,
            self.sync_config.clone(),
        )
        .await?;
        Ok(joined)
    }

    /// Persisted text-to-speech preferences, defaulting when absent.
    pub fn tts_settings(&self) -> TtsSettings {
        self.store
            .read(StateKey::TtsSettings)
            .unwrap_or_default()
    }

    /// Saves text-to-speech preferences.
    pub fn set_tts_settings(
        &self,
        settings: TtsSettings,
    ) -> Result<(), TriviumError> {
        self.store.write(StateKey::TtsSettings, &settings)?;
        Ok(())
    }
}

/// Installs the global tracing subscriber, filtered by `RUST_LOG`
/// (`info` when unset). Call once, early.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// =========================================================================
// Tests
// =========================================================================
