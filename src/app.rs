use crate::config::{Config, ConfigUpdate};
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::CustomLogger;
use crate::spotify::{Client, SharedToken, Spotify, SpotifyError};
use crate::state::State;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;
pub type ConfigSaveSender = std::sync::mpsc::Sender<ConfigUpdate>;
type ConfigSaveReceiver = std::sync::mpsc::Receiver<ConfigUpdate>;
type SessionExpiredSender = std::sync::mpsc::Sender<()>;
type SessionExpiredReceiver = std::sync::mpsc::Receiver<()>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    config: Config,
    token: SharedToken,
    state: Arc<Mutex<State>>,
    logger: &'static CustomLogger,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config, logger: &'static CustomLogger) -> Result<()> {
        info!("Starting application...");
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let (config_save_tx, config_save_rx) = std::sync::mpsc::channel::<ConfigUpdate>();
        let (session_tx, session_rx) = std::sync::mpsc::channel::<()>();
        let token = SharedToken::new(config.access_token.clone());
        let state = State::new(tx.clone(), config_save_tx.clone(), token.clone(), &config);
        let mut app = App {
            config,
            token,
            state: Arc::new(Mutex::new(state)),
            logger,
        };
        let spotify = app.spotify(config_save_tx, session_tx)?;
        app.start_network(spotify, rx);
        app.start_config_saver(config_save_rx);
        app.start_session_watcher(session_rx);

        if app.config.access_token.is_some() {
            tx.send(NetworkEvent::Me)?;
        }
        app.start_ui().await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Build the API facade. A rejected token is cleared, forgotten on disk
    /// and reported to the session watcher.
    ///
    fn spotify(
        &self,
        config_save_sender: ConfigSaveSender,
        session_sender: SessionExpiredSender,
    ) -> Result<Spotify> {
        let token = self.token.clone();
        let on_unauthorized = Arc::new(move || {
            token.clear();
            if let Err(e) = config_save_sender.send(ConfigUpdate::AccessToken(None)) {
                error!("Failed to request token removal: {}", e);
            }
            if let Err(e) = session_sender.send(()) {
                error!("Failed to report expired session: {}", e);
            }
        });
        let client = Client::new(
            &self.config.api_base_url,
            Arc::new(self.token.clone()),
            Duration::from_secs(self.config.request_timeout_secs),
        )?
        .with_unauthorized_callback(on_unauthorized);
        Ok(Spotify::new(client, self.config.retry.clone())
            .with_catalog(&self.config.market, &self.config.include_groups))
    }

    /// Start a thread to persist config updates.
    ///
    fn start_config_saver(&self, receiver: ConfigSaveReceiver) {
        let mut config = self.config.clone();
        std::thread::spawn(move || {
            while let Ok(update) = receiver.recv() {
                debug!("Saving config update ({})...", update_name(&update));
                if let Err(e) = config.update(update) {
                    error!("Failed to save config: {}", e);
                }
            }
        });
    }

    /// Start a thread that returns the UI to the welcome screen whenever
    /// Spotify rejects the token.
    ///
    fn start_session_watcher(&self, receiver: SessionExpiredReceiver) {
        let state = Arc::clone(&self.state);
        let message = SpotifyError::Authentication {
            message: String::new(),
        }
        .user_message();
        std::thread::spawn(move || {
            while receiver.recv().is_ok() {
                // Requests in flight may all fail with 401; expire once
                while receiver.try_recv().is_ok() {}
                state.blocking_lock().expire_session(message);
            }
        });
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(&self, spotify: Spotify, net_receiver: NetworkEventReceiver) {
        debug!("Creating new thread for asynchronous networking...");
        let cloned_state = Arc::clone(&self.state);
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to create network runtime: {}", e);
                    return;
                }
            };
            runtime.block_on(async {
                let mut network_event_handler = NetworkEventHandler::new(&cloned_state, &spotify);
                while let Ok(network_event) = net_receiver.recv() {
                    if let Err(e) = network_event_handler.handle(network_event).await {
                        error!("Failed to handle network event: {}", e);
                    }
                }
            })
        });
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run(&mut terminal).await;

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        result
    }

    async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let mut state = self.state.lock().await;
            for entry in self.logger.drain() {
                state.add_log_entry(entry);
            }
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            if !terminal_event_handler.handle_next(&mut state)? {
                debug!("Received application exit request.");
                return Ok(());
            }
        }
    }
}

fn update_name(update: &ConfigUpdate) -> &'static str {
    match update {
        ConfigUpdate::AccessToken(Some(_)) => "set access token",
        ConfigUpdate::AccessToken(None) => "clear access token",
    }
}
