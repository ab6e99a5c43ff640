//! Application state and main loop

use crate::action::Action;
use crate::components::{
    Component, ControlsComponent, FileResultsComponent, IntroComponent, PacketFlowComponent,
    PredictionsComponent,
};
use crate::tui::{self, Tui};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::Frame;
use std::future::Future;
use std::time::{Duration, Instant};
use threat_hunter_client::{
    BackendClient, ClientError, FeedEvent, FileMetrics, MaliciousPredictions, PacketFeed,
    PacketPredictions,
};
use threat_hunter_core::constants::{DEFAULT_TICK_MS, FEED_RECONNECT_DELAY};
use threat_hunter_core::{
    Completion, ConnectionState, Dashboard, PredictionKind, Ticket, ViewMode, describe_error,
    format_client_error,
};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Results from background requests, tagged with the ticket that started them
#[derive(Debug)]
enum AsyncResult {
    CaptureStarted(Ticket, Result<(), ClientError>),
    CaptureStopped(Ticket, Result<(), ClientError>),
    Packets(Ticket, Result<PacketPredictions, ClientError>),
    File(Ticket, Result<FileMetrics, ClientError>),
    Malicious(Ticket, Result<MaliciousPredictions, ClientError>),
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    should_quit: bool,
    /// All controller state
    dashboard: Dashboard,
    client: BackendClient,
    /// Live feed subscription, if one is open
    feed: Option<PacketFeed>,
    feed_rx: Option<mpsc::UnboundedReceiver<FeedEvent>>,
    /// When to resubscribe after the feed dropped
    reconnect_at: Option<Instant>,
    controls: ControlsComponent,
    intro: IntroComponent,
    packet_flow: PacketFlowComponent,
    packet_predictions: PredictionsComponent,
    malicious_predictions: PredictionsComponent,
    file_results: FileResultsComponent,
    /// Poll timeout for terminal events
    tick_rate: Duration,
    /// Channel for async request results
    action_rx: mpsc::UnboundedReceiver<AsyncResult>,
    action_tx: mpsc::UnboundedSender<AsyncResult>,
}

impl App {
    pub fn new(client: BackendClient, tick_rate: Duration) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            should_quit: false,
            dashboard: Dashboard::new(),
            client,
            feed: None,
            feed_rx: None,
            reconnect_at: None,
            controls: ControlsComponent::new(),
            intro: IntroComponent::new(),
            packet_flow: PacketFlowComponent::new(),
            packet_predictions: PredictionsComponent::new(PredictionKind::Packets),
            malicious_predictions: PredictionsComponent::new(PredictionKind::Malicious),
            file_results: FileResultsComponent::new(),
            tick_rate,
            action_rx,
            action_tx,
        }
    }

    /// Build an app with the default tick rate
    pub fn with_client(client: BackendClient) -> Self {
        Self::new(client, Duration::from_millis(DEFAULT_TICK_MS))
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        tui::install_panic_hook();
        let mut terminal = tui::init()?;

        let result = self.main_loop(&mut terminal).await;

        if let Some(feed) = self.feed.take() {
            feed.close();
        }
        tui::restore()?;

        result
    }

    /// Main event loop
    async fn main_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        self.connect_feed();

        loop {
            terminal.draw(|frame| {
                if let Err(e) = self.draw(frame) {
                    tracing::error!("Draw failed: {}", e);
                }
            })?;

            if event::poll(self.tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = self.handle_key(key)? {
                            self.handle_action(action)?;
                        }
                    }
                    Event::Resize(w, h) => {
                        self.handle_action(Action::Resize(w, h))?;
                    }
                    _ => {}
                }
            }

            // Every pass, so a burst of key presses cannot hold a status label
            self.handle_action(Action::Tick)?;

            self.drain_feed();
            while let Ok(result) = self.action_rx.try_recv() {
                self.apply_result(result);
            }

            if self.should_quit {
                break;
            }
            // Let spawned requests and the feed task make progress
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Chrome first, then the panel for the selected view
    fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let area = frame.area();
        let [_, _, panel, _, _] = ControlsComponent::layout(area);
        let dash = &self.dashboard;
        self.controls.draw(frame, area, dash)?;

        match dash.view() {
            ViewMode::Intro => self.intro.draw(frame, panel, dash),
            ViewMode::Sniffing => self.packet_flow.draw(frame, panel, dash),
            ViewMode::PacketResults => self.packet_predictions.draw(frame, panel, dash),
            ViewMode::MaliciousResults => self.malicious_predictions.draw(frame, panel, dash),
            ViewMode::FileResults => self.file_results.draw(frame, panel, dash),
        }
    }

    /// The visible panel gets the key first; unclaimed keys go to the controls
    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.dashboard.view() {
            ViewMode::Sniffing => self.packet_flow.handle_key_event(key)?,
            ViewMode::PacketResults => self.packet_predictions.handle_key_event(key)?,
            ViewMode::MaliciousResults => self.malicious_predictions.handle_key_event(key)?,
            ViewMode::Intro | ViewMode::FileResults => None,
        };
        match action {
            Some(action) => Ok(Some(action)),
            None => self.controls.handle_key_event(key),
        }
    }

    /// Handle an action
    fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ToggleSniffing => self.toggle_sniffing(),
            Action::DismissSniffError => {
                if !self.dashboard.dismiss_sniff_error() {
                    tracing::debug!("Nothing to dismiss");
                }
            }
            Action::Run(kind) => self.run_predictions(kind),
            Action::Cancel => {
                let kind = PredictionKind::for_view(self.dashboard.view());
                if !kind.is_some_and(|kind| self.dashboard.cancel(kind)) {
                    tracing::debug!("Nothing to cancel");
                }
            }
            Action::NextPage => {
                self.dashboard.next_page();
            }
            Action::PrevPage => {
                self.dashboard.prev_page();
            }
            Action::Tick => {
                let now = Instant::now();
                self.dashboard.tick(now);
                if self.reconnect_at.is_some_and(|at| now >= at) {
                    self.reconnect_at = None;
                    self.connect_feed();
                }
            }
            Action::Resize(_, _) => {
                // Terminal will automatically resize
            }
        }
        Ok(())
    }

    fn toggle_sniffing(&mut self) {
        let phase = self.dashboard.sniffer().phase();
        let (can_start, can_stop) = (phase.can_start(), phase.can_stop());

        if can_start {
            if let Some(ticket) = self.dashboard.start_sniffing() {
                tracing::info!("Starting capture");
                let client = self.client.clone();
                self.spawn(async move {
                    AsyncResult::CaptureStarted(ticket, client.start_capture().await)
                });
            }
        } else if can_stop {
            if let Some(ticket) = self.dashboard.stop_sniffing() {
                tracing::info!("Stopping capture");
                let client = self.client.clone();
                self.spawn(async move {
                    AsyncResult::CaptureStopped(ticket, client.stop_capture().await)
                });
            }
        } else {
            let phase = self.dashboard.sniffer().phase();
            tracing::debug!("Capture toggle ignored while {:?}", phase);
        }
    }

    fn run_predictions(&mut self, kind: PredictionKind) {
        let Some(ticket) = self.dashboard.run(kind) else {
            tracing::debug!("{} already running", kind.name());
            return;
        };
        tracing::info!("Requesting {}", kind.name());

        let client = self.client.clone();
        self.spawn(async move {
            match kind {
                PredictionKind::Packets => {
                    let outcome = client.packet_predictions().await;
                    AsyncResult::Packets(ticket, outcome)
                }
                PredictionKind::File => {
                    let outcome = client.file_predictions().await;
                    AsyncResult::File(ticket, outcome)
                }
                PredictionKind::Malicious => {
                    let outcome = client.malicious_predictions().await;
                    AsyncResult::Malicious(ticket, outcome)
                }
            }
        });
    }

    /// Run a backend request in the background and queue its result
    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = AsyncResult> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if tx.send(request.await).is_err() {
                tracing::debug!("Result arrived after shutdown");
            }
        });
    }

    /// Hand a finished request to the dashboard
    ///
    /// Returns what happened to a prediction result; capture results give None.
    fn apply_result(&mut self, result: AsyncResult) -> Option<Completion> {
        let now = Instant::now();
        let (kind, completion) = match result {
            AsyncResult::CaptureStarted(ticket, outcome) => {
                let outcome = user_facing(outcome);
                self.dashboard.sniff_start_completed(ticket, outcome);
                return None;
            }
            AsyncResult::CaptureStopped(ticket, outcome) => {
                let outcome = user_facing(outcome);
                self.dashboard.sniff_stop_completed(ticket, outcome, now);
                return None;
            }
            AsyncResult::Packets(ticket, outcome) => {
                let outcome = user_facing(outcome);
                let completion = self.dashboard.complete_packets(ticket, outcome, now);
                (PredictionKind::Packets, completion)
            }
            AsyncResult::File(ticket, outcome) => {
                let outcome = user_facing(outcome);
                let completion = self.dashboard.complete_file(ticket, outcome, now);
                (PredictionKind::File, completion)
            }
            AsyncResult::Malicious(ticket, outcome) => {
                let outcome = user_facing(outcome);
                let completion = self.dashboard.complete_malicious(ticket, outcome, now);
                (PredictionKind::Malicious, completion)
            }
        };
        tracing::debug!("{}: {:?}", kind.name(), completion);
        Some(completion)
    }

    /// Open a feed subscription, or schedule another attempt
    fn connect_feed(&mut self) {
        match PacketFeed::subscribe(self.client.config()) {
            Ok((feed, rx)) => {
                self.feed = Some(feed);
                self.feed_rx = Some(rx);
                self.dashboard.feed_connecting();
            }
            Err(e) => {
                tracing::error!("Cannot subscribe to packet feed: {}", describe_error(&e));
                let event = FeedEvent::Disconnected(format_client_error(&e));
                self.dashboard.on_feed_event(event);
                self.reconnect_at = Some(Instant::now() + FEED_RECONNECT_DELAY);
            }
        }
    }

    /// Apply queued feed events; schedules a resubscribe when the feed ends
    fn drain_feed(&mut self) {
        let Some(rx) = self.feed_rx.as_mut() else {
            return;
        };

        let mut ended = false;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    ended |= matches!(event, FeedEvent::Disconnected(_));
                    self.dashboard.on_feed_event(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.dashboard.feed_state() != ConnectionState::Disconnected {
                        let event = FeedEvent::Disconnected("feed closed".to_string());
                        self.dashboard.on_feed_event(event);
                    }
                    ended = true;
                    break;
                }
            }
        }

        if ended {
            self.feed = None;
            self.feed_rx = None;
            self.reconnect_at = Some(Instant::now() + FEED_RECONNECT_DELAY);
            tracing::info!("Resubscribing in {}s", FEED_RECONNECT_DELAY.as_secs());
        }
    }
}

/// Log the raw error and keep the short form for display
fn user_facing<T>(outcome: Result<T, ClientError>) -> Result<T, String> {
    outcome.map_err(|e| {
        tracing::warn!("Backend request failed: {}", describe_error(&e));
        format_client_error(&e)
    })
}
