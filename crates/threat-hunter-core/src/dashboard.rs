//! The coordinator: one owned state record composing every controller
//!
//! The rendering layer reads a `&Dashboard`; the event loop mutates it
//! through the methods below, one discrete transition at a time.

use crate::constants::labels;
use crate::indicators::ConnectionState;
use crate::sniffer::{SniffControl, SniffPhase};
use crate::stream_buffer::StreamBuffer;
use crate::summary::{FileSummary, PredictionSet};
use crate::view::{ViewMode, ViewSelector};
use crate::workflow::{Completion, Ticket, Workflow, WorkflowPhase};
use std::fmt::Display;
use std::time::Instant;
use threat_hunter_client::{FeedEvent, FileMetrics, MaliciousPredictions, PacketPredictions};

/// The three prediction workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionKind {
    Packets,
    File,
    Malicious,
}

impl PredictionKind {
    pub const ALL: [PredictionKind; 3] = [
        PredictionKind::Packets,
        PredictionKind::File,
        PredictionKind::Malicious,
    ];

    /// Panel shown once this workflow is triggered
    pub fn view(&self) -> ViewMode {
        match self {
            PredictionKind::Packets => ViewMode::PacketResults,
            PredictionKind::File => ViewMode::FileResults,
            PredictionKind::Malicious => ViewMode::MaliciousResults,
        }
    }

    /// Button label while Idle
    pub fn idle_label(&self) -> &'static str {
        match self {
            PredictionKind::Packets => labels::RUN_PREDICTIONS,
            PredictionKind::File => labels::RUN_FILE,
            PredictionKind::Malicious => labels::RUN_MALICIOUS,
        }
    }

    /// Workflow whose panel `view` is, if any
    pub fn for_view(view: ViewMode) -> Option<Self> {
        match view {
            ViewMode::PacketResults => Some(PredictionKind::Packets),
            ViewMode::FileResults => Some(PredictionKind::File),
            ViewMode::MaliciousResults => Some(PredictionKind::Malicious),
            ViewMode::Intro | ViewMode::Sniffing => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PredictionKind::Packets => "packet-predictions",
            PredictionKind::File => "file-predictions",
            PredictionKind::Malicious => "malicious-predictions",
        }
    }
}

/// Central state of the dashboard
#[derive(Debug)]
pub struct Dashboard {
    buffer: StreamBuffer,
    feed: ConnectionState,
    /// Times the feed namespace was joined
    feed_sessions: u64,
    feed_error: Option<String>,
    sniffer: SniffControl,
    packets: Workflow<PredictionSet>,
    file: Workflow<FileSummary>,
    malicious: Workflow<PredictionSet>,
    view: ViewSelector,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::with_parts(StreamBuffer::new(), SniffControl::new())
    }

    /// Build from a custom buffer and sniff control (tests, tuning)
    pub fn with_parts(buffer: StreamBuffer, sniffer: SniffControl) -> Self {
        Self {
            buffer,
            feed: ConnectionState::Unknown,
            feed_sessions: 0,
            feed_error: None,
            sniffer,
            packets: Workflow::new(PredictionKind::Packets.name()),
            file: Workflow::new(PredictionKind::File.name()),
            malicious: Workflow::new(PredictionKind::Malicious.name()),
            view: ViewSelector::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------------

    pub fn buffer(&self) -> &StreamBuffer {
        &self.buffer
    }

    pub fn feed_state(&self) -> ConnectionState {
        self.feed
    }

    pub fn feed_error(&self) -> Option<&str> {
        self.feed_error.as_deref()
    }

    pub fn sniffer(&self) -> &SniffControl {
        &self.sniffer
    }

    pub fn view(&self) -> ViewMode {
        self.view.mode()
    }

    pub fn packet_workflow(&self) -> &Workflow<PredictionSet> {
        &self.packets
    }

    pub fn file_workflow(&self) -> &Workflow<FileSummary> {
        &self.file
    }

    pub fn malicious_workflow(&self) -> &Workflow<PredictionSet> {
        &self.malicious
    }

    pub fn phase(&self, kind: PredictionKind) -> WorkflowPhase {
        match kind {
            PredictionKind::Packets => self.packets.phase(),
            PredictionKind::File => self.file.phase(),
            PredictionKind::Malicious => self.malicious.phase(),
        }
    }

    pub fn last_error(&self, kind: PredictionKind) -> Option<&str> {
        match kind {
            PredictionKind::Packets => self.packets.last_error(),
            PredictionKind::File => self.file.last_error(),
            PredictionKind::Malicious => self.malicious.last_error(),
        }
    }

    /// Label for the sniff button
    pub fn sniff_label(&self) -> &'static str {
        match self.sniffer.phase() {
            SniffPhase::Idle => labels::START_SNIFFING,
            SniffPhase::Running => labels::SNIFF_RUNNING,
            SniffPhase::Stopping => labels::SNIFF_STOPPING,
            SniffPhase::Stopped => labels::SNIFF_STOPPED,
            SniffPhase::Failed(_) => labels::SNIFF_FAILED,
        }
    }

    /// Whether the sniff button does anything right now
    pub fn sniff_enabled(&self) -> bool {
        let phase = self.sniffer.phase();
        phase.can_start() || phase.can_stop()
    }

    /// Label for a prediction button
    pub fn run_label(&self, kind: PredictionKind) -> &'static str {
        match self.phase(kind) {
            WorkflowPhase::Idle => kind.idle_label(),
            WorkflowPhase::Running => labels::REASONING,
            WorkflowPhase::Done => labels::DONE,
        }
    }

    pub fn run_enabled(&self, kind: PredictionKind) -> bool {
        self.phase(kind) == WorkflowPhase::Idle
    }

    /// Label set of the current panel, if it is a paged one
    pub fn current_predictions(&self) -> Option<&PredictionSet> {
        match self.view.mode() {
            ViewMode::PacketResults => self.packets.result(),
            ViewMode::MaliciousResults => self.malicious.result(),
            _ => None,
        }
    }

    /// Whether the current panel has data to render
    ///
    /// Prediction panels render only over a non-empty collection; the file
    /// panel only once metrics exist.
    pub fn panel_ready(&self) -> bool {
        match self.view.mode() {
            ViewMode::Intro | ViewMode::Sniffing => true,
            ViewMode::PacketResults => self.packets.result().is_some_and(|s| !s.is_empty()),
            ViewMode::MaliciousResults => self.malicious.result().is_some_and(|s| !s.is_empty()),
            ViewMode::FileResults => self.file.has_result(),
        }
    }

    // ---------------------------------------------------------------------
    // Sniffing
    // ---------------------------------------------------------------------

    /// Start capturing; the caller issues the start request with the ticket
    pub fn start_sniffing(&mut self) -> Option<Ticket> {
        let ticket = self.sniffer.start()?;
        self.view.select(ViewMode::Sniffing);
        Some(ticket)
    }

    /// Stop capturing (or retry a failed stop)
    pub fn stop_sniffing(&mut self) -> Option<Ticket> {
        self.sniffer.stop()
    }

    pub fn sniff_start_completed<E: Display>(&mut self, ticket: Ticket, outcome: Result<(), E>) {
        self.sniffer.start_completed(ticket, outcome);
    }

    pub fn sniff_stop_completed<E: Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<(), E>,
        now: Instant,
    ) {
        self.sniffer.stop_completed(ticket, outcome, now);
    }

    pub fn dismiss_sniff_error(&mut self) -> bool {
        self.sniffer.dismiss()
    }

    // ---------------------------------------------------------------------
    // Predictions
    // ---------------------------------------------------------------------

    /// Trigger a prediction workflow
    ///
    /// Accepted only from Idle; an accepted run switches to the workflow's
    /// panel. A rejected run changes nothing.
    pub fn run(&mut self, kind: PredictionKind) -> Option<Ticket> {
        let ticket = match kind {
            PredictionKind::Packets => self.packets.begin(),
            PredictionKind::File => self.file.begin(),
            PredictionKind::Malicious => self.malicious.begin(),
        }?;
        self.view.select(kind.view());
        Some(ticket)
    }

    pub fn complete_packets<E: Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<PacketPredictions, E>,
        now: Instant,
    ) -> Completion {
        let outcome = outcome.map(PredictionSet::from);
        self.packets.complete(ticket, outcome, now)
    }

    pub fn complete_file<E: Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<FileMetrics, E>,
        now: Instant,
    ) -> Completion {
        let outcome = outcome.map(FileSummary::from);
        self.file.complete(ticket, outcome, now)
    }

    pub fn complete_malicious<E: Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<MaliciousPredictions, E>,
        now: Instant,
    ) -> Completion {
        let outcome = outcome.map(PredictionSet::from);
        self.malicious.complete(ticket, outcome, now)
    }

    /// Abandon a running prediction
    ///
    /// Acts only while the workflow is Running. The previous result is kept
    /// and the abandoned request's response will come back stale.
    pub fn cancel(&mut self, kind: PredictionKind) -> bool {
        if self.phase(kind) != WorkflowPhase::Running {
            return false;
        }
        match kind {
            PredictionKind::Packets => self.packets.cancel(),
            PredictionKind::File => self.file.cancel(),
            PredictionKind::Malicious => self.malicious.cancel(),
        }
    }

    /// Advance the current paged panel; false when not paged or at the end
    pub fn next_page(&mut self) -> bool {
        match self.current_predictions_mut() {
            Some(set) => set.labels_mut().next_page(),
            None => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        match self.current_predictions_mut() {
            Some(set) => set.labels_mut().prev_page(),
            None => false,
        }
    }

    fn current_predictions_mut(&mut self) -> Option<&mut PredictionSet> {
        match self.view.mode() {
            ViewMode::PacketResults => self.packets.result_mut(),
            ViewMode::MaliciousResults => self.malicious.result_mut(),
            _ => None,
        }
    }

    // ---------------------------------------------------------------------
    // Feed and timers
    // ---------------------------------------------------------------------

    /// A feed subscription is being opened
    pub fn feed_connecting(&mut self) {
        self.feed = ConnectionState::Connecting;
    }

    /// Apply one push-feed event
    pub fn on_feed_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Connected => {
                if self.feed_sessions > 0 {
                    tracing::info!(
                        "feed reconnected, dropping {} buffered records",
                        self.buffer.len()
                    );
                    self.buffer.clear();
                } else {
                    tracing::info!("feed connected");
                }
                self.feed_sessions += 1;
                self.feed = ConnectionState::Connected;
                self.feed_error = None;
            }
            FeedEvent::Record(record) => {
                self.buffer.push(record);
            }
            FeedEvent::Disconnected(reason) => {
                tracing::warn!("feed disconnected: {}", reason);
                self.feed = ConnectionState::Disconnected;
                self.feed_error = Some(reason);
            }
        }
    }

    /// Fire any deferred status resets that are due
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        // Evaluate all four; no short-circuit
        let sniff = self.sniffer.tick(now);
        let packets = self.packets.tick(now);
        let file = self.file.tick(now);
        let malicious = self.malicious.tick(now);
        sniff || packets || file || malicious
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};
    use std::time::Duration;
    use threat_hunter_client::{ClientError, Label, Record, TopFeature};

    fn record(n: u64) -> Record {
        let mut fields = Map::new();
        fields.insert("No".to_string(), json!(n));
        Record::new(fields)
    }

    fn labels(values: &[i64]) -> Vec<Label> {
        let label = |v: &i64| Label::try_from(*v).unwrap();
        values.iter().map(label).collect()
    }

    fn packet_response(values: &[i64], key: &str) -> PacketPredictions {
        PacketPredictions {
            predictions: labels(values),
            file_key: Some(key.to_string()),
            model_info: None,
        }
    }

    fn malicious_response(values: &[i64], key: &str) -> MaliciousPredictions {
        MaliciousPredictions {
            predictions: labels(values),
            file_key: Some(key.to_string()),
        }
    }

    fn top_feature(name: &str) -> TopFeature {
        TopFeature {
            feature: name.to_string(),
        }
    }

    fn server_error(message: &str) -> ClientError {
        ClientError::Status {
            status: 500,
            message: message.to_string(),
        }
    }

    fn page_index(dash: &Dashboard) -> usize {
        let set = dash.current_predictions().unwrap();
        set.labels().page_index()
    }

    #[test]
    fn test_initial_state() {
        let dash = Dashboard::new();
        assert_eq!(dash.view(), ViewMode::Intro);
        assert_eq!(dash.sniff_label(), "Start Sniffing");
        assert_eq!(dash.run_label(PredictionKind::Packets), "Run Predictions");
        assert_eq!(dash.run_label(PredictionKind::File), "Run File");
        assert_eq!(dash.run_label(PredictionKind::Malicious), "Run Malicious");
        assert!(dash.buffer().is_empty());
        assert_eq!(dash.feed_state(), ConnectionState::Unknown);
    }

    #[test]
    fn test_kind_for_view() {
        for kind in PredictionKind::ALL {
            assert_eq!(PredictionKind::for_view(kind.view()), Some(kind));
        }
        assert_eq!(PredictionKind::for_view(ViewMode::Sniffing), None);
    }

    #[test]
    fn test_feed_fills_bounded_buffer() {
        let mut dash = Dashboard::new();
        dash.on_feed_event(FeedEvent::Connected);
        for n in 1..=1200 {
            dash.on_feed_event(FeedEvent::Record(record(n)));
        }

        assert_eq!(dash.buffer().len(), 1000);
        let first = dash.buffer().oldest().unwrap();
        assert_eq!(first.record.get("No"), Some(&json!(201)));
        let last = dash.buffer().latest().unwrap();
        assert_eq!(last.record.get("No"), Some(&json!(1200)));
    }

    #[test]
    fn test_reconnect_clears_buffer() {
        let mut dash = Dashboard::new();
        dash.feed_connecting();
        assert_eq!(dash.feed_state(), ConnectionState::Connecting);

        dash.on_feed_event(FeedEvent::Connected);
        dash.on_feed_event(FeedEvent::Record(record(1)));
        dash.on_feed_event(FeedEvent::Disconnected("server gone".to_string()));
        assert_eq!(dash.feed_state(), ConnectionState::Disconnected);
        assert_eq!(dash.feed_error(), Some("server gone"));
        // Records survive a disconnect
        assert_eq!(dash.buffer().len(), 1);

        dash.on_feed_event(FeedEvent::Connected);
        assert!(dash.buffer().is_empty());
        assert_eq!(dash.feed_error(), None);
        assert!(dash.feed_state().is_connected());
    }

    #[test]
    fn test_packet_run_commits_and_pages() {
        let mut dash = Dashboard::new();
        let now = Instant::now();

        let ticket = dash.run(PredictionKind::Packets).unwrap();
        assert_eq!(dash.view(), ViewMode::PacketResults);
        assert_eq!(dash.run_label(PredictionKind::Packets), "Reasoning…");
        assert!(!dash.panel_ready());

        let values: Vec<i64> = (0..73).map(|i| i64::from(i % 4 == 2)).collect();
        let response = packet_response(&values, "abc");
        let outcome = dash.complete_packets(ticket, Ok::<_, ClientError>(response), now);
        assert_eq!(outcome, Completion::Committed);
        assert_eq!(dash.run_label(PredictionKind::Packets), "Done");
        assert!(dash.panel_ready());

        let set = dash.current_predictions().unwrap();
        assert_eq!(set.file_key.as_deref(), Some("abc"));
        assert_eq!(set.labels().page_count(), 2);
        assert_eq!(set.labels().current_page().len(), 50);
        assert_eq!(set.dangerous_count(), 18);

        assert!(dash.next_page());
        assert!(!dash.next_page());
        let set = dash.current_predictions().unwrap();
        assert_eq!(set.labels().current_page().len(), 23);
        assert_eq!(set.dangerous_count(), 18);

        dash.tick(now + Duration::from_millis(1500));
        assert_eq!(dash.run_label(PredictionKind::Packets), "Run Predictions");
    }

    #[test]
    fn test_new_result_resets_page() {
        let mut dash = Dashboard::new();
        let now = Instant::now();

        let ticket = dash.run(PredictionKind::Malicious).unwrap();
        let response = MaliciousPredictions {
            predictions: vec![Label::Dangerous; 120],
            file_key: None,
        };
        dash.complete_malicious(ticket, Ok::<_, ClientError>(response.clone()), now);
        dash.next_page();
        dash.next_page();
        assert_eq!(page_index(&dash), 2);

        dash.tick(now + Duration::from_secs(2));
        let ticket = dash.run(PredictionKind::Malicious).unwrap();
        dash.complete_malicious(ticket, Ok::<_, ClientError>(response), now);
        assert_eq!(page_index(&dash), 0);
    }

    #[test]
    fn test_malicious_failure_keeps_collection() {
        let mut dash = Dashboard::new();
        let now = Instant::now();

        let ticket = dash.run(PredictionKind::Malicious).unwrap();
        let response = malicious_response(&[1, 0], "first");
        dash.complete_malicious(ticket, Ok::<_, ClientError>(response), now);
        dash.tick(now + Duration::from_secs(2));

        let ticket = dash.run(PredictionKind::Malicious).unwrap();
        let phase = dash.phase(PredictionKind::Malicious);
        assert_eq!(phase, WorkflowPhase::Running);
        let failure = Err::<MaliciousPredictions, _>(server_error("model not loaded"));
        let outcome = dash.complete_malicious(ticket, failure, now);

        assert_eq!(outcome, Completion::Failed);
        assert_eq!(dash.phase(PredictionKind::Malicious), WorkflowPhase::Idle);
        let kept = dash.malicious_workflow().result().unwrap();
        assert_eq!(kept.file_key.as_deref(), Some("first"));
        assert_eq!(kept.len(), 2);
        let error = dash.last_error(PredictionKind::Malicious).unwrap();
        assert!(error.contains("model not loaded"));
    }

    #[test]
    fn test_cancel_discards_late_response() {
        let mut dash = Dashboard::new();
        let now = Instant::now();

        let ticket = dash.run(PredictionKind::Malicious).unwrap();
        let response = malicious_response(&[1], "first");
        dash.complete_malicious(ticket, Ok::<_, ClientError>(response), now);
        // Done is not cancellable
        assert!(!dash.cancel(PredictionKind::Malicious));
        dash.tick(now + Duration::from_secs(2));

        let late = dash.run(PredictionKind::Malicious).unwrap();
        assert!(dash.cancel(PredictionKind::Malicious));
        assert_eq!(dash.run_label(PredictionKind::Malicious), "Run Malicious");
        assert!(!dash.cancel(PredictionKind::Malicious));

        let response = malicious_response(&[0, 0, 0], "late");
        let outcome = dash.complete_malicious(late, Ok::<_, ClientError>(response), now);
        assert_eq!(outcome, Completion::Stale);
        assert_eq!(dash.phase(PredictionKind::Malicious), WorkflowPhase::Idle);

        let kept = dash.malicious_workflow().result().unwrap();
        assert_eq!(kept.file_key.as_deref(), Some("first"));
        assert_eq!(dash.last_error(PredictionKind::Malicious), None);

        // A fresh run after cancelling is accepted
        assert!(dash.run(PredictionKind::Malicious).is_some());
    }

    #[test]
    fn test_first_failure_leaves_panel_empty() {
        let mut dash = Dashboard::new();
        let ticket = dash.run(PredictionKind::File).unwrap();
        let err = ClientError::Contract("missing field".to_string());
        dash.complete_file(ticket, Err::<FileMetrics, _>(err), Instant::now());

        assert_eq!(dash.view(), ViewMode::FileResults);
        assert!(!dash.panel_ready());
    }

    #[test]
    fn test_run_rejected_while_busy() {
        let mut dash = Dashboard::new();
        dash.run(PredictionKind::File).unwrap();
        dash.run(PredictionKind::Packets).unwrap();
        assert_eq!(dash.view(), ViewMode::PacketResults);

        // Rejected: no view switch, no new generation
        assert!(dash.run(PredictionKind::File).is_none());
        assert_eq!(dash.view(), ViewMode::PacketResults);
        assert_eq!(dash.file_workflow().generation(), 1);
    }

    #[test]
    fn test_workflows_are_independent() {
        let mut dash = Dashboard::new();
        let now = Instant::now();

        let packets = dash.run(PredictionKind::Packets).unwrap();
        let malicious = dash.run(PredictionKind::Malicious).unwrap();

        // Malicious resolves first
        let response = malicious_response(&[1, 1, 1], "m");
        dash.complete_malicious(malicious, Ok::<_, ClientError>(response), now);
        assert_eq!(dash.phase(PredictionKind::Packets), WorkflowPhase::Running);

        let response = packet_response(&[0, 0], "p");
        dash.complete_packets(packets, Ok::<_, ClientError>(response), now);

        let p = dash.packet_workflow().result().unwrap();
        let m = dash.malicious_workflow().result().unwrap();
        assert_eq!((p.len(), p.file_key.as_deref()), (2, Some("p")));
        assert_eq!((m.len(), m.file_key.as_deref()), (3, Some("m")));
        assert_eq!(p.dangerous_count(), 0);
        assert_eq!(m.dangerous_count(), 3);
    }

    #[test]
    fn test_file_run_summary() {
        let mut dash = Dashboard::new();
        let ticket = dash.run(PredictionKind::File).unwrap();
        let metrics = FileMetrics {
            total_packets: 1000,
            anomalous_packets: 42,
            percent_anomalous: 0.042,
            top_features: vec![top_feature("duration"), top_feature("bytes")],
            file_key: Some("f".to_string()),
        };
        dash.complete_file(ticket, Ok::<_, ClientError>(metrics), Instant::now());

        let summary = dash.file_workflow().result().unwrap();
        assert_eq!(summary.percent_text(), "4.2%");
        assert_eq!(summary.ranked_features, vec!["duration", "bytes"]);
        assert!(dash.panel_ready());
        // Not a paged panel
        assert!(!dash.next_page());
    }

    #[test]
    fn test_sniff_start_twice() {
        let mut dash = Dashboard::new();
        assert!(dash.start_sniffing().is_some());
        assert_eq!(dash.view(), ViewMode::Sniffing);
        assert_eq!(dash.sniff_label(), "Running…");

        assert!(dash.start_sniffing().is_none());
        assert_eq!(dash.sniffer().phase(), &SniffPhase::Running);
    }

    #[test]
    fn test_sniff_stop_cycle_and_labels() {
        let mut dash = Dashboard::new();
        let now = Instant::now();

        dash.start_sniffing().unwrap();
        let stop = dash.stop_sniffing().unwrap();
        assert_eq!(dash.sniff_label(), "Stopping…");
        assert!(!dash.sniff_enabled());

        dash.sniff_stop_completed(stop, Ok::<_, ClientError>(()), now);
        assert_eq!(dash.sniff_label(), "Stopped");
        assert!(dash.sniffer().capture_completed());

        assert!(dash.tick(now + Duration::from_millis(1500)));
        assert_eq!(dash.sniff_label(), "Start Sniffing");
        assert!(!dash.tick(now + Duration::from_millis(3000)));
    }

    #[test]
    fn test_sniff_stop_failure() {
        let mut dash = Dashboard::new();
        dash.start_sniffing().unwrap();
        let stop = dash.stop_sniffing().unwrap();
        let err = ClientError::Status {
            status: 400,
            message: "Sniffing not running".to_string(),
        };
        dash.sniff_stop_completed(stop, Err::<(), _>(err), Instant::now());

        assert_eq!(dash.sniff_label(), "Stop failed");
        assert!(dash.sniff_enabled());
        assert!(dash.dismiss_sniff_error());
        assert_eq!(dash.sniff_label(), "Start Sniffing");
    }

    #[test]
    fn test_prediction_does_not_touch_sniffer_or_buffer() {
        let mut dash = Dashboard::new();
        dash.start_sniffing().unwrap();
        dash.on_feed_event(FeedEvent::Connected);
        dash.on_feed_event(FeedEvent::Record(record(1)));

        let ticket = dash.run(PredictionKind::Packets).unwrap();
        dash.on_feed_event(FeedEvent::Record(record(2)));
        let response = packet_response(&[1], "k");
        dash.complete_packets(ticket, Ok::<_, ClientError>(response), Instant::now());

        assert_eq!(dash.buffer().len(), 2);
        assert_eq!(dash.sniffer().phase(), &SniffPhase::Running);
    }
}
