//! Display-ready views over committed prediction results
//!
//! [`PredictionSet`] holds a label collection with its paging cursor;
//! [`FileSummary`] holds per-file metrics. Derived numbers (dangerous
//! count, anomalous percentage) are recomputed on read.

use crate::formatting::{format_fraction_percent, format_share_percent};
use crate::pagination::PagedList;
use serde_json::Value;
use threat_hunter_client::{FileMetrics, Label, MaliciousPredictions, PacketPredictions};

/// Number of dangerous labels in a collection
pub fn dangerous_count(labels: &[Label]) -> usize {
    labels.iter().filter(|label| label.is_dangerous()).count()
}

/// Labels from one per-packet or malicious run
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSet {
    pub file_key: Option<String>,
    /// Backend model description, per-packet runs only
    pub model_info: Option<Value>,
    labels: PagedList<Label>,
}

impl PredictionSet {
    pub fn new(labels: Vec<Label>, file_key: Option<String>) -> Self {
        Self {
            file_key,
            model_info: None,
            labels: PagedList::new(labels),
        }
    }

    pub fn labels(&self) -> &PagedList<Label> {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut PagedList<Label> {
        &mut self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Dangerous labels over the whole collection, not just the current page
    pub fn dangerous_count(&self) -> usize {
        dangerous_count(self.labels.items())
    }

    pub fn safe_count(&self) -> usize {
        self.len() - self.dangerous_count()
    }

    /// Share of dangerous labels, "0.0%" for an empty set
    pub fn dangerous_percent(&self) -> String {
        format_share_percent(self.dangerous_count() as u64, self.len() as u64)
    }

    /// Rows of the current page as (1-based packet number, label)
    pub fn page_rows(&self) -> impl Iterator<Item = (usize, Label)> + '_ {
        self.labels
            .iter_current_page()
            .map(|(index, label)| (index + 1, *label))
    }

    /// "Showing X of Y packets"
    pub fn showing_text(&self) -> String {
        format!(
            "Showing {} of {} packets",
            self.labels.current_page().len(),
            self.len()
        )
    }

    /// "Page i / n", 1-based; "Page 0 / 0" when empty
    pub fn page_text(&self) -> String {
        let count = self.labels.page_count();
        let current = if count == 0 {
            0
        } else {
            self.labels.page_index() + 1
        };
        format!("Page {} / {}", current, count)
    }
}

impl From<PacketPredictions> for PredictionSet {
    fn from(response: PacketPredictions) -> Self {
        let mut set = Self::new(response.predictions, response.file_key);
        set.model_info = response.model_info;
        set
    }
}

impl From<MaliciousPredictions> for PredictionSet {
    fn from(response: MaliciousPredictions) -> Self {
        Self::new(response.predictions, response.file_key)
    }
}

/// Metrics from one per-file run
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub file_key: Option<String>,
    pub total_count: u64,
    pub anomalous_count: u64,
    /// Fraction as reported by the backend
    pub reported_fraction: f64,
    /// Feature names, most important first
    pub ranked_features: Vec<String>,
}

impl FileSummary {
    /// Anomalous share in 0..=1
    ///
    /// Computed from the counts; the backend's own fraction is used only
    /// when there are no packets to divide by.
    pub fn anomalous_fraction(&self) -> f64 {
        if self.total_count == 0 {
            self.reported_fraction
        } else {
            self.anomalous_count as f64 / self.total_count as f64
        }
    }

    /// Anomalous share formatted to one decimal ("4.2%")
    pub fn percent_text(&self) -> String {
        format_fraction_percent(self.anomalous_fraction())
    }

    pub fn normal_count(&self) -> u64 {
        self.total_count.saturating_sub(self.anomalous_count)
    }

    pub fn has_features(&self) -> bool {
        !self.ranked_features.is_empty()
    }
}

impl From<FileMetrics> for FileSummary {
    fn from(metrics: FileMetrics) -> Self {
        Self {
            file_key: metrics.file_key,
            total_count: metrics.total_packets,
            anomalous_count: metrics.anomalous_packets,
            reported_fraction: metrics.percent_anomalous,
            ranked_features: metrics
                .top_features
                .into_iter()
                .map(|f| f.feature)
                .collect(),
        }
    }
}
