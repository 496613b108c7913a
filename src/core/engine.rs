use crate::core::match_companies::{MatchCompanies, MatchCompaniesRequest};
use crate::core::report::MatchReport;
use crate::domain::ports::BlockingKeyFactory;
use crate::utils::error::Result;
use crate::utils::metrics::MatchMetrics;
use crate::utils::monitor::{MatchPhase, SystemMonitor};
use std::sync::Arc;

/// Runs one match request end to end and reports counts to the attached metrics.
pub struct MatchEngine<B: BlockingKeyFactory> {
    matcher: MatchCompanies<B>,
    monitor: SystemMonitor,
    metrics: Option<Arc<MatchMetrics>>,
}

impl<B: BlockingKeyFactory> MatchEngine<B> {
    pub fn new(matcher: MatchCompanies<B>) -> Self {
        Self::new_with_monitoring(matcher, false)
    }

    pub fn new_with_monitoring(matcher: MatchCompanies<B>, enable_monitoring: bool) -> Self {
        Self {
            matcher,
            monitor: SystemMonitor::new(enable_monitoring),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MatchMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&MatchMetrics> {
        self.metrics.as_deref()
    }

    pub fn monitor(&self) -> &SystemMonitor {
        &self.monitor
    }

    pub async fn run(&self, request: &MatchCompaniesRequest) -> Result<MatchReport> {
        if let Some(metrics) = &self.metrics {
            metrics.record_request();
        }
        tracing::info!(
            "Matching {} source companies against {} candidates (threshold {}, semantic search {})",
            request.source_companies.len(),
            request.candidate_companies.len(),
            self.matcher.identity_linker().threshold(),
            if self.matcher.has_semantic_search() { "enabled" } else { "disabled" }
        );

        let response = self.matcher.execute(request).await?;
        self.monitor.log_stats(MatchPhase::Matching);

        let report = MatchReport::new(request, response);
        if let Some(metrics) = &self.metrics {
            metrics.record_confirmed(report.confirmed_count);
        }
        tracing::info!(
            "Performed {} comparisons, confirmed {} matches",
            report.comparisons_performed,
            report.confirmed_count
        );

        self.monitor.log_final_stats();
        Ok(report)
    }
}
