use crate::utils::error::Result;
use prometheus::{IntCounter, Registry, TextEncoder};
use std::sync::{Arc, OnceLock};

/// Match counters exported in the Prometheus text format, together with the
/// default process metrics on Linux. The matching core never reads them; the
/// engine reports into them after each run.
pub struct MatchMetrics {
    registry: Registry,
    match_requests_total: IntCounter,
    matches_confirmed_total: IntCounter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub match_requests_total: u64,
    pub matches_confirmed_total: u64,
}

impl MatchMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let match_requests_total = IntCounter::new(
            "company_match_requests_total",
            "Total number of match requests processed",
        )?;
        let matches_confirmed_total = IntCounter::new(
            "company_matches_confirmed_total",
            "Total number of confirmed company matches",
        )?;
        registry.register(Box::new(match_requests_total.clone()))?;
        registry.register(Box::new(matches_confirmed_total.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            match_requests_total,
            matches_confirmed_total,
        })
    }

    /// Shared counters for the lifetime of the process.
    pub fn global() -> Result<Arc<MatchMetrics>> {
        static GLOBAL: OnceLock<Arc<MatchMetrics>> = OnceLock::new();
        if let Some(metrics) = GLOBAL.get() {
            return Ok(metrics.clone());
        }
        let metrics = Arc::new(MatchMetrics::new()?);
        Ok(GLOBAL.get_or_init(|| metrics).clone())
    }

    pub fn record_request(&self) {
        self.match_requests_total.inc();
    }

    pub fn record_confirmed(&self, count: usize) {
        self.matches_confirmed_total.inc_by(count as u64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            match_requests_total: self.match_requests_total.get(),
            matches_confirmed_total: self.matches_confirmed_total.get(),
        }
    }

    pub fn render(&self) -> Result<String> {
        let families = self.registry.gather();
        Ok(TextEncoder::new().encode_to_string(&families)?)
    }
}
