//! Prometheus counters for the ingest surface
use obsgate_core::BatchReport;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

static BATCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_counter("obsgate_batches_total", "Ingestion batches processed")
});
static RECORDS_ACCEPTED: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "obsgate_records_accepted_total",
        "Records that passed structural validation",
    )
});
static RECORDS_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "obsgate_records_rejected_total",
        "Records that failed structural validation or faulted",
    )
});

fn register_counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("valid counter opts");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("unique counter name");
    counter
}

pub fn observe_batch(report: &BatchReport) {
    BATCHES_TOTAL.inc();
    RECORDS_ACCEPTED.inc_by(report.successes() as u64);
    RECORDS_REJECTED.inc_by(report.failures() as u64);
}

pub fn encode() -> Result<String, prometheus::Error> {
    // Force registration so all series appear on the first scrape.
    Lazy::force(&BATCHES_TOTAL);
    Lazy::force(&RECORDS_ACCEPTED);
    Lazy::force(&RECORDS_REJECTED);

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}
