use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, info_span, Instrument};
use crate::domain::services::status_scheduler::StatusScheduler;

/// Runs `sweep` forever on a fixed cadence. A failed sweep is logged and the next tick retries.
pub async fn start_status_worker(scheduler: Arc<StatusScheduler>, every: Duration) {
    info!("Starting status worker, sweeping every {:?}", every);

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let span = info_span!("status_sweep");
        async {
            match scheduler.sweep().await {
                Ok(report) if report.checked_in + report.checked_out + report.failed > 0 => {
                    info!(
                        checked_in = report.checked_in,
                        checked_out = report.checked_out,
                        skipped = report.skipped,
                        failed = report.failed,
                        "Sweep finished"
                    );
                }
                Ok(_) => debug!("Sweep found nothing due"),
                Err(e) => error!("Sweep failed: {:?}", e),
            }
        }
            .instrument(span)
            .await;
    }
}
