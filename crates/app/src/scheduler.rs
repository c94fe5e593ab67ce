//! Periodic materialization of due recurring transactions.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use engine::Engine;
use tokio::time::MissedTickBehavior;

use crate::settings;

pub async fn run(engine: Arc<Engine>, settings: settings::Scheduler) {
    tokio::time::sleep(Duration::from_secs(settings.initial_delay_secs)).await;

    let mut interval = tokio::time::interval(Duration::from_secs(settings.interval_secs.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let today = Utc::now().date_naive();
        tracing::debug!("running recurring transactions due by {today}");
        if let Err(err) = engine.run_due_recurring(today).await {
            tracing::error!("recurring run failed: {err}");
        }
    }
}
