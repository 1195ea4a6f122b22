use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::{Res, cli::run, info, utils, warning};

/// Top of every hour.
pub const HEARTBEAT_CRON: &str = "0 0 * * * *";

/// How late (seconds) the daily job may still start. A later tick means the
/// process was suspended through the run time; it is not caught up.
pub const GRACE_SECS: i64 = 60;

/// Cron expression (with seconds) firing every day at `at`.
pub fn daily_cron(at: NaiveTime) -> String {
    format!("0 {} {} * * *", at.minute(), at.hour())
}

/// Whether a daily tick observed at `now` belongs to today's `at`.
pub fn on_time(at: NaiveTime, now: DateTime<Tz>) -> bool {
    let late = now.naive_local() - now.date_naive().and_time(at);
    late >= Duration::zero() && late <= Duration::seconds(GRACE_SECS)
}

async fn waiting_banner(scheduler: &mut JobScheduler, daily: Uuid, tz: Tz) {
    let now = Utc::now().with_timezone(&tz);
    match scheduler.next_tick_for_job(daily).await {
        Ok(Some(next)) => info!(
            "It's {}. Waiting for next run at {} ({})",
            utils::format_clock(&now),
            utils::format_clock(&next.with_timezone(&tz)),
            tz.name()
        ),
        _ => info!(
            "It's {}. Waiting for next run ({})",
            utils::format_clock(&now),
            tz.name()
        ),
    }
}

/// Registers the daily sync at `at` and the hourly heartbeat, both in `tz`,
/// and starts the scheduler. Returns the scheduler and the daily job's id.
pub async fn start_scheduler(tz: Tz, at: NaiveTime) -> Res<(JobScheduler, Uuid)> {
    let scheduler = JobScheduler::new().await?;

    // One sync at a time; a tick that finds the previous run still going is dropped
    let running = Arc::new(Mutex::new(()));
    let daily_job = Job::new_async_tz(daily_cron(at).as_str(), tz, move |uuid, mut l| {
        let running = Arc::clone(&running);
        Box::pin(async move {
            let now = Utc::now().with_timezone(&tz);
            if !on_time(at, now) {
                warning!(
                    "Missed the run due at {}. Skipping until tomorrow",
                    at.format("%I:%M %p")
                );
                return;
            }

            let Ok(_guard) = running.try_lock() else {
                warning!("Previous run still in progress. Skipping");
                return;
            };

            if let Err(e) = run::run(tz).await {
                warning!("Run failed: {}", e);
            }
            waiting_banner(&mut l, uuid, tz).await;
        })
    })?;
    let daily = daily_job.guid();
    scheduler.add(daily_job).await?;

    let heartbeat = Job::new_async_tz(HEARTBEAT_CRON, tz, move |_uuid, mut l| {
        Box::pin(async move {
            waiting_banner(&mut l, daily, tz).await;
        })
    })?;
    scheduler.add(heartbeat).await?;

    scheduler.start().await?;
    Ok((scheduler, daily))
}

/// Runs the sync every day at `at` (in `tz`) and prints a status line every
/// hour. Only returns if the scheduler cannot be started; stop it with a
/// signal.
pub async fn schedule(tz: Tz, at: NaiveTime) -> Res<()> {
    let (mut scheduler, daily) = start_scheduler(tz, at).await?;
    waiting_banner(&mut scheduler, daily, tz).await;

    std::future::pending::<()>().await;
    Ok(())
}
