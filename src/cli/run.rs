use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    Res, config,
    http::HttpClient,
    info,
    management::{ConfigStore, ConsoleApproval, CredentialManager},
    mdblist::{self, MdblistClient, RatingSource},
    plex::{LibraryServer, PlexClient},
    success,
    tmdb::ListPublisher,
    types::{
        Config, LibraryReport, LibraryRule, ListEntry, ListId, MediaItem, MediaKind, PublishMode,
        ReportTableRow, RunReport, Thresholds,
    },
    utils, warning,
};

/// The three remote collaborators of a run.
pub struct Services<'a> {
    pub server: &'a dyn LibraryServer,
    pub ratings: &'a dyn RatingSource,
    pub lists: &'a dyn ListPublisher,
}

/// One complete sync: load the configuration, make sure TMDb credentials are
/// usable, then rebuild the list of every configured library.
///
/// "Today" is taken in `tz`. Errors from Plex or TMDb end the run; the
/// libraries already processed keep their new lists.
pub async fn run(tz: Tz) -> Res<RunReport> {
    let started = Instant::now();

    let mut store = ConfigStore::load(config::config_file()).await?;
    let http = HttpClient::new()?;

    let tmdb = CredentialManager::new(&mut store)
        .ensure(&http, &ConsoleApproval::from_env())
        .await?;

    let config = store.config();
    let mdblist = MdblistClient::new(http.clone(), &config.mdblist);
    match mdblist.limits().await {
        Some(limits) => info!("MDBList API limits = {}", limits),
        None => warning!("MDBList API limits = none"),
    }

    let plex = PlexClient::new(http, &config.plex);
    let services = Services {
        server: &plex,
        ratings: &mdblist,
        lists: &tmdb,
    };

    let today = Utc::now().with_timezone(&tz).date_naive();
    let report = run_libraries(&services, config, today).await?;

    print_report(&report);
    info!(
        "Script execution time: {}",
        utils::format_elapsed(started.elapsed())
    );

    Ok(report)
}

pub async fn run_libraries(
    services: &Services<'_>,
    config: &Config,
    today: NaiveDate,
) -> Res<RunReport> {
    let mut report = RunReport::default();

    for (name, rule) in &config.libraries {
        let library = sync_library(services, name, rule, today).await?;
        report.libraries.push(library);
    }

    Ok(report)
}

pub async fn sync_library(
    services: &Services<'_>,
    name: &str,
    rule: &LibraryRule,
    today: NaiveDate,
) -> Res<LibraryReport> {
    info!("============================");
    info!("Working on library {}", name);

    let kind = rule.window_kind();
    let current = utils::current_window(kind, today);
    info!(
        "Date range: {} to {}",
        current.start.format("%Y-%m-%d"),
        current.end.format("%Y-%m-%d")
    );

    let windows = utils::historical_windows(&current, kind, rule.starting_year, today.year());
    let section = services.server.section(name).await?;
    let thresholds = rule.thresholds();
    let list_id = &rule.tmdb_list_id;

    info!("Clearing list {}", list_id);
    services.lists.clear(list_id).await?;

    let mut report = LibraryReport {
        library: name.to_string(),
        kind: section.kind,
        list_id: list_id.clone(),
        windows: windows.len(),
        scanned: 0,
        added: 0,
    };
    let mut pending: Vec<ListEntry> = Vec::new();

    for window in &windows {
        info!("Searching between {}", window);
        let items = services.server.search(&section, window).await?;
        info!("Found {} items in range", items.len());
        report.scanned += items.len();

        let payload =
            collect_included(services.ratings, section.kind, &items, &thresholds).await?;

        match rule.publish {
            PublishMode::PerWindow => {
                report.added += publish(services.lists, list_id, &payload).await?;
            }
            PublishMode::Once => pending.extend(payload),
        }
    }

    if rule.publish == PublishMode::Once {
        report.added += publish(services.lists, list_id, &pending).await?;
    }

    Ok(report)
}

/// Entries of `items` that pass the rating rule, one per TMDb guid.
pub async fn collect_included(
    ratings: &dyn RatingSource,
    kind: MediaKind,
    items: &[MediaItem],
    thresholds: &Thresholds,
) -> Res<Vec<ListEntry>> {
    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} Checking ratings {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut payload = Vec::new();
    for item in items {
        pb.set_message(item.title.clone());
        for tmdb_id in utils::tmdb_ids(&item.guids) {
            let record = ratings.rating(kind, &tmdb_id).await?;
            if mdblist::should_include(record.as_ref(), thresholds) {
                payload.push(ListEntry { id: tmdb_id, kind });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(payload)
}

async fn publish(lists: &dyn ListPublisher, list_id: &ListId, payload: &[ListEntry]) -> Res<usize> {
    if !payload.is_empty() {
        lists.add_items(list_id, payload).await?;
    }
    success!("Added {} items to list {}", payload.len(), list_id);
    Ok(payload.len())
}

pub fn print_report(report: &RunReport) {
    if report.libraries.is_empty() {
        warning!("No libraries configured");
        return;
    }

    let rows: Vec<ReportTableRow> = report.libraries.iter().map(ReportTableRow::from).collect();
    println!("{}", Table::new(rows));
}
