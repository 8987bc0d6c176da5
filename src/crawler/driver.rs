//! Crawl driver used by the command-line binary
//!
//! Spawns a fixed pool of pull workers over one shared `Coordinator`. Each
//! worker takes a URL, fetches it, feeds the HTML back through `discover`,
//! and reports the outcome. Snapshots are written periodically, on Ctrl-C,
//! and when the crawl ends.

use crate::config::Config;
use crate::crawler::{build_http_client, fetch_page, Coordinator, HttpSource};
use crate::output::format_progress;
use crate::robots::PolitenessOracle;
use crate::sitemap::SitemapResolver;
use crate::state::FrontierStats;
use crate::storage::JsonFileStore;
use crate::url::UrlCanonicalizer;
use crate::Result;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Summary of a finished (or interrupted) crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages fetched by this process, successes and failures together
    pub pages_fetched: u64,
    pub stats: FrontierStats,
    pub interrupted: bool,
    pub elapsed: Duration,
}

struct WorkerContext {
    coordinator: Coordinator,
    client: Client,
    store: JsonFileStore,
    max_pages: u64,
    save_every: u64,
    dispatched: AtomicU64,
    finished: AtomicU64,
    /// Signalled once the page budget is spent
    budget_reached: Notify,
}

/// Builds the crawl from `config` and runs it to completion
///
/// Resumes from the configured snapshot unless `fresh` is set or no snapshot
/// exists, in which case the frontier is seeded from scratch.
pub async fn run_crawl(config: &Config, fresh: bool) -> Result<CrawlReport> {
    let start_time = Instant::now();

    let client = build_http_client(&config.user_agent)?;
    let source: Arc<dyn HttpSource> = Arc::new(client.clone());
    let user_agent = config.user_agent_string();

    let oracle = Arc::new(PolitenessOracle::with_timeout(
        Arc::clone(&source),
        config.robots_timeout(),
    ));
    let sitemaps = SitemapResolver::new(source, user_agent.clone())
        .with_timeout(config.sitemap_timeout())
        .with_max_depth(config.politeness.max_sitemap_depth);

    let mut options = config.crawl_options();
    options.on_progress = Arc::new(|stats: FrontierStats| {
        debug!("Progress: {}", format_progress(&stats));
    });

    let coordinator = Coordinator::new(
        &config.crawler.base_url,
        options,
        Arc::new(UrlCanonicalizer::new(config.url_filters())),
        oracle,
        sitemaps,
    )?;
    let store = JsonFileStore::new(&config.output.snapshot_path);

    let configured_base = coordinator.base_url();
    if !fresh && coordinator.load_state(&store)? {
        let restored_base = coordinator.base_url();
        if restored_base != configured_base {
            warn!(
                "Snapshot {} is for {}, not the configured {}; continuing with the snapshot",
                store.path().display(),
                restored_base,
                configured_base
            );
        }
    } else {
        if fresh {
            info!("Starting fresh crawl of {}", configured_base);
        } else {
            info!("No snapshot at {}, starting new crawl", store.path().display());
        }
        coordinator.initialize().await?;
    }

    let context = Arc::new(WorkerContext {
        coordinator,
        client,
        store,
        max_pages: config.crawler.max_pages,
        save_every: u64::from(config.crawler.save_every),
        dispatched: AtomicU64::new(0),
        finished: AtomicU64::new(0),
        budget_reached: Notify::new(),
    });

    info!(
        "Crawling with {} workers as {} ({})",
        config.crawler.workers,
        user_agent,
        format_progress(&context.coordinator.stats())
    );

    let mut workers = JoinSet::new();
    for id in 0..config.crawler.workers {
        workers.spawn(worker(id, Arc::clone(&context)));
    }

    let outcome = tokio::select! {
        result = drain(&mut workers) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    workers.abort_all();

    let interrupted = outcome.is_none();
    if interrupted {
        warn!("Interrupted, saving snapshot to {}", context.store.path().display());
    }

    context.coordinator.save_state(&context.store)?;
    if let Some(result) = outcome {
        result?;
    }

    let report = CrawlReport {
        pages_fetched: context.finished.load(Ordering::SeqCst),
        stats: context.coordinator.stats(),
        interrupted,
        elapsed: start_time.elapsed(),
    };

    info!(
        "Crawl {} after {} pages in {:?}: {}",
        if interrupted { "interrupted" } else { "finished" },
        report.pages_fetched,
        report.elapsed,
        format_progress(&report.stats)
    );

    Ok(report)
}

impl WorkerContext {
    fn budget_spent(&self) -> bool {
        self.max_pages > 0 && self.dispatched.load(Ordering::SeqCst) >= self.max_pages
    }
}

async fn drain(workers: &mut JoinSet<Result<()>>) -> Result<()> {
    while let Some(joined) = workers.join_next().await {
        joined??;
    }
    Ok(())
}

async fn worker(id: u32, ctx: Arc<WorkerContext>) -> Result<()> {
    debug!("Worker {} started", id);

    loop {
        let stop = ctx.budget_reached.notified();
        tokio::pin!(stop);
        stop.as_mut().enable();

        if ctx.budget_spent() {
            break;
        }

        let next = tokio::select! {
            url = ctx.coordinator.wait_for_url() => url,
            _ = &mut stop => None,
        };
        let Some(url) = next else {
            break;
        };

        if ctx.max_pages > 0 {
            let dispatched = ctx.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
            // Past the page budget the URL stays in flight; the final snapshot requeues it
            if dispatched > ctx.max_pages {
                debug!("Worker {} stopping at page budget {}", id, ctx.max_pages);
                ctx.budget_reached.notify_waiters();
                break;
            }
            if dispatched == ctx.max_pages {
                ctx.budget_reached.notify_waiters();
            }
        }

        match fetch_page(&ctx.client, url.as_str()).await {
            Ok(html) => {
                match ctx.coordinator.discover(&html, url.as_str()).await {
                    Ok(added) => debug!("{} -> {} new URLs", url, added.len()),
                    Err(e) => warn!("Link discovery failed for {}: {}", url, e),
                }
                ctx.coordinator.mark_completed(&url)?;
            }
            Err(e) => {
                debug!("Fetch failed for {} ({}): {}", url, e.kind(), e);
                ctx.coordinator.mark_failed(&url)?;
            }
        }

        let finished = ctx.finished.fetch_add(1, Ordering::SeqCst) + 1;
        if ctx.save_every > 0 && finished % ctx.save_every == 0 {
            match ctx.coordinator.save_state(&ctx.store) {
                Ok(()) => info!("Progress: {}", format_progress(&ctx.coordinator.stats())),
                Err(e) => warn!("Periodic snapshot failed: {}", e),
            }
        }
    }

    debug!("Worker {} finished", id);
    Ok(())
}
