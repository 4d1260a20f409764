//! Pages through the catalogue the way a list screen would: appear, load
//! pages until none are left, disappear.

use std::fmt;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use loadkit_core::services::{AnalyticEvent, AppDependencies};
use loadkit_core::{Changeset, ListModel, LoadingState, PagedOutput, ViewLifetime};
use loadkit_engine::{PageSource, PagingLoader, PagingSettings, Subscription, ViewLifecycle};
use loadkit_logging::{loadkit_info, loadkit_warn};

use crate::catalogue::{Article, Catalogue};
use crate::config::DemoConfig;

const STATE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    pub items: usize,
    pub failed: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loaded {} article(s) in {} page(s)", self.items, self.pages)?;
        if self.failed {
            f.write_str(", stopped by an error")?;
        }
        Ok(())
    }
}

pub async fn run(config: &DemoConfig, dependencies: &AppDependencies) -> anyhow::Result<Summary> {
    let catalogue = Catalogue::new(
        config.catalogue_size,
        Duration::from_millis(config.latency_ms),
    );
    walk(catalogue, config.paging_settings()?, dependencies).await
}

async fn walk<S>(
    source: S,
    settings: PagingSettings,
    dependencies: &AppDependencies,
) -> anyhow::Result<Summary>
where
    S: PageSource<Article> + 'static,
{
    let paging = PagingLoader::new(source, settings);
    let lifecycle = ViewLifecycle::new();
    let binding = paging.loader().bind_lifetime(lifecycle.subscribe());
    let mut states = paging.subscribe();

    dependencies.record(
        AnalyticEvent::new("catalogue", "opened", None)
            .with_info("started_at", Utc::now().to_rfc3339()),
    );

    lifecycle.appear();
    if !loads_on_appear(settings.options.trigger) {
        paging.restart()?;
    }

    let mut summary = Summary::default();
    let mut shown: PagedOutput<Article> = PagedOutput::fresh();
    loop {
        match next_terminal(&mut states).await? {
            LoadingState::Success(output) => {
                let changes = Changeset::between(&shown, &output);
                summary.pages += 1;
                summary.items = output.len();
                loadkit_info!(
                    "page {}: {} new article(s), {} row(s) shown",
                    summary.pages,
                    changes.insertions.len(),
                    output.total_count()
                );
                dependencies.record(
                    AnalyticEvent::new("catalogue", "page_loaded", Some(summary.pages.to_string()))
                        .with_info("items", output.len().to_string()),
                );

                let more_available = output.more_available;
                shown = output;
                if !more_available {
                    break;
                }
                paging.next_page()?;
            }
            LoadingState::Error(err) => {
                loadkit_warn!("giving up after page {}: {}", summary.pages, err);
                dependencies.report_error(&err);
                summary.failed = true;
                break;
            }
            _ => {
                loadkit_info!("catalogue is empty");
                break;
            }
        }
    }

    // Stop loading before the screen goes away, so a disappear trigger
    // cannot start another fetch.
    paging.loader().shutdown();
    binding.await?;
    lifecycle.disappear();
    dependencies.record(AnalyticEvent::new("catalogue", "closed", Some(summary.to_string())));
    Ok(summary)
}

fn loads_on_appear(trigger: Option<ViewLifetime>) -> bool {
    matches!(
        trigger,
        Some(ViewLifetime::DidLoad | ViewLifetime::WillAppear | ViewLifetime::DidAppear)
    )
}

async fn next_terminal<T>(
    states: &mut Subscription<LoadingState<T>>,
) -> anyhow::Result<LoadingState<T>> {
    loop {
        let state = tokio::time::timeout(STATE_TIMEOUT, states.recv())
            .await
            .context("timed out waiting for the catalogue")?
            .context("catalogue loader stopped")?;
        if state.is_terminal() {
            return Ok(state);
        }
    }
}
