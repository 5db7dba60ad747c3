mod admin;
mod config;
mod view;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use floor_core::{
    context::ScopedContext,
    lifecycle::Lifecycle,
    scheduler::TaskEntry,
    wiring::{FloorDeps, build_scheduler},
};
use floor_http::HttpGateway;
use floor_model::{SystemClock, init_local_offset};
use floor_observe::{TZ_SYNC_INTERVAL, TimezoneSyncTask, init_logger};
use floor_prometheus::PrometheusMetrics;

use crate::{
    admin::AdminState,
    config::DashboardConfig,
    view::{LoggingHooks, RosterBoard},
};

fn main() -> anyhow::Result<()> {
    // Offset detection must happen before any runtime thread exists.
    init_local_offset();

    let config = DashboardConfig::load()?;
    init_logger(&config.logger)?;
    info!(
        base_url = %config.gateway.base_url,
        station = ?config.context.station_id,
        roster = config.roster.len(),
        "configuration loaded"
    );

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: DashboardConfig) -> anyhow::Result<()> {
    let metrics = PrometheusMetrics::new()?;
    let gateway = Arc::new(HttpGateway::new(config.gateway.clone())?);
    let context = Arc::new(ScopedContext::new().with_override(config.context.station_id));

    let mut deps = FloorDeps::new(gateway, context.clone(), Arc::new(SystemClock))
        .with_hooks(Arc::new(LoggingHooks))
        .with_metrics(Arc::new(metrics.clone()))
        .with_task(TaskEntry::new(Arc::new(TimezoneSyncTask), TZ_SYNC_INTERVAL));
    if !config.roster.is_empty() {
        deps = deps.with_board(Arc::new(RosterBoard::new(config.roster.clone())));
    }
    let scheduler = build_scheduler(&config.scheduler, deps)?;
    let lifecycle = Lifecycle::new(scheduler, config.scheduler.warm_up());

    if let Some(listen) = config.admin.listen.as_deref() {
        let listener = tokio::net::TcpListener::bind(listen)
            .await
            .with_context(|| format!("binding admin listener on {listen}"))?;
        info!(addr = %listener.local_addr()?, "admin endpoints listening");

        let app = admin::router(Arc::new(AdminState {
            lifecycle: lifecycle.clone(),
            context,
            metrics,
        }));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "admin server stopped");
            }
        });
    }

    lifecycle.on_load().await;
    info!("floor scheduler running");

    wait_for_shutdown(&lifecycle).await?;
    lifecycle.on_unload();
    Ok(())
}

/// Waits for ctrl-c. On unix, SIGUSR1 hides the view and SIGUSR2 shows it.
#[cfg(unix)]
async fn wait_for_shutdown(lifecycle: &Lifecycle) -> anyhow::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hide = signal(SignalKind::user_defined1())?;
    let mut show = signal(SignalKind::user_defined2())?;
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                info!("shutdown requested");
                return Ok(());
            }
            _ = hide.recv() => lifecycle.on_visibility_change(false),
            _ = show.recv() => lifecycle.on_visibility_change(true),
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_lifecycle: &Lifecycle) -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    Ok(())
}
