use std::process::ExitCode;

use common::utils::logging::{init_logging, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_tracing() {
    // .env must be loaded before RUST_LOG / LOG_FORMAT are read
    dotenv().ok();
    init_logging(LogFormat::from_env());
    info!(service = "geo_ref", event = "logger_init", "tracing subscriber initialized");
}

fn worker_threads() -> Option<usize> {
    match configs::AppConfig::load_or_env() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(_) => std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "geo_ref", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let threads = worker_threads();
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "geo_ref", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "geo_ref",
        event = "start",
        %service_id,
        pid,
        version,
        threads = threads.unwrap_or_default(),
        "city service starting"
    );

    // server::run owns graceful shutdown on Ctrl+C / SIGTERM
    rt.block_on(async move {
        match server::run().await {
            Ok(()) => {
                info!(service = "geo_ref", event = "stop", %service_id, pid, "city service stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "geo_ref", event = "run_failed", %service_id, error = %e, "server::run returned error");
                ExitCode::FAILURE
            }
        }
    })
}
