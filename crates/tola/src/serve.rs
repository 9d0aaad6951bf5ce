// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tola serve` command implementation.
//!
//! Wires the configured pieces together: SQLite storage, the SMTP (or
//! logging) mail transport, the live hub, the intake service, and the
//! axum gateway. Runs until the gateway stops or a shutdown signal
//! arrives, then checkpoints the database.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use tola_config::TolaConfig;
use tola_core::{LiveChannel, MailTransport, TolaError};
use tola_gateway::auth::AuthConfig;
use tola_gateway::live::LiveHub;
use tola_gateway::{server, GatewayState};
use tola_intake::EnquiryService;
use tola_notify::{LogMailer, SmtpMailer};
use tola_storage::Database;

/// Runs the `tola serve` command.
pub async fn run_serve(config: TolaConfig) -> Result<(), TolaError> {
    init_tracing(&config.service.log_level);

    info!(name = %config.service.name, "starting tola serve");

    let db = Database::open(&config.storage).await?;

    let mailer: Arc<dyn MailTransport> = if config.smtp.enabled {
        Arc::new(SmtpMailer::new(&config.smtp)?)
    } else {
        info!("smtp disabled, staff digests will be logged only");
        Arc::new(LogMailer)
    };

    let hub = Arc::new(LiveHub::new());
    let service = EnquiryService::new(
        db.clone(),
        mailer,
        Arc::clone(&hub) as Arc<dyn LiveChannel>,
    );

    if config.server.bearer_token.is_none() {
        warn!("no server.bearer_token configured; /v1 routes reject all requests");
    }

    let state = GatewayState {
        service,
        hub,
        auth: AuthConfig {
            bearer_token: config.server.bearer_token.clone(),
        },
        start_time: Instant::now(),
    };

    tokio::select! {
        result = server::start_server(&config.server, state) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    db.close().await?;
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// whole tree.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
