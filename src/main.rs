use std::net::SocketAddr;
use std::sync::Arc;

use chat_onboard::channels::CliChannel;
use chat_onboard::config::OnboardConfig;
use chat_onboard::error::{ChannelError, ConfigError, Result};
use chat_onboard::onboarding::{
    FieldSchema, OnboardingFlow, OnboardingManager, OnboardingRouteState, onboarding_routes,
};
use chat_onboard::store::{MemoryProfileStore, ProfileStore};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = OnboardConfig::from_env()?;

    if !config.cli_enabled && config.http_port.is_none() {
        return Err(ConfigError::MissingRequired {
            key: "ONBOARD_HTTP_PORT".to_string(),
            hint: "Set a port or leave ONBOARD_CLI enabled.".to_string(),
        }
        .into());
    }

    eprintln!("📝 Chat Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Qualifications: {}", config.qualifications.join(", "));
    eprintln!("   Type '{}' to start over.", config.reset_sentinel);

    // ── Flow ─────────────────────────────────────────────────────────────
    let schema = FieldSchema::standard(&config.qualifications);
    let flow = OnboardingFlow::new(schema).with_reset_sentinel(config.reset_sentinel.clone());
    let store = Arc::new(MemoryProfileStore::new());
    let manager = OnboardingManager::new(flow, Arc::clone(&store) as Arc<dyn ProfileStore>);

    // ── REST/WS server ───────────────────────────────────────────────────
    let server = match config.http_port {
        Some(port) => {
            let addr = SocketAddr::new(config.bind_addr, port);
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                ChannelError::StartupFailed {
                    name: "http".to_string(),
                    reason: format!("cannot bind {addr}: {e}"),
                }
            })?;
            eprintln!("   Onboarding API: http://{}/api/onboarding", addr);
            eprintln!("   Onboarding WS: ws://{}/ws/onboarding", addr);

            let app = onboarding_routes(OnboardingRouteState {
                manager: Arc::clone(&manager),
            });
            Some(tokio::spawn(async move {
                tracing::info!(%addr, "Onboarding server started");
                axum::serve(listener, app).await
            }))
        }
        None => {
            eprintln!("   HTTP: disabled (set ONBOARD_HTTP_PORT to enable)");
            None
        }
    };

    // ── Terminal ─────────────────────────────────────────────────────────
    if config.cli_enabled {
        eprintln!("   Type your answers and press Enter. /quit to exit.\n");
        let cli = CliChannel::new(Arc::clone(&manager), config.reset_sentinel.clone());
        cli.run().await?;

        if let Some(profile) = manager.latest_saved().await? {
            tracing::info!(
                profile_id = %profile.id,
                saved = store.count().await,
                "Last saved profile"
            );
        }
    } else if let Some(server) = server {
        let stopped = |reason: String| ChannelError::StartupFailed {
            name: "http".to_string(),
            reason,
        };
        server
            .await
            .map_err(|e| stopped(e.to_string()))?
            .map_err(ChannelError::Io)?;
    }

    Ok(())
}
