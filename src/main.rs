use anyhow::{Context, Result};

use baidu_ai_gateway::config::{self, Capability, LogFormat};
use baidu_ai_gateway::routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = config::Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(false)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .init(),
    }

    tracing::info!("🚀 Baidu AI Gateway starting...");
    tracing::info!(
        "Server configured: {}:{}",
        config.server_host,
        config.server_port
    );
    tracing::debug!("Upstream base URL: {}", config.base_url);

    if config.has_api_key() {
        tracing::info!("✅ Baidu AI API key configured");
    } else {
        tracing::warn!(
            "Baidu AI API key is not configured, set BAIDU_API_KEY. \
             Capability requests will fail until it is provided"
        );
    }

    // Shared HTTP client for token and capability calls
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let state = routes::AppState::new(config.clone(), client);

    // Build the application with routes and middleware
    let app = routes::build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    print_startup_banner(&config);

    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server shutdown complete");

    Ok(())
}

/// Print startup banner
fn print_startup_banner(config: &config::Config) {
    let banner = r#"
╔═══════════════════════════════════════════════════════════╗
║                                                           ║
║             🚀 Baidu AI Gateway - Rust Edition            ║
║                                                           ║
║   OCR, TTS, NLP & image classification behind one API    ║
║                                                           ║
╚═══════════════════════════════════════════════════════════╝
"#;

    let services: Vec<&str> = Capability::ALL.iter().map(|c| c.name()).collect();

    println!("{}", banner);
    println!("  Version:     {}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Server:      http://{}:{}",
        config.server_host, config.server_port
    );
    println!("  Upstream:    {}", config.base_url);
    println!("  Environment: {}", config.environment);
    println!("  Services:    {}", services.join(", "));
    println!(
        "  API Key:     {}",
        if config.has_api_key() {
            "configured"
        } else {
            "missing (set BAIDU_API_KEY)"
        }
    );
    println!();
    println!("  Endpoints:");
    println!("    GET  /health                              health check");
    println!("    GET  /api/health                          health check");
    println!("    GET  /api/info                            gateway info");
    println!("    POST /api/ocr/general_basic               general text recognition");
    println!("    POST /api/tts                             speech synthesis");
    println!("    POST /api/nlp/sentiment_classify          sentiment analysis");
    println!("    POST /api/image-classify/advanced_general object recognition");
    println!();
}

/// Handle graceful shutdown signal
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
