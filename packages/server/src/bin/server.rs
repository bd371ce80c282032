//! MetaStream Live server.
//!
//! Guards the single live stream session and fans chat and status events out
//! to every connected websocket client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin metastream-server
//! cargo run --bin metastream-server -- --host 0.0.0.0 --port 3000 --require-media false
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use metastream_server::{
    config::{
        DEFAULT_EXTERNAL_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_LOG_FILE, DEFAULT_MEDIA_SERVER_URL,
        DEFAULT_OUTBOUND_BUFFER, DEFAULT_PORT, MIN_OUTBOUND_BUFFER, ServerConfig,
    },
    infrastructure::media::HttpMediaHealthClient,
    ui::Server,
};
use metastream_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "metastream-server")]
#[command(about = "Live stream session and chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "METASTREAM_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "METASTREAM_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Base URL of the media server
    #[arg(long, env = "METASTREAM_MEDIA_SERVER_URL", default_value = DEFAULT_MEDIA_SERVER_URL)]
    media_server_url: String,

    /// Refuse to start a stream while the media server is unhealthy
    #[arg(
        long,
        env = "METASTREAM_REQUIRE_MEDIA",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    require_media: bool,

    /// File that chat lines and session summaries are appended to
    #[arg(long, env = "METASTREAM_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Outbound queue capacity per websocket connection
    #[arg(
        long,
        env = "METASTREAM_OUTBOUND_BUFFER",
        default_value_t = DEFAULT_OUTBOUND_BUFFER,
        value_parser = parse_outbound_buffer
    )]
    outbound_buffer: usize,

    /// Timeout for media, log and notification calls, in milliseconds
    #[arg(long, env = "METASTREAM_EXTERNAL_TIMEOUT_MS", default_value_t = DEFAULT_EXTERNAL_TIMEOUT_MS)]
    external_timeout_ms: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "METASTREAM_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn parse_outbound_buffer(value: &str) -> Result<usize, String> {
    let capacity: usize = value
        .parse()
        .map_err(|e| format!("`{value}` is not a queue capacity: {e}"))?;
    if capacity < MIN_OUTBOUND_BUFFER {
        return Err(format!("must be at least {MIN_OUTBOUND_BUFFER}"));
    }
    Ok(capacity)
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            media_server_url: args.media_server_url,
            require_media: args.require_media,
            log_file: args.log_file,
            outbound_buffer: args.outbound_buffer,
            external_timeout: Duration::from_millis(args.external_timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    tracing::info!(
        "Media server: {} (required: {}), log file: {}",
        config.media_server_url,
        config.require_media,
        config.log_file.display()
    );

    // Initialize dependencies in order:
    // 1. External collaborators
    // 2. Registry, hub and usecases (AppState)
    // 3. Server
    let media = Arc::new(HttpMediaHealthClient::new(
        &config.media_server_url,
        config.external_timeout,
    ));
    let state = config.build_app_state(media, Arc::new(SystemClock));

    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_buffer_below_minimum_is_rejected() {
        // テスト項目: 送信キューの容量が 2 未満なら起動時に拒否される
        assert!(parse_outbound_buffer("0").is_err());
        assert!(parse_outbound_buffer("1").is_err());
        assert!(parse_outbound_buffer("many").is_err());
        assert_eq!(parse_outbound_buffer("2"), Ok(2));
        assert!(
            Args::try_parse_from(["metastream-server", "--outbound-buffer", "1"]).is_err()
        );
    }
}
