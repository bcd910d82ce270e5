/// Logging helpers
///
/// Subscriber setup plus a few formatting helpers for log output
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the level follows `verbose`.
/// Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "bangla_pdf_client=debug"
    } else {
        "bangla_pdf_client=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log startup information
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 Session started - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 Backend: {}", config.api_base_url);
    info!(
        "📐 Render scale: {} | columns: {}",
        config.render_scale, config.default_columns
    );
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log display
///
/// # Arguments
/// - `text`: original text
/// - `max_len`: maximum number of characters kept
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        // Bangla glyphs are multi-byte; truncation must not split them
        assert_eq!(truncate_text("আমার সোনার বাংলা", 4), "আমার...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
