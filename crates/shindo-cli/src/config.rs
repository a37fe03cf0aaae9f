//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "shindo",
    version,
    about = "JMA earthquake feed ingestion and translation service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API and refresh the snapshot on a timer.
    Serve(ServeArgs),
    /// Run one ingestion pass and write the snapshot cache, then exit.
    Refresh(StoreArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory backing the key-value store (snapshot, dictionaries, products).
    #[arg(long, env = "SHINDO_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Base URL of the JMA quake feed (the directory holding list.json).
    #[arg(
        long,
        env = "SHINDO_FEED_URL",
        default_value = shindo_feed::http::DEFAULT_BASE_URL
    )]
    pub feed_url: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "SHINDO_BIND", default_value = "127.0.0.1:8787")]
    pub bind: String,

    /// Seconds between scheduled refreshes (0 disables the schedule).
    #[arg(long, env = "SHINDO_REFRESH_SECS", default_value_t = 60)]
    pub refresh_secs: u64,

    /// Rakuten Web Service application ID.
    #[arg(long, env = "RAKUTEN_APP_ID")]
    pub rakuten_app_id: Option<String>,

    /// Yahoo! Shopping application ID.
    #[arg(long, env = "YAHOO_APP_ID")]
    pub yahoo_app_id: Option<String>,

    /// Gemini API key. Product and ingredient endpoints answer 503 without it.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for product summaries and ingredient extraction.
    #[arg(
        long,
        env = "GEMINI_MODEL",
        default_value = shindo_ai::gemini::DEFAULT_MODEL
    )]
    pub gemini_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// Declared defaults, read from the command definition so the caller's
    /// environment cannot leak in.
    fn serve_default(id: &str) -> String {
        let cli = Cli::command();
        let serve = cli.find_subcommand("serve").unwrap();
        let arg = serve
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn serve_defaults() {
        assert_eq!(serve_default("refresh_secs"), "60");
        assert_eq!(serve_default("data_dir"), "data");
        assert_eq!(serve_default("bind"), "127.0.0.1:8787");
        assert_eq!(serve_default("gemini_model"), "gemini-2.0-flash-exp");
        assert!(serve_default("feed_url").starts_with("https://www.jma.go.jp/"));
    }

    #[test]
    fn serve_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "shindo",
            "serve",
            "--refresh-secs",
            "0",
            "--gemini-model",
            "gemini-1.5-flash",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.refresh_secs, 0);
        assert_eq!(args.gemini_model, "gemini-1.5-flash");
    }

    #[test]
    fn refresh_takes_store_flags() {
        let cli = Cli::try_parse_from([
            "shindo",
            "refresh",
            "--data-dir",
            "/var/lib/shindo",
            "--feed-url",
            "http://localhost:9000/data",
        ])
        .unwrap();
        let Command::Refresh(args) = cli.command else {
            panic!("expected refresh");
        };
        assert_eq!(args.data_dir, PathBuf::from("/var/lib/shindo"));
        assert_eq!(args.feed_url, "http://localhost:9000/data");
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }
}
