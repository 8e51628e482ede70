mod config;
mod dictionary;
mod fetch;
mod images;
mod query;
mod server;
mod tokenize;
mod translate;

pub const USER_AGENT: &str = concat!("wordscope/", env!("CARGO_PKG_VERSION"));

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::info;

use config::Settings;
use dictionary::ScrapeDictionary;
use images::BingImages;
use query::Providers;
use server::AppState;
use translate::GoogleTranslator;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wordscope=info".parse()?),
        )
        .init();

    let settings = Settings::parse();

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;

    let providers = Providers {
        translator: Arc::new(GoogleTranslator::new(http.clone(), settings.translate_key())),
        images: Arc::new(BingImages::new(http.clone(), settings.bing_key())),
        dictionary: Arc::new(ScrapeDictionary::new(
            http,
            settings.instructions_dir.clone(),
        )),
    };

    info!(bind = %settings.bind, "starting wordscope");
    server::run_server(
        settings.bind,
        AppState {
            providers,
            debug: settings.debug,
        },
    )
    .await
    .inspect_err(|e| tracing::error!("server failed: {e}"))?;

    info!("server stopped");
    Ok(())
}
