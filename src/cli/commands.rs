use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use url::Url;

use crate::app::{AppContext, Result, TrawlError};
use crate::config::Config;
use crate::domain::CollectionReport;
use crate::engine::{Collector, StopSignal};
use crate::session::{ChromeSessionBackend, PersistentSession, SessionProvider};
use crate::sink::open_sink;
use crate::surface::{BrowserSession, ChromeSurface};

use super::CollectArgs;

/// Log in (if needed), collect from the page and write the items out.
///
/// The browser is closed on every path, including failures.
pub async fn collect(ctx: &AppContext, args: &CollectArgs) -> Result<CollectionReport> {
    let mut config = ctx.config.clone();
    args.apply(&mut config);
    config.validate()?;

    let url = match args.url {
        Some(ref url) => url.clone(),
        None => prompt("Page URL: ").await?,
    };
    let url = parse_source(&url)?;

    let browser = BrowserSession::launch(&config.surface, &ctx.profile_dir()).await?;
    let mut session = PersistentSession::new(
        ChromeSessionBackend::new(
            browser.page().clone(),
            config.session.clone(),
            config.surface.headless,
        ),
        ctx.cookie_jar(),
        config.session.clear_cookies_on_exit,
    );

    let result = run_collection(&config, &mut session, &browser, url.as_str(), &args.output).await;

    session.release();
    browser.close().await;

    let report = result?;
    println!(
        "{}: {} items written to {}",
        report.termination,
        report.emitted,
        args.output.display()
    );
    Ok(report)
}

async fn run_collection(
    config: &Config,
    session: &mut PersistentSession<ChromeSessionBackend>,
    browser: &BrowserSession,
    source: &str,
    output: &Path,
) -> Result<CollectionReport> {
    session.ensure_authenticated().await?;

    let mut surface = ChromeSurface::new(browser.page().clone(), config.surface.clone());
    let mut sink = open_sink(output, source);

    let stop = StopSignal::new();
    listen_for_shutdown(stop.clone());

    let collector = Collector::new(config.collector.clone()).with_stop_signal(stop);
    collector.collect(&mut surface, &mut sink, source).await
}

/// Establish a session and keep its cookies for later runs.
pub async fn login(ctx: &AppContext, headed: bool) -> Result<()> {
    let mut config = ctx.config.clone();
    if headed {
        config.surface.headless = false;
    }

    let browser = BrowserSession::launch(&config.surface, &ctx.profile_dir()).await?;
    let mut session = PersistentSession::new(
        ChromeSessionBackend::new(
            browser.page().clone(),
            config.session.clone(),
            config.surface.headless,
        ),
        ctx.cookie_jar(),
        false,
    );

    let result = session.ensure_authenticated().await;
    browser.close().await;
    result?;

    println!("Logged in; session saved to {}", ctx.cookie_file().display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let path = Config::default_config_path()?;
    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("(not created yet; defaults are in effect)");
    }
    Ok(())
}

fn parse_source(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TrawlError::Config(format!(
            "Unsupported URL scheme '{}': {}",
            other, url
        ))),
    }
}

async fn prompt(message: &str) -> Result<String> {
    println!("{}", message);
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

/// Raise `stop` on SIGINT or SIGTERM.
fn listen_for_shutdown(stop: StopSignal) {
    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    (Err(e), _) | (_, Err(e)) => {
                        warn!("Failed to install signal handlers: {}", e);
                        return;
                    }
                };

            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
            eprintln!("Stopping after the current iteration...");
            stop.raise();
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Stopping after the current iteration...");
                stop.raise();
            }
        });
    }
}
