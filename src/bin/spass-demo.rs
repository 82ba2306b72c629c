use std::{sync::Arc, thread, time::Duration};

use anyhow::{Result, anyhow};
use clap::Parser as ClapParser;
use rouille::Server;
use spass::{config::SpassConfig,
            demo::{Dataset, Demo, server_handler}};
use tracing_subscriber::EnvFilter;

const SESSION_MAX_AGE: Duration = Duration::from_secs(3600);

#[derive(clap::Parser, Debug)]
/// Serve a demo table editor. Settings not given here are taken from
/// the SPASS_* env vars.
struct Args {
    /// ip:port to listen on
    #[clap(long)]
    listen: Option<String>,

    /// Directory to serve /static/ from (needs spass_forms.js)
    #[clap(long)]
    static_dir: Option<String>,

    /// JSON file with an array of objects to edit instead of the
    /// built-in records
    #[clap(long)]
    data: Option<String>,

    /// The column identifying the rows of --data
    #[clap(long, default_value = "id")]
    index: String,

    /// Render pages with a well-formed xml preamble
    #[clap(long)]
    fixed_preamble: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                         .unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = SpassConfig::from_env()?;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_dir = static_dir;
    }
    if args.fixed_preamble {
        config.legacy_preamble = false;
    }

    let dataset = match &args.data {
        Some(path) => {
            let s = std::fs::read_to_string(path).map_err(
                |e| anyhow!("reading {path:?}: {e}"))?;
            Dataset::from_json_str(&s, &args.index).map_err(
                |e| anyhow!("loading {path:?}: {e:#}"))?
        }
        None => Dataset::builtin(),
    };

    let listen = config.listen.clone();
    let demo = Arc::new(Demo::new(config, dataset));

    thread::Builder::new().name("spass_session_purge".into()).spawn({
        let demo = demo.clone();
        move || loop {
            thread::sleep(SESSION_MAX_AGE / 6);
            if let Err(e) = demo.sessions().purge_older_than(SESSION_MAX_AGE) {
                tracing::error!("purging sessions: {e:#}");
            }
        }
    })?;

    tracing::info!("listening on http://{listen}/");
    Server::new(listen.clone(), server_handler(demo))
        .map_err(|e| anyhow!("can't listen on {listen:?}: {e}"))?
        .run();
    Ok(())
}
