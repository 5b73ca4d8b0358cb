#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

use actix_web::{middleware::Logger, web, App, HttpServer};
use address_checker::{config::required_var, Config, Dispatcher, Limits, MemorySessionStore};
use anyhow::Error;
use env_logger::{Builder, Env};
use log::{error, info};
use std::{sync::Arc, time::Duration};
use structopt::StructOpt;

mod api;
mod types;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "Address checker params",
    about = "Multi-chain address and balance checker front-end."
)]
struct Opt {
    /// Set logging level
    #[structopt(short, long, default_value = "info")]
    log: String,

    /// Set IP address
    #[structopt(long, short, default_value = "127.0.0.1")]
    ip: String,

    /// Set port number
    #[structopt(long, short, default_value = "8080")]
    port: u16,

    /// Maximum number of backend lookups in flight
    #[structopt(long, short, default_value = "16")]
    workers: usize,

    /// Deadline of a single backend lookup in seconds
    #[structopt(long, short, default_value = "10")]
    timeout: u64,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let opt = Opt::from_args();

    Builder::from_env(Env::default().default_filter_or(&opt.log)).init();

    if let Err(e) = try_main(&opt).await {
        error!("{e}");
        std::process::exit(1);
    }

    info!("Exiting gracefully");
}

async fn try_main(opt: &Opt) -> Result<(), Error> {
    let token = required_var("TOKEN")?;
    let config = Config::from_env()?;
    let limits = Limits {
        timeout: Duration::from_secs(opt.timeout),
        workers: opt.workers,
    };

    info!("Backends: {:?}", config);
    info!(
        "Up to {} concurrent lookups, {:?} deadline each",
        limits.workers, limits.timeout
    );

    let state = web::Data::new(api::AppState {
        dispatcher: Arc::new(Dispatcher::from_config(&config, limits)?),
        sessions: Arc::new(MemorySessionStore::new()),
        token,
    });

    info!("Listening on http://{}:{}", opt.ip, opt.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::router::configure)
    })
    .bind((opt.ip.as_str(), opt.port))
    .map_err(Error::msg)?
    .run()
    .await
    .map_err(Error::msg)
}
