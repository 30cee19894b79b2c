use std::{sync::mpsc, thread};

use clap::Parser;
use egui::Vec2;
use poptrend::population::client::IpcApiClient;
use poptrend::population::fetcher::{DEBOUNCE_WINDOW, run_fetch_worker};
use poptrend::population::{FetchOutcome, FetchRequest};
use poptrend::ui::trend::{TrendApp, config::AppConfig};

const API_KEY_ENV_VAR: &str = "IPC_API_KEY";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// ISO country code to chart, e.g. AF
    #[arg(short, long)]
    country: Option<String>,

    /// First year of the initial range
    #[arg(short, long)]
    start: Option<u16>,

    /// Last year of the initial range
    #[arg(short, long)]
    end: Option<u16>,

    /// IPC API key, overrides IPC_API_KEY and the config file
    #[arg(short, long)]
    key: Option<String>,
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let args = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let mut app_config = AppConfig::from_local_file().unwrap_or_default();
    if let Some(country) = args.country {
        app_config.set_country(country);
    }
    if let Some(start) = args.start {
        app_config.start_year = start;
    }
    if let Some(end) = args.end {
        app_config.end_year = end;
    }
    app_config.clamp_range();

    let api_key = app_config
        .resolve_api_key(args.key, std::env::var(API_KEY_ENV_VAR).ok())
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        });

    let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
    let (outcome_tx, outcome_rx) = mpsc::channel::<FetchOutcome>();

    let client = IpcApiClient::new(app_config.country_code.clone(), api_key);
    thread::spawn(move || run_fetch_worker(client, request_rx, outcome_tx, DEBOUNCE_WINDOW));

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options.viewport.with_inner_size(Vec2::new(900., 600.));

    eframe::run_native(
        "Poptrend",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(TrendApp::new(
                app_config,
                request_tx,
                outcome_rx,
                cc,
            )))
        }),
    )
    .expect("could not start app");
}
