mod ui;

use std::{path::PathBuf, sync::Arc};

use anemoi::{AnemoiError, AppConfig, FetchContext, ReqwestClient, ViewKind, headless};
use clap::{Parser, Subcommand};
use egui::Vec2;
use log::{error, info, warn};
use ui::AnemoiApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Statistics backend URL, overrides the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Seconds to wait for a backend response
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Opens the desktop client (default)
    Gui {
        #[arg(short, long)]
        view: Option<ViewKind>,
    },
    /// Runs one query and prints the result
    Query {
        view: ViewKind,

        /// Filter as name=value, e.g. -f year=2021 -f driverId=hamilton
        #[arg(short = 'f', long = "filter", value_parser = headless::parse_filter)]
        filters: Vec<(String, String)>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Where to write the plot returned by image views
        #[arg(long)]
        image_out: Option<PathBuf>,
    },
}

fn gui(config: AppConfig, context: FetchContext, view: Option<ViewKind>) -> Result<(), AnemoiError> {
    let initial_view = view.unwrap_or(config.default_view);
    info!("Starting desktop client on view {}", initial_view);

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("Anemoi")
        .with_inner_size(Vec2::new(config.window_size.width, config.window_size.height))
        .with_min_inner_size(Vec2::new(420., 320.));

    eframe::run_native(
        "Anemoi",
        native_options,
        Box::new(move |cc| Ok(Box::new(AnemoiApp::new(config, context, initial_view, cc)))),
    )
    .map_err(|e| AnemoiError::Gui {
        message: e.to_string(),
    })
}

fn run(cli: Args) -> Result<(), AnemoiError> {
    let config = AppConfig::from_local_file()
        .unwrap_or_else(|e| {
            warn!("Ignoring unreadable config file: {}", e);
            None
        })
        .unwrap_or_default();

    // command line overrides apply to this run only and are not saved
    let mut effective = config.clone();
    if let Some(base_url) = cli.base_url {
        effective.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        effective.request_timeout_s = timeout;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("anemoi-fetch")
        .enable_all()
        .build()
        .map_err(|e| AnemoiError::Runtime { source: e })?;
    let client = ReqwestClient::new(&effective.base_url, effective.request_timeout())?;
    info!("Using statistics backend at {}", client.base_url());
    let context = FetchContext::new(
        Arc::new(client),
        runtime.handle().clone(),
        effective.request_timeout(),
    );

    match cli.command.unwrap_or(Commands::Gui { view: None }) {
        Commands::Gui { view } => gui(config, context, view),
        Commands::Query {
            view,
            filters,
            page,
            image_out,
        } => {
            let report =
                headless::run_query(&context, view, &filters, page, image_out.as_deref())?;
            print!("{}", report);
            Ok(())
        }
    }
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    }) {
        error!("Could not set Ctrl-C handler: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
