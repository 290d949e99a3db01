//! Instafilter command-line application
//!
//! Loads a photo, applies one filter with the configured slider values and
//! saves the result.
//!
//! # Architecture
//! - `cli`: command-line arguments
//! - `config`: global TOML configuration
//! - `logic`: edit and share flows on top of `filter-pipeline`

#[macro_use]
extern crate derivative;

pub mod cli;
pub mod config;
pub mod logic;

use anyhow::{Context, Result};
use cli::Args;
use log::info;

/// Initializes the logger.
///
/// Each line carries a local timestamp, log level, file name and line number.
/// Defaults to `info`; `RUST_LOG` overrides it.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

/// Runs one edit: load the input, filter it and export the result.
pub async fn desktop_main(args: Args) -> Result<()> {
    if args.list_filters {
        print!("{}", logic::filter_listing());
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .context("no input image given (see --help)")?;

    config::init(args.config.clone())?;
    let conf = config::all();
    if conf.is_first_run {
        info!("wrote default config to {}", conf.config_path.display());
    }

    let settings = logic::EditSettings::resolve(&conf, &args)?;
    let pipeline = logic::edit(input, &settings).await?;
    let rendered = pipeline
        .rendered_image()
        .context("no filtered image to export")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| logic::default_output_path(input, settings.kind, &conf.export));
    logic::export(rendered, &output)?;

    info!("saved {}", output.display());
    println!("{}", output.display());
    Ok(())
}
