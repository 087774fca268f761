use anyhow::Result;
use clap::{App as ClapApp, Arg};
use log::LevelFilter;
use spotify_albums_tui::{app::App, config::Config, logger::CustomLogger};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Show debug (-v) or trace (-vv) entries in the log panel"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let logger = CustomLogger::install(level)?;

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    App::start(config, logger).await?;

    Ok(())
}
