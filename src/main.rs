use clap::Parser;
use period_rating::{
    args::Args,
    model::{self, RatingOutcome},
    report::{self, ReportPaths},
    store::{self, MatchStore}
};
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(&args) {
        Ok((outcome, paths)) => info!(
            competitors = outcome.standings.total_averages.len(),
            periods = outcome.ratings.len(),
            "Run {} complete",
            paths.id
        ),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn run(args: &Args) -> Result<(RatingOutcome, ReportPaths), Box<dyn std::error::Error>> {
    let config = args.rating_config()?;
    info!(family = %config.family, seed = config.seed, "Configuration loaded");

    let store: MatchStore = store::read_csv(&args.file, args.pad_scores)?;
    let periods = store.resolved_periods()?;

    let outcome = model::rate(&periods, &config)?;
    let paths = report::write_reports(&outcome, &store, &args.destination)?;

    Ok((outcome, paths))
}
