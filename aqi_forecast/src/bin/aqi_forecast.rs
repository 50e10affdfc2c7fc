use anyhow::Context;
use aqi_forecast::{
    ForecastConfig, LinearPredictor, PersistencePredictor, PointPredictor, RecursiveForecaster,
    SeriesLoader,
};
use aqi_math::AqiCategory;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments
#[derive(Debug)]
struct Args {
    history: PathBuf,
    model: Option<PathBuf>,
    config: Option<PathBuf>,
    horizon: Option<usize>,
    output: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let matches = clap::Command::new("aqi-forecast")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Recursive hourly AQI forecast")
            .arg(
                clap::Arg::new("history")
                    .long("history")
                    .help("Historical series (.csv or .parquet)")
                    .required(true)
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("model")
                    .short('m')
                    .long("model")
                    .help("Linear model coefficients (JSON); persistence baseline when omitted")
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("Forecast configuration (JSON)")
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("horizon")
                    .long("horizon")
                    .help("Hours to forecast, overrides the configuration")
                    .value_parser(clap::value_parser!(usize))
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("output")
                    .short('o')
                    .long("output")
                    .help("Output file (.csv or .parquet); CSV on stdout when omitted")
                    .num_args(1),
            )
            .get_matches();

        let path = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);

        Args {
            history: path("history").unwrap_or_default(),
            model: path("model"),
            config: path("config"),
            horizon: matches.get_one::<usize>("horizon").copied(),
            output: path("output"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqi_forecast=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(horizon) = args.horizon {
        config.horizon_hours = horizon;
    }
    config.validate().context("invalid forecast configuration")?;

    let spec = config.feature_spec()?;
    let history = SeriesLoader::from_path(&args.history, &config.series)
        .with_context(|| format!("loading history {}", args.history.display()))?;

    let predictor: Box<dyn PointPredictor> = match &args.model {
        Some(path) => Box::new(
            LinearPredictor::from_json_file(path)
                .with_context(|| format!("loading model {}", path.display()))?,
        ),
        None => Box::new(PersistencePredictor::new(&spec)),
    };
    tracing::info!(predictor = predictor.name(), "predictor ready");

    let forecaster = RecursiveForecaster::new(spec);
    let forecast = forecaster
        .forecast(&history, &predictor, config.horizon_hours)
        .context("forecast failed")?;

    match &args.output {
        Some(path) if path.extension().map_or(false, |e| e.eq_ignore_ascii_case("parquet")) => {
            forecast.write_parquet(path)?
        }
        Some(path) => forecast.write_csv_path(path)?,
        None => forecast.write_csv(std::io::stdout().lock())?,
    }

    if let Some(mean) = forecast.mean_value() {
        tracing::info!(
            mean,
            category = %AqiCategory::from_aqi(mean),
            "average predicted AQI"
        );
    }

    Ok(())
}
