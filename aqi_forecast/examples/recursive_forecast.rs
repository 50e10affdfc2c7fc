use aqi_forecast::features::{FeatureSpec, FeatureVector, TimeFeature};
use aqi_forecast::metrics::evaluate_forecast;
use aqi_forecast::models::{FnPredictor, LinearPredictor, PersistencePredictor, PointPredictor};
use aqi_forecast::{HistoricalSeries, RecursiveForecaster};
use aqi_math::AqiCategory;
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("AQI Forecast: Recursive Forecast Example");
    println!("========================================\n");

    // Four days of hourly readings with a daily cycle
    let values = create_sample_values(96);
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let full = HistoricalSeries::hourly(start, values.clone())?;
    let history = HistoricalSeries::hourly(start, values[..72].to_vec())?;
    println!(
        "History: {} hours ending {}\n",
        history.len(),
        history.last_timestamp()
    );

    let spec = FeatureSpec::air_quality();
    println!("Features: {}\n", spec.feature_names().join(", "));

    let linear = LinearPredictor::new(
        4.0,
        vec![
            ("aqi_lag_1".to_string(), 0.55),
            ("aqi_lag_24".to_string(), 0.35),
            ("aqi_lag_48".to_string(), 0.05),
            ("hour".to_string(), 0.1),
            ("day".to_string(), 0.0),
            ("month".to_string(), 0.0),
            ("weekday".to_string(), 0.0),
        ],
    )?
    .with_name("Linear");
    let persistence = PersistencePredictor::new(&spec);
    let damped = FnPredictor::new(|v: &FeatureVector| {
        let lag1 = v.get("aqi_lag_1").unwrap_or(0.0);
        let lag24 = v.get("aqi_lag_24").unwrap_or(lag1);
        Ok(0.5 * lag1 + 0.5 * lag24)
    })
    .with_name("Damped blend");

    let forecaster = RecursiveForecaster::new(spec);
    let predictors: Vec<&dyn PointPredictor> = vec![&linear, &persistence, &damped];

    for predictor in predictors {
        let forecast = forecaster.forecast(&history, predictor, 24)?;
        let accuracy = evaluate_forecast(&forecast, &full)?;
        let mean = forecast.mean_value().unwrap_or(0.0);

        println!("{}:", predictor.name());
        println!(
            "  mean {:.1} ({}), first {:.1}, last {:.1}",
            mean,
            AqiCategory::from_aqi(mean),
            forecast.values()[0],
            forecast.values()[forecast.len() - 1]
        );
        println!("{}\n", accuracy);
    }

    // Step through a short horizon lazily
    let short = RecursiveForecaster::new(FeatureSpec::new(&[1, 2], &[TimeFeature::Hour])?);
    let model = FnPredictor::new(|v: &FeatureVector| {
        Ok(v.get("index_lag_1").unwrap_or(0.0) * 0.9 + v.get("index_lag_2").unwrap_or(0.0) * 0.1)
    });
    for point in short.iter(&history, &model, 3)? {
        let point = point?;
        println!("{} -> {:.2}", point.timestamp, point.predicted_value);
    }

    Ok(())
}

fn create_sample_values(hours: usize) -> Vec<f64> {
    (0..hours)
        .map(|i| {
            let hour = (i % 24) as f64;
            let daily = 15.0 * (hour / 24.0 * std::f64::consts::TAU).sin();
            45.0 + daily + (i as f64) * 0.05
        })
        .collect()
}
