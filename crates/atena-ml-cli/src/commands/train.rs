use std::path::PathBuf;

use atena_ml_core::bootstrap::load_records;
use atena_ml_core::{Config, Predictor};
use clap::Args;
use serde_json::json;

#[derive(Args)]
pub struct TrainArgs {
    /// JSON file holding an array of session records
    file: PathBuf,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: TrainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let records = load_records(&args.file)?;

    let mut predictor = Predictor::with_params(config.model.clone());
    let summary = predictor.train(&records)?;

    let predictions = predictor.predict_records(&records)?;
    let mae = predictions
        .iter()
        .zip(&records)
        .map(|(p, r)| (p - r.effectiveness).abs())
        .sum::<f64>()
        / records.len().max(1) as f64;

    if args.json {
        let out = json!({
            "records": summary.records,
            "columns": summary.columns,
            "mean_absolute_error": mae,
            "trained_at": summary.trained_at,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Trained on {} records", summary.records);
        println!("Features:  {}", summary.columns.join(", "));
        println!("In-sample MAE: {mae:.4}");
    }
    Ok(())
}
