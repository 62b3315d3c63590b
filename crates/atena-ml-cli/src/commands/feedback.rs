use atena_ml_core::validation::{parse_body, parse_session_record};
use atena_ml_core::{Config, FeedbackSink, JsonlFeedbackSink};
use clap::Args;

#[derive(Args)]
pub struct FeedbackArgs {
    /// Session record as inline JSON, or @path to read it from a file
    payload: String,
}

pub fn run(args: FeedbackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = match args.payload.strip_prefix('@') {
        Some(path) => std::fs::read(path)?,
        None => args.payload.into_bytes(),
    };
    let value = parse_body(&bytes)?;
    let session = parse_session_record(&value)?;

    let config = Config::load()?;
    let sink = JsonlFeedbackSink::new(config.feedback_log_path()?);
    sink.record(&session)?;

    println!("Feedback recorded ({} total)", sink.recorded_count());
    Ok(())
}
