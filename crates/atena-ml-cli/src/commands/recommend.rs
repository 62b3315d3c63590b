use atena_ml_core::bootstrap::pretrain;
use atena_ml_core::{
    Config, LoggingFeedbackSink, PolicyKind, Predictor, RecommendationService, UserContext,
};
use clap::Args;
use serde_json::json;

#[derive(Args)]
pub struct RecommendArgs {
    /// Hour of day (0-23)
    #[arg(long)]
    time_of_day: Option<u8>,
    /// Day of week (0-6)
    #[arg(long)]
    day_of_week: Option<u8>,
    /// Subject to study
    #[arg(long)]
    subject: Option<String>,
    /// Task difficulty (1-5, default 3)
    #[arg(long, allow_hyphen_values = true)]
    difficulty: Option<i32>,
    /// Energy level (1-5, default 3)
    #[arg(long, allow_hyphen_values = true)]
    energy_level: Option<i32>,
    /// Policy to apply (energy-difficulty, default-adjustment); defaults to
    /// the configured service variant's policy
    #[arg(long)]
    policy: Option<PolicyKind>,
    /// Skip startup training
    #[arg(long)]
    untrained: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: RecommendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let kind = args
        .policy
        .unwrap_or_else(|| config.server.variant.policy_kind());

    let service = RecommendationService::new(
        Predictor::with_params(config.model.clone()),
        kind.build(),
        Box::new(LoggingFeedbackSink::new()),
    );
    if !args.untrained {
        let bootstrap = config.bootstrap_path().ok();
        pretrain(&service, bootstrap.as_deref())?;
    }

    let context = UserContext {
        time_of_day: args.time_of_day,
        day_of_week: args.day_of_week,
        subject: args.subject,
        difficulty: args.difficulty,
        energy_level: args.energy_level,
    };
    let rec = service.recommend(&context);

    if args.json {
        let out = json!({
            "policy": service.policy_name(),
            "model_trained": service.is_trained(),
            "user_context": context,
            "recommendation": rec,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Pomodoro:   {} min", rec.pomodoro_minutes);
        println!("Break:      {} min", rec.break_minutes);
        println!(
            "Long break: {} min (every {} sessions)",
            rec.long_break_minutes, rec.sessions_until_long_break
        );
        println!("Confidence: {:.2}", rec.confidence);
        println!(
            "Policy:     {} ({})",
            service.policy_name(),
            if service.is_trained() {
                "model trained"
            } else {
                "model untrained"
            }
        );
    }
    Ok(())
}
