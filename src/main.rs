use clap::Parser;
use company_matcher::adapters::dataset::DatasetLoader;
use company_matcher::utils::error::ErrorSeverity;
use company_matcher::utils::metrics::MatchMetrics;
use company_matcher::utils::monitor::MatchPhase;
use company_matcher::utils::{logger, validation::Validate};
use company_matcher::{
    CliConfig, LocalStorage, MatchCompaniesRequest, MatchEngine, MatcherConfig, MatcherError,
    ReportWriter,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting company-matcher");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(&cli).await {
        Ok(output_path) => {
            tracing::info!("Match report saved to: {}", output_path);
            println!("✅ Match report saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Match run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<String, MatcherError> {
    cli.validate()?;
    let config = cli.matcher_config()?;
    config.validate()?;

    let metrics = MatchMetrics::global()?;
    let engine = MatchEngine::new_with_monitoring(
        config.build_matcher()?,
        cli.monitor || config.monitoring_enabled(),
    )
    .with_metrics(metrics.clone());

    let request = load_request(cli, &config).await?;
    engine.monitor().log_stats(MatchPhase::Loading);

    let mut report = engine.run(&request).await?;
    if config.output.confirmed_only {
        report = report.confirmed_only();
    }

    let storage = LocalStorage::new(config.output.path.clone());
    let writer = ReportWriter::new(storage, config.output.filename.clone());
    let filename = writer.write(&report).await?;
    engine.monitor().log_stats(MatchPhase::Reporting);

    println!(
        "📊 {} comparisons, {} confirmed matches",
        report.comparisons_performed, report.confirmed_count
    );
    tracing::debug!("Metrics:\n{}", metrics.render()?);

    Ok(format!("{}/{}", config.output.path, filename))
}

async fn load_request(
    cli: &CliConfig,
    config: &MatcherConfig,
) -> Result<MatchCompaniesRequest, MatcherError> {
    let loader = DatasetLoader::new(LocalStorage::new(".".to_string()));

    let mut request = match (&cli.request, &cli.source, &cli.candidates) {
        (Some(path), _, _) => loader.load_request(path).await?,
        (None, Some(source), Some(candidates)) => MatchCompaniesRequest::new(
            loader.load_companies("source", source).await?,
            loader.load_companies("candidate", candidates).await?,
        ),
        _ => {
            return Err(MatcherError::MissingConfigError {
                field: "source/candidates".to_string(),
            })
        }
    };

    // Flag, then request body, then config.
    request.max_semantic_candidates = Some(
        cli.max_semantic_candidates
            .or(request.max_semantic_candidates)
            .unwrap_or_else(|| config.max_semantic_candidates()),
    );

    tracing::info!(
        "Loaded {} source and {} candidate companies",
        request.source_companies.len(),
        request.candidate_companies.len()
    );
    Ok(request)
}
