use crate::cli::{DiscoverArgs, QualifyArgs};
use crate::report::{write_results, write_tenders};
use chrono::Utc;
use std::path::Path;
use tender_sift::config::AppConfig;
use tender_sift::error::AppError;
use tender_sift::telemetry;
use tender_sift::workflows::discovery::{ContractsFinderClient, NoticeDiscovery};
use tender_sift::workflows::qualification::{
    CapabilityProfile, ProfileGuard, ProfileSubmission, QualificationEngine, QualificationStatus,
    ScoringConfig,
};
use tracing::info;

pub(crate) fn build_discovery(
    config: &AppConfig,
) -> Result<NoticeDiscovery<ContractsFinderClient>, AppError> {
    let client = ContractsFinderClient::new(&config.source)?;
    Ok(NoticeDiscovery::new(
        client,
        config.source.clone(),
        &config.relevance,
    ))
}

pub(crate) async fn run_discover(args: DiscoverArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let discovery = build_discovery(&config)?;
    let report = discovery.discover(Utc::now()).await;

    let stdout = std::io::stdout();
    write_tenders(stdout.lock(), args.format, &report)
}

pub(crate) async fn run_qualify(args: QualifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let profile = read_profile(&args.profile)?;
    info!(account = %profile.account_id, "capability profile loaded");

    let discovery = build_discovery(&config)?;
    let report = discovery.discover(Utc::now()).await;

    let engine = QualificationEngine::new(ScoringConfig::default());
    let mut results = engine.rank(&report.tenders, &profile);
    if args.hide_disqualified {
        results.retain(|result| result.status != QualificationStatus::Disqualified);
    }

    let stdout = std::io::stdout();
    write_results(stdout.lock(), args.format, &profile.account_id, &results)
}

pub(crate) fn read_profile(path: &Path) -> Result<CapabilityProfile, AppError> {
    let bytes = std::fs::read(path)?;
    let submission: ProfileSubmission = serde_json::from_slice(&bytes)?;
    Ok(ProfileGuard.profile_from_submission(submission)?)
}
