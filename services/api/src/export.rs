use crate::infra::{FixtureSource, LOCAL_TOKEN};
use chrono::Local;
use clap::{Args, ValueEnum};
use speed_analytics::analytics::report::ReportKind;
use speed_analytics::analytics::source::{AccessToken, SourceError};
use speed_analytics::analytics::AnalyticsService;
use speed_analytics::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum ReportKindArg {
    CaseManagersPerformance,
    TeamSummary,
}

impl From<ReportKindArg> for ReportKind {
    fn from(value: ReportKindArg) -> Self {
        match value {
            ReportKindArg::CaseManagersPerformance => ReportKind::CaseManagersPerformance,
            ReportKindArg::TeamSummary => ReportKind::TeamSummary,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Which report to render
    #[arg(long, value_enum, default_value_t = ReportKindArg::CaseManagersPerformance)]
    pub(crate) kind: ReportKindArg,
    /// Output file; defaults to the report's own file name in the current directory
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let service = AnalyticsService::new(Arc::new(FixtureSource));
    let token = AccessToken::new(LOCAL_TOKEN).ok_or(AppError::Source(SourceError::Denied))?;

    let report = service.report(&token, args.kind.into(), Local::now().date_naive())?;
    let csv = report.to_csv()?;

    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(report.file_name()));
    std::fs::write(&path, csv)?;

    println!(
        "wrote {} ({} rows, {} columns)",
        path.display(),
        report.rows.len(),
        report.columns().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_argument_maps_onto_the_report_catalogue() {
        assert_eq!(
            ReportKind::from(ReportKindArg::CaseManagersPerformance),
            ReportKind::CaseManagersPerformance
        );
        assert_eq!(
            ReportKind::from(ReportKindArg::TeamSummary),
            ReportKind::TeamSummary
        );
    }
}
