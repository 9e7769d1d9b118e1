use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use tender_sift::error::AppError;
use tender_sift::workflows::discovery::DiscoveryReport;
use tender_sift::workflows::qualification::{format_amount, AccountId, QualificationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
struct TenderRow<'a> {
    id: &'a str,
    title: &'a str,
    buyer: &'a str,
    jurisdiction: &'a str,
    value: Option<f64>,
    deadline: Option<&'a str>,
    url: &'a str,
}

#[derive(Serialize)]
struct ResultRow<'a> {
    status: &'static str,
    score: i32,
    id: &'a str,
    title: &'a str,
    buyer: &'a str,
    jurisdiction: &'a str,
    value: Option<f64>,
    deadline: Option<&'a str>,
    url: &'a str,
    passes: String,
    issues: String,
}

pub(crate) fn write_tenders<W: Write>(
    mut out: W,
    format: OutputFormat,
    report: &DiscoveryReport,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for tender in &report.tenders {
                writer
                    .serialize(TenderRow {
                        id: &tender.id,
                        title: &tender.title,
                        buyer: &tender.buyer,
                        jurisdiction: &tender.jurisdiction,
                        value: tender.value,
                        deadline: tender.deadline.as_deref(),
                        url: &tender.url,
                    })
                    .map_err(io::Error::from)?;
            }
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Table => {
            let stats = &report.stats;
            writeln!(
                out,
                "Open tenders: {} retained from {} fetched across {} jurisdictions",
                stats.retained, stats.fetched, stats.jurisdictions
            )?;
            writeln!(
                out,
                "Dropped: {} duplicate, {} irrelevant, {} closed or undated, {} unidentified",
                stats.duplicates, stats.irrelevant, stats.closed, stats.unidentified
            )?;
            if stats.failed_sources > 0 {
                writeln!(out, "Unavailable jurisdictions: {}", stats.failed_sources)?;
            }

            if report.tenders.is_empty() {
                writeln!(out, "\nNo open tenders found")?;
                return Ok(());
            }

            writeln!(out)?;
            for tender in &report.tenders {
                writeln!(out, "- [{}] {}", tender.jurisdiction, tender.title)?;
                writeln!(
                    out,
                    "  {} | value {} | closes {}",
                    tender.buyer,
                    display_value(tender.value),
                    tender.deadline.as_deref().unwrap_or("-")
                )?;
                writeln!(out, "  {}", tender.url)?;
            }
            Ok(())
        }
    }
}

pub(crate) fn write_results<W: Write>(
    mut out: W,
    format: OutputFormat,
    account: &AccountId,
    results: &[QualificationResult],
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => write_json(out, results),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for result in results {
                let tender = &result.tender;
                writer
                    .serialize(ResultRow {
                        status: result.status.label(),
                        score: result.score,
                        id: &tender.id,
                        title: &tender.title,
                        buyer: &tender.buyer,
                        jurisdiction: &tender.jurisdiction,
                        value: tender.value,
                        deadline: tender.deadline.as_deref(),
                        url: &tender.url,
                        passes: result.passes.join("; "),
                        issues: result.issues.join("; "),
                    })
                    .map_err(io::Error::from)?;
            }
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "Qualification results for {} ({} tenders)",
                account,
                results.len()
            )?;
            if results.is_empty() {
                writeln!(out, "No open tenders to qualify")?;
                return Ok(());
            }

            for (position, result) in results.iter().enumerate() {
                let tender = &result.tender;
                writeln!(
                    out,
                    "\n{}. [{}] score {} | {} ({})",
                    position + 1,
                    result.status.label().to_uppercase(),
                    result.score,
                    tender.title,
                    tender.jurisdiction
                )?;
                writeln!(
                    out,
                    "   {} | value {} | closes {}",
                    tender.buyer,
                    display_value(tender.value),
                    tender.deadline.as_deref().unwrap_or("-")
                )?;
                writeln!(out, "   {}", tender.url)?;
                for pass in &result.passes {
                    writeln!(out, "   + {pass}")?;
                }
                for issue in &result.issues {
                    writeln!(out, "   - {issue}")?;
                }
            }
            Ok(())
        }
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut out, value).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

fn display_value(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| "n/a".to_string())
}
