use crate::config::ReportFormat;
use anyhow::Result;
use keyword_core::ScoredDocument;
use serde::Serialize;
use std::io::Write;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct CycleReport<'a> {
    pub timestamp: String,
    pub total_files: usize,
    pub results: &'a [ScoredDocument],
}

impl<'a> CycleReport<'a> {
    pub fn new(results: &'a [ScoredDocument], total_files: usize) -> Result<Self> {
        let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
        Ok(Self { timestamp, total_files, results })
    }
}

/// Publish one cycle's ranking. Empty rankings are not reported.
pub fn emit<W: Write>(out: &mut W, format: ReportFormat, results: &[ScoredDocument], total_files: usize) -> Result<()> {
    if results.is_empty() {
        return Ok(());
    }
    match format {
        ReportFormat::Text => {
            tracing::info!("reporting {} filtered results from {} files:", results.len(), total_files);
            for line in text_lines(results) {
                tracing::info!("  {line}");
            }
        }
        ReportFormat::Json => {
            let report = CycleReport::new(results, total_files)?;
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// `<path> <score>` per result, scores printed with at least one decimal.
pub fn text_lines(results: &[ScoredDocument]) -> Vec<String> {
    results
        .iter()
        .map(|r| format!("{} {:?}", r.path.display(), r.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Vec<ScoredDocument> {
        vec![
            ScoredDocument { path: PathBuf::from("dir/file1.txt"), score: 0.301 },
            ScoredDocument { path: PathBuf::from("dir/file2.txt"), score: 0.0 },
        ]
    }

    #[test]
    fn text_lines_show_path_and_score() {
        assert_eq!(text_lines(&sample()), vec!["dir/file1.txt 0.301", "dir/file2.txt 0.0"]);
    }

    #[test]
    fn json_report_is_one_line() {
        let mut out = Vec::new();
        emit(&mut out, ReportFormat::Json, &sample(), 7).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["total_files"], 7);
        assert_eq!(json["results"][0]["path"], "dir/file1.txt");
        assert_eq!(json["results"][0]["score"], 0.301);
        assert_eq!(json["results"][1]["score"], 0.0);
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn timestamp_is_utc_rfc3339() {
        let report = CycleReport::new(&[], 0).unwrap();
        assert!(!report.timestamp.is_empty());
        assert!(report.timestamp.ends_with('Z'), "{}", report.timestamp);
    }

    #[test]
    fn empty_ranking_writes_nothing() {
        let mut out = Vec::new();
        emit(&mut out, ReportFormat::Json, &[], 3).unwrap();
        assert!(out.is_empty());
    }
}
