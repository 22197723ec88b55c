//! Terminal rendering of the view model. Only what changed between two
//! views is printed, so a job reads as a short log of its progress.

use probe_core::{AppViewModel, HistoryRowView, JobStatus, OcrService, ResultView};
use probe_engine::{HealthReport, ServiceCatalog};

pub fn status_line(status: JobStatus, service: OcrService) -> Option<String> {
    let line = match status {
        JobStatus::Idle => return None,
        JobStatus::Uploading => "Uploading file...".to_string(),
        JobStatus::Processing => format!("Processing with {}...", service.label()),
        JobStatus::Completed => "Completed".to_string(),
        JobStatus::Failed => "Failed".to_string(),
    };
    Some(line)
}

pub fn changes(previous: &AppViewModel, next: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if next.file != previous.file {
        if let Some(file) = &next.file {
            lines.push(format!(
                "Selected {} ({}, {})",
                file.name, file.size_label, file.mime_type
            ));
        }
    }
    if next.status != previous.status {
        lines.extend(status_line(next.status, next.service));
    }
    if next.result != previous.result {
        if let Some(result) = &next.result {
            lines.extend(result_lines(result));
        }
    }
    if next.error != previous.error {
        if let Some(error) = &next.error {
            lines.push(format!("Error: {error}"));
        }
    }
    if next.history != previous.history {
        lines.extend(history_lines(&next.history));
    }
    lines
}

pub fn result_lines(result: &ResultView) -> Vec<String> {
    let mut lines = vec![result.processing_time.clone()];
    if !result.confidence.is_empty() {
        lines.push(result.confidence.clone());
    }
    lines.push(String::new());
    lines.extend(result.text.lines().map(str::to_string));
    lines.push(String::new());
    lines
}

pub fn history_lines(rows: &[HistoryRowView]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No recent results".to_string()];
    }
    let mut lines = vec!["Recent results:".to_string()];
    for row in rows {
        lines.push(format!("  [{}] {}  {}", row.index, row.file_name, row.meta));
        lines.push(format!("      {}", row.preview));
    }
    lines
}

pub fn service_lines(catalog: &ServiceCatalog) -> Vec<String> {
    catalog
        .services
        .iter()
        .map(|(id, info)| {
            let marker = if catalog.recommended.as_deref() == Some(id.as_str()) {
                '*'
            } else {
                ' '
            };
            let availability = if info.available { "available" } else { "unavailable" };
            format!("{marker} {id:<10} {:<20} {availability:<12} {}", info.name, info.description)
        })
        .collect()
}

pub fn health_lines(report: &HealthReport) -> Vec<String> {
    let mut lines = vec![match &report.timestamp {
        Some(timestamp) => format!("Backend {} at {timestamp}", report.status),
        None => format!("Backend {}", report.status),
    }];
    for (name, up) in &report.services {
        lines.push(format!("  {name:<10} {}", if *up { "up" } else { "down" }));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_core::FileView;

    fn result() -> ResultView {
        ResultView {
            processing_time: "Processing time: 2.80s".to_string(),
            confidence: "Confidence: 95.0%".to_string(),
            text: "line one\nline two".to_string(),
        }
    }

    #[test]
    fn unchanged_view_prints_nothing() {
        let view = AppViewModel::default();
        assert!(changes(&view, &view.clone()).is_empty());
    }

    #[test]
    fn status_change_names_the_service() {
        let previous = AppViewModel::default();
        let next = AppViewModel {
            status: JobStatus::Processing,
            service: OcrService::Aws,
            ..AppViewModel::default()
        };
        assert_eq!(changes(&previous, &next), vec!["Processing with AWS Textract..."]);
    }

    #[test]
    fn new_file_and_result_are_printed() {
        let previous = AppViewModel::default();
        let next = AppViewModel {
            file: Some(FileView {
                name: "scan.pdf".to_string(),
                size_label: "1.5 MB".to_string(),
                mime_type: "application/pdf".to_string(),
            }),
            result: Some(result()),
            ..AppViewModel::default()
        };
        assert_eq!(
            changes(&previous, &next),
            vec![
                "Selected scan.pdf (1.5 MB, application/pdf)",
                "Processing time: 2.80s",
                "Confidence: 95.0%",
                "",
                "line one",
                "line two",
                "",
            ]
        );
    }

    #[test]
    fn blank_confidence_is_skipped() {
        let view = ResultView {
            confidence: String::new(),
            ..result()
        };
        assert_eq!(result_lines(&view)[1], "");
    }

    #[test]
    fn recommended_service_is_marked() {
        let catalog = ServiceCatalog {
            services: [(
                "tesseract".to_string(),
                probe_engine::ServiceInfo {
                    name: "Tesseract OCR".to_string(),
                    available: true,
                    description: "Local".to_string(),
                },
            )]
            .into_iter()
            .collect(),
            recommended: Some("tesseract".to_string()),
        };
        let lines = service_lines(&catalog);
        assert!(lines[0].starts_with("* tesseract"));
        assert!(lines[0].contains("available"));
    }

    #[test]
    fn health_lists_each_service() {
        let report = HealthReport {
            status: "healthy".to_string(),
            timestamp: None,
            services: [("aws".to_string(), false)].into_iter().collect(),
        };
        assert_eq!(health_lines(&report), vec!["Backend healthy", "  aws        down"]);
    }

    #[test]
    fn empty_history_has_a_placeholder() {
        assert_eq!(history_lines(&[]), vec!["No recent results"]);
    }
}
