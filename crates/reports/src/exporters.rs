//! Report exporters - plain text and CSV
//!
//! This module provides different export formats for reports.

/// Trait for exporting reports to different formats
pub trait ReportExporter {
    /// Export to the target format
    fn export(&self, report: &dyn ReportData) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}

/// Trait for data that can be exported
pub trait ReportData {
    /// Get the report title
    fn title(&self) -> &str;

    /// Get column headers
    fn headers(&self) -> Vec<String>;

    /// Get data rows, machine readable
    fn rows(&self) -> Vec<Vec<String>>;

    /// Rows formatted for people. Defaults to [`ReportData::rows`].
    fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows()
    }

    /// Key-value lines printed above the data
    fn summary(&self) -> Vec<(String, String)>;
}

// ============================================================================
// Text Exporter
// ============================================================================

/// Flat text report: title, summary lines, a rule, then one
/// `a | b | c` line per row
pub struct TextExporter {
    rule_width: usize,
    separator: &'static str,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self {
            rule_width: 50,
            separator: " | ",
        }
    }
}

impl TextExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }
}

impl ReportExporter for TextExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();

        output.push_str(report.title());
        output.push('\n');
        for (key, value) in report.summary() {
            output.push_str(&format!("{}: {}\n", key, value));
        }
        output.push_str(&"=".repeat(self.rule_width));
        output.push_str("\n\n");

        for row in report.display_rows() {
            output.push_str(&row.join(self.separator));
            output.push('\n');
        }

        output
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

// ============================================================================
// CSV Exporter
// ============================================================================

/// CSV format exporter
pub struct CsvExporter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    fn escape_field(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn line(&self, fields: &[String]) -> String {
        let escaped: Vec<String> = fields.iter().map(|f| self.escape_field(f)).collect();
        escaped.join(&self.delimiter.to_string())
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();

        if self.include_header {
            output.push_str(&self.line(&report.headers()));
            output.push('\n');
        }

        for row in report.rows() {
            output.push_str(&self.line(&row));
            output.push('\n');
        }

        output
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
