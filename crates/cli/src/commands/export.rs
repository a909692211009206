//! Statement export

use anyhow::{Context, Result};
use chrono::Utc;
use minibank_business::Bank;
use minibank_reports::{
    default_file_name, CsvExporter, ReportExporter, Statement, TextExporter,
};
use std::path::PathBuf;

use crate::context;
use crate::{Auth, ExportFormat};

pub fn run(
    bank: &mut Bank,
    auth: &Auth,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let session = context::session(bank, auth)?;
    let account = bank.account(&session)?;

    let exporter: Box<dyn ReportExporter> = match format {
        ExportFormat::Text => Box::new(TextExporter::new()),
        ExportFormat::Csv => Box::new(CsvExporter::new()),
    };
    let statement = Statement::new(&account.id, account.transactions());
    let content = exporter.export(&statement);

    let path = output.unwrap_or_else(|| {
        PathBuf::from(default_file_name(
            &account.id,
            Utc::now().date_naive(),
            exporter.extension(),
        ))
    });
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!("✅ Exported {} records to {:?}", statement.len(), path);
    Ok(())
}
