//! # Minibank Reports
//!
//! Statement export for a transaction log.
//!
//! ## Exporters
//!
//! - [`TextExporter`] - flat text report, one `|`-separated line per record
//! - [`CsvExporter`] - CSV format with proper escaping
//!
//! ## Example
//!
//! ```rust,ignore
//! use minibank_reports::{ReportExporter, Statement, TextExporter};
//!
//! let statement = Statement::new(&account.id, account.transactions());
//! let text = TextExporter::new().export(&statement);
//! ```

pub mod exporters;
pub mod statement;

pub use exporters::{CsvExporter, ReportData, ReportExporter, TextExporter};
pub use statement::{default_file_name, Statement};
