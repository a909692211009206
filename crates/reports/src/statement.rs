//! Statement - transaction history of one account as report data

use crate::exporters::ReportData;
use chrono::{DateTime, NaiveDate, Utc};
use minibank_core::{format_money, format_signed, TransactionRecord, CURRENCY_CODE};
use rust_decimal::Decimal;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Records of one account, in the order given
pub struct Statement<'a> {
    account_id: String,
    records: Vec<&'a TransactionRecord>,
    exported_at: DateTime<Utc>,
}

impl<'a> Statement<'a> {
    pub fn new(
        account_id: impl Into<String>,
        records: impl IntoIterator<Item = &'a TransactionRecord>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            records: records.into_iter().collect(),
            exported_at: Utc::now(),
        }
    }

    pub fn with_exported_at(mut self, exported_at: DateTime<Utc>) -> Self {
        self.exported_at = exported_at;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of the signed amounts in this statement
    pub fn net_total(&self) -> Decimal {
        self.records.iter().map(|r| r.amount).sum()
    }
}

impl ReportData for Statement<'_> {
    fn title(&self) -> &str {
        "Transaction history"
    }

    fn headers(&self) -> Vec<String> {
        ["timestamp", "kind", "amount", "currency", "description"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| {
                vec![
                    r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    r.kind.as_str().to_string(),
                    format!("{:.2}", r.amount),
                    CURRENCY_CODE.to_string(),
                    r.description.clone(),
                ]
            })
            .collect()
    }

    fn display_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| {
                vec![
                    r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    r.kind.as_str().to_string(),
                    format!("{} {}", format_signed(r.amount), CURRENCY_CODE),
                    r.description.clone(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Account".to_string(), self.account_id.clone()),
            (
                "Exported".to_string(),
                self.exported_at.format(TIMESTAMP_FORMAT).to_string(),
            ),
            (
                "Net total".to_string(),
                format!("{} {}", format_money(self.net_total()), CURRENCY_CODE),
            ),
        ]
    }
}

/// `transactions_<account>_<YYYYMMDD>.<ext>`
pub fn default_file_name(account_id: &str, date: NaiveDate, extension: &str) -> String {
    format!(
        "transactions_{}_{}.{}",
        account_id,
        date.format("%Y%m%d"),
        extension
    )
}
