//! Report intermediates.
//!
//! A [`Report`] is the single aggregation result both renderers consume:
//! the CSV and PDF encodings are pure functions of this value and never
//! query the store themselves.

use chrono::NaiveDate;

use crate::EngineError;

/// Currency prefix used by every money cell in rendered reports.
pub const CURRENCY_PREFIX: &str = "UGX";

pub(crate) const SCHEME_NAME: &str = "Lavisco Ministers Saving Scheme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportScope {
    Summary,
    Detailed,
}

impl ReportScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
        }
    }
}

impl TryFrom<&str> for ReportScope {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "summary" => Ok(Self::Summary),
            "detailed" => Ok(Self::Detailed),
            other => Err(EngineError::UnsupportedReport(other.to_string())),
        }
    }
}

/// One minister group in a summary report.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub minister_id: i32,
    pub minister_name: String,
    pub total_amount: f64,
    pub payment_count: usize,
}

/// One payment line in a detailed report.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailRow {
    pub payment_date: NaiveDate,
    pub minister_name: String,
    pub amount: f64,
    pub week_number: Option<i32>,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportBody {
    Summary {
        /// Groups sorted by descending total amount, minister id ascending on
        /// ties.
        rows: Vec<SummaryRow>,
        total_amount: f64,
        total_payments: usize,
    },
    Detailed {
        /// Payments sorted by ascending payment date, id ascending on ties.
        rows: Vec<DetailRow>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub body: ReportBody,
}

impl Report {
    pub fn scope(&self) -> ReportScope {
        match self.body {
            ReportBody::Summary { .. } => ReportScope::Summary,
            ReportBody::Detailed { .. } => ReportScope::Detailed,
        }
    }

    /// Document title, e.g. `Lavisco Ministers Saving Scheme - Summary Report`.
    pub fn title(&self) -> String {
        let scope = match self.scope() {
            ReportScope::Summary => "Summary",
            ReportScope::Detailed => "Detailed",
        };
        format!("{SCHEME_NAME} - {scope} Report")
    }

    /// `Period: <start> to <end>` line shared by both encodings.
    pub fn period_line(&self) -> String {
        format!("Period: {} to {}", self.start_date, self.end_date)
    }

    /// Download name: `{scope}_report_{YYYYMMDD}_to_{YYYYMMDD}.{ext}`.
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "{}_report_{}_to_{}.{extension}",
            self.scope().as_str(),
            self.start_date.format("%Y%m%d"),
            self.end_date.format("%Y%m%d"),
        )
    }
}

/// Render a money value with the currency prefix and exactly two decimals.
pub fn format_amount(amount: f64) -> String {
    format!("{CURRENCY_PREFIX}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_known_tokens_only() {
        assert_eq!(ReportScope::try_from("summary"), Ok(ReportScope::Summary));
        assert_eq!(ReportScope::try_from("detailed"), Ok(ReportScope::Detailed));
        assert!(matches!(
            ReportScope::try_from("weekly"),
            Err(EngineError::UnsupportedReport(_))
        ));
    }

    #[test]
    fn file_name_embeds_scope_and_period() {
        let report = Report {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            body: ReportBody::Detailed { rows: Vec::new() },
        };
        assert_eq!(
            report.file_name("csv"),
            "detailed_report_20240101_to_20240331.csv"
        );
    }

    #[test]
    fn amounts_render_with_prefix_and_two_decimals() {
        assert_eq!(format_amount(150.0), "UGX150.00");
        assert_eq!(format_amount(0.015), "UGX0.01");
    }
}
