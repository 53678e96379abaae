//! Delimited-text encoding of a report.
//!
//! Title, period and section labels are plain lines; the statistics block and
//! the tables go through the `csv` writer so names containing delimiters stay
//! quoted correctly.

use csv::Writer;

use crate::report::{Report, ReportBody, format_amount};
use crate::{EngineError, ResultEngine};

fn table_bytes(records: &[Vec<String>]) -> ResultEngine<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    for record in records {
        writer
            .write_record(record)
            .map_err(|err| EngineError::Render(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| EngineError::Render(err.to_string()))
}

fn push_line(out: &mut Vec<u8>, line: &str) {
    out.extend_from_slice(line.as_bytes());
    out.push(b'\n');
}

/// Render a report as a CSV document: title line, period line, blank
/// separator, then a statistics block (summary only) and a labeled table.
pub fn render_csv(report: &Report) -> ResultEngine<Vec<u8>> {
    let mut out = Vec::new();
    push_line(&mut out, &report.title());
    push_line(&mut out, &report.period_line());
    push_line(&mut out, "");

    match &report.body {
        ReportBody::Summary {
            rows,
            total_amount,
            total_payments,
        } => {
            push_line(&mut out, "Summary Statistics");
            out.extend_from_slice(&table_bytes(&[
                vec!["Total Amount".to_string(), format_amount(*total_amount)],
                vec!["Total Payments".to_string(), total_payments.to_string()],
            ])?);
            push_line(&mut out, "");

            push_line(&mut out, "Minister Contributions");
            let mut records = Vec::with_capacity(rows.len() + 1);
            records.push(vec![
                "Minister Name".to_string(),
                "Total Amount".to_string(),
                "Number of Payments".to_string(),
            ]);
            for row in rows {
                records.push(vec![
                    row.minister_name.clone(),
                    format_amount(row.total_amount),
                    row.payment_count.to_string(),
                ]);
            }
            out.extend_from_slice(&table_bytes(&records)?);
        }
        ReportBody::Detailed { rows } => {
            push_line(&mut out, "Payment Details");
            let mut records = Vec::with_capacity(rows.len() + 1);
            records.push(vec![
                "Date".to_string(),
                "Minister Name".to_string(),
                "Amount".to_string(),
                "Week Number".to_string(),
                "Note".to_string(),
            ]);
            for row in rows {
                records.push(vec![
                    row.payment_date.format("%Y-%m-%d").to_string(),
                    row.minister_name.clone(),
                    format_amount(row.amount),
                    row.week_number.map(|w| w.to_string()).unwrap_or_default(),
                    row.note.clone().unwrap_or_default(),
                ]);
            }
            out.extend_from_slice(&table_bytes(&records)?);
        }
    }

    Ok(out)
}
