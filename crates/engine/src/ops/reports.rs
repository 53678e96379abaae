use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    DetailRow, Report, ReportBody, ReportScope, ResultEngine, SummaryRow, ministers, payments,
};

use super::Engine;

impl Engine {
    /// Builds the intermediate report both renderers consume.
    ///
    /// Filters payments to `start_date <= payment_date <= end_date` (both
    /// inclusive). A reversed range yields an empty report, not an error.
    pub async fn build_report(
        &self,
        scope: ReportScope,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ResultEngine<Report> {
        let rows: Vec<(payments::Model, Option<ministers::Model>)> = payments::Entity::find()
            .filter(payments::Column::PaymentDate.gte(start_date))
            .filter(payments::Column::PaymentDate.lte(end_date))
            .order_by_asc(payments::Column::PaymentDate)
            .order_by_asc(payments::Column::Id)
            .find_also_related(ministers::Entity)
            .all(&self.database)
            .await?;

        let body = match scope {
            ReportScope::Summary => summarize(&rows),
            ReportScope::Detailed => detail(&rows),
        };

        Ok(Report {
            start_date,
            end_date,
            body,
        })
    }
}

/// Groups filtered payments per minister; descending total amount, minister id
/// ascending on ties.
fn summarize(rows: &[(payments::Model, Option<ministers::Model>)]) -> ReportBody {
    let mut groups: HashMap<i32, SummaryRow> = HashMap::new();
    let mut total_amount = 0.0;
    let mut total_payments = 0;

    for (payment_model, minister_model) in rows {
        let Some(minister_model) = minister_model else {
            continue;
        };
        total_amount += payment_model.amount;
        total_payments += 1;

        let group = groups
            .entry(minister_model.id)
            .or_insert_with(|| SummaryRow {
                minister_id: minister_model.id,
                minister_name: minister_model.full_name.clone(),
                total_amount: 0.0,
                payment_count: 0,
            });
        group.total_amount += payment_model.amount;
        group.payment_count += 1;
    }

    let mut summary_rows: Vec<SummaryRow> = groups.into_values().collect();
    summary_rows.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.minister_id.cmp(&b.minister_id))
    });

    ReportBody::Summary {
        rows: summary_rows,
        total_amount,
        total_payments,
    }
}

/// One row per filtered payment, already in payment-date order.
fn detail(rows: &[(payments::Model, Option<ministers::Model>)]) -> ReportBody {
    let mut detail_rows = Vec::with_capacity(rows.len());
    for (payment_model, minister_model) in rows {
        let Some(minister_model) = minister_model else {
            continue;
        };
        detail_rows.push(DetailRow {
            payment_date: payment_model.payment_date,
            minister_name: minister_model.full_name.clone(),
            amount: payment_model.amount,
            week_number: payment_model.week_number,
            note: payment_model.note.clone(),
        });
    }

    ReportBody::Detailed { rows: detail_rows }
}
