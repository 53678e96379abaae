use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{EngineError, PaymentDraft, ResultEngine, ministers, payments};

use super::{Engine, normalize_optional_text, with_tx};

/// Smallest amount a payment may carry.
const MIN_AMOUNT: f64 = 0.01;

/// Filters for listing payments.
///
/// Both bounds are inclusive; either may be omitted.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaymentListFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// ISO-8601 week of a date: week 1 contains the year's first Thursday, weeks
/// run Monday through Sunday.
pub(crate) fn iso_week_of(date: NaiveDate) -> i32 {
    date.iso_week().week() as i32
}

fn normalize_payment_draft(draft: PaymentDraft) -> ResultEngine<PaymentDraft> {
    if !draft.amount.is_finite() || draft.amount < MIN_AMOUNT {
        return Err(EngineError::Validation(format!(
            "amount must be at least {MIN_AMOUNT}"
        )));
    }
    if let Some(week) = draft.week_number
        && week < 1
    {
        return Err(EngineError::Validation(
            "week number must be at least 1".to_string(),
        ));
    }
    let note = normalize_optional_text(draft.note.as_deref(), "note", 1000)?;

    Ok(PaymentDraft {
        minister_id: draft.minister_id,
        amount: draft.amount,
        payment_date: draft.payment_date,
        week_number: draft
            .week_number
            .or_else(|| Some(iso_week_of(draft.payment_date))),
        note,
    })
}

async fn require_minister<C: ConnectionTrait>(db: &C, minister_id: i32) -> ResultEngine<()> {
    ministers::Entity::find_by_id(minister_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("minister not exists".to_string()))?;
    Ok(())
}

impl Engine {
    /// Lists payments, newest payment date first, optionally constrained to an
    /// inclusive date range.
    pub async fn list_payments(
        &self,
        filter: PaymentListFilter,
    ) -> ResultEngine<Vec<(payments::Model, ministers::Model)>> {
        let mut query = payments::Entity::find()
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::Id);

        if let Some(start) = filter.start_date {
            query = query.filter(payments::Column::PaymentDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(payments::Column::PaymentDate.lte(end));
        }

        let rows = query
            .find_also_related(ministers::Entity)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (payment_model, minister_model) in rows {
            let Some(minister_model) = minister_model else {
                continue;
            };
            out.push((payment_model, minister_model));
        }
        Ok(out)
    }

    /// Return a payment by id.
    pub async fn payment(&self, payment_id: i32) -> ResultEngine<payments::Model> {
        payments::Entity::find_by_id(payment_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment not exists".to_string()))
    }

    /// Record a payment and refresh its minister's total in the same unit of
    /// work.
    pub async fn create_payment(&self, draft: PaymentDraft) -> ResultEngine<payments::Model> {
        let draft = normalize_payment_draft(draft)?;

        with_tx!(self, |db_tx| {
            require_minister(&db_tx, draft.minister_id).await?;

            let payment_model = payments::ActiveModel {
                minister_id: ActiveValue::Set(draft.minister_id),
                amount: ActiveValue::Set(draft.amount),
                payment_date: ActiveValue::Set(draft.payment_date),
                week_number: ActiveValue::Set(draft.week_number),
                note: ActiveValue::Set(draft.note),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let inserted = payment_model.insert(&db_tx).await?;

            self.recompute_total_savings(&db_tx, inserted.minister_id)
                .await?;

            Ok(inserted)
        })
    }

    /// Update a payment. When the minister reference changes, both the former
    /// and the new minister's totals are refreshed.
    pub async fn update_payment(
        &self,
        payment_id: i32,
        draft: PaymentDraft,
    ) -> ResultEngine<payments::Model> {
        let draft = normalize_payment_draft(draft)?;

        with_tx!(self, |db_tx| {
            let model = payments::Entity::find_by_id(payment_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("payment not exists".to_string()))?;
            let old_minister_id = model.minister_id;

            require_minister(&db_tx, draft.minister_id).await?;

            let mut payment_model: payments::ActiveModel = model.into();
            payment_model.minister_id = ActiveValue::Set(draft.minister_id);
            payment_model.amount = ActiveValue::Set(draft.amount);
            payment_model.payment_date = ActiveValue::Set(draft.payment_date);
            payment_model.week_number = ActiveValue::Set(draft.week_number);
            payment_model.note = ActiveValue::Set(draft.note);
            let updated = payment_model.update(&db_tx).await?;

            if old_minister_id != updated.minister_id {
                self.recompute_total_savings(&db_tx, old_minister_id).await?;
            }
            self.recompute_total_savings(&db_tx, updated.minister_id)
                .await?;

            Ok(updated)
        })
    }

    /// Delete a payment and refresh its minister's total.
    pub async fn delete_payment(&self, payment_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = payments::Entity::find_by_id(payment_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("payment not exists".to_string()))?;
            let minister_id = model.minister_id;

            payments::Entity::delete_by_id(payment_id)
                .exec(&db_tx)
                .await?;
            self.recompute_total_savings(&db_tx, minister_id).await?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_week_handles_year_boundaries() {
        // 2024-01-01 is a Monday and opens ISO week 1.
        assert_eq!(iso_week_of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 1);
        // 2023-12-31 is a Sunday and closes ISO week 52.
        assert_eq!(
            iso_week_of(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            52
        );
    }

    #[test]
    fn draft_rejects_dust_amounts_and_zero_weeks() {
        let draft = PaymentDraft {
            minister_id: 1,
            amount: 0.001,
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            week_number: None,
            note: None,
        };
        assert!(normalize_payment_draft(draft.clone()).is_err());

        let draft = PaymentDraft {
            amount: 10.0,
            week_number: Some(0),
            ..draft
        };
        assert!(normalize_payment_draft(draft).is_err());
    }

    #[test]
    fn draft_derives_week_number_when_absent() {
        let draft = PaymentDraft {
            minister_id: 1,
            amount: 10.0,
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            week_number: None,
            note: Some("  ".to_string()),
        };
        let normalized = normalize_payment_draft(draft).unwrap();
        assert_eq!(normalized.week_number, Some(1));
        assert_eq!(normalized.note, None);

        let explicit = PaymentDraft {
            minister_id: 1,
            amount: 10.0,
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            week_number: Some(30),
            note: None,
        };
        assert_eq!(
            normalize_payment_draft(explicit).unwrap().week_number,
            Some(30)
        );
    }
}
