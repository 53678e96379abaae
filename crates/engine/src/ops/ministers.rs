use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{EngineError, MinisterDraft, ResultEngine, ministers, payments};

use super::{Engine, normalize_optional_text, normalize_required_text, validate_email, with_tx};

fn normalize_minister_draft(draft: MinisterDraft) -> ResultEngine<MinisterDraft> {
    let full_name = normalize_required_text(&draft.full_name, "full name", 100)?;
    let department = normalize_optional_text(draft.department.as_deref(), "department", 100)?;
    let phone = normalize_optional_text(draft.phone.as_deref(), "phone", 20)?;
    let email = normalize_optional_text(draft.email.as_deref(), "email", 120)?;
    if let Some(email) = &email {
        validate_email(email)?;
    }

    Ok(MinisterDraft {
        full_name,
        department,
        phone,
        email,
        date_joined: draft.date_joined,
    })
}

impl Engine {
    /// Lists ministers, optionally filtered by a case-insensitive substring
    /// match against the full name or the department.
    pub async fn list_ministers(&self, search: Option<&str>) -> ResultEngine<Vec<ministers::Model>> {
        let mut query = ministers::Entity::find().order_by_asc(ministers::Column::FullName);

        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", term.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "LOWER(full_name) LIKE ?",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values("LOWER(department) LIKE ?", [pattern])),
            );
        }

        Ok(query.all(&self.database).await?)
    }

    /// Return a minister by id.
    pub async fn minister(&self, minister_id: i32) -> ResultEngine<ministers::Model> {
        ministers::Entity::find_by_id(minister_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("minister not exists".to_string()))
    }

    /// Add a new minister.
    pub async fn create_minister(&self, draft: MinisterDraft) -> ResultEngine<ministers::Model> {
        let draft = normalize_minister_draft(draft)?;
        let now = Utc::now();

        let minister_model = ministers::ActiveModel {
            full_name: ActiveValue::Set(draft.full_name),
            department: ActiveValue::Set(draft.department),
            phone: ActiveValue::Set(draft.phone),
            email: ActiveValue::Set(draft.email),
            date_joined: ActiveValue::Set(draft.date_joined),
            total_savings: ActiveValue::Set(0.0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(minister_model.insert(&self.database).await?)
    }

    /// Update an existing minister. Touches `updated_at`; `total_savings` is
    /// left to the payment ops.
    pub async fn update_minister(
        &self,
        minister_id: i32,
        draft: MinisterDraft,
    ) -> ResultEngine<ministers::Model> {
        let draft = normalize_minister_draft(draft)?;

        with_tx!(self, |db_tx| {
            let model = ministers::Entity::find_by_id(minister_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("minister not exists".to_string()))?;

            let mut minister_model: ministers::ActiveModel = model.into();
            minister_model.full_name = ActiveValue::Set(draft.full_name);
            minister_model.department = ActiveValue::Set(draft.department);
            minister_model.phone = ActiveValue::Set(draft.phone);
            minister_model.email = ActiveValue::Set(draft.email);
            minister_model.date_joined = ActiveValue::Set(draft.date_joined);
            minister_model.updated_at = ActiveValue::Set(Utc::now());

            Ok(minister_model.update(&db_tx).await?)
        })
    }

    /// Delete a minister and all of its payments.
    ///
    /// The payment rows go first, inside the same transaction, so no orphan
    /// can survive a partial failure.
    pub async fn delete_minister(&self, minister_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            ministers::Entity::find_by_id(minister_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("minister not exists".to_string()))?;

            payments::Entity::delete_many()
                .filter(payments::Column::MinisterId.eq(minister_id))
                .exec(&db_tx)
                .await?;
            ministers::Entity::delete_by_id(minister_id)
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }
}
