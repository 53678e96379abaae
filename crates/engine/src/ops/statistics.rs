use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, QuerySelect, Statement, prelude::*};

use crate::{ResultEngine, ministers, payments};

use super::Engine;

/// Headline figures for the dashboard.
#[derive(Clone, Debug)]
pub struct DashboardStats {
    pub total_ministers: u64,
    /// All-time sum over every payment, regardless of minister.
    pub total_savings: f64,
    /// Up to three ministers with the highest running totals.
    pub top_savers: Vec<ministers::Model>,
    /// Up to five most recently recorded payments, newest first.
    pub recent_payments: Vec<(payments::Model, ministers::Model)>,
}

impl Engine {
    pub async fn dashboard(&self) -> ResultEngine<DashboardStats> {
        let total_ministers = ministers::Entity::find().count(&self.database).await?;

        let stmt = Statement::from_string(
            self.database.get_database_backend(),
            "SELECT COALESCE(SUM(amount), 0.0) AS total FROM payments",
        );
        let row = self.database.query_one(stmt).await?;
        let total_savings: f64 = row.and_then(|r| r.try_get("", "total").ok()).unwrap_or(0.0);

        let top_savers = ministers::Entity::find()
            .order_by_desc(ministers::Column::TotalSavings)
            .order_by_asc(ministers::Column::Id)
            .limit(3)
            .all(&self.database)
            .await?;

        let recent_rows = payments::Entity::find()
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
            .limit(5)
            .find_also_related(ministers::Entity)
            .all(&self.database)
            .await?;
        let mut recent_payments = Vec::with_capacity(recent_rows.len());
        for (payment_model, minister_model) in recent_rows {
            let Some(minister_model) = minister_model else {
                continue;
            };
            recent_payments.push((payment_model, minister_model));
        }

        Ok(DashboardStats {
            total_ministers,
            total_savings,
            top_savers,
            recent_payments,
        })
    }
}
