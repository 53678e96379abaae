//! Denormalized total maintenance.
//!
//! `ministers.total_savings` is recomputed from the payment rows, never
//! adjusted incrementally. The recompute always runs on the open transaction
//! of the triggering mutation, so a failed write leaves the total and the
//! payment set mutually consistent.

use sea_orm::{ActiveValue, ConnectionTrait, Statement, prelude::*};

use crate::{ResultEngine, ministers};

use super::Engine;

impl Engine {
    /// Recomputes a minister's `total_savings` from its payments.
    ///
    /// The sum over zero rows is `0.0`, never null.
    pub(crate) async fn recompute_total_savings<C: ConnectionTrait>(
        &self,
        db_tx: &C,
        minister_id: i32,
    ) -> ResultEngine<f64> {
        let stmt = Statement::from_sql_and_values(
            db_tx.get_database_backend(),
            "SELECT COALESCE(SUM(amount), 0.0) AS total \
             FROM payments \
             WHERE minister_id = ?",
            [minister_id.into()],
        );
        let row = db_tx.query_one(stmt).await?;
        let total: f64 = row.and_then(|r| r.try_get("", "total").ok()).unwrap_or(0.0);

        let minister_model = ministers::ActiveModel {
            id: ActiveValue::Set(minister_id),
            total_savings: ActiveValue::Set(total),
            ..Default::default()
        };
        minister_model.update(db_tx).await?;

        Ok(total)
    }
}
