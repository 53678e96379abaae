//! Dashboard statistics endpoint

use api_types::stats::{Dashboard, RecentPayment, TopSaver};
use axum::{Json, extract::State};
use chrono::{Datelike, Local, Weekday};

use crate::{ServerError, server::ServerState};

/// Handle requests for the dashboard headline figures.
pub async fn dashboard(
    State(state): State<ServerState>,
) -> Result<Json<Dashboard>, ServerError> {
    let stats = state.engine.dashboard().await?;

    let top_savers = stats
        .top_savers
        .into_iter()
        .map(|minister| TopSaver {
            id: minister.id,
            full_name: minister.full_name,
            total_savings: minister.total_savings,
        })
        .collect();

    let recent_payments = stats
        .recent_payments
        .into_iter()
        .map(|(payment, minister)| RecentPayment {
            id: payment.id,
            minister_name: minister.full_name,
            amount: payment.amount,
            payment_date: payment.payment_date,
            created_at: payment.created_at,
        })
        .collect();

    Ok(Json(Dashboard {
        total_ministers: stats.total_ministers,
        total_savings: stats.total_savings,
        top_savers,
        recent_payments,
        is_sunday: Local::now().weekday() == Weekday::Sun,
    }))
}
