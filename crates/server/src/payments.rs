//! Payment API endpoints

use api_types::payment::{PaymentForm, PaymentListParams, PaymentView};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{PaymentDraft, PaymentListFilter, ministers, payments};

use crate::{ServerError, server::ServerState};

pub(crate) fn view(payment: payments::Model, minister: &ministers::Model) -> PaymentView {
    PaymentView {
        id: payment.id,
        minister_id: payment.minister_id,
        minister_name: minister.full_name.clone(),
        amount: payment.amount,
        payment_date: payment.payment_date,
        week_number: payment.week_number,
        note: payment.note,
        created_at: payment.created_at,
    }
}

fn draft(form: PaymentForm) -> PaymentDraft {
    PaymentDraft {
        minister_id: form.minister_id,
        amount: form.amount,
        payment_date: form.payment_date,
        week_number: form.week_number,
        note: form.note,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<Vec<PaymentView>>, ServerError> {
    let filter = PaymentListFilter {
        start_date: params.start_date,
        end_date: params.end_date,
    };
    let rows = state.engine.list_payments(filter).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(payment, minister)| view(payment, &minister))
            .collect(),
    ))
}

pub async fn add(
    State(state): State<ServerState>,
    Form(payload): Form<PaymentForm>,
) -> Result<(StatusCode, Json<PaymentView>), ServerError> {
    let payment = state.engine.create_payment(draft(payload)).await?;
    let minister = state.engine.minister(payment.minister_id).await?;
    Ok((StatusCode::CREATED, Json(view(payment, &minister))))
}

pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Form(payload): Form<PaymentForm>,
) -> Result<Json<PaymentView>, ServerError> {
    let payment = state.engine.update_payment(id, draft(payload)).await?;
    let minister = state.engine.minister(payment.minister_id).await?;
    Ok(Json(view(payment, &minister)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_payment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
