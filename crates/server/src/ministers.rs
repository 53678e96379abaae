//! Minister API endpoints

use api_types::minister::{MinisterForm, MinisterSearch, MinisterView};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{MinisterDraft, ministers};

use crate::{ServerError, server::ServerState};

pub(crate) fn view(model: ministers::Model) -> MinisterView {
    MinisterView {
        id: model.id,
        full_name: model.full_name,
        department: model.department,
        phone: model.phone,
        email: model.email,
        date_joined: model.date_joined,
        total_savings: model.total_savings,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn draft(form: MinisterForm) -> MinisterDraft {
    MinisterDraft {
        full_name: form.full_name,
        department: form.department,
        phone: form.phone,
        email: form.email,
        date_joined: form.date_joined,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<MinisterSearch>,
) -> Result<Json<Vec<MinisterView>>, ServerError> {
    let models = state.engine.list_ministers(params.search.as_deref()).await?;
    Ok(Json(models.into_iter().map(view).collect()))
}

pub async fn add(
    State(state): State<ServerState>,
    Form(payload): Form<MinisterForm>,
) -> Result<(StatusCode, Json<MinisterView>), ServerError> {
    let model = state.engine.create_minister(draft(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(model))))
}

pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Form(payload): Form<MinisterForm>,
) -> Result<Json<MinisterView>, ServerError> {
    let model = state.engine.update_minister(id, draft(payload)).await?;
    Ok(Json(view(model)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_minister(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
