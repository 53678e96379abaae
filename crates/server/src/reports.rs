//! Report download endpoints.
//!
//! Both encodings are rendered from the same engine-built report; the scope
//! token in the path is validated before any query runs.

use api_types::report::ReportParams;
use axum::{
    Form,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use engine::{Report, ReportScope, render};

use crate::{ServerError, server::ServerState};

fn download(content_type: &str, report: &Report, extension: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", report.file_name(extension)),
            ),
        ],
        bytes,
    )
        .into_response()
}

pub async fn generate_csv(
    State(state): State<ServerState>,
    Path(report_type): Path<String>,
    Form(params): Form<ReportParams>,
) -> Result<Response, ServerError> {
    let scope = ReportScope::try_from(report_type.as_str())?;
    let report = state
        .engine
        .build_report(scope, params.start_date, params.end_date)
        .await?;
    let bytes = render::render_csv(&report)?;
    Ok(download("text/csv", &report, "csv", bytes))
}

pub async fn generate_pdf(
    State(state): State<ServerState>,
    Path(report_type): Path<String>,
    Form(params): Form<ReportParams>,
) -> Result<Response, ServerError> {
    let scope = ReportScope::try_from(report_type.as_str())?;
    let report = state
        .engine
        .build_report(scope, params.start_date, params.end_date)
        .await?;
    let bytes = render::render_pdf(&report)?;
    Ok(download("application/pdf", &report, "pdf", bytes))
}
