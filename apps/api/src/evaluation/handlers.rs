use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::pipeline::{BlockReason, PipelineResult};
use crate::evaluation::views::View;
use crate::render::answer::{parse_answer, ParsedAnswer};
use crate::render::render_outcome;
use crate::retrieval::SearchHit;
use crate::session::handlers::{find_session, parse_session_id};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewResponse {
    Ready {
        view: View,
        title: &'static str,
        answer: ParsedAnswer,
        raw: String,
        passages: Vec<SearchHit>,
    },
    Blocked {
        view: View,
        reason: BlockReason,
        message: &'static str,
    },
    Failed {
        view: View,
        kind: &'static str,
        message: &'static str,
    },
}

impl ViewResponse {
    fn from_result(view: View, result: PipelineResult) -> Self {
        match result {
            PipelineResult::Ready(answer) => ViewResponse::Ready {
                view,
                title: view.title(),
                answer: parse_answer(&answer.text),
                raw: answer.text,
                passages: answer.passages,
            },
            PipelineResult::Blocked(reason) => ViewResponse::Blocked {
                view,
                reason,
                message: reason.guidance(),
            },
            PipelineResult::Failed(err) => ViewResponse::Failed {
                view,
                kind: err.kind(),
                message: err.user_message(),
            },
        }
    }
}

/// GET /api/v1/sessions/:id/views/:view
///
/// Runs the pipeline for one view. Guidance and pipeline failures are part of
/// the 200 response; only an unknown session or view is an HTTP error.
pub async fn handle_view(
    State(state): State<AppState>,
    Path((id, view)): Path<(String, String)>,
    Query(params): Query<ViewParams>,
) -> Result<Response, AppError> {
    let view = view.parse::<View>().map_err(|e| AppError::Validation(e.to_string()))?;
    let id = parse_session_id(&id)?;
    let session = find_session(&state.sessions, id).await?;

    let _run = session.begin_run().await;
    let ctx = session.context().await;
    let result = state.pipeline.run(view, &ctx).await;

    Ok(match params.format {
        OutputFormat::Html => Html(render_outcome(view, &result)).into_response(),
        OutputFormat::Json => Json(ViewResponse::from_result(view, result)).into_response(),
    })
}
