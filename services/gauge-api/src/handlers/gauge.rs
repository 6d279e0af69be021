//! Scoring and gauge rendering endpoints.

use axum::{
    extract::Extension,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

use gauge_common::{
    aggregate, GaugeError, NormalizedScore, ScoreBasis, ScoreOutcome, SentimentState, TallyPayload,
};
use gauge_renderer::canvas::DrawCommand;
use gauge_renderer::{Asset, GaugeScene};

use super::common::{lenient_count, ApiError};
use crate::metrics::RenderBackend;
use crate::state::AppState;

/// Body of `POST /api/score`.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub tallies: TallyPayload,
    #[serde(default)]
    pub submitted: Option<Value>,
}

/// Body of the gauge rendering endpoints.
#[derive(Debug, Deserialize)]
pub struct GaugeRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub tallies: TallyPayload,
    #[serde(default)]
    pub submitted: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreResponse {
    Scored {
        score: NormalizedScore,
        basis: ScoreBasis,
        state: SentimentState,
        background: String,
    },
    Unavailable,
}

#[derive(Debug, Serialize)]
pub struct CanvasResponse {
    pub width: u32,
    pub height: u32,
    pub state: SentimentState,
    pub score: NormalizedScore,
    pub commands: Vec<DrawCommand>,
}

fn score_payload(state: &AppState, tallies: &TallyPayload, submitted: Option<&Value>) -> ScoreOutcome {
    let outcome = aggregate(tallies, lenient_count(submitted));
    state.metrics.record_score(&outcome);
    outcome
}

/// POST /api/score - Aggregate tallies into a score and sentiment state
#[instrument(skip(state, req))]
pub async fn score_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    let response = match score_payload(&state, &req.tallies, req.submitted.as_ref()) {
        ScoreOutcome::Scored { score, basis } => {
            let sentiment = state.renderer.state_for(score);
            ScoreResponse::Scored {
                score,
                basis,
                state: sentiment,
                background: state.assets.background_url(sentiment),
            }
        }
        ScoreOutcome::Unavailable => ScoreResponse::Unavailable,
    };
    Json(response)
}

/// POST /api/gauge.png - Render the gauge as a PNG image
#[instrument(skip(state, req), fields(username = %req.username))]
pub async fn gauge_png_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<GaugeRequest>,
) -> Result<Response, ApiError> {
    let score = score_payload(&state, &req.tallies, req.submitted.as_ref()).into_result()?;
    let sentiment = state.renderer.state_for(score);
    let assets = state.assets.load(sentiment, req.avatar_url.as_deref()).await;

    let start = Instant::now();
    let render_state = state.clone();
    let username = req.username;
    let result = tokio::task::spawn_blocking(move || {
        let scene = GaugeScene {
            score,
            username: &username,
            background: assets.background.as_ref(),
            avatar: assets.avatar.as_ref(),
        };
        render_state.renderer.render_png(
            &scene,
            render_state.config.image_width,
            render_state.config.image_height,
            render_state.font.as_ref(),
        )
    })
    .await
    .map_err(|e| GaugeError::InternalError(format!("render task failed: {}", e)))
    .and_then(|r| r);

    let elapsed_us = start.elapsed().as_micros() as u64;
    state
        .metrics
        .record_render(RenderBackend::Raster, elapsed_us, result.is_ok())
        .await;
    let png = result?;

    info!(
        score = score.value(),
        state = ?sentiment,
        bytes = png.len(),
        duration_ms = elapsed_us as f64 / 1000.0,
        "Rendered gauge PNG"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    )
        .into_response())
}

/// POST /api/gauge/canvas - Render the gauge as a canvas draw list
#[instrument(skip(state, req), fields(username = %req.username))]
pub async fn gauge_canvas_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<GaugeRequest>,
) -> Result<Json<CanvasResponse>, ApiError> {
    let score = score_payload(&state, &req.tallies, req.submitted.as_ref()).into_result()?;
    let sentiment = state.renderer.state_for(score);

    // The browser loads images itself, so only references are passed along.
    let background = Asset::reference(state.assets.background_url(sentiment));
    let avatar = req
        .avatar_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(Asset::reference);

    let start = Instant::now();
    let scene = GaugeScene {
        score,
        username: &req.username,
        background: Some(&background),
        avatar: avatar.as_ref(),
    };
    let result = state.renderer.render_canvas(
        &scene,
        state.config.image_width,
        state.config.image_height,
    );
    state
        .metrics
        .record_render(
            RenderBackend::Canvas,
            start.elapsed().as_micros() as u64,
            result.is_ok(),
        )
        .await;
    let drawing = result?;

    Ok(Json(CanvasResponse {
        width: drawing.width,
        height: drawing.height,
        state: sentiment,
        score,
        commands: drawing.commands,
    }))
}
