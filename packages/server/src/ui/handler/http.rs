//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::{
    infrastructure::{
        dto::http::{
            ChatAcceptedDto, ChatMessageDto, ChatRequest, HealthDto, StartStreamRequest,
            StreamSessionDto, SuccessDto,
        },
        notification::build_gateways,
    },
    ui::state::AppState,
    usecase::StartStreamCommand,
};

use super::error::ApiError;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let report = state.get_health_usecase.execute().await;
    Json(HealthDto {
        backend: "ok".to_string(),
        media_server: report.media_server,
        active_session: report.active_session,
        websocket_connections: report.websocket_connections,
    })
}

/// Start a stream
pub async fn start_stream(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartStreamRequest>, JsonRejection>,
) -> Result<Json<StreamSessionDto>, ApiError> {
    let Json(request) = body?;
    let command = StartStreamCommand {
        username: request.username.unwrap_or_default(),
        notifications: build_gateways(&request.notify, request.phone),
    };

    let snapshot = state.start_stream_usecase.execute(command).await?;

    // Domain Model から DTO への変換
    Ok(Json(StreamSessionDto::from(&snapshot)))
}

/// Get the live stream, if any
pub async fn active_stream(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StreamSessionDto>, ApiError> {
    let active = state
        .get_stream_status_usecase
        .execute()
        .await
        .ok_or_else(|| ApiError::NotFound("No active stream".to_string()))?;

    let mut dto = StreamSessionDto::from(&active.snapshot);
    dto.viewers = Some(active.viewers);
    Ok(Json(dto))
}

/// Get the summary of the most recently ended stream
pub async fn last_stream(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StreamSessionDto>, ApiError> {
    let summary = state
        .get_stream_status_usecase
        .last_ended()
        .await
        .ok_or_else(|| ApiError::NotFound("No stream has ended yet".to_string()))?;
    Ok(Json(StreamSessionDto::from(&summary)))
}

/// Stop the live stream
pub async fn stop_stream(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessDto<StreamSessionDto>>, ApiError> {
    let summary = state.stop_stream_usecase.execute().await?;
    Ok(Json(SuccessDto {
        message: "Stream stopped".to_string(),
        data: StreamSessionDto::from(&summary),
    }))
}

/// Chat over HTTP, for clients whose websocket is unavailable
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<SuccessDto<ChatAcceptedDto>>, ApiError> {
    let Json(request) = body?;
    let outcome = state
        .chat_router
        .handle_chat_event(None, request.author, request.text)
        .await?;

    Ok(Json(SuccessDto {
        message: "Message sent".to_string(),
        data: ChatAcceptedDto {
            message: ChatMessageDto::from(&outcome.message),
            recorded: outcome.recorded,
            delivered: outcome.report.sent,
        },
    }))
}

/// Query parameters for chat history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Chat history of the live stream, or of the last ended one
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<ChatMessageDto>> {
    let messages = state.get_chat_history_usecase.execute(query.limit).await;
    Json(messages.iter().map(ChatMessageDto::from).collect())
}
