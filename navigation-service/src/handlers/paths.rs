use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    Json,
};
use futures::{future, Stream, StreamExt, TryStreamExt};
use navgraph::{PathChunkRequest, PathRequest, PathResponse, TransportError};
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::{error::ApiResult, AppState};

/// POST /api/v1/paths
pub async fn get_optimal_path(
    State(state): State<AppState>,
    payload: Result<Json<PathRequest>, JsonRejection>,
) -> ApiResult<Json<PathResponse>> {
    let Json(payload) = payload?;
    let span = info_span!("get_optimal_path", request_id = %Uuid::new_v4());
    let response = state
        .path_service
        .get_optimal_path(payload)
        .instrument(span)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/paths/stream
///
/// The body is newline-delimited JSON, one chunk request per line.
pub async fn get_optimal_path_stream(
    State(state): State<AppState>,
    body: Body,
) -> ApiResult<Json<PathResponse>> {
    let span = info_span!("get_optimal_path_stream", request_id = %Uuid::new_v4());
    let response = state
        .path_service
        .get_optimal_path_stream(ndjson_chunks(body))
        .instrument(span)
        .await?;
    Ok(Json(response))
}

/// Decode a request body into chunk requests
///
/// Blank lines are skipped. A body read failure or a line that is not a
/// chunk request surfaces as a `TransportError`.
pub fn ndjson_chunks(
    body: Body,
) -> impl Stream<Item = Result<PathChunkRequest, TransportError>> + Send {
    let bytes = body
        .into_data_stream()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err));

    FramedRead::new(StreamReader::new(bytes), LinesCodec::new()).filter_map(|line| {
        future::ready(match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str::<PathChunkRequest>(&line).map_err(|err| {
                TransportError::new(format!("Undecodable chunk: {}", err))
            })),
            Err(err) => Some(Err(TransportError::new(err.to_string()))),
        })
    })
}
