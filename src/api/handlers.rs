use super::AppState;
use crate::decoder::decode;
use crate::error::{Error, ErrorResponse};
use crate::store::StoredRecord;
use serde::Deserialize;
use std::convert::Infallible;
use tracing::{error, info};
use warp::{http::StatusCode, Rejection, Reply};

/// Query parameters for `/convert-measurements`.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// The measurement string, passed verbatim to the decoder.
    pub input: String,
}

/// Decodes the input, seals and appends one record, and returns the totals.
///
/// The decode itself cannot fail; only sealing or storage can reject.
pub async fn convert_measurements(
    query: ConvertQuery,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let totals = decode(&query.input);

    let record = StoredRecord::seal(state.keys.cipher(), &query.input, &totals)
        .map_err(warp::reject::custom)?;
    state.store.append(&record).map_err(warp::reject::custom)?;

    info!(packages = totals.len(), "converted measurement input");
    Ok(warp::reply::json(&totals))
}

/// Returns every stored record, decrypted.
pub async fn decrypted_measurements(state: AppState) -> Result<impl Reply, Rejection> {
    let records = state.store.load().map_err(warp::reject::custom)?;
    let decrypted = records
        .iter()
        .map(|record| record.decrypt(state.keys.cipher()))
        .collect::<Result<Vec<_>, Error>>()
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&decrypted))
}

/// Returns the stored records as-is: sealed payloads plus timestamps.
pub async fn measurement_history(state: AppState) -> Result<impl Reply, Rejection> {
    let records = state.store.load().map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&records))
}

/// Maps every rejection onto a JSON error body with the right status code.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            "missing or invalid query parameters".to_string(),
        )
    } else if let Some(e) = err.find::<Error>() {
        error!("request failed: {e}");
        e.as_http_response()
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else {
        error!("unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    let json = warp::reply::json(&ErrorResponse { message });
    Ok(warp::reply::with_status(json, code))
}
