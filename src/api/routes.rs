use super::handlers::{self, ConvertQuery};
use super::AppState;
use std::convert::Infallible;
use warp::Filter;

/// Builds the service's route tree:
///
/// - `GET /convert-measurements?input=...`
/// - `GET /decrypted-measurements`
/// - `GET /measurement-history`
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let convert = warp::path("convert-measurements")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ConvertQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::convert_measurements);

    let decrypted = warp::path("decrypted-measurements")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::decrypted_measurements);

    let history = warp::path("measurement-history")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::measurement_history);

    convert.or(decrypted).or(history)
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
