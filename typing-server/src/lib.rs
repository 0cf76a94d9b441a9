use std::path::PathBuf;
use std::sync::Arc;

use warp::filters::BoxedFilter;
use warp::filters::path::FullPath;
use warp::{Filter, Rejection};

use crate::auth::AuthService;
use crate::errors::handle_rejection;
use crate::session::with_session;
use crate::user_service::UserService;
use typing_core::PassageProvider;
use typing_persistence::{ErrorLogRepository, UserRepository};

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod password;
pub mod session;
pub mod user_service;

/// Largest JSON body the API endpoints accept.
pub const MAX_BODY_BYTES: u64 = 16 * 1024;
/// Client error reports carry stack traces, so they get more room.
pub const MAX_ERROR_REPORT_BYTES: u64 = 256 * 1024;

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    json_body_with_limit(MAX_BODY_BYTES)
}

fn json_body_with_limit<T>(limit: u64) -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(limit).and(warp::body::json())
}

pub fn create_routes(
    auth_service: Arc<AuthService>,
    user_repository: Arc<UserRepository>,
    user_service: Arc<UserService>,
    error_logs: Arc<ErrorLogRepository>,
    passages: Arc<PassageProvider>,
    static_dir: Option<PathBuf>,
) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    // Clone for filters
    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    let user_repository_filter = warp::any().map({
        let user_repository = user_repository.clone();
        move || user_repository.clone()
    });

    let user_service_filter = warp::any().map({
        let user_service = user_service.clone();
        move || user_service.clone()
    });

    let error_log_filter = warp::any().map({
        let error_logs = error_logs.clone();
        move || error_logs.clone()
    });

    let passages_filter = warp::any().map({
        let passages = passages.clone();
        move || passages.clone()
    });

    let session = with_session(auth_service, user_repository);

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Auth endpoints
    let register = warp::path!("api" / "auth" / "register")
        .and(warp::post())
        .and(json_body())
        .and(auth_filter.clone())
        .and(user_repository_filter.clone())
        .and_then(handlers::auth::register);

    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(json_body())
        .and(auth_filter.clone())
        .and(user_repository_filter.clone())
        .and_then(handlers::auth::login);

    // Typing test endpoints
    let test_text = warp::path!("api" / "test" / "text")
        .and(warp::get())
        .and(passages_filter)
        .and_then(handlers::test::text);

    let test_submit = warp::path!("api" / "test" / "submit")
        .and(warp::post())
        .and(session.clone())
        .and(json_body())
        .and(user_service_filter.clone())
        .and_then(handlers::test::submit);

    // Game endpoints
    let game_score = warp::path!("api" / "game" / "score")
        .and(warp::post())
        .and(session.clone())
        .and(json_body())
        .and(user_service_filter.clone())
        .and_then(handlers::game::score);

    let game_leaderboard = warp::path!("api" / "game" / "leaderboard")
        .and(warp::get())
        .and(user_service_filter.clone())
        .and_then(handlers::game::leaderboard);

    // User endpoints
    let user_leaderboard = warp::path!("api" / "user" / "leaderboard")
        .and(warp::get())
        .and(user_service_filter.clone())
        .and_then(handlers::user::leaderboard);

    let user_profile = warp::path!("api" / "user" / "profile")
        .and(warp::get())
        .and(session.clone())
        .and_then(handlers::user::profile);

    let user_profile_update = warp::path!("api" / "user" / "profile")
        .and(warp::patch())
        .and(session.clone())
        .and(json_body())
        .and(user_service_filter)
        .and_then(handlers::user::update_profile);

    let user_stats = warp::path!("api" / "user" / "stats")
        .and(warp::get())
        .and(session.clone())
        .and_then(handlers::user::stats);

    let user_history = warp::path!("api" / "user" / "history")
        .and(warp::get())
        .and(session.clone())
        .and_then(handlers::user::history);

    let user_achievements = warp::path!("api" / "user" / "achievements")
        .and(warp::get())
        .and(session)
        .and_then(handlers::user::achievements);

    // Client error reports
    let log_error = warp::path!("api" / "log" / "error")
        .and(warp::post())
        .and(json_body_with_limit(MAX_ERROR_REPORT_BYTES))
        .and(error_log_filter)
        .and_then(handlers::log::client_error);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "PATCH"]);

    health
        .or(register)
        .or(login)
        .or(test_text)
        .or(test_submit)
        .or(game_score)
        .or(game_leaderboard)
        .or(user_leaderboard)
        .or(user_profile)
        .or(user_profile_update)
        .or(user_stats)
        .or(user_history)
        .or(user_achievements)
        .or(log_error)
        .or(static_files(static_dir))
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log("typing_arena"))
}

/// Client assets from `static_dir`, with `index.html` for any other non-API
/// GET so client-side routes resolve.
fn static_files(static_dir: Option<PathBuf>) -> BoxedFilter<(warp::fs::File,)> {
    match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            let assets = warp::get().and(warp::fs::dir(dir));
            let client_routes = warp::get()
                .and(warp::path::full())
                .and_then(|path: FullPath| async move {
                    if path.as_str().starts_with("/api/") {
                        Err(warp::reject::not_found())
                    } else {
                        Ok::<(), Rejection>(())
                    }
                })
                .untuple_one()
                .and(warp::fs::file(index));

            assets.or(client_routes).unify().boxed()
        }
        None => warp::any()
            .and_then(|| async { Err::<warp::fs::File, Rejection>(warp::reject::not_found()) })
            .boxed(),
    }
}
