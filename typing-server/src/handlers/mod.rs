pub mod auth;
pub mod game;
pub mod log;
pub mod test;
pub mod user;

use serde::Serialize;
use warp::Reply;
use warp::http::StatusCode;

pub type HandlerResult = Result<warp::reply::Response, warp::Rejection>;

fn json_reply<T: Serialize>(body: &T) -> warp::reply::Response {
    warp::reply::json(body).into_response()
}

fn json_reply_with_status<T: Serialize>(body: &T, status: StatusCode) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}
