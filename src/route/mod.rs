pub mod collate_tags;
pub mod post_list;
pub mod post_single;

use std::collections::HashMap;

use axum::{http::StatusCode, Json};
use tracing::error;

use crate::{
    keeper::{self, Snapshot},
    view::Notice,
};

/// A region that could not be rendered, with the message to show instead.
pub type Failure = (StatusCode, Json<Notice>);

fn unavailable(notice: Notice) -> Failure {
    (StatusCode::SERVICE_UNAVAILABLE, Json(notice))
}

/// The current post collection, or the region's fallback notice.
fn snapshot(keeper: &keeper::ArcMutex, fallback: Notice) -> Result<Snapshot, Failure> {
    let keeper = keeper.lock().map_err(|err| {
        error!("Failed to lock index data: {err}");
        unavailable(fallback.clone())
    })?;
    keeper.posts().map_err(|err| {
        error!("Cannot serve posts: {err}");
        unavailable(fallback)
    })
}

fn parse_param(params: &HashMap<String, String>, key: &str) -> Result<Option<usize>, Failure> {
    params
        .get(key)
        .map(|x| x.parse())
        .transpose()
        .map_err(|_| (StatusCode::BAD_REQUEST, Json(Notice::BAD_PAGINATION)))
}
