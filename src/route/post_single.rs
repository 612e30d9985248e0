use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use postindex_lib::single::{self, Lookup};

use super::{snapshot, Failure};
use crate::{
    keeper,
    view::{ArticleView, Notice},
};

pub async fn get(
    State(keeper): State<keeper::ArcMutex>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ArticleView>, Failure> {
    let posts = snapshot(&keeper, Notice::ARTICLE_UNAVAILABLE)?;

    match single::lookup(&posts, params.get("id").map(String::as_str)) {
        Lookup::Found(response) => Ok(Json(ArticleView::new(&response))),
        Lookup::NotFound => Err((StatusCode::NOT_FOUND, Json(Notice::UNKNOWN_ID))),
        Lookup::MissingId => Err((StatusCode::NOT_FOUND, Json(Notice::MISSING_ID))),
    }
}
