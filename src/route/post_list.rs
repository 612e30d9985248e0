use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use postindex_lib::{list, PostQuery};

use super::{parse_param, snapshot, Failure};
use crate::{
    keeper,
    view::{LatestView, ListView, Notice},
};

fn assign_headers(total: usize) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert("x-length", total.into());

    headers
}

fn list_args(params: &HashMap<String, String>) -> Result<list::Args, Failure> {
    let query = PostQuery::new(
        params.get("tag").map(String::as_str),
        params.get("lang").map(String::as_str),
    );

    Ok(list::Args {
        query,
        offset: parse_param(params, "offset")?,
        limit: parse_param(params, "limit")?,
    })
}

pub async fn get(
    State(keeper): State<keeper::ArcMutex>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(HeaderMap, Json<ListView>), Failure> {
    let args = list_args(&params)?;
    let posts = snapshot(&keeper, Notice::LIST_UNAVAILABLE)?;

    let response = list::query(&posts, &args);
    let headers = assign_headers(response.total);

    Ok((headers, Json(ListView::new(&args, &response))))
}

pub async fn latest(State(keeper): State<keeper::ArcMutex>) -> Result<Json<LatestView>, Failure> {
    let posts = snapshot(&keeper, Notice::LATEST_UNAVAILABLE)?;

    Ok(Json(LatestView::new(&posts)))
}
