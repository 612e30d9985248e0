use axum::{
    extract::{Query, State},
    Json,
};
use postindex_lib::{collate, PostQuery};

use super::{snapshot, Failure};
use crate::{keeper, view::Notice};

pub async fn get(
    State(keeper): State<keeper::ArcMutex>,
    Query(query): Query<PostQuery>,
) -> Result<Json<Vec<String>>, Failure> {
    let posts = snapshot(&keeper, Notice::LIST_UNAVAILABLE)?;

    let query = (!query.is_empty()).then_some(query);
    let values = collate::tags(&posts, query.as_ref());

    Ok(Json(values))
}
