//! Mapping of graph API JSON bodies to domain records.

use serde::Deserialize;
use serde_json::Value;

use crate::error::GraphError;
use crate::types::{Comment, Like};

#[derive(Deserialize)]
struct RawAuthor {
    name: String,
}

#[derive(Deserialize)]
struct RawComment {
    from: RawAuthor,
    message: String,
    created_time: String,
    like_count: u64,
    id: String,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Self {
            author_name: raw.from.name,
            message: raw.message,
            created_time: raw.created_time,
            like_count: raw.like_count,
            id: raw.id,
        }
    }
}

/// Extract the `id` of a freshly created object.
///
/// Anything without an `id`, including a body that is not JSON at all, is a
/// `MalformedResponse`.
pub fn parse_id(body: &[u8]) -> Result<String, GraphError> {
    let malformed = || GraphError::MalformedResponse(String::from_utf8_lossy(body).into_owned());

    let value: Value = serde_json::from_slice(body).map_err(|_| malformed())?;
    match value.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(malformed()),
    }
}

/// Parse `{"data": [comment, ...]}`. Every comment field is required.
pub fn parse_comments(body: &[u8]) -> Result<Vec<Comment>, GraphError> {
    let raw: Vec<RawComment> = serde_json::from_value(data_field(body)?)?;
    Ok(raw.into_iter().map(Comment::from).collect())
}

/// Parse `{"data": [{"id": .., "name": ..}, ...]}`.
pub fn parse_likes(body: &[u8]) -> Result<Vec<Like>, GraphError> {
    Ok(serde_json::from_value(data_field(body)?)?)
}

fn data_field(body: &[u8]) -> Result<Value, GraphError> {
    let mut value: Value = serde_json::from_slice(body)?;
    value
        .get_mut("data")
        .map(Value::take)
        .ok_or(GraphError::MissingData)
}
