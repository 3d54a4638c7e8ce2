use crate::error::Error;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;

/// A post as the remote service models it. `id` is assigned by the service and is left out of
/// the payload when creating a post.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub body: String,
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Post {
    pub fn new<T: Into<String>, B: Into<String>>(title: T, body: B, user_id: u64) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            user_id,
            id: None,
        }
    }
}

/// A response as received, owned by the case that issued the request.
#[derive(Debug, Clone, Default)]
pub struct ResponseData {
    pub status_code: u16,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ResponseData {
    pub fn header<S: AsRef<str>>(&self, name: S) -> Option<&str> {
        self.headers
            .get(&name.as_ref().to_lowercase())
            .map(String::as_str)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
