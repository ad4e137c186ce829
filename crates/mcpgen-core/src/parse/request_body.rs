use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;

/// A 3.x request body definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}
