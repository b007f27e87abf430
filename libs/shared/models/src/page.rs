use serde::{Deserialize, Serialize};

/// Lightweight pointer returned inside list envelopes. Not an owned entity,
/// only a lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

/// One page of a collection as served by the API. `count` is the total
/// matching the filter, independent of page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<ResourceRef>,
}

/// Client-facing pagination result after references have been resolved to
/// full entities. `items` preserves the order of the envelope's `results`;
/// `count` is authoritative for computing page totals.
#[derive(Debug, Clone)]
pub struct ResolvedPage<T> {
    pub items: Vec<T>,
    pub count: i64,
}

/// Body of a successful POST or PUT: the server-assigned identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}
