//! List query descriptors for the generic `masters/getMasterList` endpoint.
//!
//! A [`QueryDescriptor`] is an immutable value built fresh for every
//! request. The collaborator interprets `search`, `relations` and
//! `whereCondition`; the client only describes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Record;

/// Description of a single list request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    /// Target collection, e.g. `language_masters`.
    pub model_name: String,
    /// Equality filter applied by the collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_condition: Option<serde_json::Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<Relation>>,
}

/// Keyword search over a list of fields.
///
/// Related-collection fields use dotted paths, e.g.
/// `health_insurance_carrier_master.health_insurance_carrier_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    #[serde(rename = "field_name")]
    pub fields: Vec<String>,
    #[serde(rename = "searchKeyword")]
    pub keyword: String,
}

/// One-based page window. Both `page` and `page_size` are at least 1,
/// including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPagination")]
pub struct Pagination {
    page: u32,
    page_size: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPagination {
    page: u32,
    page_size: u32,
}

impl TryFrom<RawPagination> for Pagination {
    type Error = CoreError;

    fn try_from(raw: RawPagination) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.page_size)
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::InvalidQuery("page must be at least 1".into()));
        }
        if page_size == 0 {
            return Err(CoreError::InvalidQuery(
                "page size must be at least 1".into(),
            ));
        }
        Ok(Self { page, page_size })
    }

    /// Like [`Pagination::new`], but raises zeros to 1 instead of failing.
    pub fn clamped(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// Relation join requested from the collaborator.
///
/// Join type and null handling for a missing related row are decided by
/// the service; callers must tolerate the related key being absent or
/// `null` on a returned record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub module: String,
    #[serde(rename = "moduleas", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Relation {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            alias: None,
        }
    }

    pub fn aliased(module: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            alias: Some(alias.into()),
        }
    }

    /// Key under which the related record appears on each row.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.module)
    }
}

impl QueryDescriptor {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            where_condition: None,
            search: None,
            pagination: None,
            relations: None,
        }
    }

    /// Add an equality filter. Values should be scalars.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_condition
            .get_or_insert_with(Default::default)
            .insert(field.into(), value.into());
        self
    }

    pub fn with_search<I, S>(mut self, fields: I, keyword: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = Some(SearchSpec {
            fields: fields.into_iter().map(Into::into).collect(),
            keyword: keyword.into(),
        });
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.get_or_insert_with(Vec::new).push(relation);
        self
    }

    /// Add several relations. An empty iterator leaves `relations` unset.
    pub fn with_relations(self, relations: impl IntoIterator<Item = Relation>) -> Self {
        relations.into_iter().fold(self, Self::with_relation)
    }

    /// Keyword carried by this descriptor, or the empty string.
    pub fn keyword(&self) -> &str {
        self.search.as_ref().map_or("", |s| s.keyword.as_str())
    }
}

/// One page of rows plus the server-computed total across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResult {
    pub rows: Vec<Record>,
    pub count: u64,
}
