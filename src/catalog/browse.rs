//! Browse: filter and sort the catalog by a closed set of fields
//!
//! Field names arrive as strings from the presentation layer and are parsed
//! into [`SortField`] / [`Filter`] once, at the boundary. Unknown tags are
//! rejected with [`RescatError::UnknownField`](crate::error::RescatError).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::Catalog;
use crate::domain::{Resource, ResourceType};
use crate::error::{self, RescatError};

/// Field a browse listing can be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Type,
    Category,
    Updated,
}

impl SortField {
    pub const NAMES: [&'static str; 5] = ["id", "name", "type", "category", "updated"];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Type => "type",
            SortField::Category => "category",
            SortField::Updated => "updated",
        }
    }

    /// Compare two records on this field
    pub fn compare(self, a: &Resource, b: &Resource) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a
                .display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase()),
            SortField::Type => a.resource_type.cmp(&b.resource_type),
            SortField::Category => a.category().to_string().cmp(&b.category().to_string()),
            // Records without a timestamp sort first
            SortField::Updated => a.updated_at.cmp(&b.updated_at),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = RescatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "type" => Ok(SortField::Type),
            "category" => Ok(SortField::Category),
            "updated" => Ok(SortField::Updated),
            _ => Err(error::source::unknown_field("sort", s, &Self::NAMES)),
        }
    }
}

/// Field a browse listing can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Type,
    Category,
    Subcategory,
}

impl FilterField {
    pub const NAMES: [&'static str; 3] = ["type", "category", "subcategory"];
}

impl FromStr for FilterField {
    type Err = RescatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "type" => Ok(FilterField::Type),
            "category" => Ok(FilterField::Category),
            "subcategory" => Ok(FilterField::Subcategory),
            _ => Err(error::source::unknown_field("filter", s, &Self::NAMES)),
        }
    }
}

/// One `field=value` predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Type(ResourceType),
    Category(String),
    Subcategory(String),
}

impl Filter {
    pub fn new(field: FilterField, value: &str) -> Result<Self, RescatError> {
        match field {
            FilterField::Type => {
                let names: Vec<&str> = ResourceType::ALL.iter().map(|t| t.as_str()).collect();
                value
                    .parse()
                    .map(Filter::Type)
                    .map_err(|_| error::source::unknown_field("type", value, &names))
            }
            FilterField::Category => Ok(Filter::Category(value.to_string())),
            FilterField::Subcategory => Ok(Filter::Subcategory(value.to_string())),
        }
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Filter::Type(resource_type) => resource.resource_type == *resource_type,
            Filter::Category(primary) => resource.category().primary == *primary,
            Filter::Subcategory(secondary) => {
                resource.category().secondary.as_deref() == Some(secondary.as_str())
            }
        }
    }
}

impl FromStr for Filter {
    type Err = RescatError;

    /// Parse `field=value`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((field, value)) = s.split_once('=') else {
            return Err(error::source::unknown_field("filter", s, &FilterField::NAMES));
        };
        Filter::new(field.parse()?, value.trim())
    }
}

/// Filters (all must match), sort field, direction and optional limit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    pub filters: Vec<Filter>,
    pub sort: SortField,
    pub descending: bool,
    pub limit: Option<usize>,
}

impl BrowseQuery {
    pub fn sorted_by(mut self, sort: SortField) -> Self {
        self.sort = sort;
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// List catalog records matching `query`
///
/// The sort is stable, so records with equal keys keep catalog order in
/// both directions.
pub fn browse<'c>(catalog: &'c Catalog, query: &BrowseQuery) -> Vec<&'c Resource> {
    let mut listed: Vec<&Resource> = catalog
        .all()
        .iter()
        .filter(|resource| query.filters.iter().all(|f| f.matches(resource)))
        .collect();

    let sort = query.sort;
    if query.descending {
        listed.sort_by(|a, b| sort.compare(b, a));
    } else {
        listed.sort_by(|a, b| sort.compare(a, b));
    }

    if let Some(limit) = query.limit {
        listed.truncate(limit);
    }
    listed
}
