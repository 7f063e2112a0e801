use bson::Bson;
use tracing::debug;

use crate::config::ShaperConfig;
use crate::error::ShapeError;
use crate::filter::{Filter, Predicate};
use crate::operator::Operator;
use crate::params::{ParamValue, ParameterMap, is_control_key};
use crate::projection::Projection;
use crate::query::{PageRequest, PageWindow, QueryDescriptor};
use crate::sort::{Sort, parse_sort};

/// Turns request parameters into a [`QueryDescriptor`].
///
/// Stages run in a fixed order: filter, sort, projection, pagination. The
/// first three are pure. Pagination needs the number of documents matching
/// the filter when the caller asked for a specific page, so [`shape`]
/// stops short of it and returns a [`ShapedQuery`] to finish once the count
/// is known.
///
/// [`shape`]: QueryShaper::shape
#[derive(Debug, Clone, Default)]
pub struct QueryShaper {
    config: ShaperConfig,
}

impl QueryShaper {
    pub fn new(config: ShaperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShaperConfig {
        &self.config
    }

    /// Every non-control parameter becomes a clause. `field[gte]` style keys
    /// become comparisons; the suffix is only recognized inside the trailing
    /// brackets, so names and values are never rewritten.
    pub fn filter(&self, params: &ParameterMap) -> Predicate {
        let mut predicate = Predicate::new();
        for (key, value) in params.iter() {
            if is_control_key(key) {
                continue;
            }
            match split_operator(key) {
                Some((field, _)) if is_control_key(field) => continue,
                Some((field, operator)) => {
                    if let Some(v) = value.last() {
                        predicate.push(Filter::new(field, operator, v));
                    }
                }
                None => predicate.push(equality(key, value)),
            }
        }
        predicate
    }

    /// Parse `sort`, falling back to the configured default (which always
    /// ends in an `_id` tie-break).
    pub fn sort(&self, params: &ParameterMap) -> Vec<Sort> {
        match params.get_str("sort").map(parse_sort) {
            Some(sort) if !sort.is_empty() => sort,
            _ => self.config.default_sort(),
        }
    }

    pub fn project(&self, params: &ParameterMap) -> Projection {
        match params.get_str("fields") {
            Some(spec) => Projection::parse(spec, &self.config.hidden_fields),
            None => Projection::All,
        }
    }

    /// Parse `page` and `limit`. Anything that is not a non-zero number falls
    /// back to the default; the result is clamped to at least 1.
    pub fn page_request(&self, params: &ParameterMap) -> PageRequest {
        let page = params.get_str("page").and_then(parse_count).unwrap_or(1);
        let limit = params
            .get_str("limit")
            .and_then(parse_count)
            .unwrap_or(self.config.default_limit);
        let explicit = params
            .get_str("page")
            .is_some_and(|p| !p.trim().is_empty());

        PageRequest {
            window: PageWindow::new(page, limit),
            explicit,
        }
    }

    /// Compute the page window against `total` matching documents.
    pub fn paginate(&self, params: &ParameterMap, total: u64) -> Result<PageWindow, ShapeError> {
        self.page_request(params).bound(total)
    }

    /// Run the filter, sort and projection stages.
    pub fn shape(&self, params: &ParameterMap) -> ShapedQuery {
        let descriptor = QueryDescriptor::default()
            .with_filter(self.filter(params))
            .with_sort(self.sort(params))
            .with_projection(self.project(params));
        let page = self.page_request(params);

        debug!(
            clauses = descriptor.filter.len(),
            sort = descriptor.sort.len(),
            page = page.window.page,
            limit = page.window.limit,
            explicit_page = page.explicit,
            "shaped query"
        );

        ShapedQuery {
            descriptor: descriptor.with_window(page.window),
            page,
        }
    }
}

/// A query with every stage applied except the page bound check.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedQuery {
    descriptor: QueryDescriptor,
    page: PageRequest,
}

impl ShapedQuery {
    /// The filter to count matching documents with.
    pub fn predicate(&self) -> &Predicate {
        &self.descriptor.filter
    }

    pub fn page_request(&self) -> PageRequest {
        self.page
    }

    /// Whether the page bound must be checked against a matching count.
    pub fn requires_count(&self) -> bool {
        self.page.explicit
    }

    pub fn paginate(self, total: u64) -> Result<QueryDescriptor, ShapeError> {
        let window = self.page.bound(total)?;
        Ok(self.descriptor.with_window(window))
    }

    /// Finish without a count. Hands the query back unchanged when an
    /// explicit page still has to be checked with [`paginate`].
    ///
    /// [`paginate`]: ShapedQuery::paginate
    pub fn try_into_descriptor(self) -> Result<QueryDescriptor, ShapedQuery> {
        if self.requires_count() {
            Err(self)
        } else {
            Ok(self.descriptor)
        }
    }
}

fn split_operator(key: &str) -> Option<(&str, Operator)> {
    let inner = key.strip_suffix(']')?;
    let (field, suffix) = inner.rsplit_once('[')?;
    if field.is_empty() {
        return None;
    }
    Operator::from_suffix(suffix).map(|op| (field, op))
}

fn equality(key: &str, value: &ParamValue) -> Filter {
    match value {
        ParamValue::Single(v) => Filter::new(key, Operator::Eq, v.as_str()),
        ParamValue::Many(values) => Filter::new(
            key,
            Operator::In,
            Bson::Array(values.iter().cloned().map(Bson::String).collect()),
        ),
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    let n = raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())?;
    let n = n.trunc();
    if n == 0.0 {
        return None;
    }
    Some(if n < 1.0 { 1 } else { n as u64 })
}
