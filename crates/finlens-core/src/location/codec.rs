//! Location codec.
//!
//! Bidirectional mapping between an investigation context and the
//! shareable location string, e.g.
//! `/investigations?kind=category&id=…&category=Groceries&month=2024-03`.
//! This query layout is the engine's only externally persisted
//! representation; old shared links must keep decoding.

use crate::investigation::{
    DateRange, InvestigationContext, InvestigationKind, InvestigationScope,
};
use chrono::NaiveDate;
use tracing::debug;
use url::form_urlencoded;

const PARAM_KIND: &str = "kind";
const PARAM_ID: &str = "id";
const PARAM_CATEGORY: &str = "category";
const PARAM_MONTH: &str = "month";
const PARAM_YEAR: &str = "year";
const PARAM_FROM: &str = "from";
const PARAM_TO: &str = "to";

/// A context reconstructed from a decoded location.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialInvestigation {
    /// Encoded id, or a freshly generated one if none was encoded.
    pub id: String,
    pub kind: InvestigationKind,
    pub scope: InvestigationScope,
}

/// Encodes and decodes the shareable location string.
#[derive(Debug, Clone)]
pub struct LocationCodec {
    route_prefix: String,
}

impl LocationCodec {
    pub fn new(route_prefix: impl Into<String>) -> Self {
        Self {
            route_prefix: route_prefix.into(),
        }
    }

    /// The path prefix identifying investigation locations.
    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// True when `location`'s path names the investigation route.
    pub fn is_investigation_route(&self, location: &str) -> bool {
        let path = location.split('?').next().unwrap_or(location);
        path == self.route_prefix || path == format!("{}/", self.route_prefix)
    }

    /// Serializes `kind`, `id` and whichever scope fields are present as a
    /// flat query string. Absent fields are omitted entirely.
    pub fn encode(&self, context: &InvestigationContext) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair(PARAM_KIND, context.kind.as_str());
        query.append_pair(PARAM_ID, &context.id);

        let scope = &context.scope;
        if let Some(category) = &scope.category {
            query.append_pair(PARAM_CATEGORY, category);
        }
        if let Some(month) = &scope.month {
            query.append_pair(PARAM_MONTH, month);
        }
        if let Some(year) = scope.year {
            query.append_pair(PARAM_YEAR, &year.to_string());
        }
        if let Some(range) = &scope.date_range {
            query.append_pair(PARAM_FROM, &range.start.to_string());
            query.append_pair(PARAM_TO, &range.end.to_string());
        }

        format!("{}?{}", self.route_prefix, query.finish())
    }

    /// Reconstructs a partial context from a location string.
    ///
    /// Returns `None` when the path is not the investigation route or the
    /// `kind` parameter is missing or unrecognized; malformed locations
    /// fall back to ordinary navigation rather than surfacing an error.
    /// An absent `id` decodes to a freshly generated token.
    pub fn decode(&self, location: &str) -> Option<PartialInvestigation> {
        if !self.is_investigation_route(location) {
            return None;
        }
        let query = location.split_once('?').map(|(_, q)| q).unwrap_or("");

        let mut kind: Option<InvestigationKind> = None;
        let mut id: Option<String> = None;
        let mut scope = InvestigationScope::new();
        let mut from: Option<NaiveDate> = None;
        let mut to: Option<NaiveDate> = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                PARAM_KIND => match value.parse::<InvestigationKind>() {
                    Ok(parsed) => kind = Some(parsed),
                    Err(_) => {
                        debug!(kind = %value, "ignoring location with unrecognized kind");
                        return None;
                    }
                },
                PARAM_ID => id = Some(value.into_owned()),
                PARAM_CATEGORY => scope.category = Some(value.into_owned()),
                PARAM_MONTH => scope.month = Some(value.into_owned()),
                PARAM_YEAR => scope.year = value.parse().ok(),
                PARAM_FROM => from = NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok(),
                PARAM_TO => to = NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok(),
                _ => {}
            }
        }

        if let (Some(start), Some(end)) = (from, to) {
            scope.date_range = Some(DateRange { start, end });
        }

        let kind = match kind {
            Some(kind) => kind,
            None => {
                debug!("ignoring location without a kind parameter");
                return None;
            }
        };

        Some(PartialInvestigation {
            id: id.unwrap_or_else(InvestigationContext::generate_id),
            kind,
            scope,
        })
    }
}
