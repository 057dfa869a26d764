//! Backend-agnostic artifact search.
//!
//! A [`Query`] is a [`Filter`] plus `limit`/`offset`. Every backend applies it
//! the same way through [`Query::apply`]: filter the latest version of each
//! artifact in identifier order, then skip `offset`, then take `limit`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::artifact::{Artifact, ArtifactType};
use crate::condition::Condition;

/// Default page size for listings and searches.
pub const DEFAULT_LIMIT: usize = 100;

/// A predicate over artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Matches every artifact.
    #[default]
    All,
    /// Matches nothing.
    None,
    /// Matches the artifact with this identifier.
    Identifier { id: String },
    /// Matches artifacts of this type.
    Type { item_type: ArtifactType },
    /// Evaluates `condition` against the body value at a dot-separated path.
    Field { path: String, condition: Condition },
    And { filters: Vec<Filter> },
    Or { filters: Vec<Filter> },
    Not { filter: Box<Filter> },
}

impl Filter {
    pub fn matches(&self, artifact: &Artifact) -> bool {
        match self {
            Filter::All => true,
            Filter::None => false,
            Filter::Identifier { id } => artifact.identifier == *id,
            Filter::Type { item_type } => artifact.kind == *item_type,
            Filter::Field { path, condition } => {
                condition.evaluate(resolve_path(&artifact.body, path))
            }
            Filter::And { filters } => filters.iter().all(|f| f.matches(artifact)),
            Filter::Or { filters } => filters.iter().any(|f| f.matches(artifact)),
            Filter::Not { filter } => !filter.matches(artifact),
        }
    }
}

/// Resolves `a.b.0.c` inside a JSON value. Numeric segments index arrays.
/// An empty path is the value itself.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// A filter with pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub filter: Filter,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for Query {
    fn default() -> Self {
        Query {
            filter: Filter::All,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Query {
            filter,
            ..Query::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Filters `artifacts` (already in identifier order) and paginates.
    pub fn apply(&self, artifacts: impl IntoIterator<Item = Artifact>) -> Vec<Artifact> {
        artifacts
            .into_iter()
            .filter(|a| self.filter.matches(a))
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

/// Applies plain `limit`/`offset` pagination.
pub fn paginate<T>(items: impl IntoIterator<Item = T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample() -> Vec<Artifact> {
        vec![
            Artifact::new("card", ArtifactType::NegotiationCard, json!({"system": {"goal": "triage"}})),
            Artifact::new("cpu", ArtifactType::Value, json!({"max": 0.7, "tags": ["cost"]})),
            Artifact::new("memory", ArtifactType::Value, json!({"max": 9000, "tags": ["cost"]})),
            Artifact::new("spec", ArtifactType::Spec, json!({"properties": []})),
        ]
    }

    fn ids(artifacts: &[Artifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.identifier.as_str()).collect()
    }

    #[test]
    fn all_and_none() {
        assert_eq!(Query::default().apply(sample()).len(), 4);
        assert!(Query::new(Filter::None).apply(sample()).is_empty());
    }

    #[test]
    fn type_and_identifier_filters() {
        let values = Query::new(Filter::Type {
            item_type: ArtifactType::Value,
        })
        .apply(sample());
        assert_eq!(ids(&values), vec!["cpu", "memory"]);

        let spec = Query::new(Filter::Identifier { id: "spec".into() }).apply(sample());
        assert_eq!(ids(&spec), vec!["spec"]);
    }

    #[test]
    fn field_filter_resolves_nested_paths() {
        let query = Query::new(Filter::Field {
            path: "max".into(),
            condition: Condition::LessOrEqual { value: 1.0 },
        });
        assert_eq!(ids(&query.apply(sample())), vec!["cpu"]);

        let goal = Query::new(Filter::Field {
            path: "system.goal".into(),
            condition: Condition::Equals { value: json!("triage") },
        });
        assert_eq!(ids(&goal.apply(sample())), vec!["card"]);

        let tag = Query::new(Filter::Field {
            path: "tags.0".into(),
            condition: Condition::Equals { value: json!("cost") },
        });
        assert_eq!(ids(&tag.apply(sample())), vec!["cpu", "memory"]);
    }

    #[test]
    fn composite_filters() {
        let query = Query::new(Filter::And {
            filters: vec![
                Filter::Type {
                    item_type: ArtifactType::Value,
                },
                Filter::Not {
                    filter: Box::new(Filter::Identifier { id: "cpu".into() }),
                },
            ],
        });
        assert_eq!(ids(&query.apply(sample())), vec!["memory"]);

        let either = Query::new(Filter::Or {
            filters: vec![
                Filter::Identifier { id: "card".into() },
                Filter::Identifier { id: "spec".into() },
            ],
        });
        assert_eq!(ids(&either.apply(sample())), vec!["card", "spec"]);
    }

    #[test]
    fn pagination_applies_after_filtering() {
        let query = Query::new(Filter::Type {
            item_type: ArtifactType::Value,
        })
        .with_offset(1)
        .with_limit(5);
        assert_eq!(ids(&query.apply(sample())), vec!["memory"]);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let query: Query = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query, Query::default());
    }

    #[test]
    fn wire_format() {
        let query = Query::new(Filter::And {
            filters: vec![
                Filter::Type {
                    item_type: ArtifactType::ValidatedSpec,
                },
                Filter::Field {
                    path: "result.score".into(),
                    condition: Condition::GreaterThan { value: 0.5 },
                },
            ],
        })
        .with_limit(10);
        assert_json_snapshot!(query, @r###"
        {
          "filter": {
            "type": "and",
            "filters": [
              {
                "type": "type",
                "item_type": "validated_spec"
              },
              {
                "type": "field",
                "path": "result.score",
                "condition": {
                  "op": "greater_than",
                  "value": 0.5
                }
              }
            ]
          },
          "limit": 10,
          "offset": 0
        }
        "###);
    }

    proptest! {
        #[test]
        fn paginate_never_exceeds_limit(len in 0usize..50, limit in 0usize..20, offset in 0usize..60) {
            let items: Vec<usize> = (0..len).collect();
            let page = paginate(items, limit, offset);
            prop_assert!(page.len() <= limit);
            prop_assert_eq!(page.first().copied(), if offset < len && limit > 0 { Some(offset) } else { None });
        }
    }
}
