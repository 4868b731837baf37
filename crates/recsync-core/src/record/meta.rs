//! Deployment-defined meta fields.
//!
//! The set of meta fields is configuration owned by the server. recsync
//! passes values through untouched and never hardcodes field names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of one meta field on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// A checkbox-style flag.
    Flag(bool),
    /// A multi-select value.
    List(Vec<String>),
    /// A single-select or free-text value.
    Text(String),
}

impl MetaValue {
    /// True for empty strings and empty lists. Flags are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            MetaValue::Flag(_) => false,
            MetaValue::List(values) => values.is_empty(),
            MetaValue::Text(value) => value.is_empty(),
        }
    }

    /// Values as a list, wrapping a single text value.
    pub fn values(&self) -> Vec<String> {
        match self {
            MetaValue::Flag(flag) => vec![flag.to_string()],
            MetaValue::List(values) => values.clone(),
            MetaValue::Text(value) => vec![value.clone()],
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Flag(flag) => write!(f, "{}", flag),
            MetaValue::List(values) => write!(f, "{}", values.join(", ")),
            MetaValue::Text(value) => write!(f, "{}", value),
        }
    }
}

/// Meta values of a record, keyed by field id.
pub type MetaMap = BTreeMap<String, MetaValue>;

/// Description of one meta field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Display name.
    pub name: String,
    /// Allowed options.
    #[serde(default)]
    pub options: Vec<String>,
    /// Whether several options may be selected.
    #[serde(default)]
    pub multiple: bool,
    /// Position among the configured fields.
    #[serde(default)]
    pub order: u32,
}

/// The meta-field schema of a deployment, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaSchema(BTreeMap<String, FieldSpec>);

impl MetaSchema {
    /// Create a schema from field specs.
    pub fn new(fields: BTreeMap<String, FieldSpec>) -> Self {
        Self(fields)
    }

    /// Parse `META_SEL_<X>` / `META_MSEL_<X>` variables.
    ///
    /// Each value has the form `Display Name:option a,option b`. The field
    /// id is the lowercased display name with spaces replaced by `_`.
    /// `META_MSEL_` fields allow multiple selections. Variables without a
    /// `:` are ignored.
    pub fn from_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut fields = BTreeMap::new();
        let mut order = 0;
        for (key, value) in vars {
            let key = key.as_ref();
            let multiple = if key.starts_with("META_MSEL_") {
                true
            } else if key.starts_with("META_SEL_") {
                false
            } else {
                continue;
            };

            let Some((name, options)) = value.as_ref().split_once(':') else {
                continue;
            };

            let id = name.trim().to_lowercase().replace(' ', "_");
            let options = options
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();

            fields.insert(
                id,
                FieldSpec {
                    name: name.trim().to_string(),
                    options,
                    multiple,
                    order,
                },
            );
            order += 1;
        }
        Self(fields)
    }

    /// Look up a field by id.
    pub fn get(&self, id: &str) -> Option<&FieldSpec> {
        self.0.get(id)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the deployment defines no meta fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields in display order: single-select first, then multi-select,
    /// each by configured order and then id.
    pub fn ordered(&self) -> Vec<(&str, &FieldSpec)> {
        let mut fields: Vec<_> = self
            .0
            .iter()
            .map(|(id, f)| (id.as_str(), f))
            .collect();
        fields.sort_by(|(a_id, a), (b_id, b)| {
            (a.multiple, a.order, *a_id).cmp(&(b.multiple, b.order, *b_id))
        });
        fields
    }

    /// Meta values for a freshly reset draft.
    pub fn blank_values(&self) -> MetaMap {
        self.0
            .iter()
            .map(|(id, field)| {
                let value = if field.multiple {
                    MetaValue::List(Vec::new())
                } else {
                    MetaValue::Text(String::new())
                };
                (id.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untagged_values() {
        let meta: MetaMap = serde_json::from_value(json!({
            "billable": true,
            "required_apps": ["Excel", "Word"],
            "work_type": "Support"
        }))
        .unwrap();

        assert_eq!(meta["billable"], MetaValue::Flag(true));
        assert_eq!(
            meta["required_apps"],
            MetaValue::List(vec!["Excel".into(), "Word".into()])
        );
        assert_eq!(meta["work_type"], MetaValue::Text("Support".into()));
    }

    #[test]
    fn blank_detection() {
        assert!(MetaValue::Text(String::new()).is_blank());
        assert!(MetaValue::List(vec![]).is_blank());
        assert!(!MetaValue::Flag(false).is_blank());
    }

    #[test]
    fn parses_env_schema() {
        let schema = MetaSchema::from_env([
            ("META_SEL_WorkType", "Work Type:Support, Project"),
            ("META_MSEL_Apps", "Required Apps:Excel,Word"),
            ("META_SEL_Broken", "no colon here"),
            ("PATH", "/usr/bin"),
        ]);

        assert_eq!(schema.len(), 2);
        let work_type = schema.get("work_type").unwrap();
        assert_eq!(work_type.name, "Work Type");
        assert_eq!(work_type.options, vec!["Support", "Project"]);
        assert!(!work_type.multiple);
        assert!(schema.get("required_apps").unwrap().multiple);
    }

    #[test]
    fn orders_single_select_first() {
        let schema = MetaSchema::from_env([
            ("META_MSEL_A", "Apps:x"),
            ("META_SEL_B", "Kind:y"),
        ]);
        let ids: Vec<_> = schema.ordered().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["kind", "apps"]);
    }

    #[test]
    fn blank_values_by_kind() {
        let schema = MetaSchema::from_env([
            ("META_MSEL_A", "Apps:x"),
            ("META_SEL_B", "Kind:y"),
        ]);
        let blank = schema.blank_values();
        assert_eq!(blank["apps"], MetaValue::List(vec![]));
        assert_eq!(blank["kind"], MetaValue::Text(String::new()));
    }
}
