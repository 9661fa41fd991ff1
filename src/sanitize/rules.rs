//! Per-resource-type attribute rules.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

/// Attribute handling for one JSON:API resource type.
#[derive(Debug)]
pub struct TypeRules {
    pub resource_type: &'static str,
    /// Attributes removed outright.
    pub deny: &'static [&'static str],
    /// Free-text attributes whose markup is stripped, keeping the text.
    pub strip_html: &'static [&'static str],
}

const PAGE_DENY: &[&str] = &[
    "preferences",
    "cover_image_meta",
    "custom_fields",
    "version_number",
    "position",
];

pub const TYPE_RULES: &[TypeRules] = &[
    TypeRules {
        resource_type: "tasks",
        deny: &["creation_method_id", "email_key", "placement"],
        strip_html: &["description"],
    },
    TypeRules {
        resource_type: "comments",
        deny: &[],
        strip_html: &["body"],
    },
    TypeRules {
        resource_type: "todos",
        deny: &[],
        strip_html: &["description"],
    },
    TypeRules {
        resource_type: "pages",
        deny: PAGE_DENY,
        strip_html: &[],
    },
    TypeRules {
        resource_type: "page",
        deny: PAGE_DENY,
        strip_html: &[],
    },
    TypeRules {
        resource_type: "attachments",
        deny: &["attachable_type", "attachable_id"],
        strip_html: &[],
    },
    TypeRules {
        resource_type: "projects",
        deny: &[
            "sample_data",
            "template",
            "time_on_tasks",
            "project_color_id",
            "duplication_status",
            "project_type_id",
            "preferences",
            // duplicates project_number
            "number",
        ],
        strip_html: &[],
    },
];

static NO_RULES: TypeRules = TypeRules {
    resource_type: "",
    deny: &[],
    strip_html: &[],
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    #[error("rule entry {0} has an empty resource type")]
    EmptyType(usize),

    #[error("resource type '{0}' has more than one rule entry")]
    Duplicate(&'static str),
}

/// Check the rule table for empty or repeated type tags.
pub fn validate() -> Result<(), RuleTableError> {
    validate_table(TYPE_RULES)
}

fn validate_table(table: &'static [TypeRules]) -> Result<(), RuleTableError> {
    let mut seen = HashSet::new();
    for (index, rules) in table.iter().enumerate() {
        if rules.resource_type.is_empty() {
            return Err(RuleTableError::EmptyType(index));
        }
        if !seen.insert(rules.resource_type) {
            return Err(RuleTableError::Duplicate(rules.resource_type));
        }
    }
    Ok(())
}

/// Rules for `resource_type`; unknown or missing types get no filtering.
pub fn rules_for(resource_type: Option<&str>) -> &'static TypeRules {
    resource_type
        .and_then(|t| TYPE_RULES.iter().find(|rules| rules.resource_type == t))
        .unwrap_or(&NO_RULES)
}

/// Apply the deny list and markup stripping for `resource_type`.
pub fn filter_attributes(
    resource_type: Option<&str>,
    mut attributes: Map<String, Value>,
) -> Map<String, Value> {
    let rules = rules_for(resource_type);

    for field in rules.deny {
        attributes.remove(*field);
    }

    for field in rules.strip_html {
        let stripped = match attributes.get(*field) {
            Some(Value::String(text)) => strip_markup(text),
            _ => continue,
        };
        if stripped.is_empty() {
            attributes.remove(*field);
        } else {
            attributes.insert(field.to_string(), Value::String(stripped));
        }
    }

    attributes
}

/// Remove every markup tag from `text`, keeping the text content.
///
/// Comments are dropped. A `<` or `>` that does not open a tag stays in the
/// text, escaped as an HTML entity.
pub fn strip_markup(text: &str) -> String {
    ammonia::Builder::empty().clean(text).to_string()
}
