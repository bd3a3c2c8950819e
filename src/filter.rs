//! Filter specifications describe which inventory activities represent a technology.
//!
//! A [`FilterSpec`] is compiled into a [`Predicate`], a small boolean expression tree which can be
//! evaluated against each [`Activity`] of an inventory database.
//!
//! The semantics are:
//!
//! * `filter`: for each field, the activity must match *any* of the given values (prefix match, or
//!   exact match if `filter_exact` is set). All fields must be satisfied.
//! * `mask`: for each field, the activity must *not* match *any* of the given values (substring
//!   match, or exact match if `mask_exact` is set).
use crate::activity::Activity;
use crate::error::LcaError;
use anyhow::Result;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use std::fmt;

/// One or more values to match a field against
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Values {
    /// A single value
    One(String),
    /// Several values
    Many(Vec<String>),
}

impl Values {
    fn into_vec(self) -> Vec<String> {
        match self {
            Values::One(value) => vec![value],
            Values::Many(values) => values,
        }
    }
}

/// Matching criteria for a filter or mask.
///
/// A bare string or list of strings is shorthand for criteria on the `name` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Criteria {
    /// A single value for the `name` field
    Name(String),
    /// Several values for the `name` field
    Names(Vec<String>),
    /// Values keyed by field name
    Fields(IndexMap<String, Values>),
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::Fields(IndexMap::new())
    }
}

impl Criteria {
    /// Convert to a list of field names and values
    fn normalise(&self) -> Vec<(String, Vec<String>)> {
        match self.clone() {
            Criteria::Name(name) => vec![("name".into(), vec![name])],
            Criteria::Names(names) => vec![("name".into(), names)],
            Criteria::Fields(fields) => fields
                .into_iter()
                .map(|(field, values)| (field, values.into_vec()))
                .collect(),
        }
    }
}

/// A rule for selecting the inventory activities which represent a technology
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterSpec {
    /// Activities must match these criteria
    pub filter: Criteria,
    /// Activities must not match these criteria
    #[serde(default)]
    pub mask: Criteria,
    /// Whether filter values must match exactly, rather than as a prefix
    #[serde(default)]
    pub filter_exact: bool,
    /// Whether mask values must match exactly, rather than as a substring
    #[serde(default)]
    pub mask_exact: bool,
}

/// A field of an [`Activity`] which can be matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The activity name
    Name,
    /// The reference product
    Product,
    /// The location code
    Location,
    /// The unit of the reference product
    Unit,
}

impl Field {
    /// Get a field from its name in a filter specification.
    ///
    /// `"reference product"` is an alias for the product field.
    pub fn from_key(key: &str) -> Result<Self, LcaError> {
        match key {
            "name" => Ok(Field::Name),
            "reference product" | "product" => Ok(Field::Product),
            "location" => Ok(Field::Location),
            "unit" => Ok(Field::Unit),
            _ => Err(LcaError::config(format!("Unknown filter field: {key}"))),
        }
    }

    /// Get the value of this field for an activity
    pub fn get<'a>(&self, activity: &'a Activity) -> &'a str {
        match self {
            Field::Name => &activity.name,
            Field::Product => &activity.product,
            Field::Location => &activity.location,
            Field::Unit => &activity.unit,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Product => "product",
            Field::Location => "location",
            Field::Unit => "unit",
        };
        write!(f, "{name}")
    }
}

/// How a field value is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The field equals the value
    Exact,
    /// The field starts with the value
    Prefix,
    /// The field contains the value
    Contains,
}

/// A boolean expression over activity fields
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// True if all sub-predicates are true (or there are none)
    And(Vec<Predicate>),
    /// True if any sub-predicate is true
    Or(Vec<Predicate>),
    /// Negation
    Not(Box<Predicate>),
    /// Compare a single field against a value
    Field {
        /// The field to compare
        field: Field,
        /// The value to compare against
        value: String,
        /// How to compare
        mode: MatchMode,
    },
}

impl Predicate {
    /// Create a predicate comparing one field against a value
    pub fn field(field: Field, value: impl Into<String>, mode: MatchMode) -> Self {
        Predicate::Field {
            field,
            value: value.into(),
            mode,
        }
    }

    /// A predicate which is true if the activity's location is one of `locations`
    pub fn location_in(locations: &[String]) -> Self {
        Predicate::Or(
            locations
                .iter()
                .map(|location| Predicate::field(Field::Location, location, MatchMode::Exact))
                .collect(),
        )
    }

    /// Combine with another predicate using AND
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut predicates) => {
                predicates.push(other);
                Predicate::And(predicates)
            }
            predicate => Predicate::And(vec![predicate, other]),
        }
    }

    /// Evaluate this predicate for the given activity
    pub fn matches(&self, activity: &Activity) -> bool {
        match self {
            Predicate::And(predicates) => predicates.iter().all(|p| p.matches(activity)),
            Predicate::Or(predicates) => predicates.iter().any(|p| p.matches(activity)),
            Predicate::Not(predicate) => !predicate.matches(activity),
            Predicate::Field { field, value, mode } => {
                let actual = field.get(activity);
                match mode {
                    MatchMode::Exact => actual == value,
                    MatchMode::Prefix => actual.starts_with(value.as_str()),
                    MatchMode::Contains => actual.contains(value.as_str()),
                }
            }
        }
    }
}

/// Compile a filter specification into a [`Predicate`].
///
/// # Arguments
///
/// * `spec` - The filter specification
///
/// # Returns
///
/// The predicate, or a [`LcaError::Config`] if the filter is empty, a filter field has no values or
/// a field name is unknown.
pub fn compile(spec: &FilterSpec) -> Result<Predicate> {
    let filter = spec.filter.normalise();
    if filter.is_empty() {
        return Err(LcaError::config("Filter must not be empty").into());
    }

    let filter_mode = if spec.filter_exact {
        MatchMode::Exact
    } else {
        MatchMode::Prefix
    };
    let mask_mode = if spec.mask_exact {
        MatchMode::Exact
    } else {
        MatchMode::Contains
    };

    let mut terms = Vec::new();
    for (key, values) in filter {
        let field = Field::from_key(&key)?;
        if values.is_empty() {
            return Err(LcaError::config(format!("No filter values given for field {key}")).into());
        }

        // Any of the values may match
        terms.push(Predicate::Or(
            values
                .into_iter()
                .map(|value| Predicate::field(field, value, filter_mode))
                .collect(),
        ));
    }

    for (key, values) in spec.mask.normalise() {
        let field = Field::from_key(&key)?;

        // None of the values may match
        terms.extend(
            values.into_iter().map(|value| {
                Predicate::Not(Box::new(Predicate::field(field, value, mask_mode)))
            }),
        );
    }

    Ok(Predicate::And(terms))
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(predicates) if predicates.is_empty() => write!(f, "true"),
            Predicate::Or(predicates) if predicates.is_empty() => write!(f, "false"),
            Predicate::And(predicates) => write!(f, "({})", predicates.iter().join(" & ")),
            Predicate::Or(predicates) => write!(f, "({})", predicates.iter().join(" | ")),
            Predicate::Not(predicate) => write!(f, "!{predicate}"),
            Predicate::Field { field, value, mode } => {
                let op = match mode {
                    MatchMode::Exact => "==",
                    MatchMode::Prefix => "^=",
                    MatchMode::Contains => "*=",
                };
                write!(f, "{field} {op} {value:?}")
            }
        }
    }
}
