//! Technologies are the scenario's view of a kind of supplier (e.g. hard coal power plants). Each
//! one is mapped onto inventory activities with a [`FilterSpec`].
use crate::filter::{FilterSpec, Predicate, compile};
use crate::id::define_id_type;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::rc::Rc;

define_id_type! {TechnologyID}

/// A map of [`Technology`]s, keyed by technology ID
pub type TechnologyMap = IndexMap<TechnologyID, Rc<Technology>>;

/// A technology and the rule for finding its inventory activities
#[derive(Debug, Clone, PartialEq)]
pub struct Technology {
    /// Unique identifier (e.g. "Coal PC")
    pub id: TechnologyID,
    /// The scenario variable reporting this technology's output (e.g. "SE|Electricity|Coal|PC")
    pub variable: Option<String>,
    /// The filter specification, as given in the input file
    pub filter: FilterSpec,
    /// The compiled filter
    pub predicate: Predicate,
}

impl Technology {
    /// Create a new technology, compiling its filter specification
    pub fn new(id: TechnologyID, variable: Option<String>, filter: FilterSpec) -> Result<Self> {
        let predicate =
            compile(&filter).with_context(|| format!("Invalid filter for technology {id}"))?;

        Ok(Self {
            id,
            variable,
            filter,
            predicate,
        })
    }
}

/// Find the technology reporting the given scenario variable, if any
pub fn technology_for_variable<'a>(
    technologies: &'a TechnologyMap,
    variable: &str,
) -> Option<&'a Rc<Technology>> {
    technologies
        .values()
        .find(|technology| technology.variable.as_deref() == Some(variable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Criteria;

    #[test]
    fn invalid_filter_has_context() {
        let filter = FilterSpec {
            filter: Criteria::default(),
            mask: Criteria::default(),
            filter_exact: false,
            mask_exact: false,
        };
        let err = Technology::new("Coal".into(), None, filter).unwrap_err();
        assert_eq!(err.to_string(), "Invalid filter for technology Coal");
    }
}
