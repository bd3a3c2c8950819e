//! The life-cycle inventory: a set of databases of [`Activity`] records which can be queried with
//! [`Predicate`]s.
//!
//! The inventory is read-only once loaded and is passed explicitly to every query.
use crate::activity::{Activity, ActivityKey, DatabaseID};
use crate::error::LcaError;
use crate::filter::{Field, MatchMode, Predicate};
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::rc::Rc;

/// A single inventory database (e.g. the inventory for one scenario and year)
#[derive(Debug)]
pub struct Database {
    id: DatabaseID,
    /// Activities in the order they were loaded
    activities: Vec<Rc<Activity>>,
    /// Indexes into `activities`, keyed by location
    by_location: HashMap<String, Vec<usize>>,
}

impl Database {
    /// Create a new, empty database
    pub fn new(id: DatabaseID) -> Self {
        Self {
            id,
            activities: Vec::new(),
            by_location: HashMap::new(),
        }
    }

    /// The name of this database
    pub fn id(&self) -> &DatabaseID {
        &self.id
    }

    /// The number of activities in this database
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether this database contains no activities
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Iterate over all activities in load order
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Activity>> {
        self.activities.iter()
    }

    fn push(&mut self, activity: Rc<Activity>) {
        self.by_location
            .entry(activity.location.clone())
            .or_default()
            .push(self.activities.len());
        self.activities.push(activity);
    }

    /// Select the activities which match `predicate`.
    ///
    /// If `locations` is non-empty, only activities in one of these locations are considered.
    ///
    /// # Returns
    ///
    /// Matching activities in the order in which they were loaded.
    pub fn select(&self, predicate: &Predicate, locations: &[String]) -> Vec<Rc<Activity>> {
        if locations.is_empty() {
            return self
                .activities
                .iter()
                .filter(|activity| predicate.matches(activity))
                .cloned()
                .collect();
        }

        // Use the location index rather than scanning the whole database
        let mut indexes: Vec<usize> = locations
            .iter()
            .filter_map(|location| self.by_location.get(location))
            .flatten()
            .copied()
            .collect();
        indexes.sort_unstable();
        indexes.dedup();

        indexes
            .into_iter()
            .map(|idx| &self.activities[idx])
            .filter(|activity| predicate.matches(activity))
            .cloned()
            .collect()
    }

    /// Find the single activity with exactly this name in this location.
    ///
    /// # Returns
    ///
    /// The activity, [`LcaError::ActivityNotFound`] if there is none or
    /// [`LcaError::AmbiguousActivity`] if there is more than one.
    pub fn get_exact(&self, name: &str, location: &str) -> Result<Rc<Activity>> {
        let predicate = Predicate::field(Field::Name, name, MatchMode::Exact);
        let mut found = self.select(&predicate, &[location.to_string()]);
        match found.len() {
            1 => Ok(found.remove(0)),
            0 => Err(LcaError::ActivityNotFound {
                name: name.into(),
                location: location.into(),
                database: self.id.to_string(),
            }
            .into()),
            count => Err(LcaError::AmbiguousActivity {
                name: name.into(),
                location: location.into(),
                database: self.id.to_string(),
                count,
            }
            .into()),
        }
    }
}

/// A collection of inventory databases
#[derive(Debug, Default)]
pub struct Inventory {
    databases: IndexMap<DatabaseID, Database>,
    keys: HashMap<ActivityKey, Rc<Activity>>,
}

impl Inventory {
    /// Create an inventory from activities.
    ///
    /// Databases are created as needed. Each activity key must be unique.
    pub fn from_activities<I>(activities: I) -> Result<Self>
    where
        I: IntoIterator<Item = Activity>,
    {
        let mut inventory = Inventory::default();
        for activity in activities {
            let activity = Rc::new(activity);
            ensure!(
                !inventory.keys.contains_key(&activity.key),
                "Duplicate activity key: {}",
                activity.key
            );
            inventory
                .keys
                .insert(activity.key.clone(), Rc::clone(&activity));
            inventory
                .databases
                .entry(activity.database().clone())
                .or_insert_with(|| Database::new(activity.database().clone()))
                .push(activity);
        }

        Ok(inventory)
    }

    /// Get a database by name
    pub fn get_database(&self, id: &DatabaseID) -> Result<&Database> {
        let database = self
            .databases
            .get(id)
            .ok_or_else(|| LcaError::config(format!("Database {id} not found in inventory")))?;

        Ok(database)
    }

    /// Look up an activity by its key
    pub fn get(&self, key: &ActivityKey) -> Option<&Rc<Activity>> {
        self.keys.get(key)
    }

    /// Iterate over the databases
    pub fn iter_databases(&self) -> impl Iterator<Item = &Database> {
        self.databases.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{activity, assert_error};
    use itertools::Itertools;

    fn inventory() -> Inventory {
        Inventory::from_activities([
            activity("db", "1", "electricity production, hard coal", "electricity", "DE"),
            activity("db", "2", "electricity production, hard coal", "electricity", "FR"),
            activity("db", "3", "electricity production, nuclear", "electricity", "DE"),
            activity("db", "4", "electricity production, hard coal", "electricity", "DE"),
            activity("other", "1", "electricity production, hard coal", "electricity", "DE"),
        ])
        .unwrap()
    }

    fn codes(activities: &[Rc<Activity>]) -> Vec<&str> {
        activities.iter().map(|a| a.key.code.as_str()).collect()
    }

    #[test]
    fn select_is_scoped_to_database() {
        let inventory = inventory();
        let predicate = Predicate::field(Field::Name, "electricity production", MatchMode::Prefix);

        let db = inventory.get_database(&"db".into()).unwrap();
        assert_eq!(codes(&db.select(&predicate, &[])), ["1", "2", "3", "4"]);

        let other = inventory.get_database(&"other".into()).unwrap();
        assert_eq!(other.select(&predicate, &[]).len(), 1);
    }

    #[test]
    fn select_with_locations_keeps_load_order() {
        let inventory = inventory();
        let db = inventory.get_database(&"db".into()).unwrap();
        let predicate = Predicate::field(
            Field::Name,
            "electricity production, hard coal",
            MatchMode::Exact,
        );

        let found = db.select(&predicate, &["FR".into(), "DE".into()]);
        assert_eq!(codes(&found), ["1", "2", "4"]);
        assert!(db.select(&predicate, &["US".into()]).is_empty());
    }

    #[test]
    fn get_exact() {
        let inventory = inventory();
        let db = inventory.get_database(&"db".into()).unwrap();

        let found = db.get_exact("electricity production, nuclear", "DE").unwrap();
        assert_eq!(found.key, ActivityKey::new("db", "3"));

        // Prefix isn't enough
        let err = db.get_exact("electricity production", "DE").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LcaError>(),
            Some(LcaError::ActivityNotFound { .. })
        ));

        // Two activities with this name in DE
        let err = db
            .get_exact("electricity production, hard coal", "DE")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<LcaError>(),
            Some(&LcaError::AmbiguousActivity {
                name: "electricity production, hard coal".into(),
                location: "DE".into(),
                database: "db".into(),
                count: 2
            })
        );
    }

    #[test]
    fn unknown_database() {
        assert_error!(
            inventory().get_database(&"missing".into()),
            "Configuration error: Database missing not found in inventory"
        );
    }

    #[test]
    fn duplicate_keys_rejected() {
        let result = Inventory::from_activities([
            activity("db", "1", "a", "x", "DE"),
            activity("db", "1", "b", "x", "DE"),
        ]);
        assert_error!(result, "Duplicate activity key: (db, 1)");
    }

    #[test]
    fn databases_in_load_order() {
        let ids = inventory()
            .iter_databases()
            .map(|db| db.id().to_string())
            .collect_vec();
        assert_eq!(ids, ["db", "other"]);
    }
}
