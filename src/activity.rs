//! Activities are the process records of a life-cycle inventory (e.g. "electricity production,
//! hard coal" in Germany). Each one has a reference product and a list of exchanges with other
//! activities and with the environment.
use crate::id::define_id_type;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt;

define_id_type! {DatabaseID}

/// The unique identity of an activity: its database plus an opaque code.
///
/// Activity names are not unique, even in combination with location, so the key is the only safe
/// way to refer to a particular activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityKey {
    /// The database containing the activity
    pub database: DatabaseID,
    /// The code of the activity within its database
    pub code: String,
}

impl ActivityKey {
    /// Create a new key
    pub fn new(database: impl Into<DatabaseID>, code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.database, self.code)
    }
}

/// The type of an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeLabeledStringEnum)]
pub enum ExchangeType {
    /// The reference output of the activity
    #[string = "production"]
    Production,
    /// An input from (or output to) another activity
    #[string = "technosphere"]
    Technosphere,
    /// An elementary flow from or to the environment
    #[string = "biosphere"]
    Biosphere,
}

/// A flow between an activity and another activity or the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// The activity (or elementary flow) on the other end of the exchange
    pub input: ActivityKey,
    /// Amount per unit of the reference product
    pub amount: f64,
    /// Unit of `amount`
    pub unit: String,
    /// The type of exchange
    pub kind: ExchangeType,
}

/// A process record in the life-cycle inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    /// Unique identity of this activity
    pub key: ActivityKey,
    /// Activity name (e.g. "electricity production, hard coal")
    pub name: String,
    /// The reference product (e.g. "electricity, high voltage")
    pub product: String,
    /// Location code (e.g. "DE", "RER" or a scenario region)
    pub location: String,
    /// The unit of the reference product
    pub unit: String,
    /// Exchanges, in the order given in the inventory
    pub exchanges: Vec<Exchange>,
}

impl Activity {
    /// The database this activity belongs to
    pub fn database(&self) -> &DatabaseID {
        &self.key.database
    }

    /// Iterate over the technosphere exchanges of this activity
    pub fn technosphere(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges
            .iter()
            .filter(|exchange| exchange.kind == ExchangeType::Technosphere)
    }
}
