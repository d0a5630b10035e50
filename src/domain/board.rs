// Derived board view models
use super::person::Person;
use super::zone::ZoneType;

/// Everyone currently in one zone band, for the summary cards.
#[derive(Debug, Clone)]
pub struct ZoneSummary {
    pub zone: ZoneType,
    pub people: Vec<Person>,
}

/// A social cluster big enough to be worth joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinAlert {
    pub zone: ZoneType,
    /// Name of the place, falling back to a generic one when the cluster
    /// carries no zone label.
    pub place: String,
    pub count: usize,
}
