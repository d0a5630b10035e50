// Snapshot wire shapes pushed and pulled from the presence server
use super::person::Person;
use super::zone::ZoneType;
use serde::Deserialize;
use std::collections::HashMap;

/// One zone instance (a specific pub, a specific office floor) and the
/// people currently co-located there, in arrival order.
#[derive(Debug, Clone, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub members: Vec<Person>,
}

/// Grouping of clusters keyed by zone-type tag. Treated as immutable input:
/// every consumer derives its own state from a whole snapshot at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub grouped: HashMap<String, Vec<Cluster>>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

impl Snapshot {
    pub fn clusters_for(&self, zone: ZoneType) -> &[Cluster] {
        self.grouped.get(zone.tag()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Everyone in a zone band, flattened across its clusters.
    pub fn people_in(&self, zone: ZoneType) -> Vec<&Person> {
        self.clusters_for(zone)
            .iter()
            .flat_map(|c| c.members.iter())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        ZoneType::ORDER
            .iter()
            .all(|zone| self.clusters_for(*zone).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_server_shape() {
        let raw = r#"{
            "grouped": {
                "pub": [{"zone": "The Anchor", "members": [
                    {"id": 1, "name": "Ada Lovelace", "avatar_emoji": "🦆"},
                    {"id": 2, "name": "Grace Hopper", "current_zone": "The Anchor"}
                ]}]
            },
            "clusters": []
        }"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        let clusters = snapshot.clusters_for(ZoneType::Pub);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].zone.as_deref(), Some("The Anchor"));
        assert_eq!(clusters[0].members.len(), 2);
        assert!(snapshot.clusters_for(ZoneType::Gym).is_empty());
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.people_in(ZoneType::Office).is_empty());
    }
}
