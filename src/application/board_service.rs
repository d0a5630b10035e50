// Board service - Derives summary cards and join alerts from a snapshot
use crate::domain::board::{JoinAlert, ZoneSummary};
use crate::domain::snapshot::Snapshot;
use crate::domain::zone::ZoneType;

/// One summary per zone band that has anyone in it, in canonical order.
pub fn zone_summaries(snapshot: &Snapshot) -> Vec<ZoneSummary> {
    let mut summaries = Vec::new();

    for zone in ZoneType::ORDER {
        let people: Vec<_> = snapshot.people_in(zone).into_iter().cloned().collect();
        if people.is_empty() {
            continue;
        }
        summaries.push(ZoneSummary { zone, people });
    }

    summaries
}

/// Join alerts for social zones: any pub/restaurant/cafe cluster with at
/// least two people raises one alert. Single-member clusters never do.
pub fn join_alerts(snapshot: &Snapshot) -> Vec<JoinAlert> {
    let mut alerts = Vec::new();

    for zone in ZoneType::SOCIAL {
        for cluster in snapshot.clusters_for(zone) {
            if cluster.members.len() < 2 {
                continue;
            }
            let place = cluster.zone.clone().unwrap_or_else(|| {
                if zone == ZoneType::Pub {
                    "the pub".to_string()
                } else {
                    "lunch".to_string()
                }
            });
            alerts.push(JoinAlert {
                zone,
                place,
                count: cluster.members.len(),
            });
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::person::Person;
    use crate::domain::snapshot::Cluster;
    use std::collections::HashMap;

    fn person(id: u64) -> Person {
        Person {
            id,
            name: format!("Person {id}"),
            avatar_emoji: None,
            current_zone: None,
        }
    }

    fn cluster(zone: Option<&str>, size: usize) -> Cluster {
        Cluster {
            zone: zone.map(str::to_string),
            members: (0..size as u64).map(person).collect(),
        }
    }

    fn snapshot(entries: Vec<(&str, Vec<Cluster>)>) -> Snapshot {
        let grouped: HashMap<String, Vec<Cluster>> = entries
            .into_iter()
            .map(|(tag, clusters)| (tag.to_string(), clusters))
            .collect();
        Snapshot {
            grouped,
            clusters: Vec::new(),
        }
    }

    #[test]
    fn test_pair_at_pub_raises_alert() {
        let snap = snapshot(vec![("pub", vec![cluster(Some("The Anchor"), 2)])]);
        let alerts = join_alerts(&snap);
        assert_eq!(
            alerts,
            vec![JoinAlert {
                zone: ZoneType::Pub,
                place: "The Anchor".to_string(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_singles_everywhere_raise_nothing() {
        let snap = snapshot(vec![
            ("pub", vec![cluster(None, 1)]),
            ("restaurant", vec![cluster(None, 1), cluster(None, 1)]),
            ("cafe", vec![cluster(None, 1)]),
        ]);
        assert!(join_alerts(&snap).is_empty());
    }

    #[test]
    fn test_office_crowds_are_not_social() {
        let snap = snapshot(vec![("office", vec![cluster(Some("HQ"), 5)])]);
        assert!(join_alerts(&snap).is_empty());
    }

    #[test]
    fn test_unlabeled_place_falls_back() {
        let snap = snapshot(vec![
            ("pub", vec![cluster(None, 2)]),
            ("cafe", vec![cluster(None, 3)]),
        ]);
        let alerts = join_alerts(&snap);
        assert_eq!(alerts[0].place, "the pub");
        assert_eq!(alerts[1].place, "lunch");
    }

    #[test]
    fn test_summaries_flatten_clusters_in_order() {
        let snap = snapshot(vec![
            ("gym", vec![cluster(None, 1)]),
            ("office", vec![cluster(None, 2), cluster(None, 1)]),
        ]);
        let summaries = zone_summaries(&snap);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].zone, ZoneType::Office);
        assert_eq!(summaries[0].people.len(), 3);
        assert_eq!(summaries[1].zone, ZoneType::Gym);
    }
}
