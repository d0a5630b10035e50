// Layout engine - Packs zone bands, clusters and figures onto the canvas
use crate::domain::figure::Figure;
use crate::domain::snapshot::Snapshot;
use crate::domain::zone::ZoneType;
use rand::Rng;
use std::f32::consts::TAU;

const LEFT_MARGIN: f32 = 80.0;
const ZONE_LABEL_Y: f32 = 30.0;
const FIGURE_Y: f32 = 120.0;
const BADGE_Y: f32 = 70.0;
const MEMBER_SPACING: f32 = 70.0;
const CLUSTER_GAP: f32 = 40.0;
const ZONE_GAP: f32 = 80.0;

/// Source of per-person animation phases. Injectable so tests can pin it.
pub trait PhaseSource {
    fn next_phase(&mut self) -> f32;
}

pub struct RandomPhase<R: Rng>(pub R);

impl<R: Rng> PhaseSource for RandomPhase<R> {
    fn next_phase(&mut self) -> f32 {
        self.0.gen_range(0.0..TAU)
    }
}

/// Compute absolute positions for every drawable item in a snapshot.
///
/// Zone bands are laid out left to right in canonical zone order; within a
/// band, clusters keep arrival order and members keep fixed spacing. A
/// cluster of two or more gets exactly one badge centered over its span.
/// Pure apart from drawing phases from `phases`.
pub fn build_figures(snapshot: &Snapshot, phases: &mut dyn PhaseSource) -> Vec<Figure> {
    let mut figures = Vec::new();
    let mut cursor = LEFT_MARGIN;

    for zone in ZoneType::ORDER {
        let clusters = snapshot.clusters_for(zone);
        if clusters.is_empty() {
            continue;
        }

        figures.push(Figure::ZoneLabel {
            zone,
            x: cursor,
            y: ZONE_LABEL_Y,
        });

        let mut figure_x = cursor;
        for cluster in clusters {
            for (i, person) in cluster.members.iter().enumerate() {
                figures.push(Figure::Person {
                    name: person.first_name().to_string(),
                    glyph: person.avatar().to_string(),
                    x: figure_x + i as f32 * MEMBER_SPACING,
                    y: FIGURE_Y,
                    color: zone.color(),
                    phase: phases.next_phase(),
                });
            }

            let count = cluster.members.len();
            if count > 1 {
                figures.push(Figure::ClusterBadge {
                    count,
                    x: figure_x + (count - 1) as f32 * (MEMBER_SPACING / 2.0),
                    y: BADGE_Y,
                    color: zone.color(),
                });
            }

            figure_x += count as f32 * MEMBER_SPACING + CLUSTER_GAP;
        }

        cursor = figure_x + ZONE_GAP;
    }

    figures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::person::Person;
    use crate::domain::snapshot::Cluster;
    use std::collections::HashMap;

    struct FixedPhase(f32);

    impl PhaseSource for FixedPhase {
        fn next_phase(&mut self) -> f32 {
            self.0
        }
    }

    fn person(id: u64, name: &str) -> Person {
        Person {
            id,
            name: name.to_string(),
            avatar_emoji: None,
            current_zone: None,
        }
    }

    fn cluster(ids: &[u64]) -> Cluster {
        Cluster {
            zone: None,
            members: ids.iter().map(|id| person(*id, "Someone")).collect(),
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

    fn positions(figures: &[Figure]) -> Vec<(f32, f32)> {
        figures
            .iter()
            .map(|f| match f {
                Figure::ZoneLabel { x, y, .. } => (*x, *y),
                Figure::Person { x, y, .. } => (*x, *y),
                Figure::ClusterBadge { x, y, .. } => (*x, *y),
            })
            .collect()
    }

    #[test]
    fn test_counts_per_snapshot() {
        let snap = snapshot(vec![
            ("office", vec![cluster(&[1]), cluster(&[2, 3])]),
            ("gym", vec![cluster(&[4])]),
        ]);
        let figures = build_figures(&snap, &mut FixedPhase(0.0));

        let people = figures
            .iter()
            .filter(|f| matches!(f, Figure::Person { .. }))
            .count();
        let labels = figures
            .iter()
            .filter(|f| matches!(f, Figure::ZoneLabel { .. }))
            .count();
        let badges = figures
            .iter()
            .filter(|f| matches!(f, Figure::ClusterBadge { .. }))
            .count();

        assert_eq!(people, 4);
        assert_eq!(labels, 2);
        // One badge for the two-member cluster, none for singles.
        assert_eq!(badges, 1);
    }

    #[test]
    fn test_zone_bands_follow_canonical_order() {
        // Insertion order deliberately scrambled; bands must still come out
        // office, pub, gym.
        let snap = snapshot(vec![
            ("gym", vec![cluster(&[1])]),
            ("office", vec![cluster(&[2])]),
            ("pub", vec![cluster(&[3])]),
        ]);
        let figures = build_figures(&snap, &mut FixedPhase(0.0));

        let bands: Vec<ZoneType> = figures
            .iter()
            .filter_map(|f| match f {
                Figure::ZoneLabel { zone, .. } => Some(*zone),
                _ => None,
            })
            .collect();
        assert_eq!(bands, vec![ZoneType::Office, ZoneType::Pub, ZoneType::Gym]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let snap = snapshot(vec![
            ("office", vec![cluster(&[1, 2]), cluster(&[3])]),
            ("cafe", vec![cluster(&[4, 5, 6])]),
        ]);
        let first = positions(&build_figures(&snap, &mut FixedPhase(0.1)));
        let second = positions(&build_figures(&snap, &mut FixedPhase(2.5)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_member_spacing_and_badge_center() {
        let snap = snapshot(vec![("pub", vec![cluster(&[1, 2, 3])])]);
        let figures = build_figures(&snap, &mut FixedPhase(0.0));

        let xs: Vec<f32> = figures
            .iter()
            .filter_map(|f| match f {
                Figure::Person { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![80.0, 150.0, 220.0]);

        let badge_x = figures
            .iter()
            .find_map(|f| match f {
                Figure::ClusterBadge { x, .. } => Some(*x),
                _ => None,
            })
            .unwrap();
        // Centered over the 80..220 span.
        assert_eq!(badge_x, 150.0);
    }

    #[test]
    fn test_zone_cursor_advances_past_band() {
        let snap = snapshot(vec![
            ("office", vec![cluster(&[1, 2])]),
            ("pub", vec![cluster(&[3])]),
        ]);
        let figures = build_figures(&snap, &mut FixedPhase(0.0));

        let label_xs: Vec<f32> = figures
            .iter()
            .filter_map(|f| match f {
                Figure::ZoneLabel { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        // office band: 2 * 70 + 40 wide, then an 80 gap.
        assert_eq!(label_xs, vec![80.0, 80.0 + 180.0 + 80.0]);
    }

    #[test]
    fn test_empty_snapshot_yields_no_figures() {
        let figures = build_figures(&Snapshot::default(), &mut FixedPhase(0.0));
        assert!(figures.is_empty());
    }
}
