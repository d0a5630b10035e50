// Drawable figures derived from a snapshot by the layout engine
use super::zone::{Rgb, ZoneType};

/// One item on the canvas with an absolute position. The full figure list is
/// rebuilt from each snapshot and replaces the prior list wholesale.
#[derive(Debug, Clone)]
pub enum Figure {
    ZoneLabel {
        zone: ZoneType,
        x: f32,
        y: f32,
    },
    Person {
        name: String,
        glyph: String,
        x: f32,
        y: f32,
        color: Rgb,
        /// Animation phase in [0, 2π), assigned at build time and not
        /// persisted across rebuilds.
        phase: f32,
    },
    ClusterBadge {
        count: usize,
        x: f32,
        y: f32,
        color: Rgb,
    },
}
