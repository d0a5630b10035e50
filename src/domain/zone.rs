// Zone type enumeration and its display attributes

/// RGB accent color for a zone band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneType {
    Office,
    Pub,
    Restaurant,
    Cafe,
    Gym,
    Unknown,
}

impl ZoneType {
    /// Canonical band order on the board. Layout and summaries iterate this
    /// regardless of how the snapshot keys happen to be ordered.
    pub const ORDER: [ZoneType; 6] = [
        ZoneType::Office,
        ZoneType::Pub,
        ZoneType::Restaurant,
        ZoneType::Cafe,
        ZoneType::Gym,
        ZoneType::Unknown,
    ];

    /// Zone types whose clusters can raise a join alert.
    pub const SOCIAL: [ZoneType; 3] = [ZoneType::Pub, ZoneType::Restaurant, ZoneType::Cafe];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "office" => ZoneType::Office,
            "pub" => ZoneType::Pub,
            "restaurant" => ZoneType::Restaurant,
            "cafe" => ZoneType::Cafe,
            "gym" => ZoneType::Gym,
            _ => ZoneType::Unknown,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ZoneType::Office => "office",
            ZoneType::Pub => "pub",
            ZoneType::Restaurant => "restaurant",
            ZoneType::Cafe => "cafe",
            ZoneType::Gym => "gym",
            ZoneType::Unknown => "unknown",
        }
    }

    /// Capitalized tag, used for the canvas band label.
    pub fn label(&self) -> String {
        let tag = self.tag();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Friendly name used on the summary cards.
    pub fn display_name(&self) -> &'static str {
        match self {
            ZoneType::Office => "At the Office",
            ZoneType::Pub => "At the Pub",
            ZoneType::Restaurant => "Getting Lunch",
            ZoneType::Cafe => "Coffee Break",
            ZoneType::Gym => "Working Out",
            ZoneType::Unknown => "Out & About",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ZoneType::Office => "🏢",
            ZoneType::Pub => "🍺",
            ZoneType::Restaurant => "🍕",
            ZoneType::Cafe => "☕",
            ZoneType::Gym => "🏃",
            ZoneType::Unknown => "📍",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            ZoneType::Office => Rgb(0x22, 0xc5, 0x5e),
            ZoneType::Pub => Rgb(0xa8, 0x55, 0xf7),
            ZoneType::Restaurant => Rgb(0xf9, 0x73, 0x16),
            ZoneType::Cafe => Rgb(0x3b, 0x82, 0xf6),
            ZoneType::Gym => Rgb(0xef, 0x44, 0x44),
            ZoneType::Unknown => Rgb(0x6b, 0x72, 0x80),
        }
    }
}
