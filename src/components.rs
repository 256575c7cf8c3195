use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub type TileId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCategory {
    #[default]
    Nothing,
    House,
    Road,
    Store,
    Hospital,
    Park,
}

/// Order in which a click advances a tile's category.
const ADVANCE_CYCLE: [(TileCategory, TileCategory); 6] = [
    (TileCategory::Nothing, TileCategory::House),
    (TileCategory::House, TileCategory::Road),
    (TileCategory::Road, TileCategory::Store),
    (TileCategory::Store, TileCategory::Hospital),
    (TileCategory::Hospital, TileCategory::Park),
    (TileCategory::Park, TileCategory::Nothing),
];

impl TileCategory {
    pub const ALL: [TileCategory; 6] = [
        TileCategory::Nothing,
        TileCategory::House,
        TileCategory::Road,
        TileCategory::Store,
        TileCategory::Hospital,
        TileCategory::Park,
    ];

    pub fn advanced(self) -> TileCategory {
        ADVANCE_CYCLE
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(TileCategory::Nothing)
    }

    pub fn amenity(self) -> Option<Amenity> {
        match self {
            TileCategory::Store => Some(Amenity::Store),
            TileCategory::Hospital => Some(Amenity::Hospital),
            TileCategory::Park => Some(Amenity::Park),
            TileCategory::Nothing | TileCategory::House | TileCategory::Road => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TileCategory::Nothing => "nothing",
            TileCategory::House => "house",
            TileCategory::Road => "road",
            TileCategory::Store => "store",
            TileCategory::Hospital => "hospital",
            TileCategory::Park => "park",
        }
    }
}

/// A tile category that emits influence onto nearby roads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    Store,
    Hospital,
    Park,
}

impl Amenity {
    pub const ALL: [Amenity; 3] = [Amenity::Store, Amenity::Hospital, Amenity::Park];

    pub fn category(self) -> TileCategory {
        match self {
            Amenity::Store => TileCategory::Store,
            Amenity::Hospital => TileCategory::Hospital,
            Amenity::Park => TileCategory::Park,
        }
    }

    pub fn credit(self) -> AmenityCredits {
        match self {
            Amenity::Store => AmenityCredits::STORE,
            Amenity::Hospital => AmenityCredits::HOSPITAL,
            Amenity::Park => AmenityCredits::PARK,
        }
    }
}

bitflags! {
    /// Amenity categories that have already credited a road during a pass.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AmenityCredits: u8 {
        const STORE = 1;
        const HOSPITAL = 2;
        const PARK = 4;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub category: TileCategory,
    pub score: u32,
}

impl Tile {
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            category: TileCategory::Nothing,
            score: 0,
        }
    }

    pub fn is(&self, category: TileCategory) -> bool {
        self.category == category
    }
}
