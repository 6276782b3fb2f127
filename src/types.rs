use std::fmt;

/// Bedroom buckets used by the bedroom price reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BedroomCount {
    One,
    Two,
    Three,
    Four,
    FivePlus,
}

impl BedroomCount {
    pub const ALL: [BedroomCount; 5] = [
        BedroomCount::One,
        BedroomCount::Two,
        BedroomCount::Three,
        BedroomCount::Four,
        BedroomCount::FivePlus,
    ];

    /// Parse a label from the bedroom price table ("1".."4", "5 or more")
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            "3" => Some(Self::Three),
            "4" => Some(Self::Four),
            "5 or more" | "5+" => Some(Self::FivePlus),
            _ => None,
        }
    }

    /// Bucket a listing's bedroom count. Anything at or below one is `One`,
    /// anything at or above five is `FivePlus`.
    pub fn bucket(bedrooms: u32) -> Self {
        match bedrooms {
            0 | 1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            _ => Self::FivePlus,
        }
    }

    /// Column name in the market table output
    pub fn column(&self) -> &'static str {
        match self {
            Self::One => "one_br",
            Self::Two => "two_br",
            Self::Three => "three_br",
            Self::Four => "four_br",
            Self::FivePlus => "five_plus_br",
        }
    }
}

impl fmt::Display for BedroomCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::FivePlus => "5+",
        };
        write!(f, "{label}")
    }
}

/// The canonical real-estate market segments the analysis covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    BallardGreenlake,
    BelltownDowntown,
    CentralSeattle,
    EastSideSouthOfI90,
    NorthSeattle,
    QueenAnneMagnolia,
    SodoBeaconHill,
    SoutheastSeattle,
    WestSeattle,
}

impl Segment {
    pub const ALL: [Segment; 9] = [
        Segment::BallardGreenlake,
        Segment::BelltownDowntown,
        Segment::CentralSeattle,
        Segment::EastSideSouthOfI90,
        Segment::NorthSeattle,
        Segment::QueenAnneMagnolia,
        Segment::SodoBeaconHill,
        Segment::SoutheastSeattle,
        Segment::WestSeattle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BallardGreenlake => "Ballard/Greenlake",
            Self::BelltownDowntown => "Belltown/Downtown",
            Self::CentralSeattle => "Central Seattle",
            // en dash, matching the real-estate export
            Self::EastSideSouthOfI90 => "East Side–South of I-90",
            Self::NorthSeattle => "North Seattle",
            Self::QueenAnneMagnolia => "Queen Anne/Magnolia",
            Self::SodoBeaconHill => "SODO/Beacon Hill",
            Self::SoutheastSeattle => "Southeast Seattle",
            Self::WestSeattle => "West Seattle",
        }
    }

    /// Resolve an allow-listed segment name. Names outside the list return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the bedroom price reference table
#[derive(Debug, Clone, PartialEq)]
pub struct BedroomPriceRow {
    pub bedroom_count: BedroomCount,
    pub median_price: i64,
}

/// One row of the neighborhood price table, before allow-list filtering
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodPriceRow {
    pub segment_name: String,
    pub median_price: i64,
}

/// A rental listing projected to the fields the analysis needs
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    pub id: String,
    pub name: String,
    pub platform_neighborhood: String,
    pub property_type: String,
    pub room_type: String,
    /// Missing in some exports; such rows never pass the bedroom filter
    pub bedroom_count: Option<u32>,
    pub nightly_rate: f64,
    pub availability_30: u32,
}

/// A listing that survived every filter, with its derived investment metrics
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedListing {
    pub listing: RawListing,
    pub days_occupied: u32,
    pub monthly_revenue: f64,
    pub mapped_segment: Segment,
    pub equivalent_home_price: i64,
    pub net_operating_income: f64,
}
