use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::constants::OTHER_NEIGHBORHOOD;
use crate::types::Segment;

/// Rental-platform neighborhood group -> real-estate market segment.
/// Several platform groups roll up into one segment.
static NEIGHBORHOOD_MAPPING: Lazy<HashMap<&'static str, Segment>> = Lazy::new(|| {
    HashMap::from([
        ("Ballard", Segment::BallardGreenlake),
        ("Downtown", Segment::BelltownDowntown),
        ("Cascade", Segment::BelltownDowntown),
        ("Capitol Hill", Segment::BelltownDowntown),
        ("Central Area", Segment::CentralSeattle),
        ("Rainier Valley", Segment::EastSideSouthOfI90),
        ("Northgate", Segment::NorthSeattle),
        ("Lake City", Segment::NorthSeattle),
        ("University District", Segment::NorthSeattle),
        ("Queen Anne", Segment::QueenAnneMagnolia),
        ("Magnolia", Segment::QueenAnneMagnolia),
        ("Interbay", Segment::QueenAnneMagnolia),
        ("Beacon Hill", Segment::SodoBeaconHill),
        ("Seward Park", Segment::SoutheastSeattle),
        ("Delridge", Segment::WestSeattle),
        ("West Seattle", Segment::WestSeattle),
    ])
});

/// Translates platform neighborhood labels into market segments
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborhoodMapper;

impl NeighborhoodMapper {
    pub fn new() -> Self {
        Self
    }

    /// Typed lookup; `None` for labels outside the catalog.
    pub fn lookup(&self, platform_neighborhood: &str) -> Option<Segment> {
        NEIGHBORHOOD_MAPPING.get(platform_neighborhood.trim()).copied()
    }

    /// Segment name for a label, or `"Other"` when the label is unmapped.
    pub fn map(&self, platform_neighborhood: &str) -> &'static str {
        self.lookup(platform_neighborhood)
            .map(|segment| segment.as_str())
            .unwrap_or(OTHER_NEIGHBORHOOD)
    }
}
