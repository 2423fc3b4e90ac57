//! Named map detail levels, from whole continents down to single streets.

use serde::{Deserialize, Serialize};

use crate::coord::SQUARE_MC2_TO_SQUARE_METER;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScaleLevel {
    Continent = 0,
    Country = 1,
    County = 2,
    SmallCounty = 3,
    Municipal = 4,
    City = 5,
    SmallCity = 6,
    District = 7,
    Block = 8,
    PartOfBlock = 9,
    DetailedStreet = 10,
}

/// Smallest squared meters per pixel (times five) shown at each level.
/// Strictly decreasing, so every level owns a non-empty band.
const MAX_SCALE: [u64; 11] = [
    500_000_000, // Europe in 200x200 pixels is about 2e9
    50_000_000,  // Sweden in 200x200 pixels is about 3e8
    5_000_000,
    30_000,
    7_000,
    1_000,
    300,
    50, // a city district in 300x300 pixels
    24,
    10,
    2,
];

impl ScaleLevel {
    pub const ALL: [ScaleLevel; 11] = [
        ScaleLevel::Continent,
        ScaleLevel::Country,
        ScaleLevel::County,
        ScaleLevel::SmallCounty,
        ScaleLevel::Municipal,
        ScaleLevel::City,
        ScaleLevel::SmallCity,
        ScaleLevel::District,
        ScaleLevel::Block,
        ScaleLevel::PartOfBlock,
        ScaleLevel::DetailedStreet,
    ];

    /// Level by index, saturating at [`ScaleLevel::DetailedStreet`].
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleLevel::Continent => "Continent",
            ScaleLevel::Country => "Country",
            ScaleLevel::County => "County",
            ScaleLevel::SmallCounty => "Small county",
            ScaleLevel::Municipal => "Municipal",
            ScaleLevel::City => "City",
            ScaleLevel::SmallCity => "Small city",
            ScaleLevel::District => "District",
            ScaleLevel::Block => "Block",
            ScaleLevel::PartOfBlock => "Part of block",
            ScaleLevel::DetailedStreet => "Detailed street",
        }
    }

    /// Level for an `area` in square MC2 units shown on a `width` x `height`
    /// image. `factor` biases the choice toward coarser levels.
    pub fn for_area(area: i64, width: i32, height: i32, factor: u32) -> Self {
        let pixels = (width as f64 * height as f64).max(1.0);
        let cur_scale =
            (area as f64 * factor as f64 * 5.0 * SQUARE_MC2_TO_SQUARE_METER / pixels) as u64 + 1;
        let mut level = 0;
        while level < MAX_SCALE.len() - 1 && MAX_SCALE[level] > cur_scale {
            level += 1;
        }
        Self::from_index(level)
    }
}
