//! Regions partition the world into a fixed 3×3 layout of compass-point
//! zones. Landmass placement rules are configured per region.

use crate::world::grid::GridPoint;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the nine named zones of the world. The grid is split into thirds
/// along each axis (using floor division, so the last third absorbs any
/// remainder), and each region is one cell of that 3×3 layout.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Region {
    #[serde(rename = "NW")]
    #[strum(serialize = "NW")]
    NorthWest,
    #[serde(rename = "N")]
    #[strum(serialize = "N")]
    North,
    #[serde(rename = "NE")]
    #[strum(serialize = "NE")]
    NorthEast,
    #[serde(rename = "W")]
    #[strum(serialize = "W")]
    West,
    #[serde(rename = "C")]
    #[strum(serialize = "C")]
    Center,
    #[serde(rename = "E")]
    #[strum(serialize = "E")]
    East,
    #[serde(rename = "SW")]
    #[strum(serialize = "SW")]
    SouthWest,
    #[serde(rename = "S")]
    #[strum(serialize = "S")]
    South,
    #[serde(rename = "SE")]
    #[strum(serialize = "SE")]
    SouthEast,
}

/// Which third of an axis a coordinate falls in
#[derive(Copy, Clone, Debug, PartialEq)]
enum Third {
    Low,
    Mid,
    High,
}

impl Third {
    fn of(value: u32, extent: u32) -> Self {
        let third = extent / 3;
        if value < third {
            Self::Low
        } else if value < 2 * third {
            Self::Mid
        } else {
            Self::High
        }
    }

    /// Inclusive start and end of this third along an axis of the given
    /// extent. The end can be less than the start if the third is empty.
    fn span(self, extent: u32) -> (i64, i64) {
        let third = i64::from(extent / 3);
        match self {
            Self::Low => (0, third - 1),
            Self::Mid => (third, 2 * third - 1),
            Self::High => (2 * third, i64::from(extent) - 1),
        }
    }
}

impl Region {
    /// Classify a point on a `width × height` grid into its region.
    pub fn of(point: GridPoint, width: u32, height: u32) -> Self {
        let row = Third::of(point.y, height);
        let col = Third::of(point.x, width);
        match (row, col) {
            (Third::Low, Third::Low) => Self::NorthWest,
            (Third::Low, Third::Mid) => Self::North,
            (Third::Low, Third::High) => Self::NorthEast,
            (Third::Mid, Third::Low) => Self::West,
            (Third::Mid, Third::Mid) => Self::Center,
            (Third::Mid, Third::High) => Self::East,
            (Third::High, Third::Low) => Self::SouthWest,
            (Third::High, Third::Mid) => Self::South,
            (Third::High, Third::High) => Self::SouthEast,
        }
    }

    /// Get the rectangle this region covers on a `width × height` grid. This
    /// is the exact inverse of [Region::of]: every point classified into a
    /// region falls within that region's bounds.
    pub fn bounds(self, width: u32, height: u32) -> RegionBounds {
        let (row, col) = self.thirds();
        let (start_x, end_x) = col.span(width);
        let (start_y, end_y) = row.span(height);
        RegionBounds {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    fn thirds(self) -> (Third, Third) {
        match self {
            Self::NorthWest => (Third::Low, Third::Low),
            Self::North => (Third::Low, Third::Mid),
            Self::NorthEast => (Third::Low, Third::High),
            Self::West => (Third::Mid, Third::Low),
            Self::Center => (Third::Mid, Third::Mid),
            Self::East => (Third::Mid, Third::High),
            Self::SouthWest => (Third::High, Third::Low),
            Self::South => (Third::High, Third::Mid),
            Self::SouthEast => (Third::High, Third::High),
        }
    }
}

/// A rectangle of grid cells, inclusive on both ends. On grids smaller than
/// 3 cells along an axis some regions have no cells at all, in which case the
/// end is less than the start.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBounds {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
}

impl RegionBounds {
    pub fn contains(&self, point: GridPoint) -> bool {
        let (x, y) = (i64::from(point.x), i64::from(point.y));
        self.start_x <= x
            && x <= self.end_x
            && self.start_y <= y
            && y <= self.end_y
    }

    pub fn is_empty(&self) -> bool {
        self.end_x < self.start_x || self.end_y < self.start_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_region_of() {
        let (w, h) = (9, 9);
        assert_eq!(Region::of(GridPoint::new(0, 0), w, h), Region::NorthWest);
        assert_eq!(Region::of(GridPoint::new(4, 0), w, h), Region::North);
        assert_eq!(Region::of(GridPoint::new(8, 2), w, h), Region::NorthEast);
        assert_eq!(Region::of(GridPoint::new(2, 3), w, h), Region::West);
        assert_eq!(Region::of(GridPoint::new(4, 4), w, h), Region::Center);
        assert_eq!(Region::of(GridPoint::new(6, 5), w, h), Region::East);
        assert_eq!(Region::of(GridPoint::new(0, 6), w, h), Region::SouthWest);
        assert_eq!(Region::of(GridPoint::new(5, 8), w, h), Region::South);
        assert_eq!(Region::of(GridPoint::new(8, 8), w, h), Region::SouthEast);
    }

    /// When the size isn't divisible by 3, the last third takes the leftovers
    #[test]
    fn test_region_of_remainder() {
        // thirds of 10 are [0,3) [3,6) [6,10)
        assert_eq!(Region::of(GridPoint::new(5, 5), 10, 10), Region::Center);
        assert_eq!(Region::of(GridPoint::new(6, 5), 10, 10), Region::East);
        assert_eq!(Region::of(GridPoint::new(9, 9), 10, 10), Region::SouthEast);
        assert_eq!(
            Region::of(GridPoint::new(9, 9), 10, 10).bounds(10, 10),
            RegionBounds {
                start_x: 6,
                start_y: 6,
                end_x: 9,
                end_y: 9
            }
        );
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> =
            Region::iter().map(|r| r.to_string()).collect();
        assert_eq!(
            labels,
            vec!["NW", "N", "NE", "W", "C", "E", "SW", "S", "SE"]
        );
        assert_eq!("SE".parse::<Region>().unwrap(), Region::SouthEast);
        assert!("XX".parse::<Region>().is_err());
        assert_eq!(serde_json::to_string(&Region::Center).unwrap(), "\"C\"");
    }

    /// Every point must land inside the bounds of the region it's classified
    /// into, for a variety of grid sizes
    #[test]
    fn test_bounds_inverse() {
        for &(width, height) in
            &[(9, 9), (10, 10), (25, 25), (11, 7), (100, 31), (2, 2), (1, 5)]
        {
            for y in 0..height {
                for x in 0..width {
                    let point = GridPoint::new(x, y);
                    let region = Region::of(point, width, height);
                    assert!(
                        region.bounds(width, height).contains(point),
                        "{} classified as {} on {}x{} grid, \
                        but isn't in its bounds",
                        point,
                        region,
                        width,
                        height
                    );
                }
            }
        }
    }

    /// The bounds of all 9 regions tile the grid exactly, with no overlap
    #[test]
    fn test_bounds_partition() {
        let (width, height) = (11, 14);
        for y in 0..height {
            for x in 0..width {
                let point = GridPoint::new(x, y);
                let containing: Vec<Region> = Region::iter()
                    .filter(|r| r.bounds(width, height).contains(point))
                    .collect();
                assert_eq!(containing, vec![Region::of(point, width, height)]);
            }
        }
    }

    #[test]
    fn test_bounds_tiny_grid() {
        // On a 2x2 grid every third but the last is empty
        assert!(Region::NorthWest.bounds(2, 2).is_empty());
        assert!(Region::Center.bounds(2, 2).is_empty());
        assert!(!Region::SouthEast.bounds(2, 2).is_empty());
    }
}
