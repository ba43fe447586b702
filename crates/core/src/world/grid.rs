//! The rectangular tile grid that every world is built on, plus the point type
//! used to address it.

use derive_more::Display;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Index, IndexMut};

/// A position on a world grid. `x` grows to the east and `y` grows to the
/// south, so `(0, 0)` is the north-west corner.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
#[serde(deny_unknown_fields)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The four axis-aligned neighbors of this point, as signed coordinates.
    /// Neighbors of edge points fall off the grid, so these **aren't**
    /// bounds-checked. Use [Grid::point] to validate them.
    pub fn adjacents(self) -> [(i64, i64); 4] {
        let x = i64::from(self.x);
        let y = i64::from(self.y);
        [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
    }
}

/// A dense `width × height` grid of values, stored row-major. The dimensions
/// are fixed at creation. Values can be mutated, but never added or removed.
///
/// Grids serialize as an array of rows (an array of arrays), which is the
/// shape the browser viewer reads and writes.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid by calling the given function for every point, in
    /// row-major order.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(GridPoint) -> T,
    ) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(GridPoint::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid from a list of rows. Returns an error if there are no
    /// rows, the rows are empty, or they aren't all the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, String> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err("grid must have at least one row and column".into());
        }
        if let Some((y, row)) =
            rows.iter().enumerate().find(|(_, row)| row.len() != width)
        {
            return Err(format!(
                "row {} has {} cells, expected {}",
                y,
                row.len(),
                width
            ));
        }
        let width = u32::try_from(width)
            .map_err(|_| format!("grid width {} is too large", width))?;
        let height = u32::try_from(height)
            .map_err(|_| format!("grid height {} is too large", height))?;

        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Is the given point within the bounds of this grid?
    pub fn contains(&self, point: GridPoint) -> bool {
        point.x < self.width && point.y < self.height
    }

    /// Convert signed coordinates to a point on this grid. Returns `None` if
    /// the coordinates fall outside the grid.
    pub fn point(&self, x: i64, y: i64) -> Option<GridPoint> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        let point = GridPoint::new(x, y);
        if self.contains(point) {
            Some(point)
        } else {
            None
        }
    }

    pub fn get(&self, point: GridPoint) -> Option<&T> {
        if self.contains(point) {
            Some(&self.cells[self.index(point)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, point: GridPoint) -> Option<&mut T> {
        if self.contains(point) {
            let index = self.index(point);
            Some(&mut self.cells[index])
        } else {
            None
        }
    }

    /// Iterate over every point in the grid, row-major.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| GridPoint::new(x, y)))
    }

    /// Iterate over every value in the grid, along with its position.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, &T)> {
        self.points().zip(self.cells.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.cells.iter_mut()
    }

    /// Iterate over the rows of the grid, north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Every point on the outer border of the grid. The top and bottom rows
    /// come first, then the left and right columns. Corners appear more than
    /// once.
    pub fn edge_points(&self) -> Vec<GridPoint> {
        if self.is_empty() {
            return Vec::new();
        }
        let (max_x, max_y) = (self.width - 1, self.height - 1);
        let mut points =
            Vec::with_capacity(2 * (self.width + self.height) as usize);
        for x in 0..self.width {
            points.push(GridPoint::new(x, 0));
            points.push(GridPoint::new(x, max_y));
        }
        for y in 0..self.height {
            points.push(GridPoint::new(0, y));
            points.push(GridPoint::new(max_x, y));
        }
        points
    }

    /// Build a new grid of the same size by mapping every value.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    fn index(&self, point: GridPoint) -> usize {
        point.y as usize * self.width as usize + point.x as usize
    }
}

impl<T> Index<GridPoint> for Grid<T> {
    type Output = T;

    fn index(&self, point: GridPoint) -> &T {
        match self.get(point) {
            Some(value) => value,
            None => panic!(
                "point {} is outside {}x{} grid",
                point, self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<GridPoint> for Grid<T> {
    fn index_mut(&mut self, point: GridPoint) -> &mut T {
        let (width, height) = (self.width, self.height);
        match self.get_mut(point) {
            Some(value) => value,
            None => {
                panic!("point {} is outside {}x{} grid", point, width, height)
            }
        }
    }
}

// Serialize as a list of rows, since that's what JS consumers expect
impl<T: Serialize> Serialize for Grid<T> {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grid<T> {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let rows: Vec<Vec<T>> = Vec::deserialize(deserializer)?;
        Self::from_rows(rows).map_err(de::Error::custom)
    }
}
