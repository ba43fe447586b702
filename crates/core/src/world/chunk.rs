use crate::world::grid::{Grid, GridPoint};
use serde::{Deserialize, Serialize};

/// A square section of the world grid. Renderers use chunks to draw (or
/// skip) large pieces of a big world at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// `chunk_<n>`, numbered row-major from the north-west corner
    pub id: String,
    pub bounds: ChunkBounds,
}

/// Inclusive bounds of a chunk
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkBounds {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

impl ChunkBounds {
    pub fn contains(&self, point: GridPoint) -> bool {
        self.start_x <= point.x
            && point.x <= self.end_x
            && self.start_y <= point.y
            && point.y <= self.end_y
    }
}

/// Split a grid into square chunks of `chunk_size` cells per side. Chunks
/// along the east and south edges are clipped to the grid. A chunk size of
/// zero is treated as 1.
pub fn chunks<T>(grid: &Grid<T>, chunk_size: u32) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    let (width, height) = (grid.width(), grid.height());
    let mut chunks = Vec::new();
    for start_y in (0..height).step_by(chunk_size as usize) {
        for start_x in (0..width).step_by(chunk_size as usize) {
            chunks.push(Chunk {
                id: format!("chunk_{}", chunks.len()),
                bounds: ChunkBounds {
                    start_x,
                    start_y,
                    end_x: start_x
                        .saturating_add(chunk_size - 1)
                        .min(width - 1),
                    end_y: start_y
                        .saturating_add(chunk_size - 1)
                        .min(height - 1),
                },
            });
        }
    }
    chunks
}
