//! Map, tile and direction types.

use std::fmt;

use serde::Serialize;

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single-step cardinal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Towards x - 1.
    Left,
    /// Towards x + 1.
    Right,
    /// Towards y - 1.
    Up,
    /// Towards y + 1.
    Down,
}

impl Direction {
    /// All directions in the order scripted agents evaluate them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// The `(dx, dy)` offset of this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Map a `(dx, dy)` offset back to a direction.
    ///
    /// Returns `None` for diagonal, multi-tile or zero offsets.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// Type of terrain on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TileType {
    /// Open grass - passable, may hold a resource.
    Grass = 0,
    /// Forest - passable, may hold a resource.
    Forest = 1,
    /// Mountain - passable, never holds a resource.
    Mountain = 2,
    /// Water - impassable.
    Water = 3,
}

impl TileType {
    /// Check if agents may step onto this terrain.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, TileType::Water)
    }

    /// Check if map generation may place a resource on this terrain.
    #[must_use]
    pub const fn can_hold_resource(self) -> bool {
        matches!(self, TileType::Grass | TileType::Forest)
    }
}

/// A collectible deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resource {
    /// Gold.
    Gold,
    /// Food.
    Food,
    /// Weapon - raises attack and defense power.
    Weapon,
}

impl Resource {
    /// All resource kinds.
    pub const ALL: [Resource; 3] = [Resource::Gold, Resource::Food, Resource::Weapon];
}

/// A single tile on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    /// Type of terrain.
    pub tile_type: TileType,
    /// Deposit waiting to be collected, if any.
    pub resource: Option<Resource>,
}

impl Tile {
    /// Create a new tile with the given type and no resource.
    #[must_use]
    pub const fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            resource: None,
        }
    }

    /// Create a tile carrying a resource.
    #[must_use]
    pub const fn with_resource(tile_type: TileType, resource: Resource) -> Self {
        Self {
            tile_type,
            resource: Some(resource),
        }
    }

    /// Create a new grass tile.
    #[must_use]
    pub const fn grass() -> Self {
        Self::new(TileType::Grass)
    }

    /// Create a new water tile.
    #[must_use]
    pub const fn water() -> Self {
        Self::new(TileType::Water)
    }

    /// Remove and return the resource on this tile.
    pub fn take_resource(&mut self) -> Option<Resource> {
        self.resource.take()
    }
}

/// The game map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    /// Width of the map in tiles.
    width: u16,
    /// Height of the map in tiles.
    height: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Map {
    /// Create a new map filled with grass tiles.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        Self::filled(width, height, Tile::grass())
    }

    /// Create a new map with every tile set to `tile`.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn filled(width: u16, height: u16, tile: Tile) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            tiles: vec![tile; size],
        })
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get a reference to the raw tiles slice in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to an index into the tiles array.
    #[must_use]
    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.coord_to_index(coord).map(|idx| &self.tiles[idx])
    }

    /// Get a mutable reference to the tile at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.coord_to_index(coord).map(|idx| &mut self.tiles[idx])
    }

    /// Set the tile at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, tile: Tile) -> bool {
        if let Some(idx) = self.coord_to_index(coord) {
            self.tiles[idx] = tile;
            true
        } else {
            false
        }
    }

    /// The cell one step from `from` in `direction`, clamped to the map edge.
    ///
    /// Stepping off the edge yields `from`'s own row or column boundary; it
    /// never wraps.
    #[must_use]
    pub fn step(&self, from: Coord, direction: Direction) -> Coord {
        let (dx, dy) = direction.delta();
        let max_x = i32::from(self.width) - 1;
        let max_y = i32::from(self.height) - 1;
        let x = (i32::from(from.x) + dx).clamp(0, max_x);
        let y = (i32::from(from.y) + dy).clamp(0, max_y);
        // Both values are clamped into u16 range above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Coord::new(x as u16, y as u16)
    }

    /// Iterate over all coordinates and tiles.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        let width = usize::from(self.width);
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, tile)
        })
    }

    /// Count tiles of the given terrain.
    #[must_use]
    pub fn count_terrain(&self, tile_type: TileType) -> usize {
        self.tiles.iter().filter(|t| t.tile_type == tile_type).count()
    }

    /// Count uncollected resources on the map.
    #[must_use]
    pub fn count_resources(&self) -> usize {
        self.tiles.iter().filter(|t| t.resource.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_creation() {
        let map = Map::new(10, 10).unwrap();
        assert_eq!(map.width(), 10);
        assert_eq!(map.height(), 10);
        assert_eq!(map.tiles().len(), 100);
    }

    #[test]
    fn test_map_zero_size() {
        assert!(Map::new(0, 10).is_none());
        assert!(Map::new(10, 0).is_none());
    }

    #[test]
    fn test_map_get_set() {
        let mut map = Map::new(10, 10).unwrap();
        let coord = Coord::new(5, 5);

        assert_eq!(map.get(coord).unwrap().tile_type, TileType::Grass);

        map.set(coord, Tile::with_resource(TileType::Forest, Resource::Gold));
        let tile = map.get(coord).unwrap();
        assert_eq!(tile.tile_type, TileType::Forest);
        assert_eq!(tile.resource, Some(Resource::Gold));
        assert!(!map.set(Coord::new(10, 0), Tile::water()));
    }

    #[test]
    fn test_map_bounds() {
        let map = Map::new(10, 10).unwrap();
        assert!(map.in_bounds(Coord::new(0, 0)));
        assert!(map.in_bounds(Coord::new(9, 9)));
        assert!(!map.in_bounds(Coord::new(10, 0)));
        assert!(!map.in_bounds(Coord::new(0, 10)));
    }

    #[test]
    fn test_step_interior() {
        let map = Map::new(10, 10).unwrap();
        let from = Coord::new(5, 5);
        assert_eq!(map.step(from, Direction::Left), Coord::new(4, 5));
        assert_eq!(map.step(from, Direction::Right), Coord::new(6, 5));
        assert_eq!(map.step(from, Direction::Up), Coord::new(5, 4));
        assert_eq!(map.step(from, Direction::Down), Coord::new(5, 6));
    }

    #[test]
    fn test_step_clamps_at_edges() {
        let map = Map::new(3, 2).unwrap();
        assert_eq!(map.step(Coord::new(0, 0), Direction::Left), Coord::new(0, 0));
        assert_eq!(map.step(Coord::new(0, 0), Direction::Up), Coord::new(0, 0));
        assert_eq!(map.step(Coord::new(2, 1), Direction::Right), Coord::new(2, 1));
        assert_eq!(map.step(Coord::new(2, 1), Direction::Down), Coord::new(2, 1));
    }

    #[test]
    fn test_direction_delta_roundtrip() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(2, 0), None);
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    #[test]
    fn test_take_resource_once() {
        let mut tile = Tile::with_resource(TileType::Grass, Resource::Food);
        assert_eq!(tile.take_resource(), Some(Resource::Food));
        assert_eq!(tile.take_resource(), None);
    }

    #[test]
    fn test_tile_type_rules() {
        assert!(TileType::Grass.is_passable());
        assert!(TileType::Mountain.is_passable());
        assert!(!TileType::Water.is_passable());
        assert!(TileType::Forest.can_hold_resource());
        assert!(!TileType::Mountain.can_hold_resource());
        assert!(!TileType::Water.can_hold_resource());
    }
}
