//! Random map generation.
//!
//! Every cell is sampled independently: one draw picks the terrain, and
//! grass or forest cells get a second draw for a deposit and a third for its
//! kind. There is no connectivity or fairness pass, so starting corners may
//! be walled in by water.

use rand::Rng;

use crate::error::ConfigError;
use crate::game::{Coord, Map, Resource, Tile, TileType};

/// Cumulative probability of grass.
const GRASS_CUTOFF: f64 = 0.60;
/// Cumulative probability of grass or forest.
const FOREST_CUTOFF: f64 = 0.75;
/// Cumulative probability of grass, forest or mountain. The rest is water.
const MOUNTAIN_CUTOFF: f64 = 0.85;

/// Chance that a grass or forest cell carries a deposit.
pub const RESOURCE_CHANCE: f64 = 0.10;
/// Cumulative probability of a gold deposit.
const GOLD_CUTOFF: f64 = 0.40;
/// Cumulative probability of a gold or food deposit. The rest is weapons.
const FOOD_CUTOFF: f64 = 0.70;

/// Draw a uniform value in `[0, 1)`.
fn roll<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

/// Pick a terrain type from a single draw.
fn sample_terrain<R: Rng + ?Sized>(rng: &mut R) -> TileType {
    let r = roll(rng);
    if r < GRASS_CUTOFF {
        TileType::Grass
    } else if r < FOREST_CUTOFF {
        TileType::Forest
    } else if r < MOUNTAIN_CUTOFF {
        TileType::Mountain
    } else {
        TileType::Water
    }
}

/// Pick a resource kind from a single draw.
fn sample_resource<R: Rng + ?Sized>(rng: &mut R) -> Resource {
    let r = roll(rng);
    if r < GOLD_CUTOFF {
        Resource::Gold
    } else if r < FOOD_CUTOFF {
        Resource::Food
    } else {
        Resource::Weapon
    }
}

/// Generate a map of the given size.
///
/// The output depends only on the RNG stream, so a seeded RNG reproduces the
/// exact same grid.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDimensions`] if either dimension is zero.
pub fn generate_map<R: Rng + ?Sized>(
    width: u16,
    height: u16,
    rng: &mut R,
) -> Result<Map, ConfigError> {
    let mut map =
        Map::new(width, height).ok_or(ConfigError::InvalidDimensions { width, height })?;

    for y in 0..height {
        for x in 0..width {
            let tile_type = sample_terrain(rng);
            let tile = if tile_type.can_hold_resource() && roll(rng) < RESOURCE_CHANCE {
                Tile::with_resource(tile_type, sample_resource(rng))
            } else {
                Tile::new(tile_type)
            };
            map.set(Coord::new(x, y), tile);
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_deterministic() {
        let a = generate_map(32, 24, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = generate_map(32, 24, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_different_seeds_differ() {
        let a = generate_map(32, 32, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let b = generate_map(32, 32, &mut ChaCha8Rng::seed_from_u64(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_zero_dimensions() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            generate_map(0, 5, &mut rng),
            Err(ConfigError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_resources_only_on_grass_or_forest() {
        let map = generate_map(100, 100, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        for (coord, tile) in map.iter() {
            if tile.resource.is_some() {
                assert!(
                    tile.tile_type.can_hold_resource(),
                    "resource on {:?} at {coord}",
                    tile.tile_type
                );
            }
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_terrain_distribution() {
        let map = generate_map(200, 200, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
        let total = map.tiles().len() as f64;
        let share = |t: TileType| map.count_terrain(t) as f64 / total;

        assert!((share(TileType::Grass) - 0.60).abs() < 0.02);
        assert!((share(TileType::Forest) - 0.15).abs() < 0.02);
        assert!((share(TileType::Mountain) - 0.10).abs() < 0.02);
        assert!((share(TileType::Water) - 0.15).abs() < 0.02);

        // 75% of cells can hold a deposit, 10% of those do
        let resource_share = map.count_resources() as f64 / total;
        assert!((resource_share - 0.075).abs() < 0.01);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_resource_kind_split() {
        let map = generate_map(400, 400, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let deposits: Vec<Resource> = map.iter().filter_map(|(_, t)| t.resource).collect();
        let total = deposits.len() as f64;
        let share = |r: Resource| deposits.iter().filter(|&&d| d == r).count() as f64 / total;

        assert!((share(Resource::Gold) - 0.40).abs() < 0.02);
        assert!((share(Resource::Food) - 0.30).abs() < 0.02);
        assert!((share(Resource::Weapon) - 0.30).abs() < 0.02);
    }
}
