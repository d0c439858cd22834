//! Ray tables for vision shadowcasting.
//!
//! Each of the [`RAY_COUNT`] rays walks outward from the observer through one
//! octant pair, from due east (`dy = 0`) to due south (`dx = 0`). The
//! shadowcaster reflects the deltas into the other three quadrants.

/// Number of rays per quadrant.
pub const RAY_COUNT: usize = 23;

/// Longest ray in tiles.
pub const MAX_RAY_STEPS: usize = 15;

/// Tile deltas along each ray. A `(0, 0)` entry pads a short ray.
#[rustfmt::skip]
pub static CRAWL_TABLE: [[(u8, u8); MAX_RAY_STEPS]; RAY_COUNT] = [
    [(1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0), (7, 0), (8, 0), (9, 0), (10, 0), (11, 0), (12, 0), (13, 0), (14, 0), (15, 0)],
    [(1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0), (7, 0), (8, 1), (9, 1), (10, 1), (11, 1), (12, 1), (13, 1), (14, 1), (15, 1)],
    [(1, 0), (2, 0), (3, 0), (4, 1), (5, 1), (6, 1), (7, 1), (8, 1), (9, 1), (10, 1), (11, 1), (12, 2), (13, 2), (14, 2), (15, 2)],
    [(1, 0), (2, 0), (3, 1), (4, 1), (5, 1), (6, 1), (7, 1), (8, 2), (9, 2), (10, 2), (11, 2), (12, 2), (13, 3), (14, 3), (15, 3)],
    [(1, 0), (2, 1), (3, 1), (4, 1), (5, 1), (6, 2), (7, 2), (8, 2), (9, 3), (10, 3), (11, 3), (12, 3), (13, 4), (14, 4), (0, 0)],
    [(1, 0), (2, 1), (3, 1), (4, 1), (5, 2), (6, 2), (7, 3), (8, 3), (9, 3), (10, 4), (11, 4), (12, 4), (13, 5), (14, 5), (0, 0)],
    [(1, 0), (2, 1), (3, 1), (4, 2), (5, 2), (6, 3), (7, 3), (8, 3), (9, 4), (10, 4), (11, 5), (12, 5), (13, 6), (14, 6), (0, 0)],
    [(1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (6, 3), (7, 4), (8, 4), (9, 5), (10, 5), (11, 6), (12, 6), (13, 7), (0, 0), (0, 0)],
    [(1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (6, 4), (7, 4), (8, 5), (9, 6), (10, 6), (11, 7), (12, 7), (12, 8), (13, 8), (0, 0)],
    [(1, 1), (2, 2), (3, 2), (4, 3), (5, 4), (6, 5), (7, 5), (8, 6), (9, 7), (10, 7), (10, 8), (11, 8), (12, 9), (0, 0), (0, 0)],
    [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 5), (7, 6), (8, 7), (9, 8), (10, 9), (11, 9), (11, 10), (0, 0), (0, 0), (0, 0)],
    [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7), (8, 8), (9, 9), (10, 10), (11, 11), (0, 0), (0, 0), (0, 0), (0, 0)],
    [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (5, 6), (6, 7), (7, 8), (8, 9), (9, 10), (9, 11), (10, 11), (0, 0), (0, 0), (0, 0)],
    [(1, 1), (2, 2), (2, 3), (3, 4), (4, 5), (5, 6), (5, 7), (6, 8), (7, 9), (7, 10), (8, 10), (8, 11), (9, 12), (0, 0), (0, 0)],
    [(1, 1), (1, 2), (2, 3), (2, 4), (3, 5), (4, 6), (4, 7), (5, 8), (6, 9), (6, 10), (7, 11), (7, 12), (8, 12), (8, 13), (0, 0)],
    [(1, 1), (1, 2), (2, 3), (2, 4), (3, 5), (3, 6), (4, 7), (4, 8), (5, 9), (5, 10), (6, 11), (6, 12), (7, 13), (0, 0), (0, 0)],
    [(0, 1), (1, 2), (1, 3), (2, 4), (2, 5), (3, 6), (3, 7), (3, 8), (4, 9), (4, 10), (5, 11), (5, 12), (6, 13), (6, 14), (0, 0)],
    [(0, 1), (1, 2), (1, 3), (1, 4), (2, 5), (2, 6), (3, 7), (3, 8), (3, 9), (4, 10), (4, 11), (4, 12), (5, 13), (5, 14), (0, 0)],
    [(0, 1), (1, 2), (1, 3), (1, 4), (1, 5), (2, 6), (2, 7), (2, 8), (3, 9), (3, 10), (3, 11), (3, 12), (4, 13), (4, 14), (0, 0)],
    [(0, 1), (0, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7), (2, 8), (2, 9), (2, 10), (2, 11), (2, 12), (3, 13), (3, 14), (3, 15)],
    [(0, 1), (0, 2), (0, 3), (1, 4), (1, 5), (1, 6), (1, 7), (1, 8), (1, 9), (1, 10), (1, 11), (2, 12), (2, 13), (2, 14), (2, 15)],
    [(0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (1, 8), (1, 9), (1, 10), (1, 11), (1, 12), (1, 13), (1, 14), (1, 15)],
    [(0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 9), (0, 10), (0, 11), (0, 12), (0, 13), (0, 14), (0, 15)],
];

/// Per-ray reduction of the vision radius. Diagonal rays are shortened so the
/// visible area approximates a circle.
pub const RADIUS_ADJUST: [u8; RAY_COUNT] = [
    0, 0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 4, 3, 2, 2, 2, 1, 1, 1, 0, 0, 0, 0,
];

/// Iterates over the deltas of `ray` for an observer with vision `radius`.
///
/// The ray is cut short by its radius adjustment, by [`MAX_RAY_STEPS`], and
/// by the first padding entry.
pub fn ray_steps(ray: usize, radius: u8) -> impl Iterator<Item = (i32, i32)> {
    let steps = radius
        .saturating_sub(RADIUS_ADJUST[ray])
        .min(MAX_RAY_STEPS as u8) as usize;
    CRAWL_TABLE[ray][..steps]
        .iter()
        .take_while(|&&(dx, dy)| dx != 0 || dy != 0)
        .map(|&(dx, dy)| (i32::from(dx), i32::from(dy)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_rays_are_straight() {
        let east: Vec<_> = ray_steps(0, 15).collect();
        assert_eq!(east.len(), 15);
        assert!(east.iter().enumerate().all(|(i, &(dx, dy))| dx == i as i32 + 1 && dy == 0));

        let south: Vec<_> = ray_steps(RAY_COUNT - 1, 15).collect();
        assert!(south.iter().all(|&(dx, _)| dx == 0), "last ray must run along the y axis");
    }

    #[test]
    fn test_table_is_mirrored_about_the_diagonal() {
        for ray in 0..RAY_COUNT {
            let mirror = RAY_COUNT - 1 - ray;
            assert_eq!(RADIUS_ADJUST[ray], RADIUS_ADJUST[mirror], "radius adjust of ray {ray}");
            for (step, &(dx, dy)) in CRAWL_TABLE[ray].iter().enumerate() {
                assert_eq!(CRAWL_TABLE[mirror][step], (dy, dx), "ray {ray} step {step}");
            }
        }
    }

    #[test]
    fn test_steps_advance_one_tile_at_a_time() {
        for ray in 0..RAY_COUNT {
            let mut prev = (0, 0);
            for (dx, dy) in ray_steps(ray, 15) {
                assert!(dx - prev.0 <= 1 && dy - prev.1 <= 1, "ray {ray} skipped a tile");
                assert!(dx >= prev.0 && dy >= prev.1, "ray {ray} turned back");
                prev = (dx, dy);
            }
        }
    }

    #[test]
    fn test_radius_adjustment_shortens_diagonals() {
        assert_eq!(ray_steps(0, 10).count(), 10);
        assert_eq!(ray_steps(11, 10).count(), 6);
        assert_eq!(ray_steps(11, 3).count(), 0);
    }

    #[test]
    fn test_padding_ends_ray() {
        // The diagonal ray has 11 entries followed by padding.
        assert_eq!(ray_steps(11, 15).count(), 11);
        assert_eq!(ray_steps(11, 15).last(), Some((11, 11)));
    }

    #[test]
    fn test_zero_radius_has_no_steps() {
        assert!((0..RAY_COUNT).all(|ray| ray_steps(ray, 0).next().is_none()));
    }
}
