use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{GenerateError, MazeError};
use crate::grid::Grid;
use crate::maze::Maze;
use crate::models::Coordinate;

/// Upper bound on `width * height`. Requested dimensions come straight from
/// clients, so the product is checked before anything is allocated.
pub const MAX_ROOMS: usize = 1 << 20;

/// Maze builder: carves a spanning tree with the recursive backtracker,
/// optionally braids away dead ends, then hides the treasure away from the
/// start. All random choices come from the caller's `Rng`, so a seeded
/// generator reproduces the same maze.
#[derive(Debug, Clone)]
pub struct Generator {
    width: usize,
    height: usize,
    braid: f64,
}

impl Generator {
    pub fn new(width: usize, height: usize) -> Self {
        Generator {
            width,
            height,
            braid: 0.0,
        }
    }

    /// Probability of braiding away each dead end; `p <= 0` disables
    /// braiding entirely.
    pub fn braid(mut self, p: f64) -> Self {
        self.braid = p;
        self
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Maze, GenerateError> {
        let rooms = self
            .width
            .checked_mul(self.height)
            .filter(|n| *n <= MAX_ROOMS)
            .ok_or(GenerateError::TooLarge {
                width: self.width,
                height: self.height,
            })?;
        if self.width == 0 || self.height == 0 || rooms < 2 {
            return Err(GenerateError::TooSmall {
                width: self.width,
                height: self.height,
            });
        }

        let mut grid = Grid::new(self.width, self.height);
        carve(&mut grid, rng)?;
        braid(&mut grid, self.braid, rng)?;

        let (start, treasure) = place_endpoints(&mut grid, rng)?;
        debug!(
            width = self.width,
            height = self.height,
            braid = self.braid,
            %start,
            %treasure,
            "maze generated"
        );
        Ok(Maze::new(grid, start, treasure))
    }
}

/// Recursive backtracker with an explicit stack. A room counts as visited
/// once it has at least one link, so the loop ends exactly when every room
/// has been carved into the tree.
fn carve<R: Rng>(grid: &mut Grid, rng: &mut R) -> Result<(), MazeError> {
    let start = Coordinate::new(
        rng.gen_range(0..grid.width()),
        rng.gen_range(0..grid.height()),
    );
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let unvisited: Vec<Coordinate> = grid
            .neighbors(current)
            .into_iter()
            .filter(|n| grid.link_count(*n) == 0)
            .collect();

        match unvisited.choose(rng) {
            None => {
                stack.pop();
            }
            Some(&next) => {
                grid.link(current, next)?;
                stack.push(next);
            }
        }
    }
    Ok(())
}

/// Removes dead ends by linking them onward, preferring to merge a dead end
/// with another dead end over cutting a new hole into a corridor. Only adds
/// links, so connectivity is never lost.
fn braid<R: Rng>(grid: &mut Grid, p: f64, rng: &mut R) -> Result<(), MazeError> {
    if p <= 0.0 {
        return Ok(());
    }

    let mut order: Vec<Coordinate> = grid.coordinates().collect();
    order.shuffle(rng);

    for room in order {
        if grid.link_count(room) != 1 || rng.gen::<f64>() > p {
            continue;
        }

        let unlinked = grid.unlinked_neighbors(room);
        let fellow_dead_ends: Vec<Coordinate> = unlinked
            .iter()
            .copied()
            .filter(|n| grid.link_count(*n) == 1)
            .collect();

        let pool = if fellow_dead_ends.is_empty() {
            &unlinked
        } else {
            &fellow_dead_ends
        };
        if let Some(&partner) = pool.choose(rng) {
            grid.link(room, partner)?;
        }
    }
    Ok(())
}

/// Flags a random start room, then draws treasure coordinates until they
/// differ from the start. The draw is capped at one attempt per room with a
/// deterministic scan as the fallback, so placement always terminates.
fn place_endpoints<R: Rng>(
    grid: &mut Grid,
    rng: &mut R,
) -> Result<(Coordinate, Coordinate), GenerateError> {
    let (w, h) = (grid.width(), grid.height());
    let start = Coordinate::new(rng.gen_range(0..w), rng.gen_range(0..h));
    grid.set_start(start)?;

    for _ in 0..w * h {
        let candidate = Coordinate::new(rng.gen_range(0..w), rng.gen_range(0..h));
        if candidate != start {
            grid.set_treasure(candidate)?;
            return Ok((start, candidate));
        }
    }
    let fallback = grid.coordinates().find(|c| *c != start);
    if let Some(candidate) = fallback {
        grid.set_treasure(candidate)?;
        return Ok((start, candidate));
    }
    Err(GenerateError::PlacementConflict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn reachable_from(maze: &Maze, from: Coordinate) -> HashSet<Coordinate> {
        let mut seen = HashSet::from([from]);
        let mut stack = vec![from];
        while let Some(c) = stack.pop() {
            for n in maze.grid().linked_neighbors(c) {
                if seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen
    }

    #[test]
    fn rejects_grids_without_two_rooms() {
        let mut rng = StdRng::seed_from_u64(0);
        for (w, h) in [(0, 0), (0, 5), (5, 0), (1, 1)] {
            assert_eq!(
                Generator::new(w, h).generate(&mut rng).err(),
                Some(GenerateError::TooSmall {
                    width: w,
                    height: h
                })
            );
        }
    }

    #[test]
    fn rejects_grids_beyond_the_room_cap() {
        let mut rng = StdRng::seed_from_u64(0);
        // the first pair overflows the multiply, the second merely exceeds the cap
        for (w, h) in [(usize::MAX, 2), (MAX_ROOMS + 1, 1)] {
            assert_eq!(
                Generator::new(w, h).generate(&mut rng).err(),
                Some(GenerateError::TooLarge {
                    width: w,
                    height: h
                })
            );
        }
    }

    /// Rng stuck on zero: `gen_range` always yields the low bound.
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn treasure_placement_falls_back_to_a_scan_when_draws_repeat() {
        // every random draw lands on the start cell, so the capped draws all
        // miss and the deterministic scan has to place the treasure
        let mut rng = ZeroRng;
        let maze = Generator::new(3, 1).generate(&mut rng).unwrap();
        assert_eq!(maze.start(), Coordinate::new(0, 0));
        assert_ne!(maze.treasure(), maze.start());
        assert!(maze
            .room(maze.treasure().x as i64, maze.treasure().y as i64)
            .unwrap()
            .is_treasure());
    }

    #[test]
    fn unbraided_maze_is_a_spanning_tree() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = Generator::new(9, 7).generate(&mut rng).unwrap();
            // n - 1 links and full connectivity make it a tree
            assert_eq!(maze.grid().total_links(), 9 * 7 - 1);
            assert_eq!(reachable_from(&maze, maze.start()).len(), 9 * 7);
        }
    }

    #[test]
    fn start_and_treasure_are_distinct_and_connected() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = Generator::new(5, 4).braid(0.5).generate(&mut rng).unwrap();
            assert_ne!(maze.start(), maze.treasure());
            assert!(reachable_from(&maze, maze.start()).contains(&maze.treasure()));
            assert!(maze.room(maze.start().x as i64, maze.start().y as i64)
                .unwrap()
                .is_start());
            assert!(maze
                .room(maze.treasure().x as i64, maze.treasure().y as i64)
                .unwrap()
                .is_treasure());
        }
    }

    #[test]
    fn zero_braid_probability_changes_nothing() {
        let mut carved = Grid::new(6, 5);
        let mut rng = StdRng::seed_from_u64(11);
        carve(&mut carved, &mut rng).unwrap();
        let links_before = carved.total_links();
        let dead_ends_before = carved.dead_ends();

        braid(&mut carved, 0.0, &mut rng).unwrap();
        braid(&mut carved, -1.0, &mut rng).unwrap();

        assert_eq!(carved.total_links(), links_before);
        assert_eq!(carved.dead_ends(), dead_ends_before);
    }

    #[test]
    fn full_braiding_reduces_dead_ends() {
        for seed in 0..10 {
            let mut grid = Grid::new(8, 6);
            let mut rng = StdRng::seed_from_u64(seed);
            carve(&mut grid, &mut rng).unwrap();
            let before = grid.dead_ends().len();
            assert!(before > 0, "a tree of this size always has dead ends");

            braid(&mut grid, 1.0, &mut rng).unwrap();
            assert!(grid.dead_ends().len() < before);
        }
    }

    #[test]
    fn braiding_only_adds_links() {
        let mut grid = Grid::new(7, 7);
        let mut rng = StdRng::seed_from_u64(3);
        carve(&mut grid, &mut rng).unwrap();
        let before = grid.total_links();
        braid(&mut grid, 1.0, &mut rng).unwrap();
        assert!(grid.total_links() >= before);
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(99);
            Generator::new(6, 6).braid(0.3).generate(&mut rng).unwrap()
        };
        let (a, b) = (build(), build());
        assert_eq!(a.start(), b.start());
        assert_eq!(a.treasure(), b.treasure());
        for c in a.grid().coordinates() {
            assert_eq!(
                a.discover(c.x as i64, c.y as i64).unwrap(),
                b.discover(c.x as i64, c.y as i64).unwrap()
            );
        }
    }

    #[test]
    fn minimal_two_room_grid_generates() {
        let mut rng = StdRng::seed_from_u64(5);
        let maze = Generator::new(2, 1).generate(&mut rng).unwrap();
        assert_ne!(maze.start(), maze.treasure());
        assert_eq!(maze.grid().total_links(), 1);
    }
}
