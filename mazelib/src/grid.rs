use crate::direction::Direction;
use crate::error::{GenerateError, MazeError};
use crate::models::{Coordinate, Survey};

/// A single cell of the grid. Walls and links are direction-indexed and
/// only ever mutated through `Grid::link`, which keeps them consistent:
/// inside the grid a wall stands exactly where no link is, and boundary
/// sides are always walled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    walls: [bool; 4],
    links: [bool; 4],
    start: bool,
    treasure: bool,
}

impl Room {
    fn sealed() -> Self {
        Room {
            walls: [true; 4],
            links: [false; 4],
            start: false,
            treasure: false,
        }
    }

    pub fn survey(&self) -> Survey {
        Survey {
            top: self.walls[Direction::North.index()],
            right: self.walls[Direction::East.index()],
            bottom: self.walls[Direction::South.index()],
            left: self.walls[Direction::West.index()],
        }
    }

    pub fn is_linked_toward(&self, dir: Direction) -> bool {
        self.links[dir.index()]
    }

    pub fn link_count(&self) -> usize {
        self.links.iter().filter(|linked| **linked).count()
    }

    /// A dead end has exactly one open passage.
    pub fn is_dead_end(&self) -> bool {
        self.link_count() == 1
    }

    pub fn is_start(&self) -> bool {
        self.start
    }

    pub fn is_treasure(&self) -> bool {
        self.treasure
    }

    fn open(&mut self, dir: Direction) {
        self.walls[dir.index()] = false;
        self.links[dir.index()] = true;
    }
}

/// Rectangular 4-connected grid of rooms, row-major, fixed size after
/// construction. All coordinate validation funnels through `index`.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    rooms: Vec<Room>,
}

impl Grid {
    /// A fully walled grid with no links: the starting point for carving.
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            rooms: vec![Room::sealed(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn room_count(&self) -> usize {
        self.width * self.height
    }

    /// The single bounds-checking choke point.
    fn index(&self, x: i64, y: i64) -> Result<usize, MazeError> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Err(MazeError::OutOfBounds { x, y });
        }
        Ok(y as usize * self.width + x as usize)
    }

    pub fn room(&self, x: i64, y: i64) -> Result<&Room, MazeError> {
        let idx = self.index(x, y)?;
        Ok(&self.rooms[idx])
    }

    /// Trusted access for coordinates the grid itself produced; callers
    /// outside the crate go through the bounds-checked `room` instead.
    fn at(&self, c: Coordinate) -> &Room {
        assert!(
            c.x < self.width && c.y < self.height,
            "coordinate {} outside the grid",
            c
        );
        &self.rooms[c.y * self.width + c.x]
    }

    pub fn survey(&self, x: i64, y: i64) -> Result<Survey, MazeError> {
        Ok(self.room(x, y)?.survey())
    }

    /// The adjacent coordinate in `dir`, if it is inside the grid.
    pub fn neighbor(&self, c: Coordinate, dir: Direction) -> Option<Coordinate> {
        let (dx, dy) = dir.delta();
        let (x, y) = (c.x as i64 + dx, c.y as i64 + dy);
        self.index(x, y).ok()?;
        Some(Coordinate::new(x as usize, y as usize))
    }

    pub fn neighbors(&self, c: Coordinate) -> Vec<Coordinate> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.neighbor(c, dir))
            .collect()
    }

    /// Opens the passage between two adjacent rooms in one transaction:
    /// both facing walls come down and both link bits go up. Linking an
    /// already linked pair is a no-op.
    pub fn link(&mut self, a: Coordinate, b: Coordinate) -> Result<(), MazeError> {
        let ia = self.index(a.x as i64, a.y as i64)?;
        let ib = self.index(b.x as i64, b.y as i64)?;
        let dir = self
            .direction_between(a, b)
            .ok_or(MazeError::NotAdjacent { a, b })?;
        self.rooms[ia].open(dir);
        self.rooms[ib].open(dir.opposite());
        Ok(())
    }

    pub fn is_linked(&self, a: Coordinate, b: Coordinate) -> bool {
        match self.direction_between(a, b) {
            Some(dir) => self.at(a).is_linked_toward(dir),
            None => false,
        }
    }

    fn direction_between(&self, a: Coordinate, b: Coordinate) -> Option<Direction> {
        self.index(a.x as i64, a.y as i64).ok()?;
        Direction::ALL
            .into_iter()
            .find(|dir| self.neighbor(a, *dir) == Some(b))
    }

    pub(crate) fn link_count(&self, c: Coordinate) -> usize {
        self.at(c).link_count()
    }

    pub(crate) fn linked_neighbors(&self, c: Coordinate) -> Vec<Coordinate> {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.at(c).is_linked_toward(*dir))
            .filter_map(|dir| self.neighbor(c, dir))
            .collect()
    }

    pub(crate) fn unlinked_neighbors(&self, c: Coordinate) -> Vec<Coordinate> {
        Direction::ALL
            .into_iter()
            .filter(|dir| !self.at(c).is_linked_toward(*dir))
            .filter_map(|dir| self.neighbor(c, dir))
            .collect()
    }

    /// Every room with exactly one open passage.
    pub fn dead_ends(&self) -> Vec<Coordinate> {
        self.coordinates()
            .filter(|c| self.at(*c).is_dead_end())
            .collect()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coordinate::new(x, y)))
    }

    /// Total number of open passages (each counted once).
    pub fn total_links(&self) -> usize {
        self.rooms.iter().map(Room::link_count).sum::<usize>() / 2
    }

    /// Flags the awakening room. Start and treasure are mutually exclusive.
    pub fn set_start(&mut self, c: Coordinate) -> Result<(), GenerateError> {
        let idx = self.index(c.x as i64, c.y as i64)?;
        if self.rooms[idx].treasure {
            return Err(GenerateError::PlacementConflict);
        }
        self.rooms[idx].start = true;
        Ok(())
    }

    /// Flags the treasure room. Start and treasure are mutually exclusive.
    pub fn set_treasure(&mut self, c: Coordinate) -> Result<(), GenerateError> {
        let idx = self.index(c.x as i64, c.y as i64)?;
        if self.rooms[idx].start {
            return Err(GenerateError::PlacementConflict);
        }
        self.rooms[idx].treasure = true;
        Ok(())
    }
}
