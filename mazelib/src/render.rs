use std::fmt;

use crate::maze::Maze;
use crate::models::Survey;

/// Debug rendering, one text row per grid row: `_`/`|` walls, `⏀`/`⏂` the
/// start, `⏃`/`⏅` the treasure, `⏆`/`⏈` the agent (the second glyph of each
/// pair is the variant over a bottom wall).
impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "_{}", "___".repeat(self.width()))?;

        for y in 0..self.height() {
            write!(f, "|")?;
            for x in 0..self.width() {
                let survey = self
                    .discover(x as i64, y as i64)
                    .unwrap_or(Survey::SEALED);
                let (start, treasure) = match self.room(x as i64, y as i64) {
                    Ok(room) => (room.is_start(), room.is_treasure()),
                    Err(_) => (false, false),
                };
                let agent_here =
                    self.position().x == x && self.position().y == y;

                let cell = if survey.bottom {
                    if treasure {
                        "⏅_"
                    } else if start {
                        "⏂_"
                    } else if agent_here {
                        "⏈ "
                    } else {
                        "__"
                    }
                } else if treasure {
                    "⏃ "
                } else if start {
                    "⏀ "
                } else if agent_here {
                    "⏆ "
                } else {
                    "  "
                };
                write!(f, "{}", cell)?;
                write!(f, "{}", if survey.right { "|" } else { "_" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::Grid;
    use crate::maze::Maze;
    use crate::models::Coordinate;

    #[test]
    fn renders_a_vertical_corridor() {
        let mut grid = Grid::new(1, 2);
        grid.link(Coordinate::new(0, 0), Coordinate::new(0, 1)).unwrap();
        grid.set_start(Coordinate::new(0, 0)).unwrap();
        grid.set_treasure(Coordinate::new(0, 1)).unwrap();
        let maze = Maze::new(grid, Coordinate::new(0, 0), Coordinate::new(0, 1));

        assert_eq!(maze.to_string(), "____\n|⏀ |\n|⏅_|\n");
    }

    #[test]
    fn agent_shows_up_after_moving() {
        let mut grid = Grid::new(2, 1);
        grid.link(Coordinate::new(0, 0), Coordinate::new(1, 0)).unwrap();
        grid.set_start(Coordinate::new(0, 0)).unwrap();
        grid.set_treasure(Coordinate::new(1, 0)).unwrap();
        let maze = Maze::new(grid, Coordinate::new(0, 0), Coordinate::new(1, 0));

        let frame = maze.to_string();
        assert!(frame.contains('⏂'), "start over its bottom wall: {frame}");
        assert!(frame.contains('⏅'), "treasure over its bottom wall: {frame}");
        // agent glyph hidden while standing on the flagged start room
        assert!(!frame.contains('⏈') && !frame.contains('⏆'));
    }
}
