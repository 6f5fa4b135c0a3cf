//! Fixed level templates
//!
//! Glyphs: `#` wall, `.` floor, `@` hero, `W` warden, `E` enemy, `G` goal,
//! `+` health, `$` gold. Templates are static and never mutated; loading a
//! level parses a fresh [`Grid`](super::Grid) from them.

/// A level template: equal-length rows of glyphs
pub type LevelTemplate = &'static [&'static str];

/// Classic and Tron levels (hero, enemies, goal)
pub const CRAWL_LEVELS: [LevelTemplate; 3] = [
    // 16x15 - corridor start, two enemies guarding the south room
    &[
        "################",
        "#..............#",
        "#.+............#",
        "#..#######.....#",
        "#..#.....#.....#",
        "#..#.@...#.....#",
        "#..#.....#.....#",
        "#..#####.#####.#",
        "#..............#",
        "#......E....$..#",
        "#....#####.....#",
        "#....#...#.....#",
        "#....#.E.#.....#",
        "#....#.....G...#",
        "################",
    ],
    // 19x16 - hero top-left, goal near the bottom
    &[
        "###################",
        "#.+.......$.......#",
        "#........E........#",
        "#.#####.#####.#####",
        "#.#...........#...#",
        "#.#..@.........#..#",
        "#.#..............+#",
        "#.#...E...........#",
        "#.#####.#####.....#",
        "#...........#.....#",
        "#.....E......#....#",
        "#....#####...#....#",
        "#....#...+.#.#....#",
        "#....#.....#.#.G..#",
        "#####.......###.###",
        "###################",
    ],
    // 21x18 - narrow choke points, seven enemies
    &[
        "#####################",
        "#.+.$......$.......+#",
        "#.....E...E...E.....#",
        "#####.#####.#####.###",
        "#.#...........#.....#",
        "#.#...........#.....#",
        "#.#....@......#.....#",
        "#.#...........#.....#",
        "#.#...E...E.........#",
        "#.#####.#####.#.....#",
        "#..............$....#",
        "#......E............#",
        "#.....#####.........#",
        "#.....#...+.#.......#",
        "#.....#.....#...E...#",
        "#####.#####.#####.###",
        "#.$................G#",
        "#####################",
    ],
];

/// Blind Duel levels (hero, warden, goal)
pub const DUEL_LEVELS: [LevelTemplate; 3] = [
    // 16x15 - hero in the corridor, warden below; choke at the center
    &[
        "################",
        "#..............#",
        "#.+............#",
        "#..#######.....#",
        "#..#.....#.....#",
        "#..#.@...#.....#",
        "#..#.....#.....#",
        "#..#####.#####.#",
        "#..............#",
        "#......W....$..#",
        "#....#####.....#",
        "#....#...#.....#",
        "#....#...#.....#",
        "#....#.....G...#",
        "################",
    ],
    // 19x16 - hero top-left, warden at the bottom gate; several paths to G
    &[
        "###################",
        "#.+.......$.......#",
        "#.................#",
        "#.#####.#####.#####",
        "#.#...........#...#",
        "#.#..@.........#..#",
        "#.#..............+#",
        "#.#...............#",
        "#.#####.#####.....#",
        "#...........#.....#",
        "#............#....#",
        "#....#####...#....#",
        "#....#...+.#.#....#",
        "#....#.....#.#.G..#",
        "#####.......###W###",
        "###################",
    ],
    // 21x18 - choke points where the hero must out-guess the warden
    &[
        "#####################",
        "#.+.$......$.......+#",
        "#...................#",
        "#####.#####.#####.###",
        "#.#...........#.....#",
        "#.#...........#.....#",
        "#.#....@......#.....#",
        "#.#...........#.....#",
        "#.#.......W.........#",
        "#.#####.#####.#.....#",
        "#..............$....#",
        "#...................#",
        "#.....#####.........#",
        "#.....#...+.#.......#",
        "#.....#.....#.......#",
        "#####.#####.#####.###",
        "#.$................G#",
        "#####################",
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Cell, Grid};

    fn check(template: LevelTemplate, seekers_expected: Option<usize>) {
        let grid = Grid::parse(template).unwrap();
        assert!(grid.find_unique(Cell::Evader).is_ok());
        assert!(grid.find_unique(Cell::Goal).is_ok());
        let seekers = grid.find_all(Cell::Seeker).len();
        match seekers_expected {
            Some(n) => assert_eq!(seekers, n),
            None => assert!(seekers > 0),
        }
        // Top and bottom rows are solid wall
        for (r, row) in grid.rows().enumerate() {
            if r == 0 || r + 1 == grid.height() {
                assert!(row.iter().all(|c| *c == Cell::Wall), "row {r}");
            }
        }
    }

    #[test]
    fn test_crawl_levels_parse() {
        for template in CRAWL_LEVELS {
            check(template, None);
        }
    }

    #[test]
    fn test_duel_levels_parse() {
        for template in DUEL_LEVELS {
            check(template, Some(1));
        }
    }
}
