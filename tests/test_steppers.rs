#[cfg(test)]
mod tests {
    use gol_lookup::*;
    use serial_test::serial;
    use std::sync::{Arc, OnceLock};

    const SEED: u64 = 42;
    const GLIDER: &[u8] = b"#C This is a glider.\nx = 3, y = 3\nbo$2bo$3o!\n";

    fn table(window_size: u32) -> Arc<TransitionTable> {
        static TABLE_3: OnceLock<Arc<TransitionTable>> = OnceLock::new();
        static TABLE_5: OnceLock<Arc<TransitionTable>> = OnceLock::new();
        let cell = match window_size {
            3 => &TABLE_3,
            5 => &TABLE_5,
            _ => unreachable!(),
        };
        cell.get_or_init(|| Arc::new(TransitionTable::build(window_size).unwrap()))
            .clone()
    }

    fn build_steppers() -> Vec<Box<dyn Stepper>> {
        vec![
            Box::new(DirectStepper),
            Box::new(AcceleratedStepper::new(table(3))),
            Box::new(AcceleratedStepper::new(table(5))),
        ]
    }

    fn assert_steps_equal(steppers: &[Box<dyn Stepper>], grid: &Grid) -> Grid {
        let expected = grid.tick();
        for stepper in steppers.iter() {
            assert_eq!(
                stepper.step(grid),
                expected,
                "{} stepper diverged on a {}x{} grid",
                stepper.name(),
                grid.width(),
                grid.height()
            );
        }
        expected
    }

    #[test]
    #[serial]
    fn test_single_steps() {
        let steppers = build_steppers();
        for (width, height) in [(1, 1), (3, 3), (4, 7), (10, 10), (33, 17), (64, 64), (97, 50)] {
            for density in [0.1, 0.35, 0.7] {
                let grid = Grid::random(width, height, density, Some(SEED)).unwrap();
                assert_steps_equal(&steppers, &grid);
            }
        }
    }

    #[test]
    #[serial]
    fn test_repetitive_steps() {
        let steppers = build_steppers();
        let mut grid = Grid::random(120, 90, 0.3, Some(SEED)).unwrap();
        for _ in 0..64 {
            grid = assert_steps_equal(&steppers, &grid);
        }
    }

    #[test]
    #[serial]
    fn test_two_colour_steps() {
        let steppers = build_steppers();
        let player_one = Grid::random(30, 40, 0.4, Some(SEED)).unwrap();
        let player_two = player_one.rotate90().change_player(Player::Two);
        let mut grid = Grid::new(80, 45)
            .unwrap()
            .copy_from(&player_one, 2, 2)
            .copy_from(&player_two, 38, 3);
        for _ in 0..32 {
            grid = assert_steps_equal(&steppers, &grid);
        }
    }

    #[test]
    #[serial]
    fn test_glider_translation() {
        let glider = decode_rle(GLIDER).unwrap();
        let start = Grid::new(20, 16).unwrap().copy_from(&glider, 1, 1);
        for stepper in build_steppers() {
            let mut grid = start.clone();
            for generation in 1..=40 {
                grid = stepper.step(&grid);
                if generation % 4 == 0 {
                    let shift = generation / 4 + 1;
                    let expected = Grid::new(20, 16).unwrap().copy_from(&glider, shift, shift);
                    assert_eq!(grid, expected, "{} at generation {}", stepper.name(), generation);
                }
            }
        }
    }

    #[test]
    #[serial]
    fn test_glider_dies_at_border() {
        // zero-padded borders turn the glider into a block in the corner
        let glider = decode_rle(GLIDER).unwrap();
        let mut simulation = Simulation::new(Grid::new(8, 8).unwrap().copy_from(&glider, 0, 0));
        simulation.attach_table(table(5));
        let last = simulation.run(60);
        let block = decode_lexicon(&["11", "11"], '0', Player::One).unwrap();
        assert_eq!(*last, Grid::new(8, 8).unwrap().copy_from(&block, 6, 6));
        assert_eq!(*last, *Simulation::new(last.as_ref().clone()).step());
    }

    #[test]
    #[serial]
    fn test_lexicon_pattern_in_simulation() {
        let rule = "-".repeat(71);
        let text = format!(
            "preamble\n{rule}\n:toad: (p2) A small oscillator.\n\t.***\n\t***.\n{rule}\n"
        );
        let entries = parse_lexicon(&text).unwrap();
        let toad = entries[0].to_pattern(Player::One).unwrap();

        let grid = Grid::new(12, 12).unwrap().copy_from(&toad, 4, 5);
        let mut simulation = Simulation::new(grid.clone());
        simulation.attach_table(table(5));
        assert_ne!(*simulation.step(), grid);
        assert_eq!(*simulation.step(), grid);
    }
}
