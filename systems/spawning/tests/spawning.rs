use std::collections::{BTreeSet, HashMap};

use tilemerge_core::{BoardView, CellCoord, Command};
use tilemerge_system_spawning::{Config, Spawning};

fn spawns(spawning: &mut Spawning, board: &BoardView, count: u32) -> Vec<(CellCoord, u32)> {
    let mut commands = Vec::new();
    spawning.handle(board, count, &mut commands);
    commands
        .into_iter()
        .map(|command| match command {
            Command::SpawnTile { cell, value } => (cell, value),
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn spawn_lands_on_the_only_empty_cell() {
    let board = BoardView::new(3, vec![2, 4, 8, 16, 0, 32, 64, 128, 256]);
    let mut spawning = Spawning::new(Config::new(0.7, 0x1234_5678));

    for _ in 0..16 {
        let placed = spawns(&mut spawning, &board, 1);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0, CellCoord::new(1, 1));
    }
}

#[test]
fn batch_claims_distinct_cells_and_stops_when_board_fills() {
    let board = BoardView::new(2, vec![0, 2, 0, 0]);
    let mut spawning = Spawning::new(Config::new(0.7, 7));

    let placed = spawns(&mut spawning, &board, 5);
    assert_eq!(placed.len(), 3, "only three cells are empty");

    let cells: BTreeSet<CellCoord> = placed.iter().map(|(cell, _)| *cell).collect();
    assert_eq!(cells.len(), 3, "spawns must not share a cell");
    assert!(!cells.contains(&CellCoord::new(0, 1)));
}

#[test]
fn spawned_values_follow_configured_odds() {
    let board = BoardView::new(4, vec![0; 16]);

    let mut always_two = Spawning::new(Config::new(1.0, 3));
    let mut always_four = Spawning::new(Config::new(0.0, 3));
    for _ in 0..64 {
        assert_eq!(spawns(&mut always_two, &board, 1)[0].1, 2);
        assert_eq!(spawns(&mut always_four, &board, 1)[0].1, 4);
    }

    let mut spawning = Spawning::new(Config::new(0.7, 0x4d59_5df4_d0f3_3173));
    let draws = 4_000;
    let twos = (0..draws)
        .filter(|_| spawns(&mut spawning, &board, 1)[0].1 == 2)
        .count();
    let ratio = twos as f64 / f64::from(draws);
    assert!(
        (0.65..=0.75).contains(&ratio),
        "expected roughly 70% twos, observed {ratio}"
    );
}

#[test]
fn empty_cells_are_chosen_uniformly() {
    let board = BoardView::new(2, vec![0, 0, 2, 0]);
    let mut spawning = Spawning::new(Config::new(0.7, 99));
    let mut counts: HashMap<CellCoord, u32> = HashMap::new();

    for _ in 0..3_000 {
        let (cell, _) = spawns(&mut spawning, &board, 1)[0];
        *counts.entry(cell).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), 3);
    for (cell, count) in counts {
        assert!(
            (850..=1_150).contains(&count),
            "cell {cell:?} chosen {count} times out of 3000"
        );
    }
}

#[test]
fn identical_seeds_replay_identical_spawns() {
    let board = BoardView::new(4, vec![0; 16]);
    let mut first = Spawning::new(Config::new(0.7, 0xfeed));
    let mut second = Spawning::new(Config::new(0.7, 0xfeed));

    for _ in 0..32 {
        assert_eq!(
            spawns(&mut first, &board, 2),
            spawns(&mut second, &board, 2)
        );
    }
}
