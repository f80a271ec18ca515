#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::{Board, ClosedTourOutlook};
    use crate::builder::{BuilderInvalidReason, StartSquare, TourBuilder};
    use crate::knight::{Knight, MoveFilter, TourError, TraversalState};
    use crate::location::{Location, Square};
    use crate::step::KnightStep;
    use crate::tour::Tour;

    fn board(ranks: usize, files: usize) -> Board {
        Board::with_dims((NonZero::new(ranks).unwrap(), NonZero::new(files).unwrap()))
    }

    fn knight_on(board: Board, start: Square, seed: u64) -> Knight<StdRng> {
        Knight::new(board, start, StdRng::seed_from_u64(seed)).unwrap()
    }

    fn walk(knight: &mut Knight<StdRng>, moves: &[Square]) {
        for square in moves {
            knight.move_to(*square).unwrap();
        }
    }

    fn assert_knight_path(board: &Board, path: &[Square]) {
        assert!(path.iter().all(|square| board.contains(*square)), "{path:?} leaves the board");
        assert!(path.iter().all_unique(), "{path:?} repeats a square");
        for (a, b) in path.iter().tuple_windows() {
            assert!(board.is_knight_move(*a, *b), "{a} -> {b} is not a knight move in {path:?}");
        }
    }

    #[test]
    fn square_indexing() {
        let files = NonZero::new(8).unwrap();
        assert_eq!(Location::from_square(17, files), Location(1, 2));
        assert_eq!(Location(1, 2).as_square(files), 17);
        assert_eq!(Location::from_square(63, files), Location(7, 7));

        let narrow = board(3, 4);
        assert_eq!(narrow.location_of(7), Location(3, 1));
        assert_eq!(narrow.square_at(Location(3, 1)), Some(7));
        assert_eq!(narrow.square_at(Location(4, 1)), None);
        assert_eq!(narrow.square_at(Location(0, 3)), None);
    }

    #[test]
    fn steps_invert_and_match() {
        for step in <KnightStep as strum::VariantArray>::VARIANTS {
            let origin = Location(4, 4);
            assert_eq!(step.invert().attempt_from(step.attempt_from(origin)), origin);
            assert_eq!(KnightStep::between(origin, step.attempt_from(origin)), Some(*step));
        }
        assert_eq!(KnightStep::between(Location(0, 0), Location(1, 1)), None);
    }

    #[test]
    fn corner_neighbors() {
        let knight = knight_on(Board::default(), 0, 0);
        assert_eq!(knight.legal_moves(MoveFilter::Unvisited), vec![10, 17]);
        assert!(knight.legal_moves(MoveFilter::Visited).is_empty());
    }

    #[test]
    fn neighbors_in_enumeration_order() {
        let board = Board::default();
        assert_eq!(board.neighbors_raw(27), vec![37, 44, 42, 33, 17, 10, 12, 21]);
        assert_eq!(board.neighbors_raw(63), vec![53, 46]);
        assert!(board.neighbors_raw(64).is_empty());
        assert!(self::board(1, 1).neighbors_raw(0).is_empty());
    }

    #[test]
    fn moves_split_by_visit() {
        let mut knight = knight_on(Board::default(), 0, 0);
        knight.move_to(10).unwrap();

        assert_eq!(knight.legal_moves(MoveFilter::Unvisited), vec![20, 27, 25, 16, 4]);
        assert_eq!(knight.legal_moves(MoveFilter::Visited), vec![0]);
        assert_eq!(knight.current_path(), &[0, 10]);
        assert_eq!(knight.current_square(), 10);
    }

    #[test]
    fn illegal_moves_change_nothing() {
        let mut knight = knight_on(Board::default(), 0, 0);
        assert_eq!(knight.move_to(1), Err(TourError::IllegalMove { from: 0, to: 1 }));
        assert_eq!(knight.move_to(64), Err(TourError::IllegalMove { from: 0, to: 64 }));

        knight.move_to(10).unwrap();
        assert_eq!(knight.move_to(0), Err(TourError::IllegalMove { from: 10, to: 0 }));
        assert_eq!(knight.current_path(), &[0, 10]);
        assert_eq!(knight.current_square(), 10);
        assert_eq!(knight.report().moves, 1);
    }

    #[test]
    fn pivot_reverses_tail() {
        let mut knight = knight_on(Board::default(), 0, 0);
        walk(&mut knight, &[17, 11, 28, 34]);
        assert_eq!(knight.legal_moves(MoveFilter::Visited), vec![17, 28]);

        knight.pivot_path(17).unwrap();
        assert_eq!(knight.current_path(), &[0, 17, 34, 28, 11]);
        assert_eq!(knight.current_square(), 11);
        assert_knight_path(knight.board(), knight.current_path());
    }

    #[test]
    fn pivot_on_predecessor_is_a_no_op() {
        let mut knight = knight_on(Board::default(), 0, 0);
        walk(&mut knight, &[17, 11, 28, 34]);

        knight.pivot_path(28).unwrap();
        assert_eq!(knight.current_path(), &[0, 17, 11, 28, 34]);
        assert_eq!(knight.current_square(), 34);
    }

    #[test]
    fn bad_pivots_change_nothing() {
        let mut knight = knight_on(Board::default(), 0, 0);
        walk(&mut knight, &[17, 11, 28, 34]);

        // visited, but not a knight move away
        assert_eq!(knight.pivot_path(0), Err(TourError::InvalidPivot { from: 34, pivot: 0 }));
        // a knight move away, but not visited
        assert_eq!(knight.pivot_path(44), Err(TourError::InvalidPivot { from: 34, pivot: 44 }));
        // the current square itself
        assert_eq!(knight.pivot_path(34), Err(TourError::InvalidPivot { from: 34, pivot: 34 }));

        assert_eq!(knight.current_path(), &[0, 17, 11, 28, 34]);
        assert_eq!(knight.current_square(), 34);
    }

    #[test]
    fn last_unvisited_neighbor_leads_to_unblock() {
        let mut knight = knight_on(board(5, 5), 2, 3);
        walk(&mut knight, &[13, 6, 3, 14, 7, 10, 1, 8, 11, 20, 17]);
        assert_eq!(knight.legal_moves(MoveFilter::Unvisited), vec![24]);

        knight.move_to(24).unwrap();
        assert!(knight.legal_moves(MoveFilter::Unvisited).is_empty());
        assert_eq!(knight.legal_moves(MoveFilter::Visited), vec![17, 13]);

        // 17 is the predecessor, so 13 is the only pivot
        knight.unblock().unwrap();
        assert_eq!(&knight.current_path()[..13], &[2, 13, 24, 17, 20, 11, 8, 1, 10, 7, 14, 3, 6]);
        assert_eq!(knight.report().pivots, 1);
        assert_knight_path(knight.board(), knight.current_path());
    }

    #[test]
    fn unblock_refuses_predecessor() {
        let mut knight = knight_on(Board::default(), 0, 0);
        knight.move_to(10).unwrap();

        assert_eq!(knight.unblock(), Err(TourError::TraversalStuck { at: 10, visited: 2, count: 64 }));
        assert_eq!(knight.state(), TraversalState::Failed);
        assert_eq!(knight.current_path(), &[0, 10]);
    }

    #[test]
    fn single_square_is_done() {
        let mut knight = knight_on(board(1, 1), 0, 0);
        let report = knight.traverse().unwrap();

        assert_eq!(report.moves, 0);
        assert_eq!(report.pivots, 0);
        assert_eq!(knight.state(), TraversalState::Done);
        assert!(knight.tour().is_complete());
    }

    #[test]
    fn no_moves_fails() {
        let mut knight = knight_on(board(1, 2), 0, 0);
        assert_eq!(knight.traverse(), Err(TourError::TraversalStuck { at: 0, visited: 1, count: 2 }));
        assert_eq!(knight.state(), TraversalState::Failed);
    }

    #[test]
    fn pivot_budget_bounds_hopeless_boards() {
        // the center of a 3x3 board is unreachable, so the walk circles the rim forever
        for seed in 0..10 {
            let mut knight = knight_on(board(3, 3), 0, seed);
            match knight.traverse_within(200) {
                Err(TourError::PivotBudgetExhausted { pivots, visited, count }) => {
                    assert_eq!(pivots, 200);
                    assert_eq!(visited, 8);
                    assert_eq!(count, 9);
                }
                other => panic!("unexpected {other:?}"),
            }
            assert_knight_path(knight.board(), knight.current_path());
        }
    }

    #[test]
    fn full_traversals_are_tours() {
        // every square of an 8x8 board has two or more neighbors, so a stuck knight always has a pivot
        for seed in 0..8 {
            let mut knight = knight_on(Board::default(), 0, seed);
            let report = knight.traverse_within(100_000)
                .unwrap_or_else(|error| panic!("seed {seed}: {error}"));

            assert_eq!(knight.state(), TraversalState::Done);
            assert!(report.moves >= 63);
            assert_eq!(report, knight.report());

            let tour = knight.into_tour();
            assert_eq!(tour.len(), 64);
            assert!(tour.is_complete());
            assert_eq!(tour.path().first(), Some(&0));
        }
    }

    #[test]
    fn three_by_four_never_corrupts() {
        for seed in 0..200 {
            for start in [0, 5, 11] {
                let mut knight = knight_on(board(3, 4), start, seed);
                let outcome = knight.traverse_within(1_000);

                assert_knight_path(knight.board(), knight.current_path());
                assert_eq!(knight.current_path().first(), Some(&start));
                assert_eq!(knight.current_path().last(), Some(&knight.current_square()));
                match outcome {
                    Ok(_) => assert!(knight.is_complete()),
                    Err(TourError::TraversalStuck { .. } | TourError::PivotBudgetExhausted { .. }) => assert!(!knight.is_complete()),
                    Err(error) => panic!("unexpected {error}"),
                }
            }
        }
    }

    #[test]
    fn three_by_four_tours_from_the_corner() {
        let mut toured = 0;
        for seed in 0..200 {
            let mut knight = knight_on(board(3, 4), 0, seed);
            let Ok(report) = knight.traverse_within(1_000) else {
                continue;
            };

            toured += 1;
            assert_eq!(knight.state(), TraversalState::Done);
            assert!(report.moves >= 11);

            let tour = knight.into_tour();
            assert_eq!(tour.len(), 12);
            assert!(tour.is_complete());
            assert_eq!(tour.path().first(), Some(&0));
        }

        // roughly half of all seeds find a tour from the corner
        assert!(toured >= 50, "only {toured} of 200 seeds found a tour");
    }

    #[test]
    fn seeded_traversals_repeat() {
        let run = |seed| {
            let mut launch = TourBuilder::default()
                .start(StartSquare::At(0))
                .seed(seed)
                .build()
                .unwrap();
            let outcome = launch.knight.traverse_within(10_000);
            (outcome, launch.knight.into_tour())
        };

        assert_eq!(run(42), run(42));
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn random_start_is_reproducible() {
        let place = || {
            TourBuilder::with_size(6, 7)
                .seed(99)
                .build()
                .unwrap()
                .knight
                .current_square()
        };

        assert_eq!(place(), place());
        assert!(place() < 42);
    }

    #[test]
    fn off_board_start_falls_back() {
        let launch = TourBuilder::default().start(StartSquare::At(64)).seed(1).build().unwrap();

        assert_eq!(launch.note, Some(TourError::InvalidSquare { square: 64, count: 64 }));
        assert!(launch.knight.current_square() < 64);
        assert_eq!(launch.knight.current_path().len(), 1);
    }

    #[test]
    fn last_square_is_a_valid_start() {
        let launch = TourBuilder::default().start(StartSquare::At(63)).seed(1).build().unwrap();
        assert_eq!(launch.note, None);
        assert_eq!(launch.knight.current_square(), 63);

        assert!(Knight::new(Board::default(), 63, StdRng::seed_from_u64(0)).is_ok());
        assert_eq!(
            Knight::new(Board::default(), 64, StdRng::seed_from_u64(0)).err(),
            Some(TourError::InvalidSquare { square: 64, count: 64 })
        );
    }

    #[test]
    fn zero_dimension_invalidates_builder() {
        let mut builder = TourBuilder::with_size(0, 5);
        builder.start(StartSquare::At(3)).seed(4);

        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::ZeroDimension]));
        assert_eq!(builder.board(), None);
        assert!(builder.build().is_err());
        assert_eq!(TourBuilder::with_size(2, 3).board().map(|board| board.dimensions()), Some((2, 3)));
        assert_eq!(Board::try_from((5usize, 0usize)), Err(BuilderInvalidReason::ZeroDimension));
        assert_eq!(Board::try_from((2usize, 3usize)).map(|board| board.dimensions()), Ok((2, 3)));
    }

    #[test]
    fn closed_tour_outlook() {
        assert_eq!(ClosedTourOutlook::classify(8, 8), ClosedTourOutlook::Possible);
        assert_eq!(ClosedTourOutlook::classify(6, 6), ClosedTourOutlook::Possible);
        assert_eq!(ClosedTourOutlook::classify(3, 10), ClosedTourOutlook::Possible);
        assert_eq!(ClosedTourOutlook::classify(5, 5), ClosedTourOutlook::BothOdd { m: 5, n: 5 });
        assert_eq!(ClosedTourOutlook::classify(7, 1), ClosedTourOutlook::BothOdd { m: 1, n: 7 });
        assert_eq!(ClosedTourOutlook::classify(1, 8), ClosedTourOutlook::Narrow { m: 1 });
        assert_eq!(ClosedTourOutlook::classify(2, 9), ClosedTourOutlook::Narrow { m: 2 });
        assert_eq!(ClosedTourOutlook::classify(5, 4), ClosedTourOutlook::Narrow { m: 4 });
        assert_eq!(ClosedTourOutlook::classify(3, 4), ClosedTourOutlook::ShortThree { n: 4 });
        assert_eq!(ClosedTourOutlook::classify(8, 3), ClosedTourOutlook::ShortThree { n: 8 });

        assert!(board(2, 6).closed_tour_outlook().excludes_closed_tour());
        assert!(!Board::default().closed_tour_outlook().excludes_closed_tour());
        assert_eq!(
            ClosedTourOutlook::classify(3, 6).to_string(),
            "m=3, n=6: for m=3 and n=4, 6, or 8, a closed tour is not possible"
        );
    }

    #[test]
    fn narrow_boards_still_build() {
        for (ranks, files) in [(1, 5), (2, 6), (2, 2)] {
            let mut launch = TourBuilder::with_size(ranks, files).start(StartSquare::At(0)).seed(3).build().unwrap();
            assert!(launch.outlook.excludes_closed_tour());

            let outcome = launch.knight.traverse_within(100);
            assert!(outcome.is_err());
            assert_knight_path(launch.knight.board(), launch.knight.current_path());
        }
    }

    #[test]
    fn knight_graph_counts() {
        assert_eq!(Board::default().knight_moves().len(), 168);
        assert_eq!(Board::default().knight_graph().edge_count(), 168);

        let small = board(3, 3).knight_graph();
        assert_eq!(small.node_count(), 9);
        assert_eq!(small.edge_count(), 8);
        assert_eq!(small.neighbors(4).count(), 0);
        assert_eq!(small.edge_weight(0, 5), Some(&KnightStep::RightDown));
    }

    #[test]
    fn tour_validation() {
        let open = Tour::new(board(3, 4), vec![0, 6, 8, 1, 7, 9, 2, 11, 5, 3, 10, 4]);
        assert!(open.is_complete());
        assert!(!open.is_closed());

        let closed = Tour::new(board(5, 6), vec![
            0, 8, 4, 17, 28, 15, 23, 27, 19, 6, 2, 10, 21, 29, 16,
            5, 9, 1, 12, 25, 14, 18, 26, 22, 11, 3, 7, 20, 24, 13,
        ]);
        assert!(closed.is_complete());
        assert!(closed.is_closed());

        assert!(!Tour::new(board(3, 4), vec![0, 6, 0]).is_knight_path());
        assert!(!Tour::new(board(3, 4), vec![0, 1]).is_knight_path());
        assert!(!Tour::new(board(3, 4), vec![0, 6, 8]).is_complete());
        assert!(Tour::new(board(3, 4), vec![]).is_knight_path());
        assert!(!Tour::new(board(3, 4), vec![]).is_closed());
    }

    #[test]
    fn visit_order_grid() {
        let grid = board(2, 3).visit_order(&[0, 5]);
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid[(0, 0)], Some(0));
        assert_eq!(grid[(1, 2)], Some(1));
        assert_eq!(grid.iter().filter(|cell| cell.is_none()).count(), 4);
    }

    #[test]
    fn display_tour() {
        assert_eq!(format!("{}", Tour::new(board(2, 3), vec![0, 5])), "  A B C
2 0 . .
1 . . 1
");

        assert_eq!(format!("{}", Tour::new(board(1, 1), vec![0])), "  A
1 0
");
    }
}

#[cfg(test)]
mod properties {
    use std::num::NonZero;

    use itertools::Itertools;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::Board;
    use crate::knight::{Knight, MoveFilter};

    fn is_knight_path(board: &Board, path: &[usize]) -> bool {
        path.iter().all(|square| board.contains(*square))
            && path.iter().all_unique()
            && path.iter().tuple_windows().all(|(a, b)| board.is_knight_move(*a, *b))
    }

    proptest! {
        #[test]
        fn walking_and_unblocking_keep_a_knight_path(seed in any::<u64>(), ranks in 1usize..9, files in 1usize..9, rounds in 0usize..30) {
            let board = Board::with_dims((NonZero::new(ranks).unwrap(), NonZero::new(files).unwrap()));
            let mut knight = Knight::at_random(board, StdRng::seed_from_u64(seed));

            knight.random_walk();
            prop_assert!(is_knight_path(&board, knight.current_path()));
            prop_assert!(knight.is_complete() || knight.legal_moves(MoveFilter::Unvisited).is_empty());

            for _ in 0..rounds {
                if knight.is_complete() || knight.unblock().is_err() {
                    break;
                }
                prop_assert!(is_knight_path(&board, knight.current_path()));
                prop_assert_eq!(knight.current_path().last(), Some(&knight.current_square()));
            }
        }

        #[test]
        fn pivots_permute_the_path(seed in any::<u64>(), ranks in 3usize..9, files in 3usize..9, choice in any::<usize>()) {
            let board = Board::with_dims((NonZero::new(ranks).unwrap(), NonZero::new(files).unwrap()));
            let mut knight = Knight::at_random(board, StdRng::seed_from_u64(seed));
            knight.random_walk();

            let candidates = knight.legal_moves(MoveFilter::Visited);
            prop_assume!(!candidates.is_empty());
            let pivot = candidates[choice % candidates.len()];

            let before = knight.current_path().to_vec();
            let t = before.iter().position(|square| *square == pivot).unwrap();
            knight.pivot_path(pivot).unwrap();
            let after = knight.current_path();

            prop_assert_eq!(&after[..=t], &before[..=t]);
            prop_assert_eq!(after[t + 1..].iter().rev().collect_vec(), before[t + 1..].iter().collect_vec());
            prop_assert_eq!(after.iter().sorted().collect_vec(), before.iter().sorted().collect_vec());
            prop_assert_eq!(knight.current_square(), before[t + 1]);
            prop_assert!(is_knight_path(&board, after));
        }
    }
}
