//! Cross-engine contract tests.
//!
//! Every engine, in both layouts, runs the same checks: randomized
//! set/erase sequences against a `BTreeMap` oracle, the append contract,
//! cursor walks and copy-construction between engines.

#[cfg(test)]
mod contract_tests {
    use std::collections::BTreeMap;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{
        Axis, ColumnMajor, CompressedMatrix, CoordinateMatrix, Direction, MapMatrix,
        MatrixOperations, Orientation, Rank, RowMajor, SparseError, SparseMatrix,
        SparseMatrixMut, Traverse, VectorOfVectorMatrix,
    };

    type Entry = (usize, usize, i64);

    fn layout_key(order: Orientation, row: usize, col: usize) -> (usize, usize) {
        match order {
            Orientation::RowMajor => (row, col),
            Orientation::ColumnMajor => (col, row),
        }
    }

    fn sorted_by(order: Orientation, mut entries: Vec<Entry>) -> Vec<Entry> {
        entries.sort_by_key(|&(row, col, _)| layout_key(order, row, col));
        entries
    }

    fn sample() -> Vec<Entry> {
        vec![(0, 1, 1), (2, 0, 2), (2, 2, 3), (3, 1, 4)]
    }

    fn check_random_ops<M>(seed: u64)
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let (rows, cols) = (7, 5);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut matrix = M::create(rows, cols, 0);
        let mut oracle = BTreeMap::new();

        for _ in 0..300 {
            let (row, col) = (rng.gen_range(0..rows), rng.gen_range(0..cols));
            if rng.gen_bool(0.7) {
                let value = rng.gen_range(-50..50);
                matrix.set(row, col, value);
                oracle.insert((row, col), value);
            } else {
                matrix.erase(row, col);
                oracle.remove(&(row, col));
            }
        }

        for row in 0..rows {
            for col in 0..cols {
                let expected = oracle.get(&(row, col)).copied().unwrap_or(0);
                assert_eq!(matrix.get(row, col), expected, "mismatch at ({row}, {col})");
            }
        }
        assert_eq!(matrix.nnz(), oracle.len());

        let expected: Vec<Entry> = oracle.iter().map(|(&(r, c), &v)| (r, c, v)).collect();
        let by_row: Vec<_> = matrix.entries(Orientation::RowMajor).collect();
        let by_col: Vec<_> = matrix.entries(Orientation::ColumnMajor).collect();
        assert_eq!(by_row, expected);
        assert_eq!(by_col, sorted_by(Orientation::ColumnMajor, expected.clone()));

        let mut reversed: Vec<_> = matrix.entries(Orientation::RowMajor).rev().collect();
        reversed.reverse();
        assert_eq!(reversed, expected);
    }

    fn check_basic_scenario<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let mut m = M::create(4, 4, 0);
        m.set(0, 0, 1);
        m.set(2, 3, 5);
        m.set(0, 0, 9);
        assert_eq!(m.get(0, 0), 9);
        assert_eq!(m.get(2, 3), 5);
        assert_eq!(m.get(1, 1), 0);
        assert_eq!(m.nnz(), 2);
    }

    fn check_erase_and_clear_idempotent<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let mut m = M::from_entries(4, 3, sample());
        m.erase(1, 1);
        assert_eq!(m.nnz(), 4);
        m.erase(2, 0);
        m.erase(2, 0);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.get(2, 0), 0);

        m.clear();
        m.clear();
        assert_eq!(m.nnz(), 0);
        for row in 0..4 {
            for col in 0..3 {
                assert_eq!(m.get(row, col), 0);
            }
        }
        assert_eq!(m.entries(Orientation::RowMajor).count(), 0);
        assert_eq!(m.entries(Orientation::ColumnMajor).count(), 0);

        // Usable after clear
        m.set(3, 2, 6);
        assert_eq!(m.entries(Orientation::RowMajor).collect::<Vec<_>>(), vec![(3, 2, 6)]);
    }

    fn check_push_back<M>(strict: bool)
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let mut m = M::create(3, 3, 0);
        let order = m.orientation();
        let mut keys = vec![(2, 2), (0, 0), (1, 1), (0, 2), (2, 0)];
        keys.sort_by_key(|&(row, col)| layout_key(order, row, col));
        for (i, &(row, col)) in keys.iter().enumerate() {
            m.push_back(row, col, i as i64 + 1).unwrap();
        }
        assert_eq!(m.nnz(), 5);

        let (row, col) = keys[1];
        let result = m.push_back(row, col, 99);
        if strict {
            assert_eq!(result, Err(SparseError::OrderViolation));
            assert_eq!(m.get(row, col), 2);
        } else {
            assert_eq!(result, Ok(()));
            assert_eq!(m.get(row, col), 99);
        }
        assert_eq!(m.nnz(), 5);

        let (last_row, last_col) = keys[4];
        m.pop_back().unwrap();
        assert_eq!(m.get_element(last_row, last_col), None);
        for _ in 0..4 {
            m.pop_back().unwrap();
        }
        assert_eq!(m.pop_back(), Err(SparseError::Underflow));
        assert_eq!(m.nnz(), 0);
    }

    fn check_cursor_walk<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let m = M::from_entries(4, 3, sample());

        // Logical outer cursor, stored dual cursors
        let mut seen = Vec::new();
        let mut outer = m.begin(Axis::Row);
        let end = m.end(Axis::Row);
        let mut outer_steps = 0;
        while outer != end {
            assert_eq!(outer.rank(), Rank::Logical);
            let mut inner = outer.dual_begin();
            let inner_end = outer.dual_end();
            while inner != inner_end {
                assert_eq!(inner.rank(), Rank::Stored);
                assert!(inner.is_entry());
                seen.push((inner.row(), inner.col(), inner.value()));
                inner.advance();
            }
            outer.advance();
            outer_steps += 1;
        }
        assert_eq!(outer_steps, 4);
        assert_eq!(seen, sample());

        // Logical positions read through the matrix
        let logical = m.find(Rank::Logical, 1, 1, Axis::Col, Direction::Forward);
        assert!(!logical.is_entry());
        assert_eq!((logical.row(), logical.col(), logical.value()), (1, 1, 0));
        let logical = m.find(Rank::Logical, 2, 2, Axis::Col, Direction::Forward);
        assert_eq!(logical.value(), 3);

        // Stored locate moves to the nearest entry along the axis
        let down = m.find(Rank::Stored, 0, 0, Axis::Row, Direction::Forward);
        assert_eq!((down.row(), down.col(), down.value()), (2, 0, 2));
        let left = m.find(Rank::Stored, 3, 2, Axis::Col, Direction::Backward);
        assert_eq!((left.row(), left.col(), left.value()), (3, 1, 4));

        // Sentinels when nothing is found
        let past = m.find(Rank::Stored, 3, 2, Axis::Col, Direction::Forward);
        assert!(past.is_end());
        assert!(!past.is_entry());
        assert_eq!((past.row(), past.col(), past.value()), (3, 3, 0));
        let before = m.find(Rank::Stored, 1, 2, Axis::Col, Direction::Backward);
        assert!(!before.is_entry());
        assert_eq!((before.row(), before.col()), (1, 0));

        // Retreat from the end sentinel walks entries backwards
        let mut cursor = m.begin(Axis::Row);
        cursor.advance();
        cursor.advance();
        let mut back = cursor.dual_end();
        back.retreat();
        assert_eq!((back.row(), back.col()), (2, 2));
        back.retreat();
        assert_eq!((back.row(), back.col()), (2, 0));
        back.retreat();
        assert!(!back.is_entry());
        assert_eq!(back.index(), 0);
        assert_eq!(back.rank(), Rank::Stored);

        // Advancing from `rend` re-enters the line at its first entry
        back.advance();
        assert_eq!((back.row(), back.col(), back.value()), (2, 0, 2));
    }

    fn check_iterators<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let m = M::from_entries(4, 3, sample());

        assert_eq!(m.row(2).collect::<Vec<_>>(), vec![(2, 0, 2), (2, 2, 3)]);
        assert_eq!(m.row(1).count(), 0);
        assert_eq!(m.col(1).rev().collect::<Vec<_>>(), vec![(3, 1, 4), (0, 1, 1)]);

        // Both ends of a line meet without repeating
        let mut line = m.row(2);
        assert_eq!(line.next(), Some((2, 0, 2)));
        assert_eq!(line.next_back(), Some((2, 2, 3)));
        assert_eq!(line.next(), None);
        assert_eq!(line.next_back(), None);

        let mut entries = m.entries(Orientation::RowMajor);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries.next(), Some((0, 1, 1)));
        assert_eq!(entries.next_back(), Some((3, 1, 4)));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.collect::<Vec<_>>(), vec![(2, 0, 2), (2, 2, 3)]);

        assert_eq!(m.get_row(2), vec![(0, 2), (2, 3)]);
        assert_eq!(m.get_col(1), vec![(0, 1), (3, 4)]);
        assert!(m.get_col(0).iter().all(|&(row, _)| row == 2));
    }

    fn check_zero_extents<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        for (rows, cols) in [(0, 0), (0, 3), (3, 0)] {
            let m = M::create(rows, cols, 4);
            assert_eq!(m.nnz(), 0);
            assert_eq!(m.entries(Orientation::RowMajor).count(), 0);
            assert_eq!(m.entries(Orientation::ColumnMajor).count(), 0);
            assert_eq!(m.begin(Axis::Row) == m.end(Axis::Row), rows == 0);
            if rows > 0 {
                assert_eq!(m.row(rows - 1).count(), 0);
            }
            if cols > 0 {
                assert_eq!(m.col(cols - 1).rev().count(), 0);
            }
        }
    }

    fn check_element_access<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let mut m = M::create(3, 3, 0);
        {
            let mut element = m.element_mut(1, 2);
            assert_eq!(element.read(), 0);
            assert!(!element.is_stored());
            element.write(4);
            assert_eq!(element.update(|v| v * 2), 8);
            assert!(element.is_stored());
        }
        assert_eq!(m.get(1, 2), 8);

        *m.at_element(1, 2).unwrap() += 1;
        assert_eq!(m.get(1, 2), 9);
        assert_eq!(m.at_element(0, 0), Err(SparseError::MissingElement));

        {
            let mut element = m.element_mut(1, 2);
            element.write(0);
            assert!(element.is_stored());
            element.prune_zero();
            assert!(!element.is_stored());
        }
        assert_eq!(m.nnz(), 0);

        m.set(0, 0, 0);
        assert_eq!(m.nnz(), 1);
        m.element_mut(0, 0).erase();
        assert_eq!(m.nnz(), 0);
    }

    fn check_bounds_and_resize<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let mut m = M::from_entries(4, 3, sample());
        assert_eq!(m.try_get(4, 0), Err(SparseError::IndexOutOfBounds));
        assert_eq!(m.try_get(3, 1), Ok(4));
        assert_eq!(m.try_set(0, 3, 1), Err(SparseError::IndexOutOfBounds));
        m.try_set(1, 2, 7).unwrap();
        assert_eq!(m.get(1, 2), 7);

        assert_eq!(m.resize(8, 8, true), Err(SparseError::PreserveUnsupported));
        assert_eq!(m.dimensions(), (4, 3));
        assert_eq!(m.nnz(), 5);

        m.reserve(32, true);
        assert_eq!(m.nnz(), 5);
        assert_eq!(m.get(2, 2), 3);

        m.resize(2, 6, false).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 6));
        assert_eq!(m.nnz(), 0);
        m.set(1, 5, 3);
        assert_eq!(m.entries(Orientation::ColumnMajor).collect::<Vec<_>>(), vec![(1, 5, 3)]);

        m.reserve(4, false);
        assert_eq!(m.nnz(), 0);
    }

    fn check_copy_construction<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse,
    {
        let source = MapMatrix::<i64, ColumnMajor>::from_entries(4, 3, sample());
        let copy = M::from_sparse(&source).unwrap();
        assert_eq!(copy.dimensions(), (4, 3));
        assert_eq!(copy.entries(Orientation::RowMajor).collect::<Vec<_>>(), sample());

        let back = CompressedMatrix::<i64, RowMajor>::from_sparse(&copy).unwrap();
        assert_eq!(back.entries(Orientation::RowMajor).collect::<Vec<_>>(), sample());
        let triplets = CoordinateMatrix::<i64, ColumnMajor>::from_sparse(&copy).unwrap();
        assert_eq!(
            triplets.entries(Orientation::ColumnMajor).collect::<Vec<_>>(),
            sorted_by(Orientation::ColumnMajor, sample())
        );
    }

    fn check_content_equality<M>()
    where
        M: SparseMatrixMut<Element = i64> + Traverse + PartialEq + std::fmt::Debug,
    {
        // Capacity and erased slots do not take part in equality
        let mut erased = M::create(3, 3, 0);
        erased.set(0, 0, 1);
        erased.erase(0, 0);
        assert_eq!(erased, M::create(3, 3, 0));
        assert_eq!(M::create(3, 3, 5), M::create(3, 3, 0));

        let filled = M::from_entries(4, 3, sample());
        let mut reserved = M::from_entries(4, 3, sample());
        reserved.reserve(32, true);
        assert_eq!(reserved, filled);

        reserved.set(0, 1, 9);
        assert_ne!(reserved, filled);

        // Explicit zeros are stored entries
        let mut zero = M::create(3, 3, 0);
        zero.set(1, 1, 0);
        assert_ne!(zero, M::create(3, 3, 0));
        assert_ne!(M::create(3, 3, 0), M::create(3, 4, 0));
    }

    macro_rules! engine_contract {
        ($($name:ident => $engine:ty, strict: $strict:expr;)*) => {
            $(
                mod $name {
                    use super::*;

                    type Engine = $engine;

                    #[test]
                    fn test_random_set_erase_matches_oracle() {
                        for seed in 0..6 {
                            check_random_ops::<Engine>(seed);
                        }
                    }

                    #[test]
                    fn test_last_write_wins_scenario() {
                        check_basic_scenario::<Engine>();
                    }

                    #[test]
                    fn test_erase_and_clear_idempotent() {
                        check_erase_and_clear_idempotent::<Engine>();
                    }

                    #[test]
                    fn test_push_back_contract() {
                        check_push_back::<Engine>($strict);
                    }

                    #[test]
                    fn test_cursor_walk() {
                        check_cursor_walk::<Engine>();
                    }

                    #[test]
                    fn test_iterators() {
                        check_iterators::<Engine>();
                    }

                    #[test]
                    fn test_zero_extents() {
                        check_zero_extents::<Engine>();
                    }

                    #[test]
                    fn test_element_access() {
                        check_element_access::<Engine>();
                    }

                    #[test]
                    fn test_bounds_and_resize() {
                        check_bounds_and_resize::<Engine>();
                    }

                    #[test]
                    fn test_copy_construction() {
                        check_copy_construction::<Engine>();
                    }

                    #[test]
                    fn test_equality_compares_contents() {
                        check_content_equality::<Engine>();
                    }

                    #[cfg(debug_assertions)]
                    #[test]
                    #[should_panic(expected = "out of bounds")]
                    fn test_get_past_last_row_panics() {
                        let m = Engine::create(3, 2, 0);
                        m.get(3, 0);
                    }

                    #[cfg(debug_assertions)]
                    #[test]
                    #[should_panic(expected = "out of bounds")]
                    fn test_set_past_last_col_panics() {
                        let mut m = Engine::create(3, 2, 0);
                        m.set(0, 2, 1);
                    }
                }
            )*
        };
    }

    engine_contract! {
        map_row_major => MapMatrix<i64, RowMajor>, strict: false;
        map_column_major => MapMatrix<i64, ColumnMajor>, strict: false;
        vector_row_major => VectorOfVectorMatrix<i64, RowMajor>, strict: false;
        vector_column_major => VectorOfVectorMatrix<i64, ColumnMajor>, strict: false;
        compressed_row_major => CompressedMatrix<i64, RowMajor>, strict: true;
        compressed_column_major => CompressedMatrix<i64, ColumnMajor>, strict: true;
        coordinate_row_major => CoordinateMatrix<i64, RowMajor>, strict: true;
        coordinate_column_major => CoordinateMatrix<i64, ColumnMajor>, strict: true;
    }

    #[test]
    fn test_coordinate_duplicate_scenario() {
        let mut m = CoordinateMatrix::<i64>::new(3, 3);
        m.set(1, 1, 10);
        m.set(1, 1, 20);
        assert!(!m.is_sorted());
        m.sort();
        assert_eq!(m.filled(), 1);
        assert_eq!(m.get(1, 1), 20);
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![(1, 1, 20)]);
    }

    #[test]
    fn test_compressed_push_back_scenario() {
        let mut m = CompressedMatrix::<i64>::new(3, 3);
        m.push_back(0, 0, 1).unwrap();
        m.push_back(0, 2, 2).unwrap();
        m.push_back(1, 1, 3).unwrap();
        assert_eq!(m.push_back(0, 1, 4), Err(SparseError::OrderViolation));
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.get(0, 1), 0);
        assert!(m.is_consistent());
    }

    #[test]
    fn test_compressed_offsets_stay_monotone() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut m = CompressedMatrix::<i64, ColumnMajor>::new(9, 6);
        for step in 0..500 {
            let (row, col) = (rng.gen_range(0..9), rng.gen_range(0..6));
            if rng.gen_bool(0.6) {
                m.set(row, col, step);
            } else {
                m.erase(row, col);
            }
            let offsets = m.index1_data();
            assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
            assert_eq!(offsets[offsets.len() - 1], m.nnz());
        }
        assert!(m.is_consistent());
    }
}
