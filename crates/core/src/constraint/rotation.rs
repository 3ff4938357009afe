//! Quarter-turn kernel rotation via fixed per-size permutation tables.
//!
//! Each table maps a source cell index to its destination index after one
//! 90-degree turn: `rotated[DST[i]] = cells[i]`. The tables are explicit
//! per size so a table entry can be checked against the corner identities
//! (0,0) -> (0, N-1) by inspection.

use super::kernel::{CellConstraint, KernelSize};

const DST_2X2: [usize; 4] = [
    2, 0, //
    3, 1,
];

const DST_3X3: [usize; 9] = [
    6, 3, 0, //
    7, 4, 1, //
    8, 5, 2,
];

const DST_5X5: [usize; 25] = [
    20, 15, 10, 5, 0, //
    21, 16, 11, 6, 1, //
    22, 17, 12, 7, 2, //
    23, 18, 13, 8, 3, //
    24, 19, 14, 9, 4,
];

const DST_7X7: [usize; 49] = [
    42, 35, 28, 21, 14, 7, 0, //
    43, 36, 29, 22, 15, 8, 1, //
    44, 37, 30, 23, 16, 9, 2, //
    45, 38, 31, 24, 17, 10, 3, //
    46, 39, 32, 25, 18, 11, 4, //
    47, 40, 33, 26, 19, 12, 5, //
    48, 41, 34, 27, 20, 13, 6,
];

/// Returns a freshly allocated array holding `cells` rotated by one quarter
/// turn. The input is left untouched so the pre-rotation kernel stays
/// available for reuse.
pub fn rotate_quarter(size: KernelSize, cells: &[CellConstraint]) -> Vec<CellConstraint> {
    let destinations = destination_table(size);
    debug_assert_eq!(cells.len(), destinations.len());

    let mut rotated = vec![CellConstraint::DontCare; cells.len()];
    for (source, &destination) in destinations.iter().enumerate() {
        rotated[destination] = cells[source];
    }
    rotated
}

fn destination_table(size: KernelSize) -> &'static [usize] {
    match size {
        KernelSize::Square2 => &DST_2X2,
        KernelSize::Square3 => &DST_3X3,
        KernelSize::Square5 => &DST_5X5,
        KernelSize::Square7 => &DST_7X7,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ALL_SIZES: [KernelSize; 4] =
        [KernelSize::Square2, KernelSize::Square3, KernelSize::Square5, KernelSize::Square7];

    #[test]
    fn every_table_is_a_permutation() {
        for size in ALL_SIZES {
            let mut seen = vec![false; size.cell_count()];
            for &destination in destination_table(size) {
                assert!(!seen[destination], "{size:?} maps two cells to {destination}");
                seen[destination] = true;
            }
        }
    }

    #[test]
    fn top_left_corner_moves_to_bottom_left() {
        // Corner identity (0,0) -> (N-1, 0) in row-major indices.
        for size in ALL_SIZES {
            let width = size.width();
            assert_eq!(destination_table(size)[0], (width - 1) * width);
        }
    }

    #[test]
    fn single_occupied_cell_traces_a_quarter_turn_orbit() {
        // 3x3: top-center (index 1) -> middle-left (3) -> bottom-center (7)
        // -> middle-right (5) -> back to 1.
        let mut cells = vec![CellConstraint::DontCare; 9];
        cells[1] = CellConstraint::Occupied;

        let expected_orbit = [3, 7, 5, 1];
        for expected in expected_orbit {
            cells = rotate_quarter(KernelSize::Square3, &cells);
            let occupied: Vec<usize> = cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == CellConstraint::Occupied)
                .map(|(index, _)| index)
                .collect();
            assert_eq!(occupied, vec![expected]);
        }
    }

    #[test]
    fn center_cell_is_a_fixed_point_for_odd_widths() {
        for size in [KernelSize::Square3, KernelSize::Square5, KernelSize::Square7] {
            let center = size.cell_count() / 2;
            assert_eq!(destination_table(size)[center], center);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1024))]
        #[test]
        fn four_rotations_are_the_identity(
            size_selector in 0_usize..4,
            fills in proptest::collection::vec(0_u8..3, 49)
        ) {
            let size = ALL_SIZES[size_selector];
            let original: Vec<CellConstraint> = fills[..size.cell_count()]
                .iter()
                .map(|fill| match fill {
                    0 => CellConstraint::DontCare,
                    1 => CellConstraint::Occupied,
                    _ => CellConstraint::Empty,
                })
                .collect();

            let mut rotated = original.clone();
            for _ in 0..4 {
                rotated = rotate_quarter(size, &rotated);
            }
            prop_assert_eq!(rotated, original);
        }
    }
}
