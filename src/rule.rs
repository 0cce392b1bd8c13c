use crate::{CellState, Player};

/// Upper bound of the tag sum around a newborn cell: exactly 3 live
/// neighbours, each tagged at most [`Player::Two`].
pub(crate) const BIRTH_TAG_SUM_MAX: u32 = 3 * Player::Two as u32;

/// B3/S23: a live cell survives with 2 or 3 live neighbours,
/// a dead cell is born with exactly 3.
#[inline]
pub(crate) fn next_state(alive: bool, neighbours: u32) -> bool {
    neighbours == 3 || (alive && neighbours == 2)
}

/// Picks the tag of a newborn cell in the two-colour variant.
///
/// The tag sum of the three parents is compared against half of
/// [`BIRTH_TAG_SUM_MAX`]. This is a threshold, not a majority vote, and it is
/// not symmetric between the players: a single [`Player::Two`] parent pushes
/// the sum to at least 4, so two [`Player::One`] parents and one
/// [`Player::Two`] parent produce [`Player::Two`]. [`Player::One`] only wins
/// when all three parents are its own. Single-population grids always sum to
/// 3 and so always produce [`Player::One`].
#[inline]
pub(crate) fn birth_tag(neighbour_tag_sum: u32) -> CellState {
    if neighbour_tag_sum > BIRTH_TAG_SUM_MAX / 2 {
        Player::Two as CellState
    } else {
        Player::One as CellState
    }
}

/// Advances one packed row by a generation. Bit `c` of each argument is the
/// cell in column `c`; columns outside `mask` are dead.
pub(crate) fn update_row(row_prev: u32, row_curr: u32, row_next: u32, mask: u32) -> u32 {
    let b = row_prev;
    let a = b << 1;
    let c = b >> 1;
    let i = row_curr;
    let h = i << 1;
    let d = i >> 1;
    let f = row_next;
    let g = f << 1;
    let e = f >> 1;

    let (ab0, ab1, cd0, cd1) = (a ^ b, a & b, c ^ d, c & d);
    let (ef0, ef1, gh0, gh1) = (e ^ f, e & f, g ^ h, g & h);
    let (ad0, ad1, ad2) = (ab0 ^ cd0, ab1 ^ cd1 ^ (ab0 & cd0), ab1 & cd1);
    let (eh0, eh1, eh2) = (ef0 ^ gh0, ef1 ^ gh1 ^ (ef0 & gh0), ef1 & gh1);
    let (ah0, xx, yy) = (ad0 ^ eh0, ad0 & eh0, ad1 ^ eh1);
    let (ah1, ah23) = (xx ^ yy, ad2 | eh2 | (ad1 & eh1) | (xx & yy));
    let z = !ah23 & ah1;
    let (i2, i3) = (!ah0 & z, ah0 & z);
    ((i & i2) | i3) & mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_row_neighbours(rows: [u32; 3], col: i32, width: i32) -> u32 {
        let mut count = 0;
        for (r, row) in rows.iter().enumerate() {
            for dc in -1..=1 {
                if r == 1 && dc == 0 {
                    continue;
                }
                let c = col + dc;
                if (0..width).contains(&c) {
                    count += (row >> c) & 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_update_row_matches_counting() {
        let width = 5;
        let mask = (1 << width) - 1;
        for packed in 0u32..1 << (3 * width) {
            let rows = [packed & mask, (packed >> width) & mask, packed >> (2 * width)];
            let expected = (0..width).fold(0, |acc, col| {
                let alive = (rows[1] >> col) & 1 != 0;
                let next = next_state(alive, count_row_neighbours(rows, col, width));
                acc | (next as u32) << col
            });
            assert_eq!(
                update_row(rows[0], rows[1], rows[2], mask),
                expected,
                "rows {:?}",
                rows
            );
        }
    }

    #[test]
    fn test_birth_tag_threshold() {
        assert_eq!(birth_tag(3), Player::One as CellState);
        // one, one, two
        assert_eq!(birth_tag(4), Player::Two as CellState);
        // one, two, two
        assert_eq!(birth_tag(5), Player::Two as CellState);
        assert_eq!(birth_tag(6), Player::Two as CellState);
    }
}
