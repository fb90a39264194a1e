use pathviz_core::Pos;

/// Manhattan (L1) distance between two grid positions.
#[inline]
pub fn manhattan(a: Pos, b: Pos) -> u32 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u32
}
