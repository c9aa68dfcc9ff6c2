use std::cmp::Ordering;

use crate::bus_line::AssessedLine;

/// Subsidy level ascending, then profit descending. Ties keep no particular order.
pub fn ranking_order(a: &AssessedLine, b: &AssessedLine) -> Ordering {
    a.subsidy_level()
        .cmp(&b.subsidy_level())
        .then_with(|| b.profit.total_cmp(&a.profit))
}

pub fn rank_lines(lines: &mut [AssessedLine]) {
    lines.sort_unstable_by(ranking_order);
}
