// Tue Aug 25 2026 - Alex

use crate::listing::doc::Line;

/// Find the index of the line whose byte range contains `addr` in a
/// flattened, offset-sorted line array. Boundary lines (headers, footers,
/// separators) can overlap their neighbors, so after the initial match the
/// search scans in the requested direction for the first/last line still
/// containing `addr`.
pub fn line_by_addr(lines: &[Line], addr: usize, prefer_last: bool) -> Option<usize> {
    if lines.is_empty() {
        return None;
    }

    // Candidates all sit below the partition point since `from` values are
    // non-decreasing; zero-width separators can interleave, so walk back
    // to the nearest containing line.
    let upper = lines.partition_point(|l| l.from <= addr);
    let mut res = (0..upper).rev().find(|&i| lines[i].contains(addr))?;

    if prefer_last {
        while res + 1 < lines.len() && lines[res + 1].contains(addr) {
            res += 1;
        }
    } else {
        while res > 0 && lines[res - 1].contains(addr) {
            res -= 1;
        }
    }
    Some(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(from: usize, to: usize) -> Line {
        Line {
            from,
            to,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(line_by_addr(&[], 0, false), None);
        let lines = vec![line(4, 7), line(8, 11)];
        assert_eq!(line_by_addr(&lines, 0, false), None);
        assert_eq!(line_by_addr(&lines, 12, false), None);
    }

    #[test]
    fn test_unique_match_ignores_direction() {
        let lines = vec![line(0, 3), line(4, 7), line(8, 11)];
        assert_eq!(line_by_addr(&lines, 5, false), Some(1));
        assert_eq!(line_by_addr(&lines, 5, true), Some(1));
        assert_eq!(line_by_addr(&lines, 0, false), Some(0));
        assert_eq!(line_by_addr(&lines, 11, true), Some(2));
    }

    #[test]
    fn test_overlapping_boundary_lines() {
        // Header/separator lines sharing an instruction's start offset.
        let lines = vec![line(0, 3), line(4, 4), line(4, 4), line(4, 7), line(8, 11)];
        assert_eq!(line_by_addr(&lines, 4, false), Some(1));
        assert_eq!(line_by_addr(&lines, 4, true), Some(3));
    }

    #[test]
    fn test_wide_line_behind_separator() {
        // The zero-width line at 4 does not contain 6; the instruction
        // line before it does.
        let lines = vec![line(0, 3), line(4, 7), line(4, 4), line(8, 11)];
        assert_eq!(line_by_addr(&lines, 6, false), Some(1));
        assert_eq!(line_by_addr(&lines, 6, true), Some(1));
    }
}
