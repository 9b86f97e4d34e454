use ndarray::Array2;

use crate::classify::Region;

/// Pixel counts of the 4-connected patches labeled `region`, largest first.
pub fn region_areas(labels: &Array2<Region>, region: Region) -> Vec<usize> {
    let (h, w) = labels.dim();
    let mut visited = Array2::from_elem((h, w), false);
    let mut stack = Vec::new();
    let mut areas = Vec::new();

    for ((row, col), &label) in labels.indexed_iter() {
        if label != region || visited[[row, col]] {
            continue;
        }

        visited[[row, col]] = true;
        stack.push((row, col));
        let mut area = 0;
        while let Some((r, c)) = stack.pop() {
            area += 1;
            let neighbors = [
                (r.checked_sub(1), Some(c)),
                ((r + 1 < h).then_some(r + 1), Some(c)),
                (Some(r), c.checked_sub(1)),
                (Some(r), (c + 1 < w).then_some(c + 1)),
            ];
            for (nr, nc) in neighbors {
                let (Some(nr), Some(nc)) = (nr, nc) else {
                    continue;
                };
                if labels[[nr, nc]] == region && !visited[[nr, nc]] {
                    visited[[nr, nc]] = true;
                    stack.push((nr, nc));
                }
            }
        }
        areas.push(area);
    }

    areas.sort_unstable_by(|a, b| b.cmp(a));
    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Array2<Region> {
        let w = rows[0].len();
        Array2::from_shape_fn((rows.len(), w), |(r, c)| {
            match rows[r].as_bytes()[c] {
                b'F' => Region::Flare,
                b'D' => Region::DirectLight,
                _ => Region::Background,
            }
        })
    }

    #[test]
    fn test_u_shape_is_one_patch() {
        let labels = grid(&["F...F", "F...F", "F...F", "FFFFF"]);
        assert_eq!(region_areas(&labels, Region::Flare), vec![11]);
    }

    #[test]
    fn test_diagonal_neighbors_stay_separate() {
        let labels = grid(&["F..", ".F.", "..F"]);
        assert_eq!(region_areas(&labels, Region::Flare), vec![1, 1, 1]);
    }

    #[test]
    fn test_other_regions_break_patches() {
        let labels = grid(&["FFDFF", "....."]);
        assert_eq!(region_areas(&labels, Region::Flare), vec![2, 2]);
        assert_eq!(region_areas(&labels, Region::DirectLight), vec![1]);
    }
}
