//! Identifiers (landmark ids, track ids) are compared across two frames to find which
//! measurements refer to the same entity. Invalid identifiers, as decided by the caller's
//! `is_valid` predicate, never match anything.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Index pairs `(i_cur, i_ref)` such that `ids_cur[i_cur] == ids_ref[i_ref]` and the id is
/// valid, ordered by `i_cur`.
///
/// If an id appears more than once in `ids_ref`, the first occurrence is used.
///
/// ```rust
/// use kestrel_geometry::combinatorics::get_match_indices;
///
/// let matches = get_match_indices(&[-1, 4, 2], &[2, -1, 4], |id| id != -1);
/// assert_eq!(matches, vec![(1, 2), (2, 0)]);
/// ```
pub fn get_match_indices<T, F>(ids_cur: &[T], ids_ref: &[T], is_valid: F) -> Vec<(usize, usize)>
where
    T: Copy + Eq + Hash,
    F: Fn(T) -> bool,
{
    let mut ref_index: HashMap<T, usize> = HashMap::with_capacity(ids_ref.len());
    for (i, &id) in ids_ref.iter().enumerate() {
        if is_valid(id) {
            ref_index.entry(id).or_insert(i);
        }
    }

    ids_cur
        .iter()
        .enumerate()
        .filter(|&(_, &id)| is_valid(id))
        .filter_map(|(i_cur, id)| ref_index.get(id).map(|&i_ref| (i_cur, i_ref)))
        .collect()
}

/// Ascending indices into `ids_cur` whose id is valid but absent from `ids_ref`.
pub fn get_unmatched_indices<T, F>(ids_cur: &[T], ids_ref: &[T], is_valid: F) -> Vec<usize>
where
    T: Copy + Eq + Hash,
    F: Fn(T) -> bool,
{
    let ref_ids: HashSet<T> = ids_ref.iter().copied().filter(|&id| is_valid(id)).collect();
    ids_cur
        .iter()
        .enumerate()
        .filter(|&(_, &id)| is_valid(id) && !ref_ids.contains(&id))
        .map(|(i, _)| i)
        .collect()
}

/// Ascending indices in `0..size` that are not listed in `inliers`.
///
/// Inlier indices may come in any order; indices `>= size` are ignored.
pub fn get_outlier_indices_from_inlier_indices(inliers: &[usize], size: usize) -> Vec<usize> {
    let mut is_inlier = vec![false; size];
    for &i in inliers {
        if let Some(flag) = is_inlier.get_mut(i) {
            *flag = true;
        }
    }
    is_inlier
        .iter()
        .enumerate()
        .filter(|&(_, &inlier)| !inlier)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS_CUR: [i32; 10] = [-1, 2, 3, 7, 9, -1, 10, 12, 4, 5];
    const IDS_REF: [i32; 7] = [-1, 1, 2, 3, 12, 9, -1];

    fn is_valid(id: i32) -> bool {
        id != -1
    }

    #[test]
    fn test_get_match_indices() {
        let matches = get_match_indices(&IDS_CUR, &IDS_REF, is_valid);
        assert_eq!(matches.len(), 4);
        for &(i_cur, i_ref) in &matches {
            assert_eq!(IDS_CUR[i_cur], IDS_REF[i_ref]);
        }
        assert_eq!(matches, vec![(1, 2), (2, 3), (4, 5), (7, 4)]);
    }

    #[test]
    fn test_get_unmatched_indices() {
        let unmatched = get_unmatched_indices(&IDS_CUR, &IDS_REF, is_valid);
        assert_eq!(unmatched, vec![3, 6, 8, 9]);
    }

    #[test]
    fn test_invalid_ids_never_match() {
        assert!(get_match_indices(&[-1, -1], &[-1], is_valid).is_empty());
        assert!(get_unmatched_indices(&[-1, -1], &[], is_valid).is_empty());
        assert_eq!(get_unmatched_indices(&[5u64, 6], &[], |_| true), vec![0, 1]);
    }

    #[test]
    fn test_outliers_from_inliers() {
        let outliers = get_outlier_indices_from_inlier_indices(&[0, 1, 5, 4], 7);
        assert_eq!(outliers, vec![2, 3, 6]);

        let outliers = get_outlier_indices_from_inlier_indices(&[0, 1, 2], 3);
        assert!(outliers.is_empty());

        let outliers = get_outlier_indices_from_inlier_indices(&[9], 2);
        assert_eq!(outliers, vec![0, 1]);
    }
}
