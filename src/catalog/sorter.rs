//! Playlist ordering algorithms.
//!
//! All functions are pure: they take a slice and return a new `Vec`.
//! [`sort`] is the stable merge sort the engine uses; the others are
//! alternatives for callers that do not need its guarantees.

use crate::model::Track;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field to order tracks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    #[default]
    Title,
    Artist,
    Duration,
    /// Creation order
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortCriterion {
    /// Compare two tracks on this field alone.
    pub fn compare(self, a: &Track, b: &Track) -> Ordering {
        match self {
            SortCriterion::Title => a.title_key().cmp(&b.title_key()),
            SortCriterion::Artist => a.artist_key().cmp(&b.artist_key()),
            SortCriterion::Duration => a.duration.cmp(&b.duration),
            SortCriterion::CreatedAt => a.sequence.cmp(&b.sequence),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::Title => "title",
            SortCriterion::Artist => "artist",
            SortCriterion::Duration => "duration",
            SortCriterion::CreatedAt => "created_at",
        }
    }
}

impl std::str::FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortCriterion::Title),
            "artist" => Ok(SortCriterion::Artist),
            "duration" => Ok(SortCriterion::Duration),
            "created_at" | "created" | "recent" => Ok(SortCriterion::CreatedAt),
            other => Err(format!("unknown sort criterion: {other}")),
        }
    }
}

impl SortDirection {
    /// Apply this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Stable sort by one criterion.
///
/// Equal keys keep their input order in both directions.
pub fn sort(tracks: &[Track], criterion: SortCriterion, direction: SortDirection) -> Vec<Track> {
    merge_sort_by(tracks, |a, b| direction.apply(criterion.compare(a, b)))
}

/// Stable sort by several keys, earlier keys taking priority.
pub fn sort_by_keys(tracks: &[Track], keys: &[(SortCriterion, SortDirection)]) -> Vec<Track> {
    merge_sort_by(tracks, |a, b| {
        keys.iter()
            .map(|(criterion, direction)| direction.apply(criterion.compare(a, b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Top-down merge sort. The merge takes from the left run on ties.
pub fn merge_sort_by<T, F>(items: &[T], compare: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    fn merge_sort<T: Clone, F: Fn(&T, &T) -> Ordering>(items: &[T], compare: &F) -> Vec<T> {
        if items.len() <= 1 {
            return items.to_vec();
        }
        let (left, right) = items.split_at(items.len() / 2);
        let left = merge_sort(left, compare);
        let right = merge_sort(right, compare);
        merge(left, right, compare)
    }

    fn merge<T, F: Fn(&T, &T) -> Ordering>(left: Vec<T>, right: Vec<T>, compare: &F) -> Vec<T> {
        let mut out = Vec::with_capacity(left.len() + right.len());
        let mut left = left.into_iter().peekable();
        let mut right = right.into_iter().peekable();
        loop {
            let take_left = match (left.peek(), right.peek()) {
                (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_left { left.next() } else { right.next() };
            out.extend(next);
        }
        out
    }

    merge_sort(items, &compare)
}

/// Quicksort with a median-of-three pivot and a three-way partition.
/// Not stable.
///
/// Keys equal to the pivot are settled in one pass, and only the smaller
/// side is recursed into, so stack depth stays logarithmic even for sorted
/// or all-equal input.
pub fn quick_sort(tracks: &[Track], criterion: SortCriterion, direction: SortDirection) -> Vec<Track> {
    fn sort_in_place<F: Fn(&Track, &Track) -> Ordering>(mut items: &mut [Track], compare: &F) {
        while items.len() > 1 {
            let (lt, gt) = partition(items, compare);
            let (low, rest) = std::mem::take(&mut items).split_at_mut(lt);
            let high = &mut rest[gt - lt..];
            if low.len() < high.len() {
                sort_in_place(low, compare);
                items = high;
            } else {
                sort_in_place(high, compare);
                items = low;
            }
        }
    }

    /// Returns `(lt, gt)`: `[..lt]` is less than the pivot, `[lt..gt]` equal,
    /// `[gt..]` greater.
    fn partition<F: Fn(&Track, &Track) -> Ordering>(
        items: &mut [Track],
        compare: &F,
    ) -> (usize, usize) {
        let pivot = items[median_of_three(items, compare)].clone();
        let (mut lt, mut i, mut gt) = (0, 0, items.len());
        while i < gt {
            match compare(&items[i], &pivot) {
                Ordering::Less => {
                    items.swap(lt, i);
                    lt += 1;
                    i += 1;
                }
                Ordering::Greater => {
                    gt -= 1;
                    items.swap(i, gt);
                }
                Ordering::Equal => i += 1,
            }
        }
        (lt, gt)
    }

    fn median_of_three<F: Fn(&Track, &Track) -> Ordering>(items: &[Track], compare: &F) -> usize {
        let (a, b, c) = (0, items.len() / 2, items.len() - 1);
        let less = |x: usize, y: usize| compare(&items[x], &items[y]) == Ordering::Less;
        if less(a, b) {
            if less(b, c) {
                b
            } else if less(a, c) {
                c
            } else {
                a
            }
        } else if less(a, c) {
            a
        } else if less(b, c) {
            c
        } else {
            b
        }
    }

    let mut out = tracks.to_vec();
    sort_in_place(&mut out, &|a: &Track, b: &Track| direction.apply(criterion.compare(a, b)));
    out
}

/// Insertion sort; stable, for small inputs.
pub fn insertion_sort(
    tracks: &[Track],
    criterion: SortCriterion,
    direction: SortDirection,
) -> Vec<Track> {
    let mut out = tracks.to_vec();
    for i in 1..out.len() {
        let mut j = i;
        while j > 0
            && direction.apply(criterion.compare(&out[j - 1], &out[j])) == Ordering::Greater
        {
            out.swap(j - 1, j);
            j -= 1;
        }
    }
    out
}

/// Pick an algorithm by input size: insertion up to 10 tracks, merge up to
/// 1000, quicksort beyond that.
pub fn hybrid_sort(
    tracks: &[Track],
    criterion: SortCriterion,
    direction: SortDirection,
) -> Vec<Track> {
    match tracks.len() {
        0..=10 => insertion_sort(tracks, criterion, direction),
        11..=1000 => sort(tracks, criterion, direction),
        _ => quick_sort(tracks, criterion, direction),
    }
}

/// Fisher-Yates shuffle.
pub fn shuffle(tracks: &[Track]) -> Vec<Track> {
    let mut out = tracks.to_vec();
    out.shuffle(&mut rand::rng());
    out
}
