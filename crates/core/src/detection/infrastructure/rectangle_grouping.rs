use crate::shared::rect::Rectangle;

/// Relative tolerance used when clustering raw cascade hits.
pub const GROUP_EPS: f64 = 0.2;

/// Clusters near-identical rectangles and keeps one averaged rectangle per
/// cluster with more than `min_neighbors` members.
///
/// Two rectangles are similar when every edge lies within
/// `eps * (min width + min height) / 2` of the other's. Clusters are the
/// transitive closure of that relation. A surviving cluster is still dropped
/// when it sits inside another surviving cluster that is clearly stronger.
pub fn group_rectangles(rects: &[Rectangle], min_neighbors: u32, eps: f64) -> Vec<Rectangle> {
    if min_neighbors == 0 || rects.is_empty() {
        return rects.to_vec();
    }

    let (labels, n_classes) = partition(rects, |a, b| similar(a, b, eps));

    let mut sums = vec![[0i64; 4]; n_classes];
    let mut counts = vec![0u32; n_classes];
    for (rect, &label) in rects.iter().zip(&labels) {
        let sum = &mut sums[label];
        sum[0] += rect.x as i64;
        sum[1] += rect.y as i64;
        sum[2] += rect.width as i64;
        sum[3] += rect.height as i64;
        counts[label] += 1;
    }

    let averaged: Vec<Rectangle> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| {
            let avg = |v: i64| (v as f64 / count as f64).round() as i32;
            Rectangle::new(avg(sum[0]), avg(sum[1]), avg(sum[2]), avg(sum[3]))
        })
        .collect();

    let mut grouped = Vec::new();
    for (i, r1) in averaged.iter().enumerate() {
        let n1 = counts[i];
        if n1 <= min_neighbors {
            continue;
        }
        let swallowed = averaged.iter().enumerate().any(|(j, r2)| {
            let n2 = counts[j];
            if j == i || n2 <= min_neighbors {
                return false;
            }
            let dx = (r2.width as f64 * eps).round() as i32;
            let dy = (r2.height as f64 * eps).round() as i32;
            r1.x >= r2.x - dx
                && r1.y >= r2.y - dy
                && r1.x + r1.width <= r2.x + r2.width + dx
                && r1.y + r1.height <= r2.y + r2.height + dy
                && (n2 > n1.max(3) || n1 < 3)
        });
        if !swallowed {
            grouped.push(*r1);
        }
    }
    grouped
}

fn similar(a: &Rectangle, b: &Rectangle, eps: f64) -> bool {
    let delta = eps * (a.width.min(b.width) + a.height.min(b.height)) as f64 * 0.5;
    let close = |u: i32, v: i32| ((u - v) as f64).abs() <= delta;
    close(a.x, b.x)
        && close(a.y, b.y)
        && close(a.x + a.width, b.x + b.width)
        && close(a.y + a.height, b.y + b.height)
}

/// Union-find partition under an equivalence predicate.
///
/// Returns one label per item and the number of classes; labels are
/// numbered in order of each class's first member.
fn partition<T>(items: &[T], same: impl Fn(&T, &T) -> bool) -> (Vec<usize>, usize) {
    let mut parent: Vec<usize> = (0..items.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..items.len() {
        for j in i + 1..items.len() {
            if same(&items[i], &items[j]) {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[rj.max(ri)] = ri.min(rj);
                }
            }
        }
    }

    let mut class_of_root = vec![usize::MAX; items.len()];
    let mut labels = Vec::with_capacity(items.len());
    let mut n_classes = 0;
    for i in 0..items.len() {
        let root = find(&mut parent, i);
        if class_of_root[root] == usize::MAX {
            class_of_root[root] = n_classes;
            n_classes += 1;
        }
        labels.push(class_of_root[root]);
    }
    (labels, n_classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn r(x: i32, y: i32, w: i32, h: i32) -> Rectangle {
        Rectangle::new(x, y, w, h)
    }

    #[test]
    fn test_empty_input() {
        assert!(group_rectangles(&[], 3, GROUP_EPS).is_empty());
    }

    #[test]
    fn test_zero_neighbors_returns_input_untouched() {
        let rects = vec![r(0, 0, 10, 10), r(1, 1, 10, 10)];
        assert_eq!(group_rectangles(&rects, 0, GROUP_EPS), rects);
    }

    #[test]
    fn test_cluster_is_averaged() {
        let rects = vec![r(10, 10, 20, 20), r(12, 10, 20, 20), r(11, 13, 22, 20)];
        let grouped = group_rectangles(&rects, 2, GROUP_EPS);
        assert_eq!(grouped, vec![r(11, 11, 21, 20)]);
    }

    #[rstest]
    #[case::at_threshold(2, 0)]
    #[case::below_threshold(1, 1)]
    fn test_cluster_needs_more_than_min_neighbors(
        #[case] min_neighbors: u32,
        #[case] expected: usize,
    ) {
        let rects = vec![r(10, 10, 20, 20), r(11, 10, 20, 20)];
        assert_eq!(group_rectangles(&rects, min_neighbors, GROUP_EPS).len(), expected);
    }

    #[test]
    fn test_similarity_is_transitive() {
        // First and last are too far apart on their own (delta = 4).
        let rects = vec![r(0, 0, 20, 20), r(4, 0, 20, 20), r(8, 0, 20, 20)];
        let grouped = group_rectangles(&rects, 2, GROUP_EPS);
        assert_eq!(grouped, vec![r(4, 0, 20, 20)]);
    }

    #[test]
    fn test_separate_clusters_keep_first_seen_order() {
        let rects = vec![
            r(100, 100, 20, 20),
            r(0, 0, 20, 20),
            r(101, 100, 20, 20),
            r(1, 0, 20, 20),
        ];
        let grouped = group_rectangles(&rects, 1, GROUP_EPS);
        assert_eq!(grouped, vec![r(101, 100, 20, 20), r(1, 0, 20, 20)]);
    }

    #[test]
    fn test_weak_cluster_inside_strong_cluster_is_dropped() {
        let mut rects = vec![r(0, 0, 100, 100); 6];
        rects.extend(vec![r(30, 30, 20, 20); 2]);
        let grouped = group_rectangles(&rects, 1, GROUP_EPS);
        assert_eq!(grouped, vec![r(0, 0, 100, 100)]);
    }

    #[test]
    fn test_strong_cluster_inside_comparable_cluster_is_kept() {
        let mut rects = vec![r(0, 0, 100, 100); 4];
        rects.extend(vec![r(30, 30, 20, 20); 5]);
        let grouped = group_rectangles(&rects, 1, GROUP_EPS);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_partition_labels_follow_first_appearance() {
        let items = [5, 1, 5, 2, 1];
        let (labels, n) = partition(&items, |a, b| a == b);
        assert_eq!(n, 3);
        assert_eq!(labels, vec![0, 1, 0, 2, 1]);
    }
}
