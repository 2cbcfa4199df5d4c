use crate::domain::TagName;

/// Similarity ratio between two strings: `2 * lcs / (len_a + len_b)`,
/// where `lcs` is the longest-common-subsequence length. 1.0 for equal
/// strings, 0.0 for disjoint ones.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                current[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut current);
    }

    let lcs = prev[b.len()];
    (2 * lcs) as f64 / (a.len() + b.len()) as f64
}

/// Clusters tags that are likely typos of each other: each group holds
/// tags whose similarity to the group's first member meets `tolerance`.
/// Groups of one are dropped. Input order decides which tag anchors a
/// group.
pub fn typo_groups(usage: &[(TagName, i64)], tolerance: f64) -> Vec<Vec<(TagName, i64)>> {
    let mut remaining: Vec<(TagName, i64)> = usage.to_vec();
    let mut groups = Vec::new();

    while !remaining.is_empty() {
        let head = remaining.remove(0);
        let (near, rest): (Vec<_>, Vec<_>) = remaining
            .into_iter()
            .partition(|(name, _)| similarity(head.0.as_str(), name.as_str()) >= tolerance);
        remaining = rest;

        if !near.is_empty() {
            let mut group = vec![head];
            group.extend(near);
            groups.push(group);
        }
    }

    groups
}

/// Tags used fewer than `threshold` times.
pub fn low_use_tags(usage: &[(TagName, i64)], threshold: i64) -> Vec<(TagName, i64)> {
    usage
        .iter()
        .filter(|(_, count)| *count < threshold)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{low_use_tags, similarity, typo_groups};
    use crate::domain::TagName;

    fn usage(pairs: &[(&str, i64)]) -> Vec<(TagName, i64)> {
        pairs
            .iter()
            .map(|(name, count)| (TagName::new(name).unwrap(), *count))
            .collect()
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("scheduling", "scheduling"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn similarity_catches_single_typo() {
        assert!(similarity("scheduling", "schedulling") > 0.9);
        assert!(similarity("scheduling", "parsing") < 0.6);
    }

    #[test]
    fn typo_groups_cluster_near_matches() {
        let tags = usage(&[
            ("scheduling", 12),
            ("schedulling", 1),
            ("parsing", 7),
            ("parsings", 2),
        ]);
        let groups = typo_groups(&tags, 0.8);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].0.as_str(), "scheduling");
        assert_eq!(groups[0][1].0.as_str(), "schedulling");
        assert_eq!(groups[1][0].0.as_str(), "parsing");
        assert_eq!(groups[1][1].0.as_str(), "parsings");
    }

    #[test]
    fn typo_groups_skip_singletons() {
        let tags = usage(&[("alpha", 3), ("omega", 4)]);
        assert!(typo_groups(&tags, 0.8).is_empty());
    }

    #[test]
    fn low_use_respects_threshold() {
        let tags = usage(&[("alpha", 1), ("beta", 2), ("gamma", 5)]);
        let low = low_use_tags(&tags, 2);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].0.as_str(), "alpha");
    }
}
