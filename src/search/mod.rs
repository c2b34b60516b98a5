use std::cmp::Ordering;

/// A single ranked row: position in the catalog plus its cosine score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMatch {
    pub index: usize,
    pub score: f32,
}

/// Rank every row of `rows` against `query` by cosine similarity and return
/// the best `top_k` entries. Ordering is descending score; equal scores keep
/// the lower catalog index first, so identical inputs always produce
/// identical output.
pub fn rank(query: &[f32], rows: &[Vec<f32>], top_k: usize) -> Vec<RankedMatch> {
    let top_k = top_k.min(rows.len());
    if top_k == 0 {
        return Vec::new();
    }

    let mut matches: Vec<RankedMatch> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| RankedMatch {
            index,
            score: cosine_similarity(query, row),
        })
        .collect();

    select_top_k(&mut matches, top_k);
    matches
}

pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> f32 {
    let dot: f32 = lhs.iter().zip(rhs).map(|(a, b)| a * b).sum();
    let norm_l: f32 = lhs.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_r: f32 = rhs.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_l == 0.0 || norm_r == 0.0 {
        return 0.0;
    }
    (dot / (norm_l * norm_r)).clamp(-1.0, 1.0)
}

fn select_top_k(matches: &mut Vec<RankedMatch>, k: usize) {
    if matches.len() > k {
        matches.select_nth_unstable_by(k, compare_matches);
        matches.truncate(k);
    }
    matches.sort_by(compare_matches);
}

fn compare_matches(a: &RankedMatch, b: &RankedMatch) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.index.cmp(&b.index))
}
