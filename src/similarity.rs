use std::collections::HashMap;

/// Outcome of scanning a candidate pool for the closest question.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub index: usize,
    pub target: String,
    pub score: f64,
}

/// Sorensen-Dice coefficient over character bigrams, in [0, 1].
///
/// Whitespace is stripped before bigrams are extracted, so "hello there"
/// and "hellothere" score 1.0. Strings shorter than two characters share
/// no bigrams and score 0.0 unless they are identical after stripping.
pub fn compare(first: &str, second: &str) -> f64 {
    let first: Vec<char> = first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> = second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }
    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in first.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in second.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    // Each string of length n contributes n - 1 bigrams.
    (2 * intersection) as f64 / (first.len() + second.len() - 2) as f64
}

/// Scores `query` against every candidate and returns the best one.
/// Ties keep the first-encountered candidate; an empty pool yields None.
pub fn find_best_match(query: &str, candidates: &[String]) -> Option<BestMatch> {
    let mut best: Option<BestMatch> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = compare(query, candidate);
        let improves = best.as_ref().map(|b| score > b.score).unwrap_or(true);
        if improves {
            best = Some(BestMatch {
                index,
                target: candidate.clone(),
                score,
            });
        }
    }

    best
}
