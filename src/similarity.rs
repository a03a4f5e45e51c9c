//! Gestalt pattern matching (Ratcliff/Obershelp) over characters.
//!
//! Produces the same ratio as Python's `difflib.SequenceMatcher` with no junk
//! function, including its "popular element" heuristic for long inputs.

use std::collections::{HashMap, HashSet};

/// Case-insensitive similarity in `[0, 1]`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    ratio(&a, &b)
}

fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = Matcher::new(a, b).matching_chars();
    2.0 * matches as f64 / total as f64
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        // Characters filling more than 1% of a long `b` are dropped from the index.
        let n = b.len();
        if n >= 200 {
            let limit = n / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, js)| js.len() > limit)
                .map(|(c, _)| *c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }

        Self { a, b, b2j }
    }

    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.b2j.get(&self.a[i]) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow the block over equal characters that were left out of the index.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    fn matching_chars(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_and_empty() {
        assert!(close(similarity("AI Meetup", "AI Meetup"), 1.0));
        assert!(close(similarity("", ""), 1.0));
        assert!(close(similarity("abc", ""), 0.0));
    }

    #[test]
    fn ignores_case() {
        assert!(close(similarity("Demo Night", "DEMO NIGHT"), 1.0));
    }

    #[test]
    fn matches_difflib_ratios() {
        assert!(close(similarity("Founders Dinner", "Founders Brunch"), 2.0 / 3.0));
        assert!(close(similarity("AI Builders Night", "AI Builder Night"), 32.0 / 33.0));
        assert!(close(similarity("Demo Day", "Hack Night"), 1.0 / 9.0));
    }

    #[test]
    fn long_inputs_drop_popular_characters() {
        let a = "a".repeat(250) + "bc";
        let b = "a".repeat(240) + "cb";
        assert!(close(similarity(&a, &b), 482.0 / 494.0));
    }
}
