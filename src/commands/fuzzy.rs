//! Approximate matching of user-typed tokens against known names.
//!
//! The scoring walk is asymmetric: the candidate drives the comparison, and
//! a query longer than the candidate never matches. Scores land in `[0, 1]`
//! for practical inputs but can go negative when the query is much shorter
//! than the candidate; callers treat anything at or below zero as no match.
//!
//! The matchers are generic over the pool and a name-extraction function so
//! they serve both command-name resolution and lookups in other pools, such
//! as finding a member of a group roster by display name.

/// Scores how closely `query` matches `candidate`.
///
/// Equal strings score `1.0` and a query longer than the candidate scores
/// `0.0`. Otherwise the walk advances one step per matching character, pays
/// one step back for every candidate character past the end of the query,
/// and stops at the first mismatch.
///
/// A walk that ends exactly one step short of the candidate's full length
/// also scores `1.0`, so a query that differs from the candidate only in
/// the final character counts as a perfect match. Historical behavior of
/// the scoring formula, kept for compatibility; see the quirk test below.
#[must_use]
pub fn score(candidate: &str, query: &str) -> f64 {
    if candidate == query {
        return 1.0;
    }

    let candidate: Vec<char> = candidate.chars().collect();
    let query: Vec<char> = query.chars().collect();

    if query.len() > candidate.len() {
        return 0.0;
    }

    let mut step: i64 = 0;
    for (i, &ch) in candidate.iter().enumerate() {
        if i >= query.len() {
            step -= 1;
        } else if ch == query[i] {
            step += 1;
        } else {
            break;
        }
    }

    if step == candidate.len() as i64 - 1 {
        return 1.0;
    }

    step as f64 / candidate.len() as f64
}

/// Returns the best-scoring candidate for `query`.
///
/// A candidate whose extracted name equals the query is returned
/// immediately. Otherwise the first-seen maximum wins; `None` when nothing
/// scores above zero.
pub fn best_match<'a, T, I, F>(pool: I, index: F, query: &str) -> Option<&'a T>
where
    T: ?Sized,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> &str,
{
    let mut best: Option<&'a T> = None;
    let mut rate = 0.0;

    for candidate in pool {
        let name = index(candidate);
        if name == query {
            return Some(candidate);
        }
        let this = score(name, query);
        if this > rate {
            rate = this;
            best = Some(candidate);
        }
    }

    best
}

/// Like [`best_match`], but refuses to choose when the pool contains more
/// than one perfect match for the query.
///
/// Used where a guess must be unambiguous, e.g. resolving a display name to
/// exactly one member. Returns `None` both when nothing matches and when
/// the best match is ambiguous; callers that can accept any best guess use
/// [`best_match`] instead.
pub fn unique_best_match<'a, T, I, F>(pool: I, index: F, query: &str) -> Option<&'a T>
where
    T: ?Sized,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> &str,
{
    let mut best: Option<&'a T> = None;
    let mut rate = 0.0;
    let mut perfect = 0u32;

    for candidate in pool {
        let this = score(index(candidate), query);
        if this >= 1.0 {
            perfect += 1;
            if perfect > 1 {
                return None;
            }
        }
        if this > rate {
            rate = this;
            best = Some(candidate);
        }
    }

    best
}
