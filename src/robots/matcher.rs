//! Directive pattern matching
//!
//! A pattern matches when it anchors at the start of the target. `*` matches
//! any run of characters (including none) and `?` matches exactly one.

/// Returns true if `pattern` matches a prefix of `target`
///
/// Runs in `O(pattern * target)`: on a mismatch only the most recent `*` is
/// retried, one character further along the target.
pub fn matches_pattern(pattern: &str, target: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let target: Vec<char> = target.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position after the last `*` seen, and the target position it resumes from
    let mut resume: Option<(usize, usize)> = None;

    while p < pattern.len() {
        match pattern[p] {
            '*' => {
                p += 1;
                resume = Some((p, t));
            }
            c if t < target.len() && (c == '?' || c == target[t]) => {
                p += 1;
                t += 1;
            }
            _ => match resume {
                Some((star_p, star_t)) if star_t < target.len() => {
                    resume = Some((star_p, star_t + 1));
                    p = star_p;
                    t = star_t + 1;
                }
                _ => return false,
            },
        }
    }

    true
}
