/// Computes the median of a set of per-user counts. Returns 0.0 for empty
/// input; even-length input averages the two middle values.
pub fn median(values: &mut [u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid] as f64
    } else {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    }
}

/// Rounds to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Canonical join key for an identity string.
///
/// Numeric-looking identities are coerced to float and re-rendered so that
/// `24` and `24.0` compare equal; the same numeric attribute can serialize
/// either way depending on which phase wrote it, and an exact-string join
/// would silently yield zero participants for the affected row.
pub fn join_key(identity: &str) -> String {
    match identity.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => format!("{v:?}"),
        _ => identity.to_string(),
    }
}
