use super::Environment;

/// Suggestions offered for a missing variable.
const MAX_SUGGESTIONS: usize = 3;
/// Largest edit distance a suggestion may have.
const MAX_DISTANCE: usize = 2;

/// Resolve one `${NAME}` to a non-empty value, or the fatal message.
pub fn lookup_variable(name: &str, env: &dyn Environment) -> Result<String, String> {
    if name.is_empty() {
        return Err("Empty variable".into());
    }
    match env.lookup(name) {
        Some(value) if value.is_empty() => Err(format!("Value for variable {name} is empty")),
        Some(value) => Ok(value),
        None => {
            let similar = suggestions(name, env);
            if similar.is_empty() {
                Err(format!("Cannot find value for variable {name}"))
            } else {
                Err(format!(
                    "Cannot find value for variable {name}, did you mean {}?",
                    similar.join(", ")
                ))
            }
        }
    }
}

/// Up to three variable names within edit distance 2 of `name`, in
/// environment order. Case-sensitive.
pub fn suggestions(name: &str, env: &dyn Environment) -> Vec<String> {
    let target: Vec<char> = name.chars().collect();
    env.entries()
        .into_iter()
        .map(|(key, _)| key)
        .filter(|key| key.chars().count().abs_diff(target.len()) <= MAX_DISTANCE)
        .filter(|key| {
            let candidate: Vec<char> = key.chars().collect();
            within_distance(&candidate, &target, MAX_DISTANCE)
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Levenshtein distance check that gives up once every cell of a row
/// exceeds `bound`.
fn within_distance(a: &[char], b: &[char], bound: usize) -> bool {
    if a.len().abs_diff(b.len()) > bound {
        return false;
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        if row.iter().all(|&d| d > bound) {
            return false;
        }
        prev = row;
    }
    prev[b.len()] <= bound
}
