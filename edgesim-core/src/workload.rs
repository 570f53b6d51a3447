use std::collections::HashMap;

use crate::Request;

/// The `n` most requested keys, most popular first.
///
/// Ties are broken by first appearance in `keys`, so the ranking is stable for
/// a given workload. Used to build the warm-start list of edge nodes.
///
/// # Examples
///
/// ```
/// use edgesim_core::popular_keys;
///
/// let keys = ["b", "a", "c", "a", "b", "a"];
/// assert_eq!(popular_keys(keys, 2), vec!["a", "b"]);
/// assert!(popular_keys(keys, 0).is_empty());
/// ```
pub fn popular_keys<I, S>(keys: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // key -> (count, first index)
    let mut counts: HashMap<String, (u64, usize)> = HashMap::new();
    for (idx, key) in keys.into_iter().enumerate() {
        let entry = counts.entry(key.as_ref().to_string()).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, (u64, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (ca, ia)), (_, (cb, ib))| cb.cmp(ca).then(ia.cmp(ib)));
    ranked.into_iter().take(n).map(|(key, _)| key).collect()
}

/// [`popular_keys`] over the item keys of a request list.
pub fn popular_request_keys(requests: &[Request], n: usize) -> Vec<String> {
    popular_keys(requests.iter().map(|r| r.key.as_str()), n)
}
