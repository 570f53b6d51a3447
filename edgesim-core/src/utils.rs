use std::collections::VecDeque;

/// Moves a key to the end of the order queue (marks it as most recently used).
///
/// Used by the LRU and ARC policies to refresh a key's position on access.
///
/// # Behavior
///
/// - If the key exists in the queue, it is removed from its current position and added to the end
/// - If the key doesn't exist, the queue remains unchanged
///
/// # Performance
///
/// O(n) in the length of the queue: a linear scan to find the key plus the shift on removal.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
/// use edgesim_core::utils::move_key_to_end;
///
/// let mut order = VecDeque::from(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
/// move_key_to_end(&mut order, "b");
/// assert_eq!(order.back().unwrap(), "b");
///
/// // Unknown keys leave the queue untouched
/// move_key_to_end(&mut order, "zzz");
/// assert_eq!(order.len(), 3);
/// ```
pub fn move_key_to_end(order: &mut VecDeque<String>, key: &str) -> bool {
    match order.iter().position(|k| k == key) {
        Some(pos) => {
            if let Some(k) = order.remove(pos) {
                order.push_back(k);
            }
            true
        }
        None => false,
    }
}

/// Removes a key from an order queue, returning whether it was present.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
/// use edgesim_core::utils::remove_key;
///
/// let mut order = VecDeque::from(vec!["a".to_string(), "b".to_string()]);
/// assert!(remove_key(&mut order, "a"));
/// assert!(!remove_key(&mut order, "a"));
/// assert_eq!(order, VecDeque::from(vec!["b".to_string()]));
/// ```
pub fn remove_key(order: &mut VecDeque<String>, key: &str) -> bool {
    match order.iter().position(|k| k == key) {
        Some(pos) => order.remove(pos).is_some(),
        None => false,
    }
}

/// Appends a key to a bounded history queue, dropping the oldest entries once
/// `bound` is exceeded. Any previous occurrence of the key is removed first so
/// the queue never holds duplicates.
///
/// Used for ARC ghost lists, which only record the identity of evicted keys.
pub fn push_bounded(history: &mut VecDeque<String>, key: String, bound: usize) {
    remove_key(history, &key);
    history.push_back(key);
    while history.len() > bound {
        history.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(keys: &[&str]) -> VecDeque<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_move_key_to_end_reorders() {
        let mut order = queue(&["k1", "k2", "k3"]);
        assert!(move_key_to_end(&mut order, "k1"));
        assert_eq!(order, queue(&["k2", "k3", "k1"]));
    }

    #[test]
    fn test_move_key_already_at_end() {
        let mut order = queue(&["k1", "k2"]);
        assert!(move_key_to_end(&mut order, "k2"));
        assert_eq!(order, queue(&["k1", "k2"]));
    }

    #[test]
    fn test_move_missing_key() {
        let mut order = queue(&["k1"]);
        assert!(!move_key_to_end(&mut order, "k9"));
        assert_eq!(order, queue(&["k1"]));
    }

    #[test]
    fn test_push_bounded_drops_oldest() {
        let mut history = VecDeque::new();
        push_bounded(&mut history, "a".into(), 2);
        push_bounded(&mut history, "b".into(), 2);
        push_bounded(&mut history, "c".into(), 2);
        assert_eq!(history, queue(&["b", "c"]));
    }

    #[test]
    fn test_push_bounded_deduplicates() {
        let mut history = queue(&["a", "b"]);
        push_bounded(&mut history, "a".into(), 3);
        assert_eq!(history, queue(&["b", "a"]));
    }
}
