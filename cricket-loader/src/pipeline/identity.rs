use std::collections::HashMap;
use std::sync::RwLock;

/// Shared name→identifier registry, deduplicating players across all
/// documents in a batch.
///
/// Registration happens per document before its deliveries are processed;
/// after that the map is read-mostly. Lookups are exact string matches on
/// the display name. The map is safe under concurrent registration:
/// insert-if-absent under the write lock, first registration wins.
pub struct IdentityResolver {
    players: RwLock<HashMap<String, String>>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
        }
    }

    /// Register a name→id mapping. Re-registering a known name is a no-op,
    /// not an overwrite. Returns true if the name was newly registered.
    pub fn register(&self, name: &str, id: &str) -> bool {
        if let Ok(mut players) = self.players.write() {
            if players.contains_key(name) {
                false
            } else {
                players.insert(name.to_string(), id.to_string());
                true
            }
        } else {
            false
        }
    }

    /// Resolve a display name to its registered identifier. `None` means
    /// the name has no registry entry; callers propagate the absence rather
    /// than fail.
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.players.read().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.players.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_name() {
        let resolver = IdentityResolver::new();
        assert!(resolver.register("V Kohli", "p1"));
        assert_eq!(resolver.resolve("V Kohli"), Some("p1".to_string()));
    }

    #[test]
    fn re_registration_is_a_no_op() {
        let resolver = IdentityResolver::new();
        assert!(resolver.register("V Kohli", "p1"));
        assert!(!resolver.register("V Kohli", "p1"));
        assert!(!resolver.register("V Kohli", "p-conflicting"));

        // First registration wins
        assert_eq!(resolver.resolve("V Kohli"), Some("p1".to_string()));
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let resolver = IdentityResolver::new();
        resolver.register("V Kohli", "p1");
        assert_eq!(resolver.resolve("R Ashwin"), None);
    }

    #[test]
    fn registration_is_safe_under_concurrent_writers() {
        use std::sync::Arc;

        let resolver = Arc::new(IdentityResolver::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let resolver = resolver.clone();
                std::thread::spawn(move || {
                    for n in 0..100 {
                        resolver.register(&format!("player-{n}"), &format!("id-{n}-from-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(resolver.len(), 100);
        // Whichever writer won, the mapping stays internally consistent
        let id = resolver.resolve("player-0").unwrap();
        assert!(id.starts_with("id-0-from-"));
    }
}
