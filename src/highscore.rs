use crate::error::{GameError, Result};
use crate::storage::Storage;

pub const HIGHSCORE_KEY: &str = "highscore";

/// The best score so far, mirrored to a [`Storage`] as a decimal string
pub struct Highscore {
    best: u32,
    storage: Box<dyn Storage>,
}

impl Highscore {
    /// Reads the stored value. Anything missing or unreadable counts as 0.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let best = match read_best(storage.as_ref()) {
            Ok(best) => best,
            Err(err) => {
                log::warn!("Ignoring stored highscore: {err}");
                0
            }
        };
        log::info!("Loaded highscore {best}");
        Self { best, storage }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Records `score` if it beats the current best. Returns whether it did.
    ///
    /// The in-memory value is updated even when persisting fails; the error
    /// is returned so the caller can report it.
    pub fn submit(&mut self, score: u32) -> Result<bool> {
        if score <= self.best {
            return Ok(false);
        }
        self.best = score;
        self.storage
            .set_item(HIGHSCORE_KEY, &score.to_string())
            .map(|_| true)
    }
}

fn read_best(storage: &dyn Storage) -> Result<u32> {
    match storage.get_item(HIGHSCORE_KEY)? {
        None => Ok(0),
        Some(text) => text
            .trim()
            .parse()
            .map_err(|_| GameError::InvalidHighscore(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn storage_with(value: &str) -> Box<dyn Storage> {
        let mut storage = MemoryStorage::new();
        storage.set_item(HIGHSCORE_KEY, value).unwrap();
        Box::new(storage)
    }

    #[test]
    fn test_load_missing_is_zero() {
        let highscore = Highscore::load(Box::new(MemoryStorage::new()));
        assert_eq!(highscore.best(), 0);
    }

    #[test]
    fn test_load_existing() {
        assert_eq!(Highscore::load(storage_with("120")).best(), 120);
    }

    #[test]
    fn test_load_garbage_is_zero() {
        assert_eq!(Highscore::load(storage_with("abc")).best(), 0);
        assert_eq!(Highscore::load(storage_with("-4")).best(), 0);
    }

    #[test]
    fn test_submit_only_when_greater() {
        let mut highscore = Highscore::load(storage_with("50"));
        assert!(!highscore.submit(10).unwrap());
        assert!(!highscore.submit(50).unwrap());
        assert_eq!(highscore.best(), 50);

        assert!(highscore.submit(51).unwrap());
        assert_eq!(highscore.best(), 51);
        assert_eq!(
            read_best(highscore.storage.as_ref()).unwrap(),
            51,
            "persisted value follows the best score"
        );
    }

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(Some("3".to_string()))
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }
    }

    #[test]
    fn test_submit_persist_failure_keeps_value_in_memory() {
        let mut highscore = Highscore::load(Box::new(ReadOnlyStorage));
        assert!(matches!(highscore.submit(9), Err(GameError::Io { .. })));
        assert_eq!(highscore.best(), 9);
    }
}
