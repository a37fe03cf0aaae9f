//! Translation dictionaries, pre-populated by an external process.

use shindo_core::{Dictionaries, Dictionary};
use tracing::{info, warn};

use crate::StoreError;
use crate::kv::{KvStore, get_json};

pub const EPICENTER_KEY: &str = "dictionary:epi";
pub const PREFECTURE_KEY: &str = "dictionary:pref";
pub const CITY_KEY: &str = "dictionary:city";

/// Load all three dictionaries concurrently.
///
/// A dictionary that has not been provisioned loads as empty, which makes
/// every lookup against it fall back to the raw code.
pub async fn load_dictionaries(kv: &dyn KvStore) -> Result<Dictionaries, StoreError> {
    let (epi, pref, city) = tokio::try_join!(
        load_dictionary(kv, EPICENTER_KEY),
        load_dictionary(kv, PREFECTURE_KEY),
        load_dictionary(kv, CITY_KEY),
    )?;
    info!(
        epi = epi.len(),
        pref = pref.len(),
        city = city.len(),
        "loaded translation dictionaries"
    );
    Ok(Dictionaries { epi, pref, city })
}

async fn load_dictionary(kv: &dyn KvStore, key: &str) -> Result<Dictionary, StoreError> {
    match get_json::<Dictionary>(kv, key).await? {
        Some(dict) => Ok(dict),
        None => {
            warn!(key, "translation dictionary not provisioned");
            Ok(Dictionary::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryKv;

    #[tokio::test]
    async fn loads_all_three() {
        let kv = MemoryKv::new();
        kv.put(EPICENTER_KEY, br#"{"390":{"english":"Noto, Ishikawa"}}"#.to_vec(), None)
            .await
            .unwrap();
        kv.put(PREFECTURE_KEY, br#"{"17":{"english":"Ishikawa"}}"#.to_vec(), None)
            .await
            .unwrap();
        kv.put(CITY_KEY, br#"{"13101":{"english":"Chiyoda"}}"#.to_vec(), None)
            .await
            .unwrap();

        let dicts = load_dictionaries(&kv).await.unwrap();
        assert_eq!(dicts.epicenter_name("390", "english"), "Noto, Ishikawa");
        assert_eq!(dicts.prefecture_name("17", "english"), "Ishikawa");
        assert_eq!(dicts.city_name("13101", "english"), "Chiyoda");
    }

    #[tokio::test]
    async fn missing_dictionary_loads_empty() {
        let kv = MemoryKv::new();
        kv.put(CITY_KEY, br#"{"13101":{"english":"Chiyoda"}}"#.to_vec(), None)
            .await
            .unwrap();
        let dicts = load_dictionaries(&kv).await.unwrap();
        assert!(dicts.epi.is_empty());
        assert!(dicts.pref.is_empty());
        assert_eq!(dicts.city.len(), 1);
    }

    #[tokio::test]
    async fn malformed_dictionary_is_an_error() {
        let kv = MemoryKv::new();
        kv.put(PREFECTURE_KEY, b"[\"not\", \"a\", \"map\"]".to_vec(), None)
            .await
            .unwrap();
        assert!(matches!(
            load_dictionaries(&kv).await.unwrap_err(),
            StoreError::Json(_)
        ));
    }
}
