//! Serializes maps with non-string keys as sequences of pairs, which
//! keeps the definition representable in JSON. Pairs are sorted by key
//! so the serialized form is stable across runs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<'a, T, K, V, S>(map: T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: IntoIterator<Item = (&'a K, &'a V)>,
    K: Serialize + Ord + 'a,
    V: Serialize + 'a,
{
    let mut pairs: Vec<_> = map.into_iter().collect();
    pairs.sort_by_key(|(key, _)| *key);

    serializer.collect_seq(pairs)
}

pub fn deserialize<'de, T, K, V, D>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromIterator<(K, V)>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    let pairs = Vec::<(K, V)>::deserialize(deserializer)?;

    Ok(pairs.into_iter().collect())
}
