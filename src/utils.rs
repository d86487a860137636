use std::{
    collections::{HashMap, HashSet},
    hash::{BuildHasherDefault, Hash},
};

use fnv::FnvHasher;

pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;
pub type FnvHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

/// Construct a hash map with the specified capacity. Fnv hashing is much faster than
/// the default on short keys such as the grid coordinates used as pathing keys,
/// at the cost of robustness against key collision attacks.
pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashMap::<K, V, _>::with_capacity_and_hasher(capacity, fnv)
}
