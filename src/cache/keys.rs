//! Deterministic cache key derivation.
//!
//! Callers declare what uniquely identifies a cached computation: an
//! operation name, its positional parts, optional named parts, and an
//! optional data-type tag. The parts are serialized to a stable JSON
//! string and hashed, so equal inputs always map to the same key.

use sha2::{Digest, Sha256};

/// Build a cache key from an operation name and its positional parts
pub fn make_key(func: &str, parts: &[&str], data_type: Option<&str>) -> String {
    make_key_kv(func, parts, &[], data_type)
}

/// Build a cache key including named parts; named parts are sorted by
/// name before serialization so argument order never changes the key
pub fn make_key_kv(
    func: &str,
    parts: &[&str],
    named: &[(&str, &str)],
    data_type: Option<&str>,
) -> String {
    let mut named_sorted: Vec<(&str, &str)> = named.to_vec();
    named_sorted.sort();

    let kwargs: Vec<String> = named_sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    let key_data = serde_json::json!({
        "func": func,
        "args": parts,
        "kwargs": kwargs,
        "type": data_type,
    });

    format!("{:x}", Sha256::digest(key_data.to_string().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_key() {
        let a = make_key("get_weapons_in_category", &["smg"], Some("weapon_list"));
        let b = make_key("get_weapons_in_category", &["smg"], Some("weapon_list"));
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_different_keys() {
        let a = make_key("get_weapons_in_category", &["smg"], None);
        let b = make_key("get_weapons_in_category", &["lmg"], None);
        let c = make_key("get_top_attachments", &["smg"], None);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn named_part_order_does_not_matter() {
        let a = make_key_kv("search", &[], &[("mode", "mp"), ("category", "smg")], None);
        let b = make_key_kv("search", &[], &[("category", "smg"), ("mode", "mp")], None);
        assert_eq!(a, b);
    }

    #[test]
    fn data_type_tag_is_part_of_the_key() {
        let a = make_key("op", &["x"], Some("user_data"));
        let b = make_key("op", &["x"], None);
        assert_ne!(a, b);
    }
}
