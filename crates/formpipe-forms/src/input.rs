//! Raw form input.
//!
//! [`Form::load`](crate::form::Form::load) reads submissions through the
//! [`FieldAccessor`] trait: one raw string per field name, with a missing key
//! treated exactly like an empty value. [`FormData`] is the multi-valued,
//! url-encoded implementation; plain string maps work too.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use formpipe_core::utils::MultiValueDict;
use formpipe_core::{FormpipeError, FormpipeResult};

/// Read access to submitted values by field name.
///
/// Returning `None` and returning `Some("")` are equivalent to the form: both
/// load as the empty string.
pub trait FieldAccessor {
    /// Returns the raw submitted value for `name`, if present.
    fn value(&self, name: &str) -> Option<&str>;
}

impl<K, V, S> FieldAccessor for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<K, V> FieldAccessor for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<T: FieldAccessor + ?Sized> FieldAccessor for &T {
    fn value(&self, name: &str) -> Option<&str> {
        (**self).value(name)
    }
}

/// Submitted form data, possibly with several values per key.
///
/// Like request form data, `FormData` is immutable by default. The
/// [`copy`](FormData::copy) method returns a mutable clone.
///
/// # Examples
///
/// ```
/// use formpipe_forms::input::{FieldAccessor, FormData};
///
/// let data = FormData::parse("tag=red&tag=blue&name=J%C3%BCrgen+M");
/// assert_eq!(data.value("tag"), Some("red"));
/// assert_eq!(data.get_list("tag"), Some(&["red".to_string(), "blue".to_string()][..]));
/// assert_eq!(data.value("name"), Some("Jürgen M"));
/// assert_eq!(data.value("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    data: MultiValueDict<String, String>,
    mutable: bool,
}

impl FormData {
    /// Creates a new, empty, immutable `FormData`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty, mutable `FormData`.
    pub fn new_mutable() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: true,
        }
    }

    /// Parses an `application/x-www-form-urlencoded` body (or query string).
    ///
    /// `+` decodes to a space and percent escapes are decoded as UTF-8,
    /// replacing invalid sequences. A key without `=` has an empty value.
    pub fn parse(encoded: &str) -> Self {
        let data = encoded
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(key), percent_decode(value))
            })
            .collect();

        Self {
            data,
            mutable: false,
        }
    }

    /// Builds immutable form data from key/value pairs, keeping repeats.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            mutable: false,
        }
    }

    /// Returns the first value for the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.first(key).map(String::as_str)
    }

    /// Returns all values for the given key, in submission order.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.data.get_list(key)
    }

    /// Sets a single value for the given key, replacing any existing values.
    ///
    /// # Errors
    ///
    /// Returns [`FormpipeError::Immutable`] if this `FormData` is immutable.
    pub fn set(&mut self, key: &str, value: &str) -> FormpipeResult<()> {
        self.ensure_mutable()?;
        self.data.set(key.to_string(), value.to_string());
        Ok(())
    }

    /// Appends a value to the list for the given key.
    ///
    /// # Errors
    ///
    /// Returns [`FormpipeError::Immutable`] if this `FormData` is immutable.
    pub fn append(&mut self, key: &str, value: &str) -> FormpipeResult<()> {
        self.ensure_mutable()?;
        self.data.append(key.to_string(), value.to_string());
        Ok(())
    }

    /// Returns a mutable copy of this `FormData`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            data: self.data.clone(),
            mutable: true,
        }
    }

    /// Encodes this `FormData` as a url-encoded string with sorted pairs.
    pub fn urlencode(&self) -> String {
        let mut parts: Vec<String> = self
            .data
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| format!("{}={}", percent_encode(key), percent_encode(value)))
            })
            .collect();

        parts.sort();
        parts.join("&")
    }

    /// Returns `true` if this `FormData` is mutable.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no keys are present.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    fn ensure_mutable(&self) -> FormpipeResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(FormpipeError::Immutable(
                "This FormData instance is immutable".to_string(),
            ))
        }
    }
}

impl FieldAccessor for FormData {
    /// The first submitted value wins when a key repeats.
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

/// Decodes a percent-encoded string.
fn percent_decode(input: &str) -> String {
    // Replace + with space (form encoding), then decode percent sequences
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a string for use in a form body.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let data = FormData::new();
        assert!(data.is_empty());
        assert_eq!(data.len(), 0);
        assert!(!data.is_mutable());
    }

    #[test]
    fn test_parse_multiple_keys() {
        let data = FormData::parse("a=1&b=2&c=3");
        assert_eq!(data.get("a"), Some("1"));
        assert_eq!(data.get("b"), Some("2"));
        assert_eq!(data.get("c"), Some("3"));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_parse_repeated_key_first_wins() {
        let data = FormData::parse("color=red&color=blue&color=green");
        assert_eq!(data.value("color"), Some("red"));
        assert_eq!(
            data.get_list("color"),
            Some(&["red".to_string(), "blue".to_string(), "green".to_string()][..])
        );
    }

    #[test]
    fn test_parse_edge_cases() {
        assert!(FormData::parse("").is_empty());
        assert!(FormData::parse("&&").is_empty());
        assert_eq!(FormData::parse("key").get("key"), Some(""));
        assert_eq!(FormData::parse("key=").get("key"), Some(""));
        assert_eq!(FormData::parse("eq=a=b").get("eq"), Some("a=b"));
    }

    #[test]
    fn test_parse_decoding() {
        let data = FormData::parse("name=hello%20world&city=New+York&at=%40");
        assert_eq!(data.get("name"), Some("hello world"));
        assert_eq!(data.get("city"), Some("New York"));
        assert_eq!(data.get("at"), Some("@"));
    }

    #[test]
    fn test_from_pairs() {
        let data = FormData::from_pairs([("foo", "bar"), ("foo", "baz")]);
        assert_eq!(data.get("foo"), Some("bar"));
        assert_eq!(data.get_list("foo").map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_immutable_mutation_fails() {
        let mut data = FormData::parse("key=value");
        assert!(matches!(
            data.set("key", "new"),
            Err(FormpipeError::Immutable(_))
        ));
        assert!(data.append("key", "extra").is_err());
        assert_eq!(data.get("key"), Some("value"));
    }

    #[test]
    fn test_copy_returns_mutable() {
        let data = FormData::parse("key=value");
        let mut copy = data.copy();
        assert!(copy.is_mutable());
        copy.set("key", "new").unwrap();
        copy.append("key", "newer").unwrap();
        assert_eq!(copy.get("key"), Some("new"));
        assert_eq!(data.get("key"), Some("value"));
    }

    #[test]
    fn test_urlencode_sorted_and_reparseable() {
        let mut data = FormData::new_mutable();
        data.append("b", "x y").unwrap();
        data.append("a", "1").unwrap();
        data.append("a", "ü").unwrap();
        let encoded = data.urlencode();
        assert_eq!(encoded, "a=%C3%BC&a=1&b=x%20y");
        let reparsed = FormData::parse(&encoded);
        assert_eq!(reparsed.get_list("a").map(<[String]>::len), Some(2));
        assert_eq!(reparsed.get("b"), Some("x y"));
    }

    #[test]
    fn test_accessor_for_maps() {
        let mut owned: HashMap<String, String> = HashMap::new();
        owned.insert("foo".into(), "bar".into());
        assert_eq!(owned.value("foo"), Some("bar"));
        assert_eq!(owned.value("nope"), None);

        let borrowed: HashMap<&str, &str> = [("foo", "baz")].into_iter().collect();
        assert_eq!(borrowed.value("foo"), Some("baz"));

        let sorted: BTreeMap<String, String> =
            [("k".to_string(), "v".to_string())].into_iter().collect();
        assert_eq!(sorted.value("k"), Some("v"));
        assert_eq!((&sorted).value("k"), Some("v"));
    }
}
