//! Access to submitted form fields and session values, independent of
//! the web framework in use.

use kstring::KString;

use crate::{alist::AList, myfrom::MyFrom};

/// Value that dropdowns submit for "No Entry".
pub const NOENTRY: &str = "-1";

/// A source of named string fields, e.g. the posted form of a
/// request or a session.
pub trait FieldSource {
    /// The (first) value of field `name`.
    fn field(&self, name: &str) -> Option<KString>;

    /// All values given for field `name`.
    fn field_list(&self, name: &str) -> Vec<KString>;

    /// `default` (or the empty string) if absent; the empty string if
    /// the value equals `noentry`.
    fn get(&self, name: &str, default: Option<&str>, noentry: Option<&str>) -> KString {
        let value = self.field(name)
            .unwrap_or_else(|| KString::from_ref(default.unwrap_or("")));
        if noentry == Some(value.as_str()) {
            KString::from_static("")
        } else {
            value
        }
    }

    /// Like `get` with the dropdown "No Entry" code mapped to "".
    fn get_entry(&self, name: &str) -> KString {
        self.get(name, None, Some(NOENTRY))
    }

    /// None if missing or not an integer.
    fn get_int(&self, name: &str, default: Option<i64>, noentry: Option<i64>) -> Option<i64> {
        let default = default.map(|v| v.to_string());
        let noentry = noentry.map(|v| v.to_string());
        self.get(name, default.as_deref(), noentry.as_deref()).trim().parse().ok()
    }

    /// None if missing or not a number.
    fn get_float(&self, name: &str, default: Option<f64>, noentry: Option<f64>) -> Option<f64> {
        let default = default.map(|v| v.to_string());
        let noentry = noentry.map(|v| v.to_string());
        self.get(name, default.as_deref(), noentry.as_deref()).trim().parse().ok()
    }

    /// The values of a multi-value field; the `[]` suffix is added if
    /// `name` doesn't carry it.
    fn get_list(&self, name: &str) -> Vec<KString> {
        let base = name.trim_matches(|c| c == '[' || c == ']');
        self.field_list(&format!("{base}[]"))
    }

    fn get_tuple(&self, names: &[&str], default: Option<&str>, noentry: Option<&str>)
                 -> Vec<KString> {
        names.iter().map(|name| self.get(name, default, noentry)).collect()
    }
}

/// A field source that can also be written to.
pub trait SessionStorage: FieldSource {
    fn set(&mut self, key: &str, value: KString);

    fn remove(&mut self, key: &str);
}


/// In-memory fields, for sessions and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapFields {
    fields: AList<KString, Vec<KString>>,
}

impl MapFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping earlier ones for `field_list`.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where KString: MyFrom<K> + MyFrom<V>
    {
        let key = KString::myfrom(key);
        let value = KString::myfrom(value);
        if let Some(values) = self.fields.get_mut(&key) {
            values.push(value);
        } else {
            self.fields.insert(key, vec![value]);
        }
    }

    pub fn set_list<K, V>(&mut self, key: K, values: impl IntoIterator<Item = V>)
    where KString: MyFrom<K> + MyFrom<V>
    {
        self.fields.insert(KString::myfrom(key),
                           values.into_iter().map(KString::myfrom).collect());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MapFields
where KString: MyFrom<K> + MyFrom<V>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = MapFields::new();
        for (k, v) in iter {
            fields.push(k, v);
        }
        fields
    }
}

impl FieldSource for MapFields {
    fn field(&self, name: &str) -> Option<KString> {
        self.fields.get(name).and_then(|values| values.first().cloned())
    }

    fn field_list(&self, name: &str) -> Vec<KString> {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

impl SessionStorage for MapFields {
    fn set(&mut self, key: &str, value: KString) {
        self.fields.insert(KString::from_ref(key), vec![value]);
    }

    fn remove(&mut self, key: &str) {
        self.fields.remove(key);
    }
}
