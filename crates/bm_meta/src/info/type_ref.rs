use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

/// A lightweight handle on a Rust type: its [`TypeId`] and its full path.
///
/// Equality and hashing only consider the `TypeId`.
///
/// # Examples
///
/// ```
/// use bm_meta::info::TypeRef;
///
/// let ty = TypeRef::of::<Vec<String>>();
/// assert_eq!(ty.path(), "alloc::vec::Vec<alloc::string::String>");
/// assert_eq!(ty.name(), "Vec<alloc::string::String>");
/// assert!(ty.is::<Vec<String>>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    path: &'static str,
}

impl TypeRef {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, as given by [`core::any::type_name`].
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the path without its leading module path.
    ///
    /// Generic arguments are kept as written; `dyn` is dropped for trait objects.
    pub fn name(&self) -> &'static str {
        short_name(self.path)
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Returns `true` if `name` spells this type.
    ///
    /// Every path inside `name`, generic arguments included, may be given in
    /// full or by its last segment: `Vec<Address>` matches
    /// `alloc::vec::Vec<my_crate::Address>`.
    pub fn matches_name(&self, name: &str) -> bool {
        self.path == name || self.name() == name || short_tokens(self.path).eq(short_tokens(name))
    }
}

// Splits a type expression into identifiers, stripped of their module path, and
// single punctuation characters. Whitespace and `dyn` are skipped.
fn short_tokens(expr: &str) -> impl Iterator<Item = &str> {
    let is_path_char = |c: char| c.is_alphanumeric() || c == '_' || c == ':';
    let mut rest = expr;
    core::iter::from_fn(move || {
        loop {
            rest = rest.trim_start();
            let first = rest.chars().next()?;
            let len = if first == ':' || !is_path_char(first) {
                first.len_utf8()
            } else {
                rest.find(|c: char| !is_path_char(c)).unwrap_or(rest.len())
            };
            let (token, tail) = rest.split_at(len);
            rest = tail;
            if token != "dyn" {
                return Some(token.rsplit("::").next().unwrap_or(token));
            }
        }
    })
}

fn short_name(path: &'static str) -> &'static str {
    let path = path.strip_prefix("dyn ").unwrap_or(path);
    let head_end = path.find('<').unwrap_or(path.len());
    let start = path[..head_end].rfind("::").map_or(0, |i| i + 2);
    &path[start..]
}

impl PartialEq for TypeRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRef;
    use alloc::string::String;
    use alloc::vec::Vec;

    trait Marker {}

    #[test]
    fn short_names() {
        assert_eq!(TypeRef::of::<String>().name(), "String");
        assert_eq!(TypeRef::of::<u8>().name(), "u8");
        assert_eq!(TypeRef::of::<dyn Marker>().name(), "Marker");
    }

    #[test]
    fn matches_either_form() {
        let ty = TypeRef::of::<String>();
        assert!(ty.matches_name("String"));
        assert!(ty.matches_name("alloc::string::String"));
        assert!(!ty.matches_name("str"));
    }

    #[test]
    fn generic_arguments_by_short_name() {
        let ty = TypeRef::of::<Vec<String>>();
        assert!(ty.matches_name("Vec<String>"));
        assert!(ty.matches_name("Vec< alloc::string::String >"));
        assert!(ty.matches_name("alloc::vec::Vec<String>"));
        assert!(!ty.matches_name("Vec<str>"));
        assert!(!ty.matches_name("Vec<String"));
        assert!(!ty.matches_name("Option<String>"));

        assert!(TypeRef::of::<dyn Marker>().matches_name("dyn Marker"));
    }
}
