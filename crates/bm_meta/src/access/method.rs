use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{MethodDesc, TypeDesc, TypeRef, Upcast};
use crate::registry::TypeSource;
use crate::{MetaError, Value};

use super::hierarchy::{ClassStep, class_chain, interface_closure, lookup};

// -----------------------------------------------------------------------------
// Method

/// A resolved, invocable method.
///
/// The handle remembers how to reach the declaring type from the type it was
/// resolved on, so it accepts instances of that type (or of the declaring type
/// itself when resolved there).
#[derive(Clone)]
pub struct Method {
    desc: Arc<MethodDesc>,
    upcasts: Arc<[Upcast]>,
}

impl Method {
    #[inline]
    pub(crate) fn new(desc: Arc<MethodDesc>, upcasts: Arc<[Upcast]>) -> Self {
        Self { desc, upcasts }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.desc.name()
    }

    /// Returns the type declaring this method.
    #[inline]
    pub fn owner(&self) -> TypeRef {
        self.desc.owner()
    }

    #[inline]
    pub fn params(&self) -> &[TypeRef] {
        self.desc.params()
    }

    #[inline]
    pub fn return_type(&self) -> Option<TypeRef> {
        self.desc.returns()
    }

    /// Returns `true` for an interface method no class of the chain implements.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.desc.is_abstract()
    }

    #[inline]
    pub fn desc(&self) -> &MethodDesc {
        &self.desc
    }

    #[inline]
    pub(crate) fn upcasts(&self) -> &[Upcast] {
        &self.upcasts
    }

    /// Calls the method on `target`, see [`invoke`](super::invoke).
    #[inline]
    pub fn invoke(
        &self,
        target: &mut dyn Any,
        args: Vec<Value>,
    ) -> Result<Option<Value>, MetaError> {
        super::invoke(self, target, args)
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.desc, &other.desc)
    }
}

impl Eq for Method {}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.owner(), self.name())?;
        for (index, param) in self.params().iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

// -----------------------------------------------------------------------------
// MethodSpec

/// A parsed method reference: `name`, `name()` or `name(T1, T2)`.
///
/// Parameter types are matched by full type path or by short name, so
/// `setB(B)` and `setB(my_crate::B)` both select the same method. Paths inside
/// generic arguments may be shortened too: `setAll(Vec<B>)`.
///
/// # Examples
///
/// ```
/// use bm_meta::access::MethodSpec;
///
/// let spec = MethodSpec::parse("put(String, HashMap<String, u32>)").unwrap();
/// assert_eq!(spec.name(), "put");
/// assert_eq!(spec.params(), Some(&["String", "HashMap<String, u32>"][..]));
///
/// assert_eq!(MethodSpec::parse("reset").unwrap().params(), None);
/// assert!(MethodSpec::parse("broken(").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec<'a> {
    name: &'a str,
    params: Option<Vec<&'a str>>,
}

impl<'a> MethodSpec<'a> {
    pub fn parse(spec: &'a str) -> Result<Self, MetaError> {
        let malformed = |reason| MetaError::MalformedMethodSpec {
            spec: spec.into(),
            reason,
        };

        let trimmed = spec.trim();
        let (name, params) = match trimmed.find('(') {
            None => (trimmed, None),
            Some(open) => {
                let Some(inner) = trimmed[open + 1..].strip_suffix(')') else {
                    return Err(malformed("missing closing `)`"));
                };
                if inner.contains(['(', ')']) {
                    return Err(malformed("unbalanced parentheses"));
                }
                let params = split_params(inner).ok_or_else(|| malformed("empty parameter type"))?;
                (trimmed[..open].trim_end(), Some(params))
            }
        };

        if name.is_empty() {
            return Err(malformed("empty method name"));
        }
        if !name.chars().all(|c| c == '_' || c.is_alphanumeric()) {
            return Err(malformed("method name is not an identifier"));
        }

        Ok(Self { name, params })
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the parameter type names, `None` when no list was given.
    #[inline]
    pub fn params(&self) -> Option<&[&'a str]> {
        self.params.as_deref()
    }

    /// Returns `true` if `method` has this name and, if given, these parameters.
    pub fn matches(&self, method: &MethodDesc) -> bool {
        method.name() == self.name
            && self.params.as_ref().is_none_or(|params| {
                method.params().len() == params.len()
                    && method
                        .params()
                        .iter()
                        .zip(params)
                        .all(|(ty, name)| ty.matches_name(name))
            })
    }
}

// Splits on commas outside of angle brackets. `None` if a parameter is empty.
fn split_params(inner: &str) -> Option<Vec<&str>> {
    let mut params = Vec::new();
    if inner.trim().is_empty() {
        return Some(params);
    }

    let mut depth = 0_usize;
    let mut start = 0;
    for (index, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(inner[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    params.push(inner[start..].trim());

    if params.iter().any(|param| param.is_empty()) {
        None
    } else {
        Some(params)
    }
}

// -----------------------------------------------------------------------------
// Lookup

/// Finds the first method satisfying `pred`: the class chain most derived first,
/// then the interfaces.
fn find_first<S, P>(source: &S, root: &TypeDesc, pred: P) -> Option<Method>
where
    S: TypeSource + ?Sized,
    P: Fn(&MethodDesc) -> bool,
{
    let chain = class_chain(source, root);
    if let Some(found) = find_in_chain(&chain, &pred) {
        return Some(found);
    }

    interface_closure(source, &chain)
        .into_iter()
        .flat_map(|desc| desc.methods())
        .find(|method| pred(method))
        .map(|method| Method::new(method.clone(), Arc::from([])))
}

fn find_in_chain<P>(chain: &[ClassStep<'_>], pred: P) -> Option<Method>
where
    P: Fn(&MethodDesc) -> bool,
{
    chain.iter().find_map(|step| {
        step.desc
            .methods()
            .iter()
            .find(|method| pred(method))
            .map(|method| Method::new(method.clone(), step.upcasts.clone()))
    })
}

/// Binds an abstract interface method to the concrete method of the chain with
/// the same name and parameters, or keeps it abstract.
pub(crate) fn bind_to_chain(chain: &[ClassStep<'_>], method: &Arc<MethodDesc>) -> Method {
    if method.is_abstract() {
        let concrete = find_in_chain(chain, |candidate| {
            !candidate.is_abstract()
                && candidate.name() == method.name()
                && candidate.has_params(method.params())
        });
        if let Some(concrete) = concrete {
            return concrete;
        }
    }
    Method::new(method.clone(), Arc::from([]))
}

fn no_such_method(root: &TypeDesc, spec: &str) -> MetaError {
    MetaError::NoSuchMethod {
        owner: root.name(),
        spec: Box::from(spec),
    }
}

pub(crate) fn find_zero_arg_method<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
    spec: &str,
) -> Result<Method, MetaError> {
    let parsed = MethodSpec::parse(spec)?;
    if parsed.params().is_some_and(|params| !params.is_empty()) {
        return Err(MetaError::MalformedMethodSpec {
            spec: spec.into(),
            reason: "expected a method without parameters",
        });
    }

    let root = lookup(source, ty)?;
    log::trace!("looking up zero-argument method `{}` on `{}`", parsed.name(), root.ty());
    find_first(source, root, |method| {
        method.name() == parsed.name() && method.params().is_empty()
    })
    .ok_or_else(|| no_such_method(root, spec))
}

pub(crate) fn find_method<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
    spec: &str,
) -> Result<Method, MetaError> {
    let parsed = MethodSpec::parse(spec)?;
    let root = lookup(source, ty)?;
    log::trace!("looking up method `{spec}` on `{}`", root.ty());
    find_first(source, root, |method| parsed.matches(method))
        .ok_or_else(|| no_such_method(root, spec))
}

pub(crate) fn find_method_by_name<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
    name: &str,
) -> Result<Method, MetaError> {
    let root = lookup(source, ty)?;
    log::trace!("looking up method named `{name}` on `{}`", root.ty());
    find_first(source, root, |method| method.name() == name)
        .ok_or_else(|| no_such_method(root, name))
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use core::any::TypeId;

    use super::{MethodSpec, find_method, find_method_by_name, find_zero_arg_method};
    use crate::fixtures::{self, A, B, ChildChildIf, GrandChild, Person, TestClass};
    use crate::{ErrorKind, Value};

    #[test]
    fn parse_specs() {
        let spec = MethodSpec::parse("  getA  ").unwrap();
        assert_eq!(spec.name(), "getA");
        assert_eq!(spec.params(), None);

        let spec = MethodSpec::parse("getA()").unwrap();
        assert_eq!(spec.params(), Some(&[][..]));

        let spec = MethodSpec::parse("setB( B )").unwrap();
        assert_eq!(spec.params(), Some(&["B"][..]));

        for bad in ["", "()", "a(", "a(,)", "a(b))", "a b"] {
            let err = MethodSpec::parse(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "{bad}");
        }
    }

    #[test]
    fn zero_arg_method_through_superclasses() {
        let registry = fixtures::registry();
        let method = find_zero_arg_method(&registry, TypeId::of::<GrandChild>(), "getA").unwrap();
        assert_eq!(method.owner().name(), "BaseBean");

        let mut grand = GrandChild::new("x", "y", "z");
        let value = method.invoke(&mut grand, vec![]).unwrap().unwrap();
        assert_eq!(value.take::<String>().unwrap(), "x");

        let same = find_zero_arg_method(&registry, TypeId::of::<GrandChild>(), "getA()").unwrap();
        assert_eq!(same, method);
    }

    #[test]
    fn suffix_form_is_optional() {
        let registry = fixtures::registry();
        let bare = find_zero_arg_method(&registry, TypeId::of::<TestClass>(), "getC").unwrap();
        let call = find_zero_arg_method(&registry, TypeId::of::<TestClass>(), "getC()").unwrap();
        assert_eq!(bare, call);
        assert!(!bare.is_abstract());

        for spec in ["missing", "missing()"] {
            let err = find_zero_arg_method(&registry, TypeId::of::<TestClass>(), spec).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[test]
    fn zero_arg_method_rejects_parameters() {
        let registry = fixtures::registry();
        let err = find_zero_arg_method(&registry, TypeId::of::<A>(), "setB(B)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        // `setB` exists, but not without arguments.
        let err = find_zero_arg_method(&registry, TypeId::of::<A>(), "setB").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn method_with_signature() {
        let registry = fixtures::registry();
        let method = find_method(&registry, TypeId::of::<A>(), "setB(B)").unwrap();
        assert_eq!(method.params()[0].name(), "B");

        let full = find_method(&registry, TypeId::of::<A>(), "setB(bm_meta::fixtures::B)").unwrap();
        assert_eq!(full, method);

        let mut a = A::default();
        method.invoke(&mut a, vec![Value::new(B { value: 3 })]).unwrap();
        assert_eq!(a.b.value, 3);

        let err = find_method(&registry, TypeId::of::<A>(), "setB(String)").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn generic_parameter_by_short_name() {
        let registry = fixtures::registry();
        let person = TypeId::of::<Person>();
        let short = find_method(&registry, person, "setContacts(Vec<Address>)").unwrap();
        let full_spec = "setContacts(alloc::vec::Vec<bm_meta::fixtures::Address>)";
        let full = find_method(&registry, person, full_spec).unwrap();
        assert_eq!(short, full);

        let err = find_method(&registry, person, "setContacts(Vec<B>)").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn methods_on_interfaces() {
        let registry = fixtures::registry();
        let method =
            find_method_by_name(&registry, TypeId::of::<dyn ChildChildIf>(), "getParentField")
                .unwrap();
        assert!(method.is_abstract());
        assert_eq!(method.owner().name(), "ParentIf");

        let method = find_method(&registry, TypeId::of::<TestClass>(), "getB").unwrap();
        assert!(method.is_abstract());
    }

    #[test]
    fn missing_method_is_not_found() {
        let registry = fixtures::registry();
        let err = find_method_by_name(&registry, TypeId::of::<TestClass>(), "nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "no such method `TestClass.nope`");
    }
}
