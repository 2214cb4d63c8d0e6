use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use bm_utils::hash::HashMap;

use crate::info::{MethodDesc, TypeDesc, TypeRef, Upcast};
use crate::registry::TypeSource;
use crate::{MetaError, Value};

use super::Method;
use super::hierarchy::{class_chain, interface_closure, lookup};
use super::method::bind_to_chain;

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// A named property exposed through a read method, a write method or both.
///
/// Resolved on some start type, a descriptor's methods accept instances of that
/// type even when they are declared on a superclass.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: Box<str>,
    value_type: TypeRef,
    declared_on: TypeRef,
    read: Option<Method>,
    write: Option<Method>,
}

impl PropertyDescriptor {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type read by the read method or taken by the write method.
    #[inline]
    pub fn value_type(&self) -> TypeRef {
        self.value_type
    }

    /// Returns the type whose declaration of this property was kept.
    #[inline]
    pub fn declared_on(&self) -> TypeRef {
        self.declared_on
    }

    #[inline]
    pub fn read_method(&self) -> Option<&Method> {
        self.read.as_ref()
    }

    #[inline]
    pub fn write_method(&self) -> Option<&Method> {
        self.write.as_ref()
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    fn missing(&self, access: &'static str) -> MetaError {
        MetaError::MissingAccessor {
            owner: self.declared_on.name(),
            property: self.name.clone(),
            access,
        }
    }

    /// Reads the property through its read method.
    pub fn read(&self, target: &mut dyn Any) -> Result<Value, MetaError> {
        let method = self.read.as_ref().ok_or_else(|| self.missing("read"))?;
        let value = method.invoke(target, Vec::new())?;
        Ok(value.unwrap_or_else(|| Value::new(())))
    }

    /// Writes the property through its write method.
    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), MetaError> {
        let method = self.write.as_ref().ok_or_else(|| self.missing("write"))?;
        method.invoke(target, alloc::vec![value])?;
        Ok(())
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("declared_on", &self.declared_on)
            .field("read", &self.read)
            .field("write", &self.write)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Naming conventions

/// Lowercases the first character, unless the first two are both uppercase.
///
/// `Name` becomes `name`, `URL` stays `URL`.
pub(crate) fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(&name[first.len_utf8()..]);
    out
}

/// Derives the property name from `method_name` with `prefix` removed.
///
/// Accepts `getName` and `get_name` forms, rejects words that merely start
/// with the prefix, such as `settle`.
fn property_name(method_name: &str, prefix: &str) -> Option<String> {
    let rest = method_name.strip_prefix(prefix)?;
    if let Some(snake) = rest.strip_prefix('_') {
        return (!snake.is_empty()).then(|| snake.to_string());
    }
    rest.starts_with(char::is_uppercase).then(|| decapitalize(rest))
}

fn read_property(method: &MethodDesc) -> Option<(String, TypeRef)> {
    if !method.params().is_empty() {
        return None;
    }
    let returns = method.returns().filter(|ty| !ty.is::<()>())?;
    property_name(method.name(), "get")
        .or_else(|| property_name(method.name(), "is").filter(|_| returns.is::<bool>()))
        .map(|name| (name, returns))
}

fn write_property(method: &MethodDesc) -> Option<(String, TypeRef)> {
    match (method.params(), method.returns()) {
        ([param], None) => property_name(method.name(), "set").map(|name| (name, *param)),
        _ => None,
    }
}

/// A property as declared on a single type.
struct Declared {
    name: String,
    value_type: TypeRef,
    read: Option<Arc<MethodDesc>>,
    write: Option<Arc<MethodDesc>>,
}

fn declared_properties(desc: &TypeDesc) -> Vec<Declared> {
    let mut declared: Vec<Declared> = Vec::new();

    for method in desc.methods() {
        let Some((name, value_type)) = read_property(method) else {
            continue;
        };
        if declared.iter().all(|prop| prop.name != name) {
            declared.push(Declared {
                name,
                value_type,
                read: Some(method.clone()),
                write: None,
            });
        }
    }

    for method in desc.methods() {
        let Some((name, value_type)) = write_property(method) else {
            continue;
        };
        match declared.iter_mut().find(|prop| prop.name == name) {
            Some(prop) if prop.write.is_none() && prop.value_type == value_type => {
                prop.write = Some(method.clone());
            }
            Some(_) => {
                log::trace!("`{}.{}` does not pair with its read method", desc.ty(), method.name());
            }
            None => declared.push(Declared {
                name,
                value_type,
                read: None,
                write: Some(method.clone()),
            }),
        }
    }

    declared
}

// -----------------------------------------------------------------------------
// Directory

#[derive(Default)]
struct Directory {
    properties: Vec<PropertyDescriptor>,
    index: HashMap<Box<str>, usize>,
}

impl Directory {
    /// Adds `candidate`, or fills the missing halves of an earlier declaration.
    fn merge(&mut self, candidate: PropertyDescriptor) {
        let Some(&at) = self.index.get(&candidate.name) else {
            self.index.insert(candidate.name.clone(), self.properties.len());
            self.properties.push(candidate);
            return;
        };

        let kept = &mut self.properties[at];
        if kept.value_type != candidate.value_type {
            log::warn!(
                "property `{}` of `{}` shadows a `{}` property of `{}`, the latter is ignored",
                kept.name,
                kept.declared_on,
                candidate.value_type,
                candidate.declared_on,
            );
            return;
        }
        if kept.read.as_ref().is_none_or(Method::is_abstract) && candidate.read.is_some() {
            kept.read = candidate.read;
        }
        if kept.write.as_ref().is_none_or(Method::is_abstract) && candidate.write.is_some() {
            kept.write = candidate.write;
        }
    }
}

fn bound(
    declared: Declared,
    declared_on: TypeRef,
    mut bind: impl FnMut(Arc<MethodDesc>) -> Method,
) -> PropertyDescriptor {
    PropertyDescriptor {
        name: declared.name.into_boxed_str(),
        value_type: declared.value_type,
        declared_on,
        read: declared.read.map(&mut bind),
        write: declared.write.map(&mut bind),
    }
}

pub(crate) fn list_accessors<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
) -> Result<Vec<PropertyDescriptor>, MetaError> {
    let root = lookup(source, ty)?;
    let chain = class_chain(source, root);
    let mut directory = Directory::default();

    for step in &chain {
        let upcasts: &Arc<[Upcast]> = &step.upcasts;
        for declared in declared_properties(step.desc) {
            directory.merge(bound(declared, step.desc.ty(), |method| {
                Method::new(method, upcasts.clone())
            }));
        }
    }

    for interface in interface_closure(source, &chain) {
        for declared in declared_properties(interface) {
            directory.merge(bound(declared, interface.ty(), |method| {
                bind_to_chain(&chain, &method)
            }));
        }
    }

    log::trace!(
        "`{}` exposes {} accessor(s)",
        root.ty(),
        directory.properties.len()
    );
    Ok(directory.properties)
}

pub(crate) fn find_accessor<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
    name: &str,
    map_id: Option<&str>,
) -> Result<Option<PropertyDescriptor>, MetaError> {
    log::trace!("finding accessor `{name}` on {ty:?} (map id {map_id:?})");
    if name.contains('.') {
        let path = super::path::resolve_deep_path(source, ty, name, map_id)?;
        return Ok(path.last().and_then(|element| element.as_property()).cloned());
    }

    Ok(list_accessors(source, ty)?
        .into_iter()
        .find(|prop| &*prop.name == name))
}
