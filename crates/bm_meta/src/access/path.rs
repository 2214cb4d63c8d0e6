use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypeDesc, TypeKind, TypeRef};
use crate::registry::TypeSource;
use crate::{MetaError, Value};

use super::field::{FieldHandle, get_field};
use super::hierarchy::lookup;
use super::property::{PropertyDescriptor, list_accessors};

// -----------------------------------------------------------------------------
// Parsing

/// One segment of a deep path: a name and an optional index, as in `items[2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    name: &'a str,
    index: Option<usize>,
}

impl<'a> Segment<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.name),
            None => f.write_str(self.name),
        }
    }
}

/// A dotted path of at least two segments, such as `address.city` or
/// `contacts[0].city`.
///
/// # Examples
///
/// ```
/// use bm_meta::access::DeepPath;
/// use bm_meta::ErrorKind;
///
/// let path = DeepPath::parse("contacts[1].city").unwrap();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.segments()[0].index(), Some(1));
///
/// let err = DeepPath::parse("city").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Configuration);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepPath<'a> {
    path: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> DeepPath<'a> {
    pub fn parse(path: &'a str) -> Result<Self, MetaError> {
        if !path.contains('.') {
            return Err(MetaError::NotDeepField { path: path.into() });
        }

        let segments = path
            .split('.')
            .map(|raw| parse_segment(path, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { path, segments })
    }

    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.path
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

fn parse_segment<'a>(path: &'a str, raw: &'a str) -> Result<Segment<'a>, MetaError> {
    let malformed = |reason| MetaError::MalformedPath {
        path: path.into(),
        reason,
    };

    let raw = raw.trim();
    let (name, index) = match raw.find('[') {
        None => (raw, None),
        Some(open) => {
            let inner = raw[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| malformed("unclosed index"))?;
            let index = inner
                .trim()
                .parse::<usize>()
                .map_err(|_| malformed("index is not a non-negative integer"))?;
            (&raw[..open], Some(index))
        }
    };

    if name.is_empty() {
        return Err(malformed("empty segment"));
    }
    if name.contains(']') {
        return Err(malformed("unopened index"));
    }
    Ok(Segment { name, index })
}

// -----------------------------------------------------------------------------
// Resolution

/// How one path element is read and written.
#[derive(Debug, Clone)]
pub enum SlotHandle {
    Property(PropertyDescriptor),
    Field(FieldHandle),
}

impl SlotHandle {
    pub fn name(&self) -> &str {
        match self {
            Self::Property(prop) => prop.name(),
            Self::Field(field) => field.name(),
        }
    }

    pub fn value_type(&self) -> TypeRef {
        match self {
            Self::Property(prop) => prop.value_type(),
            Self::Field(field) => field.value_type(),
        }
    }

    pub fn read(&self, target: &mut dyn Any) -> Result<Value, MetaError> {
        match self {
            Self::Property(prop) => prop.read(target),
            Self::Field(field) => field.get(target),
        }
    }

    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), MetaError> {
        match self {
            Self::Property(prop) => prop.write(target, value),
            Self::Field(field) => field.set(target, value),
        }
    }
}

/// One resolved segment of a deep path.
///
/// For an indexed segment the handle reaches the collection; the caller selects
/// the element at [`index`](Self::index).
#[derive(Debug, Clone)]
pub struct PathElement {
    handle: SlotHandle,
    index: Option<usize>,
}

impl PathElement {
    #[inline]
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[inline]
    pub fn handle(&self) -> &SlotHandle {
        &self.handle
    }

    /// Returns the type of the slot, the collection type for an indexed segment.
    #[inline]
    pub fn value_type(&self) -> TypeRef {
        self.handle.value_type()
    }

    /// Reads this element's slot of `target`.
    #[inline]
    pub fn read(&self, target: &mut dyn Any) -> Result<Value, MetaError> {
        self.handle.read(target)
    }

    /// Writes this element's slot of `target`.
    #[inline]
    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), MetaError> {
        self.handle.write(target, value)
    }

    #[inline]
    pub fn as_property(&self) -> Option<&PropertyDescriptor> {
        match &self.handle {
            SlotHandle::Property(prop) => Some(prop),
            SlotHandle::Field(_) => None,
        }
    }

    #[inline]
    pub fn as_field(&self) -> Option<&FieldHandle> {
        match &self.handle {
            SlotHandle::Field(field) => Some(field),
            SlotHandle::Property(_) => None,
        }
    }
}

fn resolve_segment<S: TypeSource + ?Sized>(
    source: &S,
    owner: &TypeDesc,
    name: &str,
) -> Result<Option<SlotHandle>, MetaError> {
    let found = list_accessors(source, owner.id())?
        .into_iter()
        .find(|prop| prop.name() == name);
    if let Some(prop) = found {
        return Ok(Some(SlotHandle::Property(prop)));
    }

    match get_field(source, owner.id(), name) {
        Ok(field) => Ok(Some(SlotHandle::Field(field))),
        Err(MetaError::FieldNotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

pub(crate) fn resolve_deep_path<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
    path: &str,
    map_id: Option<&str>,
) -> Result<Vec<PathElement>, MetaError> {
    let parsed = DeepPath::parse(path)?;
    let mut current = lookup(source, ty)?;
    log::trace!("resolving `{path}` on `{}` (map id {map_id:?})", current.ty());

    let not_found = |owner: &TypeDesc, segment: &Segment<'_>| MetaError::FieldHierarchyNotFound {
        path: path.into(),
        segment: alloc::format!("{segment}").into_boxed_str(),
        owner: owner.name(),
    };

    let mut elements = Vec::with_capacity(parsed.len());
    let mut segments = parsed.segments().iter().peekable();
    while let Some(segment) = segments.next() {
        let handle = resolve_segment(source, current, segment.name())?
            .ok_or_else(|| not_found(current, segment))?;

        let mut next = handle.value_type();
        if segment.index().is_some() {
            match source.type_desc(next.id()).map(TypeDesc::kind) {
                Some(TypeKind::Sequence { element }) => next = element,
                _ => return Err(not_found(current, segment)),
            }
        }
        elements.push(PathElement {
            handle,
            index: segment.index(),
        });

        if let Some(&following) = segments.peek() {
            current = match source.type_desc(next.id()) {
                Some(desc) if desc.is_introspectable() => desc,
                Some(desc) => return Err(not_found(desc, following)),
                None => {
                    return Err(MetaError::FieldHierarchyNotFound {
                        path: path.into(),
                        segment: alloc::format!("{following}").into_boxed_str(),
                        owner: next.name(),
                    });
                }
            };
        }
    }

    Ok(elements)
}
