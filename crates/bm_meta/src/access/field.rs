use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{CallError, FieldDesc, TypeRef, Upcast, Visibility, apply_chain, apply_chain_mut};
use crate::registry::TypeSource;
use crate::{MetaError, Value};

use super::hierarchy::{class_chain, lookup};

/// A resolved field.
///
/// Non-public fields are only readable and writable once the handle is
/// [made accessible](Self::set_accessible). Handles returned by
/// [`get_field`](super::Introspect::get_field) already are.
#[derive(Clone)]
pub struct FieldHandle {
    desc: Arc<FieldDesc>,
    upcasts: Arc<[Upcast]>,
    accessible: bool,
}

impl FieldHandle {
    pub(crate) fn new(desc: Arc<FieldDesc>, upcasts: Arc<[Upcast]>) -> Self {
        let accessible = desc.visibility().is_public();
        Self {
            desc,
            upcasts,
            accessible,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.desc.name()
    }

    #[inline]
    pub fn value_type(&self) -> TypeRef {
        self.desc.ty()
    }

    /// Returns the type declaring this field.
    #[inline]
    pub fn owner(&self) -> TypeRef {
        self.desc.owner()
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.desc.visibility()
    }

    #[inline]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    #[inline]
    pub fn set_accessible(&mut self, accessible: bool) {
        self.accessible = accessible;
    }

    #[inline]
    pub fn desc(&self) -> &FieldDesc {
        &self.desc
    }

    fn illegal_target(&self) -> MetaError {
        MetaError::IllegalTarget {
            member: self.name(),
            expected: self.owner().name(),
        }
    }

    fn check_access(&self) -> Result<(), MetaError> {
        if self.accessible {
            Ok(())
        } else {
            Err(MetaError::IllegalAccess {
                owner: self.owner().name(),
                field: self.name(),
            })
        }
    }

    /// Reads the field of `target`.
    pub fn get(&self, target: &dyn Any) -> Result<Value, MetaError> {
        self.check_access()?;
        let this = if target.type_id() == self.owner().id() {
            target
        } else {
            apply_chain(&self.upcasts, target).ok_or_else(|| self.illegal_target())?
        };
        self.desc.read_raw(this).ok_or_else(|| self.illegal_target())
    }

    /// Writes `value` into the field of `target`.
    ///
    /// A value of the wrong type is rejected before `target` is touched.
    pub fn set(&self, target: &mut dyn Any, value: Value) -> Result<(), MetaError> {
        self.check_access()?;
        if !self.desc.is_writable() {
            return Err(MetaError::ReadOnlyField {
                owner: self.owner().name(),
                field: self.name(),
            });
        }

        let actual = value.type_name();
        let this = if (*target).type_id() == self.owner().id() {
            target
        } else {
            apply_chain_mut(&self.upcasts, target).ok_or_else(|| self.illegal_target())?
        };
        match self.desc.write_raw(this, value) {
            Some(Ok(())) => Ok(()),
            Some(Err(CallError::Target)) => Err(self.illegal_target()),
            Some(Err(CallError::Arity { .. } | CallError::Argument { .. })) => {
                Err(MetaError::IllegalFieldValue {
                    field: self.name(),
                    expected: self.value_type().name(),
                    actual,
                })
            }
            None => Err(MetaError::ReadOnlyField {
                owner: self.owner().name(),
                field: self.name(),
            }),
        }
    }
}

impl fmt::Debug for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("owner", &self.owner())
            .field("name", &self.name())
            .field("type", &self.value_type())
            .field("accessible", &self.accessible)
            .finish()
    }
}

/// Finds a field declared on `ty` or one of its superclasses.
pub(crate) fn get_field<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
    name: &str,
) -> Result<FieldHandle, MetaError> {
    let root = lookup(source, ty)?;
    for step in class_chain(source, root) {
        if let Some(desc) = step.desc.field(name) {
            log::trace!("field `{name}` of `{}` is declared on `{}`", root.ty(), step.desc.ty());
            let mut handle = FieldHandle::new(desc.clone(), step.upcasts);
            handle.set_accessible(true);
            return Ok(handle);
        }
    }

    Err(MetaError::FieldNotFound {
        owner: root.name(),
        field: name.into(),
    })
}
