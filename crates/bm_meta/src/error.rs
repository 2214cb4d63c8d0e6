use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ErrorKind

/// The stable classification of a [`MetaError`].
///
/// Callers match on the kind rather than the variant: a mapping engine probing
/// candidate method names treats [`NotFound`](Self::NotFound) as "try the next
/// one", while every other kind is a real misconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself is malformed, e.g. a non-deep path where one was required.
    Configuration,
    /// A well-formed request names something the type hierarchy does not have.
    Resolution,
    /// No method matches a method reference.
    NotFound,
    /// An invocation received an argument or target of the wrong type.
    InvocationType,
    /// A field was read or written without the needed access.
    Access,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => f.pad("ConfigurationError"),
            Self::Resolution => f.pad("ResolutionError"),
            Self::NotFound => f.pad("NotFoundError"),
            Self::InvocationType => f.pad("InvocationTypeError"),
            Self::Access => f.pad("AccessError"),
        }
    }
}

// -----------------------------------------------------------------------------
// MetaError

/// Every failure of a metadata query or of a call through a resolved handle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetaError {
    #[error("`{path}` is not a deep field")]
    NotDeepField { path: Box<str> },

    #[error("malformed field path `{path}`: {reason}")]
    MalformedPath { path: Box<str>, reason: &'static str },

    #[error("malformed method reference `{spec}`: {reason}")]
    MalformedMethodSpec { spec: Box<str>, reason: &'static str },

    #[error("type {0:?} is not registered")]
    UnknownType(TypeId),

    #[error("field hierarchy not found: `{owner}` has no `{segment}` while resolving `{path}`")]
    FieldHierarchyNotFound {
        path: Box<str>,
        segment: Box<str>,
        owner: &'static str,
    },

    #[error("field `{field}` not found on `{owner}` or its superclasses")]
    FieldNotFound { owner: &'static str, field: Box<str> },

    #[error("property `{owner}.{property}` has no {access} method")]
    MissingAccessor {
        owner: &'static str,
        property: Box<str>,
        access: &'static str,
    },

    #[error("method `{owner}.{method}` has no concrete implementation")]
    AbstractMethod {
        owner: &'static str,
        method: &'static str,
    },

    #[error("no such method `{owner}.{spec}`")]
    NoSuchMethod { owner: &'static str, spec: Box<str> },

    #[error(
        "Illegal object type for the method '{method}'. \n Expected types: \n{expected}\n Actual types: \n{actual}"
    )]
    IllegalObjectType {
        method: &'static str,
        expected: Box<str>,
        actual: Box<str>,
    },

    #[error("target is not an instance of `{expected}`, which declares `{member}`")]
    IllegalTarget {
        member: &'static str,
        expected: &'static str,
    },

    #[error("Illegal value type for the field '{field}': expected `{expected}`, found `{actual}`")]
    IllegalFieldValue {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field `{owner}.{field}` is not accessible")]
    IllegalAccess {
        owner: &'static str,
        field: &'static str,
    },

    #[error("field `{owner}.{field}` cannot be written")]
    ReadOnlyField {
        owner: &'static str,
        field: &'static str,
    },
}

impl MetaError {
    /// Returns the [`ErrorKind`] of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotDeepField { .. }
            | Self::MalformedPath { .. }
            | Self::MalformedMethodSpec { .. } => ErrorKind::Configuration,
            Self::UnknownType(_)
            | Self::FieldHierarchyNotFound { .. }
            | Self::FieldNotFound { .. }
            | Self::MissingAccessor { .. }
            | Self::AbstractMethod { .. } => ErrorKind::Resolution,
            Self::NoSuchMethod { .. } => ErrorKind::NotFound,
            Self::IllegalObjectType { .. }
            | Self::IllegalTarget { .. }
            | Self::IllegalFieldValue { .. } => ErrorKind::InvocationType,
            Self::IllegalAccess { .. } | Self::ReadOnlyField { .. } => ErrorKind::Access,
        }
    }

    /// Returns `true` if this is a [`ErrorKind::NotFound`] error.
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }
}
