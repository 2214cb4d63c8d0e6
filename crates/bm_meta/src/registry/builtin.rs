use alloc::string::String;
use alloc::vec::Vec;

use crate::info::{TypeDesc, Visibility};
use crate::registry::TypeRegistry;

macro_rules! register_primitives {
    ($registry:ident: $($ty:ty),+ $(,)?) => {
        $( $registry.try_insert(TypeDesc::primitive::<$ty>()); )+
    };
}

/// Registers the types every mapping needs to bottom out on.
///
/// `String` is a foreign type the caller cannot annotate; it is described as a
/// class whose internals are private fields, so field resolution has something
/// to force open.
pub(super) fn register_builtins(registry: &mut TypeRegistry) {
    register_primitives!(registry:
        (), bool, char,
        u8, u16, u32, u64, u128, usize,
        i8, i16, i32, i64, i128, isize,
        f32, f64,
        &'static str,
    );

    registry.try_insert(
        TypeDesc::class::<String>()
            .read_only_field("vec", Visibility::Private, |s: &String| -> Vec<u8> {
                s.as_bytes().to_vec()
            })
            .read_only_field("len", Visibility::Private, |s: &String| s.len())
            .getter("length", |s: &String| s.len())
            .getter("isEmpty", |s: &String| s.is_empty())
            .build(),
    );
}
