//! Bean hierarchies shared by the unit tests.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::info::{TypeDesc, Visibility};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// Class chain: GrandChild -> ChildBean -> BaseBean

#[derive(Default)]
pub(crate) struct BaseBean {
    pub(crate) a: String,
}

#[derive(Default)]
pub(crate) struct ChildBean {
    pub(crate) base: BaseBean,
    pub(crate) b: String,
}

#[derive(Default)]
pub(crate) struct GrandChild {
    pub(crate) child: ChildBean,
    pub(crate) c: String,
}

impl GrandChild {
    pub(crate) fn new(a: &str, b: &str, c: &str) -> Self {
        Self {
            child: ChildBean {
                base: BaseBean { a: a.to_string() },
                b: b.to_string(),
            },
            c: c.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// Interface chain: ChildChildIf -> ChildIf -> ParentIf

pub(crate) trait ParentIf {}
pub(crate) trait ChildIf {}
pub(crate) trait ChildChildIf {}

// -----------------------------------------------------------------------------
// A class implementing two interfaces without implementing their methods

pub(crate) trait TestIf1 {}
pub(crate) trait TestIf2 {}

pub(crate) struct TestClass {
    pub(crate) c: String,
}

// -----------------------------------------------------------------------------
// Setter taking a non-primitive argument

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct B {
    pub(crate) value: i32,
}

#[derive(Default)]
pub(crate) struct A {
    pub(crate) b: B,
}

// -----------------------------------------------------------------------------
// Nested objects for deep paths

#[derive(Clone, Default)]
pub(crate) struct Address {
    pub(crate) city: String,
    pub(crate) zip: u32,
}

#[derive(Default)]
pub(crate) struct Person {
    pub(crate) name: String,
    pub(crate) address: Address,
    pub(crate) contacts: Vec<Address>,
}

pub(crate) struct SimpleObj {
    pub(crate) field1: String,
}

// -----------------------------------------------------------------------------
// Three levels of nesting: Root -> Mid -> Leaf

#[derive(Clone, Default)]
pub(crate) struct Leaf {
    pub(crate) v: u32,
}

#[derive(Clone, Default)]
pub(crate) struct Mid {
    pub(crate) leaf: Leaf,
}

#[derive(Default)]
pub(crate) struct Root {
    pub(crate) mid: Mid,
}

// -----------------------------------------------------------------------------
// A class property shadowing an interface property of another type

pub(crate) trait Identified {}

pub(crate) struct Account {
    pub(crate) id: String,
}

// -----------------------------------------------------------------------------
// Registry

pub(crate) fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();

    registry.insert(
        TypeDesc::class::<BaseBean>()
            .field(
                "a",
                Visibility::Private,
                |s: &BaseBean| s.a.clone(),
                |s: &mut BaseBean, v| s.a = v,
            )
            .getter("getA", |s: &BaseBean| s.a.clone())
            .build(),
    );
    registry.insert(
        TypeDesc::class::<ChildBean>()
            .extends(|s: &ChildBean| &s.base, |s: &mut ChildBean| &mut s.base)
            .field(
                "b",
                Visibility::Private,
                |s: &ChildBean| s.b.clone(),
                |s: &mut ChildBean, v| s.b = v,
            )
            .getter("getB", |s: &ChildBean| s.b.clone())
            .build(),
    );
    registry.insert(
        TypeDesc::class::<GrandChild>()
            .extends(|s: &GrandChild| &s.child, |s: &mut GrandChild| &mut s.child)
            .field(
                "c",
                Visibility::Public,
                |s: &GrandChild| s.c.clone(),
                |s: &mut GrandChild, v| s.c = v,
            )
            .getter("getC", |s: &GrandChild| s.c.clone())
            .setter("setA", |s: &mut GrandChild, v: String| s.child.base.a = v)
            .build(),
    );

    registry.insert(
        TypeDesc::interface::<dyn ParentIf>()
            .abstract_getter::<String>("getParentField")
            .abstract_setter::<String>("setParentField")
            .build(),
    );
    registry.insert(
        TypeDesc::interface::<dyn ChildIf>()
            .implements::<dyn ParentIf>()
            .abstract_getter::<String>("getChildField")
            .build(),
    );
    registry.insert(
        TypeDesc::interface::<dyn ChildChildIf>()
            .implements::<dyn ChildIf>()
            .abstract_getter::<String>("getChildChildField")
            .abstract_setter::<String>("setChildChildField")
            .build(),
    );

    registry.insert(
        TypeDesc::interface::<dyn TestIf1>()
            .abstract_getter::<String>("getA")
            .abstract_setter::<String>("setA")
            .build(),
    );
    registry.insert(
        TypeDesc::interface::<dyn TestIf2>()
            .abstract_getter::<i32>("getB")
            .build(),
    );
    registry.insert(
        TypeDesc::class::<TestClass>()
            .implements::<dyn TestIf1>()
            .implements::<dyn TestIf2>()
            .getter("getC", |s: &TestClass| s.c.clone())
            .build(),
    );

    registry.insert(
        TypeDesc::class::<B>()
            .getter("getValue", |s: &B| s.value)
            .setter("setValue", |s: &mut B, v: i32| s.value = v)
            .build(),
    );
    registry.insert(
        TypeDesc::class::<A>()
            .getter("getB", |s: &A| s.b.clone())
            .setter("setB", |s: &mut A, v: B| s.b = v)
            .build(),
    );

    registry.insert(
        TypeDesc::class::<Address>()
            .field("zip", Visibility::Public, |s: &Address| s.zip, |s: &mut Address, v| s.zip = v)
            .getter("getCity", |s: &Address| s.city.clone())
            .setter("setCity", |s: &mut Address, v: String| s.city = v)
            .build(),
    );
    registry.insert(TypeDesc::sequence::<Vec<Address>, Address>());
    registry.insert(
        TypeDesc::class::<Person>()
            .getter("get_name", |s: &Person| s.name.clone())
            .setter("set_name", |s: &mut Person, v: String| s.name = v)
            .getter("getAddress", |s: &Person| s.address.clone())
            .setter("setAddress", |s: &mut Person, v: Address| s.address = v)
            .getter("getContacts", |s: &Person| s.contacts.clone())
            .setter("setContacts", |s: &mut Person, v: Vec<Address>| s.contacts = v)
            .build(),
    );
    registry.insert(
        TypeDesc::class::<SimpleObj>()
            .getter("getField1", |s: &SimpleObj| s.field1.clone())
            .setter("setField1", |s: &mut SimpleObj, v: String| s.field1 = v)
            .build(),
    );

    registry.insert(
        TypeDesc::class::<Leaf>()
            .getter("getV", |s: &Leaf| s.v)
            .build(),
    );
    registry.insert(
        TypeDesc::class::<Mid>()
            .field(
                "leaf",
                Visibility::Restricted,
                |s: &Mid| s.leaf.clone(),
                |s: &mut Mid, v| s.leaf = v,
            )
            .build(),
    );
    registry.insert(
        TypeDesc::class::<Root>()
            .getter("getMid", |s: &Root| s.mid.clone())
            .setter("setMid", |s: &mut Root, v: Mid| s.mid = v)
            .build(),
    );

    registry.insert(
        TypeDesc::interface::<dyn Identified>()
            .abstract_getter::<i64>("getId")
            .build(),
    );
    registry.insert(
        TypeDesc::class::<Account>()
            .implements::<dyn Identified>()
            .getter("getId", |s: &Account| s.id.clone())
            .build(),
    );

    registry
}
