//! Integration tests for the type-reference model.

use foredecl_model::{ArrayBounds, ArrayDim, Primitive, TypeRef};

// =============================================================================
// Shape Inspection
// =============================================================================

#[test]
fn deep_pointer_nesting_strips_fully() {
    let base = TypeRef::named("win.gdi", "BITMAPINFO");
    let ty = base.clone().wrap_pointers(4);

    let (stripped, levels) = ty.strip_pointers();
    assert_eq!(levels, 4);
    assert_eq!(stripped, &base);
}

#[test]
fn pointer_inside_array_is_not_stripped_through() {
    // an array of pointers: stripping the outer type removes nothing
    let ty = TypeRef::array(
        TypeRef::pointer(TypeRef::named("win.gdi", "HBITMAP")),
        ArrayBounds::single(16),
    );
    let (stripped, levels) = ty.strip_pointers();
    assert_eq!(levels, 0);
    assert_eq!(stripped, &ty);

    // but the element type is reachable one layer down
    let (inner, inner_levels) = ty.element_type().strip_pointers();
    assert_eq!(inner_levels, 1);
    assert_eq!(inner, &TypeRef::named("win.gdi", "HBITMAP"));
}

#[test]
fn named_base_reaches_through_both_wrappers() {
    let ty = TypeRef::pointer(TypeRef::array(
        TypeRef::named("win.ui", "MSG"),
        ArrayBounds::single(2),
    ));
    // pointer over array over name
    assert_eq!(ty.named_base().map(|n| n.name.as_str()), Some("MSG"));
    assert_eq!(ty.named_base().map(|n| n.namespace.as_str()), Some("win.ui"));
}

// =============================================================================
// Display Keys
// =============================================================================

#[test]
fn display_keys_distinguish_pointer_depth() {
    let base = TypeRef::named("win.ui", "WNDCLASS");
    let one = TypeRef::pointer(base.clone());
    let two = TypeRef::pointer(one.clone());

    assert_eq!(base.to_string(), "WNDCLASS");
    assert_eq!(one.to_string(), "WNDCLASS ptr");
    assert_eq!(two.to_string(), "WNDCLASS ptr ptr");
}

#[test]
fn display_keys_include_array_bounds() {
    let ty = TypeRef::array(
        TypeRef::Primitive(Primitive::UInt16),
        ArrayBounds {
            dims: vec![ArrayDim { lower: 0, length: 32 }],
        },
    );
    assert_eq!(ty.to_string(), "u16[0..32]");
}

#[test]
fn display_is_namespace_blind() {
    // two same-named types from different namespaces render identically;
    // forward-declaration keying relies on per-file managers for isolation
    let a = TypeRef::named("win.ui", "POINT");
    let b = TypeRef::named("win.gdi", "POINT");
    assert_eq!(a.to_string(), b.to_string());
}
