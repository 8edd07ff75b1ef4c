//! Integration tests for cross-namespace name resolution.

use foredecl_model::{EntityKind, Primitive, TypeRef};
use foredecl_registry::GlobalRegistry;

const FOUNDATION: &str = "win.foundation";
const GDI: &str = "win.gdi";

/// A registry shaped like a small slice of real metadata.
fn sample_registry() -> GlobalRegistry {
    let mut reg = GlobalRegistry::new();

    reg.add_kind(FOUNDATION, "POINT", EntityKind::Struct);
    reg.add_kind(FOUNDATION, "IUnknown", EntityKind::Interface);

    // handle chain: HGDIOBJ is the root alias, HBITMAP aliases through it
    reg.add_alias(
        GDI,
        "HGDIOBJ",
        TypeRef::pointer(TypeRef::Primitive(Primitive::Void)),
    );
    reg.add_alias(GDI, "HBITMAP", TypeRef::named(GDI, "HGDIOBJ"));

    // scalar typedef, H-prefixed name that is NOT a handle
    reg.add_alias(GDI, "HALFTONE_LEVEL", TypeRef::Primitive(Primitive::UInt32));

    reg
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn namespaces_are_isolated() {
    let reg = sample_registry();
    assert!(reg.knows(FOUNDATION, "POINT"));
    assert!(!reg.knows(GDI, "POINT"));
    assert!(reg.knows(GDI, "HBITMAP"));
    assert!(!reg.knows(FOUNDATION, "HBITMAP"));
}

#[test]
fn interface_check_crosses_namespaces_by_lookup() {
    let reg = sample_registry();
    assert!(reg.is_interface(FOUNDATION, "iunknown"));
    assert!(!reg.is_interface(GDI, "HBITMAP"));
}

#[test]
fn real_type_resolves_two_hop_handle_chain() {
    let reg = sample_registry();
    let hbitmap = TypeRef::named(GDI, "HBITMAP");
    assert_eq!(
        reg.real_type(&hbitmap),
        &TypeRef::pointer(TypeRef::Primitive(Primitive::Void))
    );
}

// =============================================================================
// Handle Detection
// =============================================================================

#[test]
fn handle_detection_needs_both_prefix_and_shape() {
    let reg = sample_registry();

    let hbitmap = TypeRef::named(GDI, "HBITMAP");
    assert!(reg.is_opaque_handle("HBITMAP", &hbitmap));

    // H prefix, scalar shape
    let level = TypeRef::named(GDI, "HALFTONE_LEVEL");
    assert!(!reg.is_opaque_handle("HALFTONE_LEVEL", &level));

    // unknown name resolves nowhere
    let ghost = TypeRef::named(GDI, "HGHOST");
    assert!(!reg.is_opaque_handle("HGHOST", &ghost));
}

#[test]
fn handle_detection_ignores_site_pointer_levels() {
    let reg = sample_registry();
    // a pointer-to-handle site still identifies the base as a handle
    let site = TypeRef::pointer(TypeRef::named(GDI, "HBITMAP"));
    assert!(reg.is_opaque_handle("HBITMAP", &site));
}
