//! Tests for the Index newtype wrapper.

use opensubdiv_stencil::Index;

#[test]
fn test_index_from_u32() {
    let idx = Index::from(42u32);
    assert_eq!(idx.0, 42);
}

#[test]
fn test_index_into_u32() {
    let idx = Index(42);
    let value: u32 = idx.into();
    assert_eq!(value, 42);
}

#[test]
fn test_index_from_usize() {
    let idx = Index::from(100usize);
    assert_eq!(idx.0, 100);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_index_from_usize_truncates() {
    assert_eq!(Index::from(u32::MAX as usize), Index(u32::MAX));
    assert_eq!(Index::from((1usize << 32) + 5), Index(5));
}

#[test]
fn test_index_into_usize() {
    let idx = Index(100);
    let value: usize = idx.into();
    assert_eq!(value, 100);
}

#[test]
fn test_index_display() {
    assert_eq!(Index(42).to_string(), "42");
    assert_eq!(format!("{:?}", Index(42)), "Index(42)");
}

#[test]
fn test_index_ordering() {
    assert!(Index(1) < Index(2));
    assert_eq!(Index(2).max(Index(1)), Index(2));
    assert_eq!(Index::default(), Index(0));
}

#[test]
fn test_index_cast_slice() {
    let raw = [0u32, 5, 7];
    let indices: &[Index] = bytemuck::cast_slice(&raw);

    assert_eq!(indices, &[Index(0), Index(5), Index(7)]);
}
