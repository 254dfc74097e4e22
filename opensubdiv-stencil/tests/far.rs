//! Tests for the far module.


use opensubdiv_stencil::far::*;
use opensubdiv_stencil::{Error, Index};

use test_utils::bilinear_grid_stencils;

fn indices(values: &[u32]) -> Vec<Index> {
    values.iter().copied().map(Index).collect()
}

#[test]
fn test_stencil_table_accessors() {
    let table = StencilTable::new(
        vec![2, 1, 0, 3],
        indices(&[0, 2, 3, 3]),
        indices(&[0, 1, 4, 2, 3, 0]),
        vec![0.5, 0.5, 1.0, 0.2, 0.3, 0.5],
    )
    .unwrap();

    assert_eq!(table.len(), 4);
    assert!(!table.is_empty());
    assert_eq!(table.control_vertex_count(), 5);
    assert_eq!(table.sizes(), &[2, 1, 0, 3]);
    assert_eq!(table.offsets(), indices(&[0, 2, 3, 3]).as_slice());
    assert_eq!(table.control_indices().len(), 6);
    assert_eq!(table.weights().len(), 6);

    let stencil = table.stencil(Index(3)).unwrap();
    assert_eq!(stencil.len(), 3);
    assert_eq!(stencil.indices(), indices(&[2, 3, 0]).as_slice());
    assert_eq!(stencil.weights(), &[0.2, 0.3, 0.5]);

    assert!(table.stencil(Index(2)).unwrap().is_empty());
    assert!(table.stencil(Index(4)).is_none());
}

#[test]
fn test_stencil_table_iter() {
    let table = bilinear_grid_stencils(2);

    assert_eq!(table.len(), 9);
    assert_eq!(table.iter().count(), table.len());

    // Corner, edge and face points of one quad.
    let sizes: Vec<usize> = table.iter().map(|stencil| stencil.len()).collect();
    assert_eq!(sizes, [1, 2, 1, 2, 4, 2, 1, 2, 1]);

    // Every stencil is a partition of unity.
    for stencil in table.iter() {
        assert_eq!(stencil.weights().iter().sum::<f32>(), 1.0);
    }
}

#[test]
fn test_stencil_table_view() {
    let table = bilinear_grid_stencils(3);
    let stencils = table.stencils();

    assert_eq!(stencils.len(), table.len());
    assert_eq!(stencils.control_vertex_count(), 9);
    assert_eq!(stencils.sizes(), table.sizes());
    assert_eq!(stencils.offsets(), table.offsets());
    assert_eq!(stencils.indices(), table.control_indices());
    assert_eq!(stencils.weights(), table.weights());
}

#[test]
fn test_stencil_table_allows_trailing_terms() {
    // A table holding only the first stencil of a larger one.
    let table = StencilTable::new(
        vec![1],
        indices(&[0]),
        indices(&[3, 1, 2]),
        vec![1.0, 0.5, 0.5],
    )
    .unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.control_vertex_count(), 4);
}

#[test]
fn test_stencil_table_validation() {
    assert!(matches!(
        StencilTable::new(vec![1, 1], indices(&[0]), indices(&[0, 1]), vec![1.0; 2]),
        Err(Error::InvalidStencilTable(_))
    ));

    assert!(matches!(
        StencilTable::new(vec![2], indices(&[0]), indices(&[0, 1]), vec![1.0]),
        Err(Error::InvalidStencilTable(_))
    ));

    // First stencil must start at term 0.
    assert!(matches!(
        StencilTable::new(vec![1], indices(&[1]), indices(&[0, 1]), vec![1.0; 2]),
        Err(Error::InvalidStencilTable(_))
    ));

    // Overlapping stencils.
    assert!(matches!(
        StencilTable::new(vec![2, 1], indices(&[0, 1]), indices(&[0, 1]), vec![1.0; 2]),
        Err(Error::InvalidStencilTable(_))
    ));

    assert_eq!(
        StencilTable::from_sizes(vec![2, 2], indices(&[0, 1, 2]), vec![1.0; 3]),
        Err(Error::InvalidBufferSize {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn test_stencil_table_from_sizes_overflow() {
    // The second stencil starts at the last addressable term; it ends past
    // what `indices` holds.
    assert_eq!(
        StencilTable::from_sizes(vec![u32::MAX, 1], indices(&[0]), vec![1.0]),
        Err(Error::InvalidBufferSize {
            expected: u32::MAX as usize + 1,
            actual: 1
        })
    );

    // The third one would start past it.
    assert!(matches!(
        StencilTable::from_sizes(vec![u32::MAX, 1, 1], indices(&[0]), vec![1.0]),
        Err(Error::InvalidStencilTable(_))
    ));
}
