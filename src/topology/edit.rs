//! Id-generic point mutations.
//!
//! Both mesh tiers implement [`TopologyEdit`] once per id kind they store, so
//! `mesh.switch_id(a, b)` and `mesh.remove_unreferenced(id)` dispatch on the
//! type of the id passed in.

use crate::mesh_error::MeshError;
use crate::topology::ids::DenseId;

/// Renaming and removal of single entities of the kind addressed by `I`.
pub trait TopologyEdit<I: DenseId> {
    /// Exchanges the ids of `a` and `b`.
    ///
    /// Positions, attribute blocks, adjacency rows and boundary flags move
    /// with the entity, and every row that referenced `a` now references `b`
    /// and vice versa. Only the neighbourhoods of `a` and `b` are visited.
    /// Calling it twice with the same arguments restores the original mesh.
    fn switch_id(&mut self, a: I, b: I) -> Result<(), MeshError>;

    /// Removes an entity that nothing else references.
    ///
    /// The last entity of the same kind is moved into the freed slot, so
    /// ids stay dense. Vertices, edges and faces that are still used by a
    /// higher-dimensional entity are rejected with
    /// [`MeshError::StillReferenced`]; polys are detached first.
    fn remove_unreferenced(&mut self, id: I) -> Result<(), MeshError>;
}

/// Moves `id` to the last slot of a table holding `len` entities, using
/// `switch`. Returns the id that was last.
pub(crate) fn swap_to_last<I, F>(id: I, len: usize, switch: F) -> Result<I, MeshError>
where
    I: DenseId,
    F: FnOnce(I, I) -> Result<(), MeshError>,
{
    let last = I::from_index(len - 1);
    if id != last {
        log::trace!("swap-and-pop {} {:?} <- {:?}", I::KIND, id, last);
        switch(id, last)?;
    }
    Ok(last)
}

/// Sorts ids descending and drops duplicates, so they can be removed one by
/// one with swap-and-pop without invalidating the ones still pending.
pub(crate) fn removal_order<I: DenseId>(mut ids: Vec<I>) -> Vec<I> {
    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids.dedup();
    ids
}
