//! Face/vertex adjacency mesh with stable face handles.
//!
//! Purpose
//! - Shared boundary representation for the hull engines: triangular faces with
//!   outward normals, per-face neighbor edges and per-point incident-face lists.
//!
//! Why this design
//! - Faces live in a `SlotMap`, so a `FaceKey` stays valid until its own face is
//!   removed. Removing a face never renumbers the others, which keeps neighbor
//!   references and engine-side `SecondaryMap`s trivially correct.
//! - Neighbor links are found by intersecting incident lists of the shared edge's
//!   endpoints; faces never need to be added in any particular order.
//!
//! Invariants
//! - A face has at most 3 neighbors; in a closed mesh exactly 3.
//! - Links are symmetric: if `f` lists `g` then `g` lists `f` over the same edge.
//! - `incident(p)` lists exactly the live faces that contain `p`.

mod ops;
mod types;

pub use ops::Mesh;
pub use types::{Face, FaceKey, Neighbor};
