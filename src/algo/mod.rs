//! Algorithms over a built topology.
//!
//! - **Path finding**: A* over the vertex graph or the face graph
//! - **Location**: point and ray to face queries on an embedded topology
//!
//! Both only read the topology. Several of them may run against the same
//! topology at once as long as nothing edits it in between.

pub mod locate;
pub mod path;
