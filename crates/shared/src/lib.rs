//! Field registry and wire types shared by the prediction client and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
