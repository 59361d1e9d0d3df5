//! Stateless foundations: constant tables, sequence utilities, the tabular
//! data model and the molecular-descriptor provider.

pub mod constants;
pub mod descriptors;
pub mod features;
pub mod sequence;
pub mod table;
