pub mod features;
pub mod plots;
