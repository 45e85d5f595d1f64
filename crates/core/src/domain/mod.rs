pub mod contract;
pub mod decision;
pub mod snapshot;
