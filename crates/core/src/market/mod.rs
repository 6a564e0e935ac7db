pub mod fetch;
pub mod normalize;
pub mod synthesize;
