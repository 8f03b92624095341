pub mod frame;
pub mod sampler;
