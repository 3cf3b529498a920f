pub mod brush;
pub mod fill;
pub mod sampler;
pub mod stroke;
