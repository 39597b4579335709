pub mod generate;

pub use generate::{noisy_sinusoid, random_buffer, valid_configurations};
