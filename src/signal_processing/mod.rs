pub mod filter;
pub mod gram;
pub mod history;
pub mod sample;
pub mod savitzky_golay;
pub mod stream;

pub use filter::Filter;
pub use history::SampleHistory;
pub use sample::{Sample, Vec3};
pub use savitzky_golay::SavitzkyGolayFilter;
pub use stream::StreamingFilter;
