mod body;
mod joint;

pub use body::BodyTracker;
pub use joint::{JointKind, JointSignal, JointState};
