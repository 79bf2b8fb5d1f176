pub mod cancellation;
pub mod classifier;
pub mod normalizer;
pub mod prober;
pub mod progress;
pub mod providers;
pub mod scanner;
pub mod search;

pub use cancellation::{CancelToken, SearchController};
pub use progress::Progress;
pub use search::{SearchRun, SearchService};
