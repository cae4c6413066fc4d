pub mod last_updated;
pub mod projection;
pub mod ranking;
pub mod window;

pub use last_updated::LastUpdated;
pub use projection::project;
pub use ranking::rank;
pub use window::{Relation, WindowSpec};
