pub mod schedule;
pub mod settings;
pub mod storage;
pub mod summary;
pub mod user;

pub use schedule::*;
pub use settings::*;
pub use storage::*;
pub use summary::*;
pub use user::*;
