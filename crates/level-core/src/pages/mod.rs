pub mod level;
pub mod page;
pub mod sensor_unavailable;

pub use level::LevelPage;
pub use page::{Page, PageWrapper};
pub use sensor_unavailable::SensorUnavailablePage;
