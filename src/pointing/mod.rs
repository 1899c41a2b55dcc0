pub mod circular;
pub mod density;
pub mod direction;
mod error;
pub mod feed;
pub mod geometry;
pub mod resolver;
mod types;

pub use density::{aggregate, BinCount, DensityTable, DEFAULT_MAX_RANGE_KM};
pub use direction::DirectionBin;
pub use error::PointingError;
pub use feed::{FeedError, FeedLoader, ObjectRecord, DEFAULT_HEIGHT_KM};
pub use resolver::resolve_pointing;
pub use types::{AnnotatedObject, GeoPoint, ObjectPosition, Observer, PointingResult};
