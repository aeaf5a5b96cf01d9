//! Domain model (image info, error taxonomy).

pub mod errors;
pub mod image;

pub use self::errors::{ErrorKind, GatewayError};
pub use self::image::ImageInfo;
