//! Inputs the renderers read: decoded images, fetched bytes and font faces.

pub mod decode;
pub mod fetch;
pub mod fonts;
