//! Photo crop/compose: user photo plus crop rectangle in, fixed square canvas out.

pub mod crop;
pub mod pipeline;
