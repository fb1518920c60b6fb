pub mod bold;
pub mod fit;
pub mod measure;
pub mod wrap;
