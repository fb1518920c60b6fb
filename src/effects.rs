pub(crate) mod blur;
pub(crate) mod composite;
pub mod grain;
pub mod vintage;
