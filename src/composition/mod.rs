pub mod animation;
pub mod clip;
pub mod ease;
pub mod spec;
pub mod track;
pub mod transition;
