pub mod manifest;
pub mod renderer;
