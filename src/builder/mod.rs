pub mod cursors;
pub mod options;
pub mod timeline;

#[cfg(test)]
#[path = "../../tests/unit/builder/timeline.rs"]
mod tests;
