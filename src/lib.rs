//! portfolio3d - an interactive 3D portfolio page
//!
//! Builds the portfolio scene, routes pointer input to its meshes and performs the
//! link and sound actions their handlers request, either in a desktop window or
//! replayed headlessly from a pointer script.

pub mod actions;
pub mod audio;
pub mod config;
pub mod headless;
pub mod pointer_script;
pub mod portfolio;
pub mod report;
pub mod window;
