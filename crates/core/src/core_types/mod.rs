//! Core types shared across modules

pub mod vec3;

pub use vec3::Vec3;
