//! Render pipelines. The scene needs exactly one: lit, optionally textured
//! triangles with a depth test.

pub mod basic;
