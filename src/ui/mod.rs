//! egui rendering of the viewer state.

pub mod panels;
pub mod plot;
