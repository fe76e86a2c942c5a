//! Calibration commands for DNA character rigs.
//!
//! A rig is copied into a [`DnaCalibReader`], edited in place by
//! [`commands::Command`] implementations and read back through the
//! capability traits in [`reader`].

pub mod commands;
pub mod dna_calib_reader;
pub mod error;
pub mod logging;
pub mod plan;
pub mod raw;
pub mod reader;
pub mod report;
pub mod rig_file;
pub mod types;
pub mod uv_overlap;
pub mod vector3;

#[cfg(test)]
pub(crate) mod fixtures;

pub use dna_calib_reader::DnaCalibReader;
pub use error::CalibError;
pub use reader::{BehaviorReader, DefinitionReader, DescriptorReader, GeometryReader, Reader};
