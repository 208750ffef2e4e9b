//! ISO 19139 remapping rules.
//!
//! - [`fields`]: path tables for every field the assembler reads
//! - [`contact`]: role filtering and projection of responsible parties into people
//! - [`extent`]: reduction of bounding boxes, time periods and resolutions

use super::*;
use crate::metadata::{DateRange, DateType, Location, Person};

pub mod contact;
pub mod extent;
pub mod fields;

pub use contact::*;
pub use extent::*;
pub use fields::*;
