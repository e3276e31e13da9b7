//! Board descriptors for the crg clock/reset planning workspace.
//!
//! A board descriptor is a declarative table of package pins, electrical
//! standards, and reference-clock inputs. The planning core treats it as an
//! opaque source of "what reference clocks exist and at what exact
//! frequency"; everything else in the table is carried for the downstream
//! synthesis tooling. Pin placement and electrical-standard selection are
//! explicitly not this workspace's concern.

#![warn(missing_docs)]

pub mod boards;
pub mod descriptor;

pub use boards::{anvyl, waxwing};
pub use descriptor::{BoardDescriptor, IoResource, IoStandard, RefClockInput, Subsignal};
