//! SoC clocking assembly: from board descriptor to finished clock/reset plan.
//!
//! This crate is the thin integration layer on top of [`crg_plan`]: it takes
//! a board's reference clocks and a set of stage requests, plans every
//! stage, resolves the clock-domain graph, derives the reset sequence, and
//! hands the surrounding SoC integration the result as one immutable
//! [`SocClocking`] value. No partial or mutable state crosses the boundary.
//!
//! The built-in [`targets`] reproduce the clock trees of the supported
//! boards.

#![warn(missing_docs)]

pub mod assembler;
pub mod targets;

pub use assembler::{assemble, SocClocking, StageRequest};
pub use targets::{anvyl_clocking, waxwing_clocking, ANVYL_SYS_CLK};
