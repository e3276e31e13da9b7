//! Clocking targets for the built-in boards.
//!
//! Each target describes one board's clock-generation tree as stage
//! requests and assembles it into a [`SocClocking`]. The Anvyl tree mirrors
//! the board's Spartan-6 CRG: a six-tap PLL for the system and SDRAM
//! domains plus a separate DCM for the 50 MHz peripheral clock, kept apart
//! so the system clock can be raised later without disturbing peripherals.

use crate::assembler::{assemble, SocClocking, StageRequest};
use crg_plan::{PlanConstraints, PlanError, ResetSequencer, StageKind, TapRequest};
use crg_common::{Frequency, Phase};

/// The Anvyl system clock: 75 MHz.
pub const ANVYL_SYS_CLK: Frequency = Frequency::const_mhz(75);

/// Builds the complete Anvyl clocking plan from the 100 MHz oscillator.
///
/// Domains: sys 75 MHz, sdram_full 300 MHz, sdram_half 150 MHz at 270°,
/// sdram_half_b 150 MHz at 250° (the off-chip DDR copy), encoder 200/3 MHz,
/// and base50 50 MHz on its own DCM. The encoder and base50 resets are
/// driven from the sys reset line and therefore release only after sys.
pub fn anvyl_clocking() -> Result<SocClocking, PlanError> {
    let board = crg_board::anvyl();
    let encoder = Frequency::new(200_000_000, 3)?;
    let pll = StageRequest {
        name: "crg_pll".into(),
        kind: StageKind::Pll,
        lock_signal: "pll_lckd".into(),
        constraints: PlanConstraints::default(),
        taps: vec![
            TapRequest::new("sdram_full", Frequency::const_mhz(300)),
            TapRequest::new("encoder", encoder).with_reset_after("sys"),
            TapRequest::new("sdram_half", Frequency::const_mhz(150))
                .with_phase(Phase::from_tenths(2700)),
            TapRequest::new("sdram_half_b", Frequency::const_mhz(150))
                .with_phase(Phase::from_tenths(2500)),
            TapRequest::new("sys", ANVYL_SYS_CLK),
        ],
    };
    let dcm = StageRequest {
        name: "periph_dcm".into(),
        kind: StageKind::Dcm,
        lock_signal: "dcm_base50_locked".into(),
        constraints: PlanConstraints::default(),
        taps: vec![TapRequest::new("base50", Frequency::const_mhz(50)).with_reset_after("sys")],
    };
    assemble(&board, "clk100", &[pll, dcm], &ResetSequencer::new())
}

/// Builds the Waxwing clocking plan: one PLL, one system domain.
pub fn waxwing_clocking(sys_clk: Frequency) -> Result<SocClocking, PlanError> {
    let board = crg_board::waxwing();
    let pll = StageRequest {
        name: "pll".into(),
        kind: StageKind::Pll,
        lock_signal: "pll_lckd".into(),
        constraints: PlanConstraints::default(),
        taps: vec![TapRequest::new("sys", sys_clk)],
    };
    assemble(&board, "clk100", &[pll], &ResetSequencer::new())
}
