//! Board descriptor types: pin maps, electrical standards, reference clocks.
//!
//! A [`BoardDescriptor`] is an opaque, declarative description of a board's
//! I/O resources. The planning core reads only the reference-clock
//! frequencies; pin identities and electrical standards pass through to the
//! downstream synthesis tooling untouched.

use crg_common::Frequency;
use serde::{Deserialize, Serialize};

/// The electrical I/O standard of a pin or resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IoStandard {
    /// 3.3 V LVCMOS.
    Lvcmos33,
    /// 1.8 V SSTL class II (DDR2 single-ended signals).
    Sstl18II,
    /// 1.8 V differential SSTL class II (DDR2 clock/strobe pairs).
    DiffSstl18II,
}

/// One named signal within an I/O resource, with its package pins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsignal {
    /// Signal name within the resource (e.g. "tx", "dq").
    pub name: String,
    /// Package pin locations, one per bit.
    pub pins: Vec<String>,
    /// Electrical standard override; the resource default applies when absent.
    pub standard: Option<IoStandard>,
}

/// One I/O resource: a flat pin set or a group of subsignals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoResource {
    /// Resource name (e.g. "serial", "ddram", "user_btn").
    pub name: String,
    /// Resource index, distinguishing multiple instances of one name.
    pub index: u32,
    /// Package pins for flat resources; empty when subsignals are used.
    pub pins: Vec<String>,
    /// Grouped subsignals; empty for flat resources.
    pub subsignals: Vec<Subsignal>,
    /// Default electrical standard for every pin of the resource.
    pub standard: IoStandard,
    /// Extra constraints passed through verbatim (e.g. "PULLUP").
    pub misc: Vec<String>,
}

/// A reference-clock input: a board oscillator wired to a package pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefClockInput {
    /// Clock name (e.g. "clk100").
    pub name: String,
    /// Package pin location.
    pub pin: String,
    /// Electrical standard of the clock pin.
    pub standard: IoStandard,
    /// The oscillator's exact nominal frequency.
    pub frequency: Frequency,
}

/// A board's declarative pin map and reference clocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDescriptor {
    /// Board name (e.g. "anvyl").
    pub name: String,
    /// The board's reference-clock inputs.
    pub reference_clocks: Vec<RefClockInput>,
    /// All other I/O resources.
    pub ios: Vec<IoResource>,
}

impl BoardDescriptor {
    /// Returns the named reference clock, if the board provides it.
    pub fn reference_clock(&self, name: &str) -> Option<&RefClockInput> {
        self.reference_clocks.iter().find(|c| c.name == name)
    }

    /// Returns the I/O resource with the given name and index, if present.
    pub fn io(&self, name: &str, index: u32) -> Option<&IoResource> {
        self.ios
            .iter()
            .find(|r| r.name == name && r.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> BoardDescriptor {
        BoardDescriptor {
            name: "test_board".into(),
            reference_clocks: vec![RefClockInput {
                name: "clk100".into(),
                pin: "D11".into(),
                standard: IoStandard::Lvcmos33,
                frequency: Frequency::from_mhz(100).unwrap(),
            }],
            ios: vec![IoResource {
                name: "user_btn".into(),
                index: 1,
                pins: vec!["D5".into()],
                subsignals: vec![],
                standard: IoStandard::Lvcmos33,
                misc: vec!["PULLUP".into()],
            }],
        }
    }

    #[test]
    fn reference_clock_lookup() {
        let board = descriptor();
        let clk = board.reference_clock("clk100").unwrap();
        assert_eq!(clk.pin, "D11");
        assert_eq!(clk.frequency, Frequency::from_mhz(100).unwrap());
        assert!(board.reference_clock("clk50").is_none());
    }

    #[test]
    fn io_lookup_by_name_and_index() {
        let board = descriptor();
        assert!(board.io("user_btn", 1).is_some());
        assert!(board.io("user_btn", 0).is_none());
        assert!(board.io("serial", 0).is_none());
    }

    #[test]
    fn descriptor_serde_roundtrip() {
        let board = descriptor();
        let json = serde_json::to_string(&board).unwrap();
        let restored: BoardDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(board, restored);
    }
}
