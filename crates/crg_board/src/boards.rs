//! Built-in board pin tables.
//!
//! Declarative descriptors for the supported development boards. The Anvyl
//! and Waxwing boards share the Numato Spartan-6 baseboard pinout, so both
//! tables are built from the same pin data.

use crate::descriptor::{BoardDescriptor, IoResource, IoStandard, RefClockInput, Subsignal};
use crg_common::Frequency;

fn pins(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

fn subsignal(name: &str, pin_list: &str) -> Subsignal {
    Subsignal {
        name: name.into(),
        pins: pins(pin_list),
        standard: None,
    }
}

fn subsignal_std(name: &str, pin_list: &str, standard: IoStandard) -> Subsignal {
    Subsignal {
        name: name.into(),
        pins: pins(pin_list),
        standard: Some(standard),
    }
}

fn flat(name: &str, index: u32, pin_list: &str, standard: IoStandard, misc: &[&str]) -> IoResource {
    IoResource {
        name: name.into(),
        index,
        pins: pins(pin_list),
        subsignals: vec![],
        standard,
        misc: misc.iter().map(|m| m.to_string()).collect(),
    }
}

fn grouped(name: &str, index: u32, subsignals: Vec<Subsignal>, standard: IoStandard, misc: &[&str]) -> IoResource {
    IoResource {
        name: name.into(),
        index,
        pins: vec![],
        subsignals,
        standard,
        misc: misc.iter().map(|m| m.to_string()).collect(),
    }
}

fn clk100() -> RefClockInput {
    RefClockInput {
        name: "clk100".into(),
        pin: "D11".into(),
        standard: IoStandard::Lvcmos33,
        frequency: Frequency::const_mhz(100),
    }
}

fn serial() -> IoResource {
    grouped(
        "serial",
        0,
        vec![subsignal("tx", "T20"), subsignal("rx", "T19")],
        IoStandard::Lvcmos33,
        &[],
    )
}

fn user_btns() -> Vec<IoResource> {
    ["E6", "D5", "A3", "AB9"]
        .into_iter()
        .enumerate()
        .map(|(i, pin)| flat("user_btn", i as u32, pin, IoStandard::Lvcmos33, &["PULLUP"]))
        .collect()
}

/// The Digilent Anvyl Spartan-6 development board.
pub fn anvyl() -> BoardDescriptor {
    let mut ios = vec![
        serial(),
        grouped(
            "ddram_clock",
            0,
            vec![subsignal("p", "F2"), subsignal("n", "F1")],
            IoStandard::DiffSstl18II,
            &["IN_TERM=NONE"],
        ),
        grouped(
            "ddram",
            0,
            vec![
                subsignal("a", "M5 L4 K3 M4 K5 G3 G1 K4 C3 C1 K6 B1 J4"),
                subsignal("ba", "E3 E1 D1"),
                subsignal("ras_n", "N4"),
                subsignal("cas_n", "P3"),
                subsignal("we_n", "D2"),
                subsignal("dm", "H2 H1"),
                subsignal("dq", "N3 N1 M2 M1 J3 J1 K2 K1 P2 P1 R3 R1 U3 U1 V2 V1"),
                subsignal_std("dqs", "T2 L3", IoStandard::DiffSstl18II),
                subsignal_std("dqs_n", "T1 L1", IoStandard::DiffSstl18II),
                subsignal("cke", "J6"),
                subsignal("odt", "M3"),
            ],
            IoStandard::Sstl18II,
            &[],
        ),
        grouped(
            "eth_clocks",
            0,
            vec![subsignal("ref_clk", "C12")],
            IoStandard::Lvcmos33,
            &[],
        ),
        grouped(
            "eth",
            0,
            vec![
                subsignal("rx_data", "C13 C14"),
                subsignal("crs_dv", "B14"),
                subsignal("tx_en", "D15"),
                subsignal("tx_data", "E10 F10"),
                subsignal("mdc", "C15"),
                subsignal("mdio", "A14"),
                subsignal("rx_er", "A13"),
            ],
            IoStandard::Lvcmos33,
            &[],
        ),
    ];
    ios.extend(user_btns());
    BoardDescriptor {
        name: "anvyl".into(),
        reference_clocks: vec![clk100()],
        ios,
    }
}

/// The Numato Waxwing Spartan-6 development module.
pub fn waxwing() -> BoardDescriptor {
    let mut ios = vec![serial()];
    ios.extend(user_btns());
    BoardDescriptor {
        name: "waxwing".into(),
        reference_clocks: vec![clk100()],
        ios,
    }
}
