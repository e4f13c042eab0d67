#![cfg(feature = "std")]

use lc7981::pattern::presets;
use lc7981::sim::{Op, Simulator};
use lc7981::{Builder, Color, Error, Lc7981, Pattern, Register};

fn panel() -> Lc7981<Simulator> {
    let config = Builder::new().dimensions(240, 128).build().unwrap();
    let mut display = Lc7981::new(Simulator::new(240, 128), config);
    display.init().unwrap();
    display
}

#[test]
fn init_programs_a_240_wide_panel() {
    let display = panel();
    let sim = display.interface();
    assert_eq!(sim.instruction(0x02), 29);
    assert_eq!(sim.instruction(0x03), 127);
    assert_eq!(display.width(), 240);
    assert_eq!(display.config().buffer_size(), 3840);
}

#[test]
fn unaligned_line_leaves_neighbours_alone() {
    let mut display = panel();
    display.interface_mut().fill(0b0000_0101);
    display.draw_horizontal_line(3, 0, 10, 0xFF).unwrap();

    let sim = display.interface();
    assert_eq!(sim.byte(0), 0b1111_1101);
    assert_eq!(sim.byte(1), 0b0001_1111);
    assert_eq!(sim.byte(2), 0b0000_0101);
    assert_eq!(sim.byte(30), 0b0000_0101);
}

#[test]
fn reads_after_cursor_move_skip_the_latch() {
    let mut display = panel();
    display.interface_mut().poke(500, 0xC3);
    display.interface_mut().poke(501, 0x3C);

    display.set_cursor_address(500).unwrap();
    display.interface_mut().clear_log();
    assert_eq!(display.read_single_byte().unwrap(), 0xC3);
    let reads: Vec<_> = display
        .interface()
        .log()
        .iter()
        .filter(|op| matches!(op, Op::Read(Register::Data, _)))
        .copied()
        .collect();
    assert_eq!(reads, [Op::Read(Register::Data, 0), Op::Read(Register::Data, 0xC3)]);

    display.interface_mut().clear_log();
    assert_eq!(display.read_single_byte().unwrap(), 0x3C);
    assert_eq!(display.interface().data_reads(), 1);
}

#[test]
fn every_stock_pattern_tiles_vertically() {
    for (name, pattern) in presets::ALL {
        let mut display = panel();
        display.fill_pattern(0, 0, 240, 128, pattern).unwrap();
        let sim = display.interface();
        let period = pattern.row_count() as u16;
        for y in 0..128 - period {
            assert_eq!(sim.row(y), sim.row(y + period), "{} row {}", name, y);
        }
        for y in 0..128 {
            assert!(
                sim.row(y).iter().all(|&b| b == pattern.row(y)),
                "{} row {}",
                name,
                y
            );
        }
    }
}

#[test]
fn pattern_blob_fills_a_window() {
    let blob = [1, 0b0000_1111, 0b1111_0000];
    let pattern = Pattern::from_blob(&blob).unwrap();
    let mut display = panel();
    display.fill_pattern(4, 10, 8, 3, &pattern).unwrap();

    let sim = display.interface();
    // Row 10 is even: low nibble pattern, pixels 4..8 of byte 0 and 0..4 of byte 1
    assert_eq!(sim.row(10)[..2], [0b0000_0000, 0b0000_1111]);
    assert_eq!(sim.row(11)[..2], [0b1111_0000, 0b0000_0000]);
    assert_eq!(sim.row(12), sim.row(10));
    assert!(sim.row(13).iter().all(|&b| b == 0));
}

#[test]
fn shapes_compose() {
    let mut display = panel();
    display.clear_white().unwrap();
    display.fill_gray(0, 0, 240, 128).unwrap();
    display.fill_rectangle(20, 20, 100, 50, Color::White).unwrap();
    display.draw_rectangle(20, 20, 100, 50, Color::Black).unwrap();
    display.draw_line(20, 20, 119, 69, Color::Black).unwrap();

    let sim = display.interface();
    assert!(sim.pixel(20, 20));
    assert!(sim.pixel(119, 69));
    assert!(sim.pixel(119, 20));
    assert!(!sim.pixel(60, 22));
    assert!(sim.pixel(0, 0));
    assert!(!sim.pixel(1, 0));
    assert_eq!(display.get_pixel(119, 45).unwrap(), Color::Black);
}

#[test]
fn rejected_calls_send_nothing() {
    let mut display = panel();
    display.interface_mut().clear_log();

    assert_eq!(
        display.draw_line(0, 0, 240, 5, Color::Black),
        Err(Error::OutOfBounds)
    );
    assert_eq!(
        display.draw_rectangle(200, 100, 41, 10, Color::Black),
        Err(Error::OutOfBounds)
    );
    assert_eq!(
        display.fill_gray(0, 120, 10, 9),
        Err(Error::OutOfBounds)
    );
    assert_eq!(
        display.draw_vertical_line(5, 0, 129, Color::Black),
        Err(Error::OutOfBounds)
    );
    assert!(display.interface().log().is_empty());
}

#[test]
fn scrolling_by_rows() {
    let mut display = panel();
    display.set_display_start(30 * 4).unwrap();
    assert_eq!(display.interface().display_start(), 120);
    assert_eq!(
        display.interface().log().last(),
        Some(&Op::Write(Register::Data, 0))
    );
}
