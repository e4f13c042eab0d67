#![cfg(feature = "std")]

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;

use lc7981::sim::Simulator;
use lc7981::{Builder, Error, Font, Lc7981};

/// 3x5 digits '0'..'2' behind empty glyphs for ' '..'/'
fn digits_3x5() -> Vec<u8> {
    let mut blob = vec![3, 5];
    blob.extend(std::iter::repeat(0).take(16 * 5));
    blob.extend([0b111, 0b101, 0b101, 0b101, 0b111]);
    blob.extend([0b010, 0b011, 0b010, 0b010, 0b111]);
    blob.extend([0b111, 0b100, 0b111, 0b001, 0b111]);
    blob
}

fn panel() -> Lc7981<Simulator> {
    let config = Builder::new().dimensions(240, 128).build().unwrap();
    let mut display = Lc7981::new(Simulator::new(240, 128), config);
    display.init().unwrap();
    display
}

fn ascii_row(sim: &Simulator, x: u16, y: u16, width: u16) -> String {
    (x..x + width)
        .map(|px| if sim.pixel(px, y) { '#' } else { '.' })
        .collect()
}

#[test]
fn digits_render_opaque_over_black() {
    let blob = digits_3x5();
    let font = Font::from_blob(&blob).unwrap();
    for x in 0..8 {
        let mut display = panel();
        display.clear_black().unwrap();
        display.draw_text(x + 1, 2, "012", &font).unwrap();

        let sim = display.interface();
        assert_eq!(ascii_row(sim, x, 1, 11), "###########");
        assert_eq!(ascii_row(sim, x, 2, 11), "####.#.####");
        assert_eq!(ascii_row(sim, x, 3, 11), "##.###...##");
        assert_eq!(ascii_row(sim, x, 4, 11), "##.#.#.####");
        assert_eq!(ascii_row(sim, x, 5, 11), "##.#.#.#..#");
        assert_eq!(ascii_row(sim, x, 6, 11), "###########");
        assert_eq!(ascii_row(sim, x, 7, 11), "###########");
    }
}

#[test]
fn missing_glyph_draws_nothing() {
    let blob = digits_3x5();
    let font = Font::from_blob(&blob).unwrap();
    let mut display = panel();
    display.interface_mut().clear_log();
    assert_eq!(
        display.draw_text(0, 0, "013", &font),
        Err(Error::MissingGlyph('3'))
    );
    assert!(display.interface().log().is_empty());
    assert_eq!(font.text_width("0123"), 12);
}

#[test]
fn mono_fonts_draw_through_embedded_graphics() {
    let mut display = panel();
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::new("Hello", Point::new(4, 20), style)
        .draw(&mut display)
        .unwrap();

    let sim = display.interface();
    let black: u32 = sim.memory().iter().map(|b| b.count_ones()).sum();
    assert!(black > 0);
    // Baseline sits at y = 20, nothing drawn below the descender area
    for y in 24..128 {
        assert!(sim.row(y).iter().all(|&b| b == 0), "row {}", y);
    }
}
