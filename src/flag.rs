/// Flag values written after the LC7981 mode setup instructions.
///
/// The controller latches each value into the instruction register that was
/// selected right before it.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Mode Control (0x00) bits
    pub const MODE_GRAPHIC: u8 = 0x02;
    pub const MODE_MASTER: u8 = 0x10;
    pub const MODE_DISPLAY_ON: u8 = 0x20;

    // Display on, master, graphic mode, cursor off
    pub const MODE_DISPLAY_ON_MASTER_GRAPHIC: u8 =
        Self::MODE_DISPLAY_ON | Self::MODE_MASTER | Self::MODE_GRAPHIC;

    // Character Pitch (0x01): horizontal pitch 8 dots, so one byte maps to 8 pixels
    pub const CHARACTER_PITCH_8_DOTS: u8 = 0b0000_0111;

    // Busy flag, read back on DB7 with RS high
    pub const STATUS_BUSY_BIT: u8 = 0x80;

    // Byte patterns for whole-screen clears
    pub const FILL_WHITE: u8 = 0x00;
    pub const FILL_BLACK: u8 = 0xFF;
    pub const FILL_GRAY_EVEN: u8 = 0b1010_1010;
    pub const FILL_GRAY_ODD: u8 = 0b0101_0101;
}
