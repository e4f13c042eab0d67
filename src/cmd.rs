pub struct Cmd;
impl Cmd {
    // Mode setup
    pub const MODE_CONTROL: u8 = 0x00;
    pub const CHARACTER_PITCH: u8 = 0x01;
    pub const NUMBER_OF_CHARACTERS: u8 = 0x02;
    pub const TIME_DIVISION: u8 = 0x03;
    pub const DISPLAY_START_LOW: u8 = 0x08;
    pub const DISPLAY_START_HIGH: u8 = 0x09;

    // Display RAM access
    pub const CURSOR_ADDRESS_LOW: u8 = 0x0A;
    pub const CURSOR_ADDRESS_HIGH: u8 = 0x0B;
    pub const WRITE_DISPLAY_DATA: u8 = 0x0C;
    pub const READ_DISPLAY_DATA: u8 = 0x0D;
    pub const CLEAR_BIT: u8 = 0x0E;
    pub const SET_BIT: u8 = 0x0F;
}

/*
LC7981 instruction register (written with RS high):
0x00 - Mode Control
0x01 - Character Pitch
0x02 - Number of Characters (bytes per row - 1 in graphic mode)
0x03 - Time Division (display duty)
0x04 - Cursor Position (character mode only)
0x08 - Display Start Lower Address
0x09 - Display Start Upper Address
0x0A - Cursor Lower Address
0x0B - Cursor Upper Address
0x0C - Write Display Data
0x0D - Read Display Data
0x0E - Clear Bit
0x0F - Set Bit
*/
