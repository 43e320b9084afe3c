//! Controller report frame and symbolic input actions.
//!
//! A [`Report`] captures the instantaneous state of every virtual input on
//! the emulated pad. The wire layout is fixed by the host: a 16-bit button
//! mask, an 8-direction-plus-center hat nibble, four stick axis bytes, and a
//! vendor byte that stays zero. [`Action`] names one symbolic input; applying
//! it to a report writes exactly one field group.

pub mod buttons {
    //! Button bit positions within the 16-bit report mask.

    pub const Y: u16 = 0x0001;
    pub const B: u16 = 0x0002;
    pub const A: u16 = 0x0004;
    pub const X: u16 = 0x0008;
    pub const L: u16 = 0x0010;
    pub const R: u16 = 0x0020;
    pub const ZL: u16 = 0x0040;
    pub const ZR: u16 = 0x0080;
    pub const MINUS: u16 = 0x0100;
    pub const PLUS: u16 = 0x0200;
    pub const L_CLICK: u16 = 0x0400;
    pub const R_CLICK: u16 = 0x0800;
    pub const HOME: u16 = 0x1000;
    pub const CAPTURE: u16 = 0x2000;
}

/// Stick axis extreme, 0 = full deflection towards the axis minimum.
pub const STICK_MIN: u8 = 0x00;
/// Stick axis rest position.
pub const STICK_CENTER: u8 = 0x80;
/// Stick axis extreme, 255 = full deflection towards the axis maximum.
pub const STICK_MAX: u8 = 0xFF;

/// Hat (d-pad) encoding: compass directions clockwise from up, plus center.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum HatDirection {
    Up = 0,
    UpRight = 1,
    Right = 2,
    DownRight = 3,
    Down = 4,
    DownLeft = 5,
    Left = 6,
    UpLeft = 7,
    Center = 8,
}

impl HatDirection {
    /// Raw nibble transmitted in byte 2 of the report.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Symbolic input understood by the action encoder.
///
/// The enumeration is closed: discrete buttons OR a bit into the mask so
/// presses compose within one tick, while hat and stick directions assign
/// their field outright since only one direction is representable at a time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    /// Returns every field to its neutral value.
    Reset,
    PadUp,
    PadUpLeft,
    PadUpRight,
    PadDown,
    PadDownLeft,
    PadDownRight,
    PadLeft,
    PadRight,
    A,
    B,
    X,
    Y,
    L,
    R,
    Zl,
    Zr,
    Plus,
    Minus,
    Home,
    Capture,
    LStickClick,
    RStickClick,
    LStickUp,
    LStickUpLeft,
    LStickUpRight,
    LStickDown,
    LStickDownLeft,
    LStickDownRight,
    LStickLeft,
    LStickRight,
    RStickUp,
    RStickUpLeft,
    RStickUpRight,
    RStickDown,
    RStickDownLeft,
    RStickDownRight,
    RStickLeft,
    RStickRight,
}

/// Instantaneous state of every input on the emulated pad.
///
/// Constructed fresh (or reset to neutral) once per polling tick, then
/// serialized with [`Report::as_bytes`] and handed to the transport.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Report {
    pub buttons: u16,
    pub hat: HatDirection,
    pub left_x: u8,
    pub left_y: u8,
    pub right_x: u8,
    pub right_y: u8,
    pub vendor: u8,
}

impl Report {
    /// Size of the serialized report in bytes.
    pub const LEN: usize = 8;

    /// Report with no buttons held, both sticks and the hat centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: 0,
            hat: HatDirection::Center,
            left_x: STICK_CENTER,
            left_y: STICK_CENTER,
            right_x: STICK_CENTER,
            right_y: STICK_CENTER,
            vendor: 0,
        }
    }

    /// Returns `true` when every field sits at its neutral value.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Applies one symbolic action to this report.
    ///
    /// Buttons OR into the mask; hat and stick directions overwrite their
    /// field group; [`Action::Reset`] restores the neutral baseline.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Reset => *self = Self::neutral(),
            Action::PadUp => self.hat = HatDirection::Up,
            Action::PadUpLeft => self.hat = HatDirection::UpLeft,
            Action::PadUpRight => self.hat = HatDirection::UpRight,
            Action::PadDown => self.hat = HatDirection::Down,
            Action::PadDownLeft => self.hat = HatDirection::DownLeft,
            Action::PadDownRight => self.hat = HatDirection::DownRight,
            Action::PadLeft => self.hat = HatDirection::Left,
            Action::PadRight => self.hat = HatDirection::Right,
            Action::A => self.buttons |= buttons::A,
            Action::B => self.buttons |= buttons::B,
            Action::X => self.buttons |= buttons::X,
            Action::Y => self.buttons |= buttons::Y,
            Action::L => self.buttons |= buttons::L,
            Action::R => self.buttons |= buttons::R,
            Action::Zl => self.buttons |= buttons::ZL,
            Action::Zr => self.buttons |= buttons::ZR,
            Action::Plus => self.buttons |= buttons::PLUS,
            Action::Minus => self.buttons |= buttons::MINUS,
            Action::Home => self.buttons |= buttons::HOME,
            Action::Capture => self.buttons |= buttons::CAPTURE,
            Action::LStickClick => self.buttons |= buttons::L_CLICK,
            Action::RStickClick => self.buttons |= buttons::R_CLICK,
            Action::LStickUp => self.set_left(STICK_CENTER, STICK_MIN),
            Action::LStickUpLeft => self.set_left(STICK_MIN, STICK_MIN),
            Action::LStickUpRight => self.set_left(STICK_MAX, STICK_MIN),
            Action::LStickDown => self.set_left(STICK_CENTER, STICK_MAX),
            Action::LStickDownLeft => self.set_left(STICK_MIN, STICK_MAX),
            Action::LStickDownRight => self.set_left(STICK_MAX, STICK_MAX),
            Action::LStickLeft => self.set_left(STICK_MIN, STICK_CENTER),
            Action::LStickRight => self.set_left(STICK_MAX, STICK_CENTER),
            Action::RStickUp => self.set_right(STICK_CENTER, STICK_MIN),
            Action::RStickUpLeft => self.set_right(STICK_MIN, STICK_MIN),
            Action::RStickUpRight => self.set_right(STICK_MAX, STICK_MIN),
            Action::RStickDown => self.set_right(STICK_CENTER, STICK_MAX),
            Action::RStickDownLeft => self.set_right(STICK_MIN, STICK_MAX),
            Action::RStickDownRight => self.set_right(STICK_MAX, STICK_MAX),
            Action::RStickLeft => self.set_right(STICK_MIN, STICK_CENTER),
            Action::RStickRight => self.set_right(STICK_MAX, STICK_CENTER),
        }
    }

    /// Convenience constructor: the neutral report with one action applied.
    #[must_use]
    pub fn from_action(action: Action) -> Self {
        let mut report = Self::neutral();
        report.apply(action);
        report
    }

    /// Serializes the report into its host wire layout.
    ///
    /// Byte 0/1 carry the button mask little-endian, byte 2 the hat nibble,
    /// bytes 3-6 the stick axes (LX, LY, RX, RY), byte 7 the vendor byte.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::LEN] {
        let [buttons_lo, buttons_hi] = self.buttons.to_le_bytes();
        [
            buttons_lo,
            buttons_hi,
            self.hat.as_u8(),
            self.left_x,
            self.left_y,
            self.right_x,
            self.right_y,
            self.vendor,
        ]
    }

    fn set_left(&mut self, x: u8, y: u8) {
        self.left_x = x;
        self.left_y = y;
    }

    fn set_right(&mut self, x: u8, y: u8) {
        self.right_x = x;
        self.right_y = y;
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 39] = [
        Action::Reset,
        Action::PadUp,
        Action::PadUpLeft,
        Action::PadUpRight,
        Action::PadDown,
        Action::PadDownLeft,
        Action::PadDownRight,
        Action::PadLeft,
        Action::PadRight,
        Action::A,
        Action::B,
        Action::X,
        Action::Y,
        Action::L,
        Action::R,
        Action::Zl,
        Action::Zr,
        Action::Plus,
        Action::Minus,
        Action::Home,
        Action::Capture,
        Action::LStickClick,
        Action::RStickClick,
        Action::LStickUp,
        Action::LStickUpLeft,
        Action::LStickUpRight,
        Action::LStickDown,
        Action::LStickDownLeft,
        Action::LStickDownRight,
        Action::LStickLeft,
        Action::LStickRight,
        Action::RStickUp,
        Action::RStickUpLeft,
        Action::RStickUpRight,
        Action::RStickDown,
        Action::RStickDownLeft,
        Action::RStickDownRight,
        Action::RStickLeft,
        Action::RStickRight,
    ];

    fn changed_groups(report: &Report) -> usize {
        let neutral = Report::neutral();
        let mut groups = 0;
        if report.buttons != neutral.buttons {
            groups += 1;
        }
        if report.hat != neutral.hat {
            groups += 1;
        }
        let left_moved = report.left_x != neutral.left_x || report.left_y != neutral.left_y;
        let right_moved = report.right_x != neutral.right_x || report.right_y != neutral.right_y;
        if left_moved || right_moved {
            groups += 1;
        }
        groups
    }

    #[test]
    fn every_action_touches_at_most_one_field_group() {
        for action in ALL_ACTIONS {
            let report = Report::from_action(action);
            assert!(
                changed_groups(&report) <= 1,
                "{action:?} changed more than one field group"
            );
            assert_eq!(report.vendor, 0);
        }
    }

    #[test]
    fn buttons_compose_while_directions_overwrite() {
        let mut report = Report::neutral();
        report.apply(Action::L);
        report.apply(Action::R);
        assert_eq!(report.buttons, buttons::L | buttons::R);

        report.apply(Action::PadLeft);
        report.apply(Action::PadRight);
        assert_eq!(report.hat, HatDirection::Right);

        report.apply(Action::LStickUp);
        report.apply(Action::LStickDownLeft);
        assert_eq!((report.left_x, report.left_y), (STICK_MIN, STICK_MAX));
    }

    #[test]
    fn reset_restores_the_neutral_baseline() {
        let mut report = Report::neutral();
        report.apply(Action::Zr);
        report.apply(Action::PadDown);
        report.apply(Action::RStickUpRight);
        report.apply(Action::Reset);
        assert!(report.is_neutral());
    }

    #[test]
    fn wire_layout_matches_host_expectations() {
        let mut report = Report::neutral();
        report.apply(Action::Plus);
        report.apply(Action::Home);
        report.apply(Action::PadDownLeft);
        report.apply(Action::LStickRight);

        let bytes = report.as_bytes();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 0x12); // Plus | Home high byte
        assert_eq!(bytes[2], HatDirection::DownLeft.as_u8());
        assert_eq!(bytes[3], STICK_MAX);
        assert_eq!(bytes[4], STICK_CENTER);
        assert_eq!(bytes[5], STICK_CENTER);
        assert_eq!(bytes[6], STICK_CENTER);
        assert_eq!(bytes[7], 0x00);
    }

    #[test]
    fn neutral_report_serializes_to_centered_frame() {
        assert_eq!(
            Report::neutral().as_bytes(),
            [0x00, 0x00, 0x08, 0x80, 0x80, 0x80, 0x80, 0x00]
        );
    }
}
