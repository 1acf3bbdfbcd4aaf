//! Compound input operations on top of an [`InputBackend`].
//!
//! Every operation validates its arguments before any OS call and propagates
//! typed errors; a press-and-release is two separate submissions in strict
//! down-then-up order so listeners observe both edges, same as a physical
//! keystroke.

use std::str::FromStr;

use crate::error::InputError;
use crate::keys::{self, KeyRef};
use crate::oskbd::{Btn, InputBackend, InputRecord, KeyValue, WheelAxis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for ScrollDirection {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            "left" => Ok(ScrollDirection::Left),
            "right" => Ok(ScrollDirection::Right),
            other => Err(InputError::validation(format!(
                "unknown scroll direction: {other}"
            ))),
        }
    }
}

/// Handle for writing keys, buttons and wheel events to the OS.
pub struct KbdOut<B> {
    backend: B,
}

impl<B: InputBackend> KbdOut<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn press_key<'a>(&mut self, key: impl Into<KeyRef<'a>>) -> Result<(), InputError> {
        let entry = keys::resolve(key)?;
        let rec = InputRecord::key(entry.vk, KeyValue::Press)?;
        self.backend.submit(&[rec])
    }

    pub fn release_key<'a>(&mut self, key: impl Into<KeyRef<'a>>) -> Result<(), InputError> {
        let entry = keys::resolve(key)?;
        let rec = InputRecord::key(entry.vk, KeyValue::Release)?;
        self.backend.submit(&[rec])
    }

    /// Key-down then key-up as two separate OS calls, never one batch.
    pub fn press_release_key<'a>(&mut self, key: impl Into<KeyRef<'a>>) -> Result<(), InputError> {
        let entry = keys::resolve(key)?;
        let down = InputRecord::key(entry.vk, KeyValue::Press)?;
        let up = InputRecord::key(entry.vk, KeyValue::Release)?;
        self.backend.submit(&[down])?;
        self.backend.submit(&[up])
    }

    pub fn press_btn<'a>(&mut self, button: impl Into<KeyRef<'a>>) -> Result<(), InputError> {
        let btn = self.resolve_btn(button.into())?;
        self.backend.submit(&[InputRecord::button(btn, KeyValue::Press)])
    }

    pub fn release_btn<'a>(&mut self, button: impl Into<KeyRef<'a>>) -> Result<(), InputError> {
        let btn = self.resolve_btn(button.into())?;
        self.backend.submit(&[InputRecord::button(btn, KeyValue::Release)])
    }

    pub fn press_release_btn<'a>(
        &mut self,
        button: impl Into<KeyRef<'a>>,
    ) -> Result<(), InputError> {
        let btn = self.resolve_btn(button.into())?;
        self.backend.submit(&[InputRecord::button(btn, KeyValue::Press)])?;
        self.backend.submit(&[InputRecord::button(btn, KeyValue::Release)])
    }

    fn resolve_btn(&self, key: KeyRef) -> Result<Btn, InputError> {
        let entry = keys::resolve(key)?;
        Btn::from_vk(entry.vk)
            .ok_or_else(|| InputError::lookup(format!("{key:?} is not a mouse button")))
    }

    /// Scroll the wheel. Up/down use the vertical axis with positive/negative
    /// deltas, right/left the horizontal axis with positive/negative deltas.
    pub fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), InputError> {
        self.scroll_at(direction, amount, 0, 0)
    }

    pub fn scroll_at(
        &mut self,
        direction: ScrollDirection,
        amount: i32,
        x: i32,
        y: i32,
    ) -> Result<(), InputError> {
        if amount < 1 {
            return Err(InputError::validation(format!(
                "scroll amount must be at least 1, got {amount}"
            )));
        }
        let (axis, delta) = match direction {
            ScrollDirection::Up => (WheelAxis::Vertical, amount),
            ScrollDirection::Down => (WheelAxis::Vertical, -amount),
            ScrollDirection::Right => (WheelAxis::Horizontal, amount),
            ScrollDirection::Left => (WheelAxis::Horizontal, -amount),
        };
        self.backend.submit(&[InputRecord::wheel(axis, delta, x, y)])
    }

    /// Type a string as key-down/key-up pairs, holding Shift across runs of
    /// characters that need it.
    ///
    /// An unresolvable character aborts the whole operation. Shift is
    /// released on exit no matter how the sequence ended, so a failure can
    /// never leave a stuck modifier behind.
    pub fn type_string(&mut self, s: &str) -> Result<(), InputError> {
        let result = self.type_chars(s);
        let release = self.release_key(keys::VK_SHIFT);
        result.and(release)
    }

    fn type_chars(&mut self, s: &str) -> Result<(), InputError> {
        let mut shift_down = false;
        for c in s.chars() {
            let entry = keys::resolve_char(c)?;
            if entry.shift && !shift_down {
                self.press_key(keys::VK_SHIFT)?;
                shift_down = true;
            } else if !entry.shift && shift_down {
                self.release_key(keys::VK_SHIFT)?;
                shift_down = false;
            }
            self.backend
                .submit(&[InputRecord::key(entry.vk, KeyValue::Press)?])?;
            self.backend
                .submit(&[InputRecord::key(entry.vk, KeyValue::Release)?])?;
        }
        Ok(())
    }

    /// True only for the OS "currently down" sentinel. Any value other than
    /// the two known sentinels is a state error, never a silent false.
    pub fn key_state<'a>(&mut self, key: impl Into<KeyRef<'a>>) -> Result<bool, InputError> {
        let entry = keys::resolve(key)?;
        match self.backend.key_state(entry.vk)? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(InputError::State {
                vk: entry.vk,
                value: v,
            }),
        }
    }

    pub fn cursor_position(&mut self) -> Result<(i32, i32), InputError> {
        self.backend.cursor_position()
    }

    pub fn set_cursor_position(&mut self, x: i32, y: i32) -> Result<(), InputError> {
        self.backend.set_cursor_position(x, y)
    }

    /// Unicode down+up pair for a character outside the key table.
    pub fn send_unicode(&mut self, c: char) -> Result<(), InputError> {
        self.backend.send_unicode(c, false)?;
        self.backend.send_unicode(c, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{VK_F15, VK_RETURN, VK_SHIFT};
    use crate::oskbd::SimInput;

    fn kbd() -> (KbdOut<SimInput>, SimInput) {
        let sim = SimInput::new();
        (KbdOut::new(sim.clone()), sim)
    }

    fn vk_of(rec: &InputRecord) -> u16 {
        match *rec {
            InputRecord::KeyDown { vk, .. } | InputRecord::KeyUp { vk, .. } => vk,
            ref other => panic!("expected keyboard record, got {other:?}"),
        }
    }

    #[test]
    fn press_release_emits_down_then_up_with_same_scan() {
        let (mut kbd, sim) = kbd();
        kbd.press_release_key("f15").unwrap();
        let recs = sim.snapshot();
        assert_eq!(recs.len(), 2);
        let (InputRecord::KeyDown { vk: v1, scan: s1, .. }, InputRecord::KeyUp { vk: v2, scan: s2, .. }) =
            (recs[0], recs[1])
        else {
            panic!("expected KeyDown then KeyUp, got {recs:?}");
        };
        assert_eq!(v1, VK_F15);
        assert_eq!(v2, VK_F15);
        assert_eq!(s1, s2);
    }

    #[test]
    fn press_by_name_and_code_are_identical() {
        let (mut kbd, sim) = kbd();
        kbd.press_key("enter").unwrap();
        kbd.press_key(VK_RETURN).unwrap();
        let recs = sim.snapshot();
        assert_eq!(recs[0], recs[1]);
    }

    #[test]
    fn type_string_shift_framing() {
        let (mut kbd, sim) = kbd();
        kbd.type_string("Hello").unwrap();
        let vks: Vec<u16> = sim.snapshot().iter().map(vk_of).collect();
        let h = 0x48;
        let e = 0x45;
        let l = 0x4C;
        let o = 0x4F;
        assert_eq!(
            vks,
            vec![
                VK_SHIFT, // down for 'H'
                h, h,
                VK_SHIFT, // released before 'e'
                e, e, l, l, l, l, o, o,
                VK_SHIFT, // unconditional release at the end
            ]
        );
        // first shift record is a press, the following two are releases
        assert!(matches!(sim.snapshot()[0], InputRecord::KeyDown { .. }));
        assert!(matches!(sim.snapshot()[3], InputRecord::KeyUp { .. }));
        assert!(matches!(sim.snapshot()[12], InputRecord::KeyUp { .. }));
    }

    #[test]
    fn type_string_shifted_punctuation() {
        let (mut kbd, sim) = kbd();
        kbd.type_string("a?").unwrap();
        let recs = sim.snapshot();
        // a down/up, shift down, ? down/up, final shift up
        assert_eq!(recs.len(), 6);
        assert_eq!(vk_of(&recs[2]), VK_SHIFT);
        assert!(matches!(recs[2], InputRecord::KeyDown { .. }));
        assert_eq!(vk_of(&recs[5]), VK_SHIFT);
        assert!(matches!(recs[5], InputRecord::KeyUp { .. }));
    }

    #[test]
    fn type_string_unknown_char_aborts_and_releases_shift() {
        let (mut kbd, sim) = kbd();
        let err = kbd.type_string("Aé").unwrap_err();
        assert!(matches!(err, InputError::Lookup(_)));
        let recs = sim.snapshot();
        // Shift down, A down/up, then the abort; the trailing record must be
        // the unconditional shift release.
        let last = recs.last().unwrap();
        assert_eq!(vk_of(last), VK_SHIFT);
        assert!(matches!(last, InputRecord::KeyUp { .. }));
    }

    #[test]
    fn scroll_up_down_are_opposite_on_same_axis() {
        let (mut kbd, sim) = kbd();
        kbd.scroll(ScrollDirection::Up, 5).unwrap();
        kbd.scroll(ScrollDirection::Down, 5).unwrap();
        let recs = sim.snapshot();
        let (InputRecord::Wheel { axis: a1, delta: d1, .. }, InputRecord::Wheel { axis: a2, delta: d2, .. }) =
            (recs[0], recs[1])
        else {
            panic!("expected wheel records");
        };
        assert_eq!(a1, WheelAxis::Vertical);
        assert_eq!(a1, a2);
        assert_eq!(d1, 5);
        assert_eq!(d2, -5);
    }

    #[test]
    fn scroll_left_right_are_opposite_on_horizontal_axis() {
        let (mut kbd, sim) = kbd();
        kbd.scroll(ScrollDirection::Left, 3).unwrap();
        kbd.scroll(ScrollDirection::Right, 3).unwrap();
        let recs = sim.snapshot();
        let (InputRecord::Wheel { axis: a1, delta: d1, .. }, InputRecord::Wheel { axis: a2, delta: d2, .. }) =
            (recs[0], recs[1])
        else {
            panic!("expected wheel records");
        };
        assert_eq!(a1, WheelAxis::Horizontal);
        assert_eq!(a1, a2);
        assert_eq!(d1, -3);
        assert_eq!(d2, 3);
    }

    #[test]
    fn scroll_at_carries_the_passed_coordinates() {
        let (mut kbd, sim) = kbd();
        kbd.scroll_at(ScrollDirection::Up, 2, 640, 480).unwrap();
        kbd.scroll(ScrollDirection::Up, 2).unwrap();
        let recs = sim.snapshot();
        assert_eq!(
            recs[0],
            InputRecord::Wheel {
                axis: WheelAxis::Vertical,
                delta: 2,
                x: 640,
                y: 480,
            }
        );
        // The plain form is the same event at the origin.
        assert_eq!(
            recs[1],
            InputRecord::Wheel {
                axis: WheelAxis::Vertical,
                delta: 2,
                x: 0,
                y: 0,
            }
        );
    }

    #[test]
    fn scroll_rejects_zero_and_negative_amounts() {
        let (mut kbd, sim) = kbd();
        assert!(matches!(
            kbd.scroll(ScrollDirection::Up, 0),
            Err(InputError::Validation(_))
        ));
        assert!(matches!(
            kbd.scroll(ScrollDirection::Down, -4),
            Err(InputError::Validation(_))
        ));
        assert!(sim.snapshot().is_empty());
    }

    #[test]
    fn scroll_direction_parses_or_rejects() {
        assert_eq!("up".parse::<ScrollDirection>().unwrap(), ScrollDirection::Up);
        assert_eq!(
            "Left".parse::<ScrollDirection>().unwrap(),
            ScrollDirection::Left
        );
        assert!(matches!(
            "sideways".parse::<ScrollDirection>(),
            Err(InputError::Validation(_))
        ));
    }

    #[test]
    fn buttons_resolve_by_name_and_code() {
        let (mut kbd, sim) = kbd();
        kbd.press_release_btn("left_mouse").unwrap();
        kbd.press_release_btn(1u16).unwrap();
        let recs = sim.snapshot();
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0], recs[2]);
        assert_eq!(recs[1], recs[3]);
        assert_eq!(recs[0], InputRecord::MouseDown { button: Btn::Left });
        assert_eq!(recs[1], InputRecord::MouseUp { button: Btn::Left });
    }

    #[test]
    fn non_button_key_is_rejected_for_mouse_ops() {
        let (mut kbd, sim) = kbd();
        assert!(matches!(
            kbd.press_btn("f15"),
            Err(InputError::Lookup(_))
        ));
        assert!(matches!(kbd.press_btn(9u16), Err(InputError::Lookup(_))));
        assert!(sim.snapshot().is_empty());
    }

    #[test]
    fn key_state_sentinels() {
        let (mut kbd, sim) = kbd();
        assert!(!kbd.key_state("f15").unwrap());
        sim.set_key_state(VK_F15, 1);
        assert!(kbd.key_state("f15").unwrap());
        sim.set_key_state(VK_F15, -127);
        assert!(matches!(
            kbd.key_state("f15"),
            Err(InputError::State { vk: VK_F15, .. })
        ));
    }

    #[test]
    fn injection_failure_is_surfaced_once() {
        let (mut kbd, sim) = kbd();
        sim.set_failing(true);
        assert!(matches!(
            kbd.press_key("."),
            Err(InputError::Injection { .. })
        ));
        assert!(sim.snapshot().is_empty());
    }

    #[test]
    fn cursor_roundtrip() {
        let (mut kbd, _sim) = kbd();
        kbd.set_cursor_position(350, 940).unwrap();
        assert_eq!(kbd.cursor_position().unwrap(), (350, 940));
    }

    #[test]
    fn unicode_pair_is_down_then_up() {
        let (mut kbd, sim) = kbd();
        kbd.send_unicode('é').unwrap();
        assert_eq!(sim.unicode_log(), vec![('é', false), ('é', true)]);
    }
}
