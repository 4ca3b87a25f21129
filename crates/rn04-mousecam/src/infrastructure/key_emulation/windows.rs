//! Windows arrow-key synthesis via the SendInput API.
//!
//! Injects arrow-key presses and releases as virtual-key events. All four
//! arrow keys live in the extended-key range, so every event carries
//! `KEYEVENTF_EXTENDEDKEY`; without it some applications decode the keys as
//! numpad arrows.

#![cfg(target_os = "windows")]

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, VIRTUAL_KEY, VK_DOWN, VK_LEFT, VK_RIGHT, VK_UP,
};

use rn04_core::DirectionKey;

use super::{KeyEmulator, SynthError};

/// Windows implementation of [`KeyEmulator`] using SendInput.
pub struct WindowsKeyEmulator;

impl WindowsKeyEmulator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsKeyEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyEmulator for WindowsKeyEmulator {
    fn emit_key_down(&self, key: DirectionKey) -> Result<(), SynthError> {
        send_key(virtual_key(key), false)
    }

    fn emit_key_up(&self, key: DirectionKey) -> Result<(), SynthError> {
        send_key(virtual_key(key), true)
    }
}

/// Maps a direction to its Windows virtual-key code.
fn virtual_key(key: DirectionKey) -> VIRTUAL_KEY {
    match key {
        DirectionKey::Left => VK_LEFT,
        DirectionKey::Right => VK_RIGHT,
        DirectionKey::Up => VK_UP,
        DirectionKey::Down => VK_DOWN,
    }
}

fn send_key(vk: VIRTUAL_KEY, key_up: bool) -> Result<(), SynthError> {
    let mut flags: KEYBD_EVENT_FLAGS = KEYEVENTF_EXTENDEDKEY;
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }

    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    // SAFETY: input is a valid INPUT structure on the stack
    let injected = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };

    // SendInput returns the number of events it placed in the input stream;
    // zero means the event was blocked (e.g., by an elevated foreground app).
    if injected == 0 {
        return Err(SynthError::Platform(
            windows::core::Error::from_win32().to_string(),
        ));
    }
    Ok(())
}
