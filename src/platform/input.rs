//! Input sampling
//!
//! Keyboard events and gamepad polls are folded into one [`TickInput`] per
//! tick. Button presses are edge-triggered: holding a button fires once.

use crate::sim::{AXIS_DEADZONE, TickInput};

/// Keyboard keys currently held
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    action_pending: bool,
}

impl KeyboardState {
    /// Handle a keydown. Returns true if the key is one the game uses.
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "Left" => self.left = true,
            "ArrowRight" | "Right" => self.right = true,
            " " | "Enter" => self.action_pending = true,
            _ => return false,
        }
        true
    }

    /// Handle a keyup. Returns true if the key is one the game uses.
    pub fn key_up(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "Left" => self.left = false,
            "ArrowRight" | "Right" => self.right = false,
            " " | "Enter" => {}
            _ => return false,
        }
        true
    }

    fn take_action(&mut self) -> bool {
        std::mem::take(&mut self.action_pending)
    }
}

/// One poll of a standard-mapping gamepad
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadSnapshot {
    /// Left stick horizontal axis
    pub axis_x: f32,
    pub dpad_left: bool,
    pub dpad_right: bool,
    /// Face button A (index 0)
    pub primary: bool,
}

impl GamepadSnapshot {
    /// Standard mapping button indices
    pub const BUTTON_PRIMARY: u32 = 0;
    pub const BUTTON_DPAD_LEFT: u32 = 14;
    pub const BUTTON_DPAD_RIGHT: u32 = 15;

    /// Read the first axis and the buttons the game uses
    #[cfg(target_arch = "wasm32")]
    pub fn from_gamepad(pad: &web_sys::Gamepad) -> Self {
        use wasm_bindgen::JsCast;

        let buttons = pad.buttons();
        let pressed = |index: u32| {
            buttons
                .get(index)
                .dyn_into::<web_sys::GamepadButton>()
                .map(|b| b.pressed())
                .unwrap_or(false)
        };
        Self {
            axis_x: pad.axes().get(0).as_f64().unwrap_or(0.0) as f32,
            dpad_left: pressed(Self::BUTTON_DPAD_LEFT),
            dpad_right: pressed(Self::BUTTON_DPAD_RIGHT),
            primary: pressed(Self::BUTTON_PRIMARY),
        }
    }
}

/// Gamepad with deadzone and button edge detection
#[derive(Debug, Clone)]
pub struct GamepadState {
    deadzone: f32,
    primary_was_down: bool,
    connected: bool,
}

impl Default for GamepadState {
    fn default() -> Self {
        Self::new(AXIS_DEADZONE)
    }
}

impl GamepadState {
    pub fn new(deadzone: f32) -> Self {
        Self {
            deadzone,
            primary_was_down: false,
            connected: false,
        }
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn set_deadzone(&mut self, deadzone: f32) {
        self.deadzone = deadzone;
    }

    /// Fold a poll into `input`. `None` means no pad is connected.
    pub fn apply(&mut self, snapshot: Option<GamepadSnapshot>, input: &mut TickInput) {
        let Some(pad) = snapshot else {
            if self.connected {
                log::info!("Gamepad disconnected");
            }
            self.connected = false;
            self.primary_was_down = false;
            return;
        };
        if !self.connected {
            log::info!("Gamepad connected");
            self.connected = true;
        }

        if pad.axis_x.abs() >= self.deadzone {
            input.axis = pad.axis_x.clamp(-1.0, 1.0);
        } else {
            // Stick centered: the d-pad drives the paddle
            input.left |= pad.dpad_left;
            input.right |= pad.dpad_right;
        }

        if pad.primary && !self.primary_was_down {
            input.primary_action = true;
        }
        self.primary_was_down = pad.primary;
    }
}

/// Everything the player can press, sampled into one [`TickInput`]
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub gamepad: GamepadState,
    /// Autopilot toggle
    pub idle_mode: bool,
}

impl InputState {
    pub fn toggle_idle_mode(&mut self) {
        self.idle_mode = !self.idle_mode;
        log::info!("Idle mode: {}", self.idle_mode);
    }

    /// Build the input for the next tick. Pending presses are consumed.
    pub fn sample(&mut self, pad: Option<GamepadSnapshot>) -> TickInput {
        let mut input = TickInput {
            left: self.keyboard.left,
            right: self.keyboard.right,
            primary_action: self.keyboard.take_action(),
            idle_mode: self.idle_mode,
            ..Default::default()
        };
        self.gamepad.apply(pad, &mut input);
        input
    }
}
