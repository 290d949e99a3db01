use filter_engine::{ParameterKey, ParameterSet};

/// Radius slider value to engine radius in pixels.
pub const RADIUS_SCALE: f32 = 200.0;

/// Scale slider value to engine scale.
pub const SCALE_SCALE: f32 = 10.0;

pub const DEFAULT_VALUE: f32 = 0.5;

/// Maps a slider value in `[0, 1]` onto the value the engine expects for `key`.
pub fn engine_value(key: ParameterKey, value: f32) -> f32 {
    match key {
        ParameterKey::Intensity => value,
        ParameterKey::Radius => value * RADIUS_SCALE,
        ParameterKey::Scale => value * SCALE_SCALE,
    }
}

/// The three slider values and whether each one currently applies.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterState {
    values: [f32; 3],
    applicable: [bool; 3],
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            values: [DEFAULT_VALUE; 3],
            applicable: [true; 3],
        }
    }
}

impl ParameterState {
    pub fn new(supported: ParameterSet) -> Self {
        let mut state = Self::default();
        state.refresh_applicable(supported);
        state
    }

    pub fn value(&self, key: ParameterKey) -> f32 {
        self.values[key.index()]
    }

    pub fn is_applicable(&self, key: ParameterKey) -> bool {
        self.applicable[key.index()]
    }

    pub fn applicable_keys(&self) -> ParameterSet {
        ParameterKey::ALL
            .into_iter()
            .filter(|key| self.is_applicable(*key))
            .collect()
    }

    /// Stores `value` clamped into `[0, 1]` and returns what was stored.
    /// NaN is rejected and leaves the state untouched.
    pub fn set(&mut self, key: ParameterKey, value: f32) -> Option<f32> {
        if value.is_nan() {
            return None;
        }

        let value = value.clamp(0.0, 1.0);
        self.values[key.index()] = value;
        Some(value)
    }

    pub fn refresh_applicable(&mut self, supported: ParameterSet) {
        for key in ParameterKey::ALL {
            self.applicable[key.index()] = supported.contains(key);
        }
    }
}
