//! Per-agent mutable state: decaying needs, inventory counts and timed effects.

use std::collections::HashMap;

use crate::{GoapError, Result};

/// The mutable record an agent carries between ticks.
///
/// - **needs** are urgencies in `[0, 1]` and are always clamped on write;
/// - **need rates** are per-second drift applied by [`AgentState::update`];
/// - **inventory** counts never go below zero;
/// - **effects** track remaining seconds, where a negative duration means the
///   effect is permanent until removed.
///
/// # Examples
///
/// ```
/// use goap_needs::AgentState;
///
/// let mut state = AgentState::new();
/// state.set_need("hunger", 0.4);
/// state.set_need_rate("hunger", 0.1);
///
/// state.update(2.0);
/// assert!((state.need("hunger") - 0.6).abs() < 1e-6);
///
/// state.set_need("hunger", 7.0);
/// assert_eq!(state.need("hunger"), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentState {
    needs: HashMap<String, f32>,
    need_rates: HashMap<String, f32>,
    inventory: HashMap<String, u32>,
    effects: HashMap<String, f32>,
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a need; unknown needs read as `0.0`.
    pub fn need(&self, name: &str) -> f32 {
        self.needs.get(name).copied().unwrap_or(0.0)
    }

    pub fn has_need(&self, name: &str) -> bool {
        self.needs.contains_key(name)
    }

    /// Sets a need, clamped to `[0, 1]`. NaN is stored as `0.0`.
    pub fn set_need(&mut self, name: impl Into<String>, value: f32) {
        self.needs.insert(name.into(), clamp_unit(value));
    }

    /// Adds `delta` to a need and clamps the result.
    pub fn modify_need(&mut self, name: &str, delta: f32) {
        let value = self.need(name) + delta;
        self.set_need(name, value);
    }

    pub fn needs(&self) -> &HashMap<String, f32> {
        &self.needs
    }

    /// Sets the per-second drift of a need. Positive rates make the need more
    /// urgent over time, negative rates let it recover.
    pub fn set_need_rate(&mut self, name: impl Into<String>, rate: f32) {
        self.need_rates.insert(name.into(), rate);
    }

    pub fn need_rate(&self, name: &str) -> f32 {
        self.need_rates.get(name).copied().unwrap_or(0.0)
    }

    pub fn item_count(&self, item: &str) -> u32 {
        self.inventory.get(item).copied().unwrap_or(0)
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.item_count(item) > 0
    }

    pub fn add_item(&mut self, item: impl Into<String>, amount: u32) {
        if amount == 0 {
            return;
        }
        let count = self.inventory.entry(item.into()).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Removes `amount` of an item.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::InsufficientItems`] if fewer than `amount` are held;
    /// the inventory is left unchanged in that case.
    pub fn remove_item(&mut self, item: &str, amount: u32) -> Result<()> {
        let available = self.item_count(item);
        if amount > available {
            return Err(GoapError::InsufficientItems {
                item: item.to_string(),
                requested: amount,
                available,
            });
        }
        let remaining = available - amount;
        if remaining == 0 {
            self.inventory.remove(item);
        } else {
            self.inventory.insert(item.to_string(), remaining);
        }
        Ok(())
    }

    pub fn inventory(&self) -> &HashMap<String, u32> {
        &self.inventory
    }

    /// Starts or refreshes a timed effect. A negative duration is permanent.
    pub fn add_effect(&mut self, name: impl Into<String>, duration: f32) {
        self.effects.insert(name.into(), duration);
    }

    pub fn remove_effect(&mut self, name: &str) -> bool {
        self.effects.remove(name).is_some()
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    pub fn effect_remaining(&self, name: &str) -> Option<f32> {
        self.effects.get(name).copied()
    }

    pub fn effects(&self) -> &HashMap<String, f32> {
        &self.effects
    }

    /// Advances the state by `dt` seconds.
    ///
    /// Every need with a rate drifts by `rate * dt` (clamped). Timed effects
    /// lose `dt` and are pruned once they reach zero; permanent effects are
    /// untouched. A negative `dt` is treated as zero.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for (name, rate) in &self.need_rates {
            let value = self.needs.get(name).copied().unwrap_or(0.0) + rate * dt;
            self.needs.insert(name.clone(), clamp_unit(value));
        }

        self.effects.retain(|name, remaining| {
            if *remaining < 0.0 {
                return true;
            }
            *remaining -= dt;
            if *remaining <= 0.0 {
                log::debug!("Effect '{}' expired", name);
                false
            } else {
                true
            }
        });
    }
}
