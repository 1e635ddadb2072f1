// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! PIN gate. Once unlocked, a session stays unlocked; only a fresh load with a saved PIN locks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PocketError, Result};

static PIN_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone)]
pub struct Gate {
    state: GateState,
    saved_pin: Option<String>,
    recovery_pin: Option<String>,
}

pub fn is_valid_pin(pin: &str) -> bool {
    PIN_FORMAT.is_match(pin)
}

impl Gate {
    pub fn new(saved_pin: Option<String>, recovery_pin: Option<String>) -> Self {
        let saved_pin = saved_pin.filter(|p| !p.is_empty());
        let state = if saved_pin.is_some() {
            GateState::Locked
        } else {
            GateState::Unlocked
        };
        Self {
            state,
            saved_pin,
            recovery_pin: recovery_pin.filter(|p| !p.is_empty()),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    pub fn has_pin(&self) -> bool {
        self.saved_pin.is_some()
    }

    /// True for the saved PIN or, when configured, the recovery PIN.
    pub fn verify(&self, attempt: &str) -> bool {
        let attempt = attempt.trim();
        if self.recovery_pin.as_deref() == Some(attempt) {
            return true;
        }
        self.saved_pin.as_deref() == Some(attempt)
    }

    pub fn unlock(&mut self, attempt: &str) -> Result<()> {
        if self.state == GateState::Unlocked {
            return Ok(());
        }
        if self.verify(attempt) {
            self.state = GateState::Unlocked;
            tracing::info!("pocket unlocked");
            Ok(())
        } else {
            tracing::warn!("rejected PIN attempt");
            Err(PocketError::IncorrectPin)
        }
    }

    pub fn ensure_unlocked(&self) -> Result<()> {
        match self.state {
            GateState::Unlocked => Ok(()),
            GateState::Locked => Err(PocketError::Locked),
        }
    }

    /// Validates a PIN change and returns the PIN to persist.
    /// Replacing an existing PIN requires the current one (or the recovery PIN).
    pub fn set_pin(&mut self, current: Option<&str>, new_pin: &str) -> Result<String> {
        self.check_current(current)?;
        let new_pin = new_pin.trim();
        if !is_valid_pin(new_pin) {
            return Err(PocketError::validation("Invalid PIN: it must be exactly 4 digits"));
        }
        self.saved_pin = Some(new_pin.to_string());
        Ok(new_pin.to_string())
    }

    /// Removes the saved PIN; the session stays unlocked.
    pub fn clear_pin(&mut self, current: Option<&str>) -> Result<()> {
        self.check_current(current)?;
        self.saved_pin = None;
        self.state = GateState::Unlocked;
        Ok(())
    }

    fn check_current(&self, current: Option<&str>) -> Result<()> {
        if self.saved_pin.is_none() {
            return Ok(());
        }
        match current {
            Some(c) if self.verify(c) => Ok(()),
            _ => Err(PocketError::IncorrectPin),
        }
    }
}
