//! The interactive prediction loop.
//!
//! Each round draws a synthetic flower, prints its measurements and the model's
//! prediction, then asks a [`KeySource`] whether to go on.
use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use rand::Rng;
use tracing::debug;

use crate::data::Feature;
use crate::error::SessionError;
use crate::pipeline::{FittedModel, KeyClassifier};
use crate::sampling::SampleGenerator;

/// What the operator asked for after a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Quit,
}

/// Decides, after each prediction, whether the loop goes on.
pub trait KeySource {
    /// Blocks until the next decision is available
    fn next_action(&mut self) -> io::Result<LoopAction>;

    /// Hint printed after each prediction, if any
    fn prompt(&self) -> Option<&str> {
        None
    }
}

/// Reads single key presses from the terminal: Escape quits, anything else continues.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_action(&mut self) -> io::Result<LoopAction> {
        let _raw = RawMode::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = action_for(key) {
                    return Ok(action);
                }
            }
        }
    }

    fn prompt(&self) -> Option<&str> {
        Some("Esc to quit...")
    }
}

/// Maps a key event to a loop decision; `None` for releases and repeats.
fn action_for(key: KeyEvent) -> Option<LoopAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    Some(match key.code {
        KeyCode::Esc => LoopAction::Quit,
        // Raw mode swallows the interrupt signal
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => LoopAction::Quit,
        _ => LoopAction::Continue,
    })
}

/// Raw terminal mode for as long as the guard lives
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
    }
}

/// Continues until a fixed number of predictions has been made, without waiting.
#[derive(Debug, Clone)]
pub struct FixedCount {
    remaining: u64,
}

impl FixedCount {
    /// `total` predictions in all; a total of zero behaves like one
    pub fn new(total: u64) -> Self {
        FixedCount {
            remaining: total.max(1),
        }
    }
}

impl KeySource for FixedCount {
    fn next_action(&mut self) -> io::Result<LoopAction> {
        self.remaining = self.remaining.saturating_sub(1);
        Ok(if self.remaining == 0 {
            LoopAction::Quit
        } else {
            LoopAction::Continue
        })
    }
}

/// Writes one synthetic sample and its prediction per round until `keys` says quit.
///
/// # Returns
/// The number of predictions made
pub fn run_predictions<M, R, K, W>(
    model: &FittedModel<M>,
    samples: &mut SampleGenerator<R>,
    keys: &mut K,
    out: &mut W,
) -> Result<u64, SessionError>
where
    M: KeyClassifier,
    R: Rng,
    K: KeySource,
    W: Write,
{
    let mut rounds = 0;
    loop {
        let sample = samples.next_sample();
        for feature in Feature::ALL {
            let caption = format!("{}:", feature.caption());
            writeln!(out, "{:<13} {:.1} cm", caption, sample.value(feature))?;
        }

        let prediction = model.predict(&sample)?;
        writeln!(out, "Predicted flower type is: {}", prediction.label)?;
        if let Some(prompt) = keys.prompt() {
            writeln!(out, "{}", prompt)?;
        }
        writeln!(out)?;
        out.flush()?;
        rounds += 1;

        let action = keys.next_action()?;
        debug!(round = rounds, ?action, "operator input");
        if action == LoopAction::Quit {
            return Ok(rounds);
        }
    }
}
