//! Reversible commands over a diagram
//!
//! A command applies one change and can revert it. `CommandChain` composes
//! commands into one unit (applied in order, reverted in reverse order) and
//! `CommandStack` plays the host's undo/redo role.

use anyhow::{Context, Result};
use tracing::{debug, trace};

use super::diagram::Diagram;
use super::error::DiagramError;

/// A reversible change to a diagram
pub trait Command {
    /// Short human-readable name
    fn label(&self) -> &str;

    fn apply(&mut self, diagram: &mut Diagram) -> Result<()>;

    fn revert(&mut self, diagram: &mut Diagram) -> Result<()>;
}

/// Several commands executed as one
#[derive(Default)]
pub struct CommandChain {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

impl CommandChain {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn with(mut self, command: Box<dyn Command>) -> Self {
        self.push(command);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Labels of the steps in apply order
    pub fn step_labels(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.label()).collect()
    }
}

impl Command for CommandChain {
    fn label(&self) -> &str {
        &self.label
    }

    /// Apply every step; on failure the steps already applied are reverted
    fn apply(&mut self, diagram: &mut Diagram) -> Result<()> {
        for applied in 0..self.commands.len() {
            let command = &mut self.commands[applied];
            trace!(step = command.label(), "Applying step");
            if let Err(e) = command.apply(diagram) {
                debug!(step = command.label(), error = %e, "Step failed, rolling back");
                for done in self.commands[..applied].iter_mut().rev() {
                    done.revert(diagram)
                        .with_context(|| format!("Rolling back {} after: {}", done.label(), e))?;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn revert(&mut self, diagram: &mut Diagram) -> Result<()> {
        for command in self.commands.iter_mut().rev() {
            trace!(step = command.label(), "Reverting step");
            command.revert(diagram)?;
        }
        Ok(())
    }
}

/// Undo/redo host for diagram commands
#[derive(Default)]
pub struct CommandStack {
    undo: Vec<Box<dyn Command>>,
    redo: Vec<Box<dyn Command>>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command and make it undoable; clears the redo history
    pub fn execute(&mut self, mut command: Box<dyn Command>, diagram: &mut Diagram) -> Result<()> {
        debug!(command = command.label(), "Executing command");
        command.apply(diagram)?;
        self.undo.push(command);
        self.redo.clear();
        Ok(())
    }

    pub fn undo(&mut self, diagram: &mut Diagram) -> Result<()> {
        let mut command = self
            .undo
            .pop()
            .ok_or_else(|| DiagramError::command_error("Nothing to undo".to_string()))?;
        debug!(command = command.label(), "Undoing command");
        command.revert(diagram)?;
        self.redo.push(command);
        Ok(())
    }

    pub fn redo(&mut self, diagram: &mut Diagram) -> Result<()> {
        let mut command = self
            .redo
            .pop()
            .ok_or_else(|| DiagramError::command_error("Nothing to redo".to_string()))?;
        debug!(command = command.label(), "Redoing command");
        command.apply(diagram)?;
        self.undo.push(command);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the command `undo` would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.last().map(|c| c.label())
    }
}
