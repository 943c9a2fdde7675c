//! Driving an embedded program on the program thread.

mod echo;

pub use echo::Echo;

use casement_common::{CasementError, Result};
use tracing::{error, info};

use crate::session::Session;

/// What the driver should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The program asked to stop.
    Finished,
    /// The display shut down underneath it.
    Interrupted,
    Failed(String),
}

/// A program run one step at a time against a [`Session`].
pub trait Program: Send {
    fn name(&self) -> &str;

    /// Called once before the first step.
    fn start(&mut self, _session: &mut Session) -> Result<()> {
        Ok(())
    }

    fn step(&mut self, session: &mut Session) -> Result<Flow>;
}

/// Run `program` until it exits, fails, or the display is interrupted.
pub fn drive(program: &mut dyn Program, session: &mut Session) -> ExitReason {
    info!(program = program.name(), "starting program");
    let reason = match run(program, session) {
        Ok(()) => ExitReason::Finished,
        Err(CasementError::Interrupted) => ExitReason::Interrupted,
        Err(e) => {
            error!(program = program.name(), "program failed: {e}");
            ExitReason::Failed(e.to_string())
        }
    };
    info!(program = program.name(), ?reason, "program stopped");
    reason
}

fn run(program: &mut dyn Program, session: &mut Session) -> Result<()> {
    program.start(session)?;
    while program.step(session)? == Flow::Continue {}
    Ok(())
}
