use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use polywatch::errors::{PolywatchError, Result};
use polywatch::exec::{CommandBackend, CommandStep};

/// One call the loop made into the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Dependency(String),
    Build(String),
    Restart(String),
    Shutdown,
}

/// A fake backend that:
/// - records every invocation in order
/// - succeeds, unless the command was registered with `fail_command`.
#[derive(Clone, Default)]
pub struct FakeBackend {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later invocation of `command` fail.
    pub fn fail_command(&self, command: &str) {
        self.failing.lock().unwrap().insert(command.to_string());
    }

    /// Make `command` succeed again.
    pub fn succeed_command(&self, command: &str) {
        self.failing.lock().unwrap().remove(command);
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.invocations.lock().unwrap().clear();
    }

    fn record(&self, invocation: Invocation, command: &str) -> Result<()> {
        self.invocations.lock().unwrap().push(invocation);
        if self.failing.lock().unwrap().contains(command) {
            return Err(PolywatchError::CommandFailed {
                command: command.to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

impl CommandBackend for FakeBackend {
    fn run_step<'a>(
        &'a mut self,
        step: CommandStep,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let invocation = match step {
            CommandStep::Dependency => Invocation::Dependency(command.to_string()),
            CommandStep::Build => Invocation::Build(command.to_string()),
        };
        let result = self.record(invocation, command);
        Box::pin(async move { result })
    }

    fn restart<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let result = self.record(Invocation::Restart(command.to_string()), command);
        Box::pin(async move { result })
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.invocations.lock().unwrap().push(Invocation::Shutdown);
        Box::pin(async {})
    }
}
