//! Fachada: build → execute → parse bajo un único `OperationContext`.
use ada_domain::{ParsedValue, ValueKind};

use crate::command::{CommandBuilder, CommandSpec, Connectivity, Operation, Params};
use crate::config::{ContextResolver, OperationContext};
use crate::errors::{AdaError, AdaResult};
use crate::exec::{CommandRunner, ProcessExecutor};
use crate::parse::OutputParser;
use crate::retry::RetryPolicy;

pub struct CardanoCli<R: CommandRunner = ProcessExecutor> {
    ctx: OperationContext,
    runner: R,
    parser: OutputParser,
    read_retry: RetryPolicy,
}

impl CardanoCli<ProcessExecutor> {
    pub fn new(ctx: OperationContext) -> Self {
        Self::with_runner(ctx, ProcessExecutor::new())
    }

    /// Contexto desde el entorno (y `.env`).
    pub fn from_env(connectivity: Connectivity) -> AdaResult<Self> {
        Ok(Self::new(ContextResolver::from_env().resolve(connectivity)?))
    }
}

impl<R: CommandRunner> CardanoCli<R> {
    pub fn with_runner(ctx: OperationContext, runner: R) -> Self {
        Self { ctx,
               runner,
               parser: OutputParser::new(),
               read_retry: RetryPolicy::none() }
    }

    pub fn with_parser(mut self, parser: OutputParser) -> Self {
        self.parser = parser;
        self
    }

    /// Reintento para lecturas puras; las operaciones con efectos nunca se reintentan.
    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    /// Mismo runner con otro contexto (p.ej. otro `cwd`).
    pub fn with_context(mut self, ctx: OperationContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn context(&self) -> &OperationContext {
        &self.ctx
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn build(&self, operation: Operation, params: &Params) -> AdaResult<CommandSpec> {
        CommandBuilder::build(operation, params, &self.ctx)
    }

    pub fn run(&self, operation: Operation, params: &Params) -> AdaResult<ParsedValue> {
        let spec = self.build(operation, params)?;
        let policy = if operation.is_idempotent() { self.read_retry } else { RetryPolicy::none() };
        policy.run(operation, || self.run_spec(&spec))
    }

    pub fn run_spec(&self, spec: &CommandSpec) -> AdaResult<ParsedValue> {
        let result = self.runner.execute(spec, &self.ctx)?;
        self.parser.parse(spec, &self.ctx, &result)
    }
}

/// Error para un `ParsedValue` de otro tipo que el declarado por la operación.
pub(crate) fn unexpected(operation: Operation, expected: ValueKind, got: &ParsedValue) -> AdaError {
    AdaError::UnparseableOutput { operation: operation.name().to_string(),
                                  command: Vec::new(),
                                  raw: got.to_json().to_string(),
                                  reason: format!("expected {expected:?}, parser produced {:?}", got.kind()) }
}
