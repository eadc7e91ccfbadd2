use std::path::{Path, PathBuf};

use crate::command::operation::{Connectivity, Operation};
use crate::config::ContextStamp;

/// Invocación completa ya renderizada. Inmutable; lleva el sello del contexto
/// que la construyó y el ejecutor se niega a correrla bajo otro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    operation: Operation,
    program: PathBuf,
    tokens: Vec<String>,
    stamp: ContextStamp,
}

impl CommandSpec {
    pub(crate) fn new(operation: Operation, program: PathBuf, tokens: Vec<String>, stamp: ContextStamp) -> Self {
        Self { operation,
               program,
               tokens,
               stamp }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argumentos tras el ejecutable; el primero es el grupo de comandos.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn stamp(&self) -> ContextStamp {
        self.stamp
    }

    pub fn connectivity(&self) -> Connectivity {
        self.operation.connectivity()
    }

    /// Ejecutable + argumentos, como se reportan en los errores.
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(self.tokens.len() + 1);
        line.push(self.program.to_string_lossy().into_owned());
        line.extend(self.tokens.iter().cloned());
        line
    }

    pub fn display_line(&self) -> String {
        self.command_line().join(" ")
    }
}
