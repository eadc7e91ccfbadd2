//! `OperationContext`: instantánea inmutable de la configuración de una llamada.
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::era::{Era, GroupRendering};
use crate::config::network::Network;
use crate::errors::{AdaError, AdaResult};

pub const DEFAULT_CLI: &str = "cardano-cli";
pub const DEFAULT_ERA: Era = Era::Conway;

/// Parte del contexto que determina la forma de un comando renderizado.
/// Un `CommandSpec` sólo se ejecuta bajo un contexto con el mismo sello.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextStamp {
    pub era: Era,
    pub legacy: bool,
    pub network: Network,
}

/// Nunca se muta: `with_*` devuelve un contexto nuevo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    cli_path: PathBuf,
    network: Network,
    era: Era,
    legacy: bool,
    socket_path: Option<PathBuf>,
    cwd: PathBuf,
    timeout: Option<Duration>,
}

impl OperationContext {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn era(&self) -> Era {
        self.era
    }

    pub fn legacy(&self) -> bool {
        self.legacy
    }

    pub fn socket_path(&self) -> Option<&Path> {
        self.socket_path.as_deref()
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn stamp(&self) -> ContextStamp {
        ContextStamp { era: self.era,
                       legacy: self.legacy,
                       network: self.network }
    }

    /// Regla de grupo de comandos; validada al construir el contexto.
    pub fn group_rendering(&self) -> AdaResult<GroupRendering> {
        self.era.rendering(self.legacy)
    }

    /// Ruta relativa → relativa a `cwd`; absoluta se deja igual.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let p = path.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        }
    }

    pub fn with_cwd(&self, cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into(),
               ..self.clone() }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self { timeout: Some(timeout),
               ..self.clone() }
    }

    pub fn without_timeout(&self) -> Self {
        Self { timeout: None,
               ..self.clone() }
    }
}

/// Builder con los defaults documentados (CLI `cardano-cli`, mainnet,
/// conway, legacy apagado, cwd del proceso).
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    cli_path: Option<PathBuf>,
    network: Option<Network>,
    era: Option<Era>,
    legacy: bool,
    socket_path: Option<PathBuf>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ContextBuilder {
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    pub fn era(mut self, era: Era) -> Self {
        self.era = Some(era);
        self
    }

    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> AdaResult<OperationContext> {
        let era = self.era.unwrap_or(DEFAULT_ERA);
        era.rendering(self.legacy)?;
        let cwd = match self.cwd {
            Some(c) => c,
            None => std::env::current_dir().map_err(|e| AdaError::Configuration(format!("cannot read current directory: {e}")))?,
        };
        if self.timeout == Some(Duration::ZERO) {
            return Err(AdaError::Configuration("timeout must be greater than zero".into()));
        }
        Ok(OperationContext { cli_path: self.cli_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CLI)),
                              network: self.network.unwrap_or(Network::Mainnet),
                              era,
                              legacy: self.legacy,
                              socket_path: self.socket_path,
                              cwd,
                              timeout: self.timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let ctx = OperationContext::builder().cwd("/tmp").build().unwrap();
        assert_eq!(ctx.cli_path(), Path::new("cardano-cli"));
        assert_eq!(ctx.network(), Network::Mainnet);
        assert_eq!(ctx.era(), Era::Conway);
        assert!(!ctx.legacy());
        assert!(ctx.socket_path().is_none());
        assert!(ctx.timeout().is_none());
    }

    #[test]
    fn with_methods_return_new_values() {
        let base = OperationContext::builder().cwd("/a").build().unwrap();
        let other = base.with_cwd("/b").with_timeout(Duration::from_secs(5));
        assert_eq!(base.cwd(), Path::new("/a"));
        assert_eq!(base.timeout(), None);
        assert_eq!(other.cwd(), Path::new("/b"));
        assert_eq!(other.resolve_path("kes.vkey"), PathBuf::from("/b/kes.vkey"));
        assert_eq!(other.resolve_path("/abs/x"), PathBuf::from("/abs/x"));
        assert_eq!(base.stamp(), other.stamp());
    }

    #[test]
    fn invalid_era_legacy_combination_fails_at_build() {
        let err = OperationContext::builder().era(Era::Latest).legacy(true).build().unwrap_err();
        assert!(matches!(err, AdaError::Configuration(_)));
    }
}
