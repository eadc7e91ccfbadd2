//! Resolución de `OperationContext` a partir de una `ConfigSource`.
use std::path::PathBuf;
use std::time::Duration;

use crate::command::Connectivity;
use crate::config::context::{OperationContext, DEFAULT_CLI};
use crate::config::era::Era;
use crate::config::network::Network;
use crate::config::source::{is_truthy, ConfigSource, EnvSource};
use crate::errors::{AdaError, AdaResult};

pub const CLI_KEY: &str = "ADAOPS_CARDANO_CLI";
pub const NETWORK_KEY: &str = "CARDANO_NODE_NETWORK_ID";
pub const ERA_KEY: &str = "CARDANO_ERA";
pub const LEGACY_KEY: &str = "ADAOPS_LEGACY_MODE";
pub const LEGACY_ERA_KEY: &str = "ADAOPS_LEGACY_ERA";
pub const SOCKET_KEY: &str = "CARDANO_NODE_SOCKET_PATH";
pub const CWD_KEY: &str = "ADAOPS_CWD";
pub const TIMEOUT_KEY: &str = "ADAOPS_TIMEOUT_SECS";

/// `CARDANO_ERA=legacy` activa el modo legacy con esta era por defecto.
const DEFAULT_LEGACY_ERA: Era = Era::Babbage;

pub struct ContextResolver<S: ConfigSource = EnvSource> {
    source: S,
}

impl ContextResolver<EnvSource> {
    pub fn from_env() -> Self {
        Self { source: EnvSource::new() }
    }
}

impl<S: ConfigSource> ContextResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Falla con `Configuration` si la operación es online y no hay socket
    /// configurado; las offline no lo necesitan.
    pub fn resolve(&self, connectivity: Connectivity) -> AdaResult<OperationContext> {
        let (era, legacy) = self.era_and_mode()?;
        let mut builder = OperationContext::builder().cli_path(self.source.get(CLI_KEY).unwrap_or_else(|| DEFAULT_CLI.to_string()))
                                                     .era(era)
                                                     .legacy(legacy);
        if let Some(raw) = self.source.get(NETWORK_KEY) {
            builder = builder.network(raw.parse::<Network>()?);
        }
        match self.source.get(SOCKET_KEY) {
            Some(sock) => builder = builder.socket_path(sock),
            None if connectivity == Connectivity::Online => {
                return Err(AdaError::Configuration(format!("{SOCKET_KEY} is required for online operations")));
            }
            None => {}
        }
        if let Some(cwd) = self.source.get(CWD_KEY) {
            builder = builder.cwd(PathBuf::from(cwd));
        }
        if let Some(raw) = self.source.get(TIMEOUT_KEY) {
            let secs = raw.trim()
                          .parse::<u64>()
                          .ok()
                          .filter(|s| *s > 0)
                          .ok_or_else(|| AdaError::Configuration(format!("{TIMEOUT_KEY} must be a positive integer, got '{raw}'")))?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    fn era_and_mode(&self) -> AdaResult<(Era, bool)> {
        let raw = self.source.get(ERA_KEY);
        match raw.as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("legacy") => {
                let era = match self.source.get(LEGACY_ERA_KEY) {
                    Some(e) => e.parse()?,
                    None => DEFAULT_LEGACY_ERA,
                };
                Ok((era, true))
            }
            other => {
                let era = match other {
                    Some(e) => e.parse()?,
                    None => crate::config::context::DEFAULT_ERA,
                };
                let legacy = self.source.get(LEGACY_KEY).map(|v| is_truthy(&v)).unwrap_or(false);
                Ok((era, legacy))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::MapSource;
    use std::path::Path;

    fn resolver(src: MapSource) -> ContextResolver<MapSource> {
        ContextResolver::new(src.with(CWD_KEY, "/work"))
    }

    #[test]
    fn online_requires_socket_offline_does_not() {
        let r = resolver(MapSource::new());
        assert!(matches!(r.resolve(Connectivity::Online), Err(AdaError::Configuration(_))));
        let ctx = r.resolve(Connectivity::Offline).unwrap();
        assert_eq!(ctx.era(), Era::Conway);
        assert_eq!(ctx.network(), Network::Mainnet);
        assert_eq!(ctx.cwd(), Path::new("/work"));
    }

    #[test]
    fn legacy_era_value_switches_mode() {
        let r = resolver(MapSource::new().with(ERA_KEY, "legacy"));
        let ctx = r.resolve(Connectivity::Offline).unwrap();
        assert!(ctx.legacy());
        assert_eq!(ctx.era(), Era::Babbage);

        let r = resolver(MapSource::new().with(ERA_KEY, "alonzo").with(LEGACY_KEY, "yes"));
        let ctx = r.resolve(Connectivity::Offline).unwrap();
        assert!(ctx.legacy());
        assert_eq!(ctx.era(), Era::Alonzo);
    }

    #[test]
    fn reads_all_keys() {
        let r = resolver(MapSource::new().with(CLI_KEY, "/opt/bin/cardano-cli")
                                         .with(NETWORK_KEY, "2")
                                         .with(SOCKET_KEY, "/ipc/node.socket")
                                         .with(TIMEOUT_KEY, "30"));
        let ctx = r.resolve(Connectivity::Online).unwrap();
        assert_eq!(ctx.cli_path(), Path::new("/opt/bin/cardano-cli"));
        assert_eq!(ctx.network(), Network::PREVIEW);
        assert_eq!(ctx.socket_path(), Some(Path::new("/ipc/node.socket")));
        assert_eq!(ctx.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_values_are_configuration_errors() {
        for (k, v) in [(NETWORK_KEY, "testnet"), (ERA_KEY, "byron"), (TIMEOUT_KEY, "0"), (TIMEOUT_KEY, "abc")] {
            let r = resolver(MapSource::new().with(k, v));
            assert!(matches!(r.resolve(Connectivity::Offline), Err(AdaError::Configuration(_))), "{k}={v}");
        }
        // alonzo no tiene grupo propio: requiere legacy
        let r = resolver(MapSource::new().with(ERA_KEY, "alonzo"));
        assert!(matches!(r.resolve(Connectivity::Offline), Err(AdaError::Configuration(_))));
    }
}
