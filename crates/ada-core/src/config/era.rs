//! Tabla era × modo legacy → regla de renderizado del grupo de comandos.
//!
//! Agregar una era es agregar una fila a `ERA_TABLE`.
use std::fmt;
use std::str::FromStr;

use crate::errors::{AdaError, AdaResult};

/// Marcador del grupo de compatibilidad.
pub const LEGACY_GROUP: &str = "legacy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Era {
    Shelley,
    Allegra,
    Mary,
    Alonzo,
    Babbage,
    Conway,
    Latest,
}

struct EraRow {
    era: Era,
    name: &'static str,
    /// Grupo de nivel superior con el nombre de la era (sintaxis moderna).
    group: Option<&'static str>,
    /// Flag explícito bajo el grupo `legacy`.
    legacy_flag: Option<&'static str>,
}

static ERA_TABLE: &[EraRow] = &[
    EraRow { era: Era::Shelley, name: "shelley", group: None, legacy_flag: Some("--shelley-era") },
    EraRow { era: Era::Allegra, name: "allegra", group: None, legacy_flag: Some("--allegra-era") },
    EraRow { era: Era::Mary, name: "mary", group: None, legacy_flag: Some("--mary-era") },
    EraRow { era: Era::Alonzo, name: "alonzo", group: None, legacy_flag: Some("--alonzo-era") },
    EraRow { era: Era::Babbage, name: "babbage", group: Some("babbage"), legacy_flag: Some("--babbage-era") },
    EraRow { era: Era::Conway, name: "conway", group: Some("conway"), legacy_flag: Some("--conway-era") },
    EraRow { era: Era::Latest, name: "latest", group: Some("latest"), legacy_flag: None },
];

/// Resultado de la tabla: primer token y, bajo legacy, el flag de era.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRendering {
    pub group: &'static str,
    pub era_flag: Option<&'static str>,
}

impl Era {
    pub const ALL: [Era; 7] = [Era::Shelley, Era::Allegra, Era::Mary, Era::Alonzo, Era::Babbage, Era::Conway, Era::Latest];

    fn row(&self) -> Option<&'static EraRow> {
        ERA_TABLE.iter().find(|r| r.era == *self)
    }

    pub fn as_str(&self) -> &'static str {
        self.row().map(|r| r.name).unwrap_or("unknown")
    }

    /// Regla de renderizado para `(era, legacy)`. Combinaciones sin sintaxis
    /// en el CLI son error de configuración, no se corrigen en silencio.
    pub fn rendering(&self, legacy: bool) -> AdaResult<GroupRendering> {
        let row = self.row().ok_or_else(|| AdaError::Configuration(format!("era {self:?} missing from dispatch table")))?;
        if legacy {
            let flag = row.legacy_flag.ok_or_else(|| {
                           AdaError::Configuration(format!("era '{}' has no legacy era flag; disable legacy mode", row.name))
                       })?;
            Ok(GroupRendering { group: LEGACY_GROUP,
                                era_flag: Some(flag) })
        } else {
            let group = row.group.ok_or_else(|| {
                            AdaError::Configuration(format!("era '{}' has no top-level command group; enable legacy mode", row.name))
                        })?;
            Ok(GroupRendering { group, era_flag: None })
        }
    }
}

impl FromStr for Era {
    type Err = AdaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_lowercase();
        ERA_TABLE.iter()
                 .find(|r| r.name == needle)
                 .map(|r| r.era)
                 .ok_or_else(|| AdaError::Configuration(format!("unknown era '{raw}'")))
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_eras_render_their_own_group() {
        let r = Era::Conway.rendering(false).unwrap();
        assert_eq!(r.group, "conway");
        assert_eq!(r.era_flag, None);
    }

    #[test]
    fn legacy_renders_marker_and_flag() {
        let r = Era::Babbage.rendering(true).unwrap();
        assert_eq!(r.group, LEGACY_GROUP);
        assert_eq!(r.era_flag, Some("--babbage-era"));
    }

    #[test]
    fn impossible_combinations_are_configuration_errors() {
        assert!(matches!(Era::Alonzo.rendering(false), Err(AdaError::Configuration(_))));
        assert!(matches!(Era::Latest.rendering(true), Err(AdaError::Configuration(_))));
        assert!("byron".parse::<Era>().is_err());
        assert_eq!("Conway".parse::<Era>().unwrap(), Era::Conway);
    }
}
