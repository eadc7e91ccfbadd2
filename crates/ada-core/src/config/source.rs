//! Fuentes de configuración clave/valor.
//!
//! `EnvSource` lee el entorno del proceso con el `.env` cargado una sola vez;
//! `MapSource` es un mapa en memoria para tests y para callers que ya tienen
//! su propia configuración.
use std::collections::BTreeMap;
use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub trait ConfigSource {
    /// Valor crudo de `key`; vacío o sólo espacios cuenta como ausente.
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl EnvSource {
    pub fn new() -> Self {
        Lazy::force(&DOTENV_LOADED);
        Self
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        Lazy::force(&DOTENV_LOADED);
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.trim().is_empty()).cloned()
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

/// Valores que cuentan como "apagado"; cualquier otro valor presente es verdadero.
const FALSY: [&str; 6] = ["", "false", "0", "no", "n", "off"];

pub fn is_truthy(raw: &str) -> bool {
    !FALSY.contains(&raw.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        for v in ["1", "true", "YES", "on", "y", "anything"] {
            assert!(is_truthy(v), "{v} debería ser verdadero");
        }
        for v in ["", "0", "False", "no", "N", "off", "  "] {
            assert!(!is_truthy(v), "{v} debería ser falso");
        }
    }

    #[test]
    fn map_source_treats_blank_as_absent() {
        let s = MapSource::new().with("A", "x").with("B", "   ");
        assert_eq!(s.get("A").as_deref(), Some("x"));
        assert_eq!(s.get("B"), None);
        assert_eq!(s.get("C"), None);
    }
}
