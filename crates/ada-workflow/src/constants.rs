//! Constantes del orquestador.
//!
//! `WORKFLOW_VERSION` forma parte del input de los fingerprints de cada paso:
//! cambiarla invalida determinísticamente los fingerprints previos aunque el
//! plan y los resultados sean idénticos.

/// Versión lógica del orquestador de rotación KES.
pub const WORKFLOW_VERSION: &str = "K1.0";
