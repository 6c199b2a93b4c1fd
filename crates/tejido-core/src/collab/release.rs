use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collab::ids::ReleaseId;

/// Tipos de release que se recorren durante un crawl.
///
/// `AppearsOn` es el que aporta la mayoría de las colaboraciones: releases
/// de terceros donde el artista semilla aparece acreditado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseKind {
  Album,
  Single,
  AppearsOn,
}

impl ReleaseKind {
  /// Valor textual que entiende el catálogo en sus filtros.
  pub fn as_str(&self) -> &'static str {
    match self {
      ReleaseKind::Album => "album",
      ReleaseKind::Single => "single",
      ReleaseKind::AppearsOn => "appears_on",
    }
  }

  /// El conjunto completo que usa un crawl de colaboraciones.
  pub fn all() -> Vec<ReleaseKind> {
    vec![ReleaseKind::Album, ReleaseKind::Single, ReleaseKind::AppearsOn]
  }
}

impl fmt::Display for ReleaseKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Precisión con la que el catálogo reporta la fecha de un release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePrecision {
  /// Solo el año ("1998"). Se normaliza al 1 de enero.
  Year,
  /// Fecha completa ("1998-05-21").
  Day,
}

/// Error de integridad: la fecha cruda del release no es interpretable.
///
/// Este error nunca aborta un crawl completo: el crawler pone el release
/// en cuarentena y sigue con el resto.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable release date `{raw}` for release {release}")]
pub struct ReleaseDateError {
  pub release: ReleaseId,
  pub raw: String,
}

/// Resumen de un release dentro de una página de discografía.
///
/// La fecha se conserva cruda tal como llegó del catálogo; `parsed_date`
/// la convierte a una fecha canónica o falla con `ReleaseDateError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
  pub id: ReleaseId,
  pub title: String,
  pub release_date: String,
  pub precision: DatePrecision,
}

impl ReleaseSummary {
  /// Normaliza la fecha cruda a un `NaiveDate`.
  ///
  /// Con precisión de año se ancla al 1 de enero (mismo criterio que el
  /// catálogo de referencia al comparar recencias).
  pub fn parsed_date(&self) -> Result<NaiveDate, ReleaseDateError> {
    let err = || ReleaseDateError { release: self.id.clone(), raw: self.release_date.clone() };

    match self.precision {
      DatePrecision::Year => {
        let year: i32 = self.release_date.trim().parse().map_err(|_| err())?;
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(err)
      }
      DatePrecision::Day => {
        NaiveDate::parse_from_str(self.release_date.trim(), "%Y-%m-%d").map_err(|_| err())
      }
    }
  }
}
