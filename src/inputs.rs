//! Form values and the request payload derived from them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Raw text of the four form fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    /// Effective electrode length (m).
    pub h_e: String,
    /// Electrode diameter (m).
    pub d: String,
    /// Fault current (A).
    pub i_f: String,
    /// Soil resistivity (Ω·m).
    pub rho: String,
}

/// Body of both simulation calls.
///
/// `r_e` is always half the entered diameter; it has no field of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub r_e: f64,
    pub h_e: f64,
    #[serde(rename = "I_f")]
    pub i_f: f64,
    pub rho: f64,
}

impl FormInputs {
    pub fn new(
        h_e: impl Into<String>,
        d: impl Into<String>,
        i_f: impl Into<String>,
        rho: impl Into<String>,
    ) -> Self {
        Self {
            h_e: h_e.into(),
            d: d.into(),
            i_f: i_f.into(),
            rho: rho.into(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("h_e", self.h_e.as_str()),
            ("D", self.d.as_str()),
            ("I_f", self.i_f.as_str()),
            ("rho", self.rho.as_str()),
        ]
    }

    /// Fails on the first empty field, in form order.
    pub fn check_present(&self) -> Result<(), ValidationError> {
        match self.fields().into_iter().find(|(_, raw)| raw.is_empty()) {
            Some((field, _)) => Err(ValidationError::MissingValue { field }),
            None => Ok(()),
        }
    }

    /// Validates every field and builds the payload sent to the service.
    pub fn to_request(&self) -> Result<SimulationRequest, ValidationError> {
        self.check_present()?;

        let h_e = parse_number("h_e", &self.h_e)?;
        let d = parse_number("D", &self.d)?;
        let i_f = parse_number("I_f", &self.i_f)?;
        let rho = parse_number("rho", &self.rho)?;

        Ok(SimulationRequest {
            r_e: d / 2.0,
            h_e,
            i_f,
            rho,
        })
    }
}

/// Accepts surrounding whitespace and a decimal comma ("0,5").
fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NotNumeric {
            field,
            raw: raw.to_string(),
        }),
    }
}
