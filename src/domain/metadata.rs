// Series metadata - typed record parsed once at ingestion
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::limits::Thresholds;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Info", default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ParameterInfo>,
    #[serde(rename = "IndependentVariable", default, skip_serializing_if = "Option::is_none")]
    pub independent_variable: Option<IndependentVariable>,
    #[serde(rename = "Limits", default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
    #[serde(rename = "State Conversions", default, skip_serializing_if = "Option::is_none")]
    pub state_conversions: Option<Vec<StateConversion>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    #[serde(rename = "tlmID", default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub tlm_id: Option<String>,
    #[serde(rename = "Alias", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "Units", default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndependentVariable {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Alias", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "Units", default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(rename = "Length", default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(rename = "Red", default)]
    pub red: LimitPair,
    #[serde(rename = "Yellow", default)]
    pub yellow: LimitPair,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitPair {
    #[serde(rename = "Low", alias = "low", default)]
    pub low: Option<f64>,
    #[serde(rename = "High", alias = "high", default)]
    pub high: Option<f64>,
}

impl Limits {
    pub fn new(red_low: f64, red_high: f64, yellow_low: f64, yellow_high: f64) -> Self {
        Self {
            red: LimitPair {
                low: Some(red_low),
                high: Some(red_high),
            },
            yellow: LimitPair {
                low: Some(yellow_low),
                high: Some(yellow_high),
            },
        }
    }

    /// All four thresholds, or None when any of them is missing.
    pub fn thresholds(&self) -> Option<Thresholds> {
        Some(Thresholds {
            red_low: self.red.low?,
            red_high: self.red.high?,
            yellow_low: self.yellow.low?,
            yellow_high: self.yellow.high?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Desirability {
    Good,
    Caution,
    Bad,
    #[serde(other)]
    Unknown,
}

/// One entry of a discrete state table: raw value, state label, desirability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConversion {
    pub value: f64,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desirability: Option<Desirability>,
}

impl StateConversion {
    pub fn new(value: f64, state: impl Into<String>, desirability: Option<Desirability>) -> Self {
        Self {
            value,
            state: state.into(),
            desirability,
        }
    }
}

impl SeriesMetadata {
    /// Parse metadata in the chart schema, normalizing state conversions into
    /// ascending value order.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let metadata: SeriesMetadata = serde_json::from_value(value)?;
        Ok(metadata.normalized())
    }

    /// Build metadata from the per-parameter metadata LaTiS returns alongside a
    /// dataset. Returns None when LaTiS has nothing for the y parameter.
    pub fn from_latis(
        parameters: &HashMap<String, LatisParameterMetadata>,
        x_name: &str,
        y_name: &str,
    ) -> Option<Self> {
        let y = parameters.get(y_name)?;
        let x = parameters.get(x_name);

        let limits = y.limits.as_ref().map(|l| Limits {
            red: l.red.unwrap_or_default(),
            yellow: l.yellow.unwrap_or_default(),
        });

        let metadata = SeriesMetadata {
            name: Some(y_name.to_string()),
            description: y.long_name.clone(),
            info: Some(ParameterInfo {
                tlm_id: y.tlm_id.clone(),
                alias: y.alias.clone(),
                units: y.units.clone(),
            }),
            independent_variable: Some(IndependentVariable {
                name: Some(x_name.to_string()),
                alias: x.and_then(|x| x.alias.clone()),
                units: x.and_then(|x| x.units.clone()),
                length: x.and_then(|x| x.length.clone()),
                kind: x.and_then(|x| x.kind.clone()),
            }),
            limits,
            state_conversions: y.state_conversions.clone(),
        };
        Some(metadata.normalized())
    }

    fn normalized(mut self) -> Self {
        if let Some(conversions) = self.state_conversions.as_mut() {
            conversions.sort_by(|a, b| a.value.total_cmp(&b.value));
        }
        self
    }

    pub fn limits(&self) -> Option<&Limits> {
        self.limits.as_ref()
    }

    pub fn thresholds(&self) -> Option<Thresholds> {
        self.limits.as_ref().and_then(Limits::thresholds)
    }

    pub fn state_conversions(&self) -> Option<&[StateConversion]> {
        self.state_conversions.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.info.as_ref()?.units.as_deref()
    }

    pub fn x_units(&self) -> Option<&str> {
        self.independent_variable.as_ref()?.units.as_deref()
    }
}

/// Raw per-parameter metadata as LaTiS serves it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatisParameterMetadata {
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(rename = "tlmId", default, deserialize_with = "string_or_number")]
    pub tlm_id: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub length: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub limits: Option<LatisLimits>,
    #[serde(default)]
    pub state_conversions: Option<Vec<StateConversion>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatisLimits {
    #[serde(default)]
    pub yellow: Option<LimitPair>,
    #[serde(default)]
    pub red: Option<LimitPair>,
}

// LaTiS mixes quoted and bare numbers for ids and lengths
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
