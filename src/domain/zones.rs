// Color zones and limit bands handed to the renderer
use serde::{Deserialize, Serialize};

use super::limits::{LimitType, Thresholds};
use super::metadata::{Desirability, StateConversion};

/// Half-width of the zone drawn around each discrete state value.
pub const DISCRETE_ZONE_WIDTH: f64 = 0.05;

/// Colors for good / warn / bad, supplied by the caller's theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePalette {
    pub good: String,
    pub warn: String,
    pub bad: String,
}

impl ZonePalette {
    pub fn new(good: impl Into<String>, warn: impl Into<String>, bad: impl Into<String>) -> Self {
        Self {
            good: good.into(),
            warn: warn.into(),
            bad: bad.into(),
        }
    }

    pub fn color_for(&self, limit: LimitType) -> &str {
        match limit {
            LimitType::Good => &self.good,
            LimitType::Warn => &self.warn,
            LimitType::Bad => &self.bad,
        }
    }
}

/// A zone spans from the previous zone's `value` up to this one's. No value
/// means unbounded above; no color means the default series color.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorZone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ColorZone {
    fn bounded(value: f64, color: Option<&str>) -> Self {
        Self {
            value: Some(value),
            color: color.map(str::to_string),
        }
    }
}

pub fn build_continuous_zones(t: &Thresholds, palette: &ZonePalette) -> Vec<ColorZone> {
    vec![
        ColorZone::bounded(t.red_low, Some(&palette.bad)),
        ColorZone::bounded(t.yellow_low, Some(&palette.warn)),
        ColorZone::bounded(t.yellow_high, Some(&palette.good)),
        ColorZone::bounded(t.red_high, Some(&palette.warn)),
        ColorZone {
            value: None,
            color: Some(palette.bad.clone()),
        },
    ]
}

/// `conversions` must already be sorted by ascending value.
pub fn build_discrete_zones(conversions: &[StateConversion], palette: &ZonePalette) -> Vec<ColorZone> {
    let mut zones = Vec::new();
    for conversion in conversions {
        let limit = match conversion.desirability {
            Some(Desirability::Good) => LimitType::Good,
            Some(Desirability::Caution) => LimitType::Warn,
            Some(Desirability::Bad) => LimitType::Bad,
            _ => continue,
        };
        zones.push(ColorZone::bounded(conversion.value - DISCRETE_ZONE_WIDTH, None));
        zones.push(ColorZone::bounded(
            conversion.value + DISCRETE_ZONE_WIDTH,
            Some(palette.color_for(limit)),
        ));
    }
    zones.push(ColorZone::default());
    zones
}

/// Shaded y-axis band behind the series. Open ends are unbounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitBand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    pub limit_type: LimitType,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPalette {
    pub warn: String,
    pub bad: String,
}

pub fn build_limit_bands(t: &Thresholds, palette: &BandPalette) -> Vec<LimitBand> {
    let band = |from, to, limit_type, color: &str| LimitBand {
        from,
        to,
        limit_type,
        color: color.to_string(),
    };
    vec![
        band(Some(t.red_low), Some(t.yellow_low), LimitType::Warn, &palette.warn),
        band(Some(t.yellow_high), Some(t.red_high), LimitType::Warn, &palette.warn),
        band(None, Some(t.red_low), LimitType::Bad, &palette.bad),
        band(Some(t.red_high), None, LimitType::Bad, &palette.bad),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> ZonePalette {
        ZonePalette::new("green", "yellow", "red")
    }

    #[test]
    fn test_continuous_zones() {
        let t = Thresholds {
            red_low: -5.0,
            red_high: 5.0,
            yellow_low: -1.0,
            yellow_high: 1.0,
        };
        let zones = build_continuous_zones(&t, &palette());

        let values: Vec<Option<f64>> = zones.iter().map(|z| z.value).collect();
        assert_eq!(values, vec![Some(-5.0), Some(-1.0), Some(1.0), Some(5.0), None]);
        let colors: Vec<&str> = zones.iter().map(|z| z.color.as_deref().unwrap()).collect();
        assert_eq!(colors, vec!["red", "yellow", "green", "yellow", "red"]);
    }

    #[test]
    fn test_discrete_zones() {
        let conversions = vec![
            StateConversion::new(0.0, "OFF", Some(Desirability::Good)),
            StateConversion::new(1.0, "IDLE", None),
            StateConversion::new(2.0, "WARM", Some(Desirability::Caution)),
            StateConversion::new(3.0, "ODD", Some(Desirability::Unknown)),
            StateConversion::new(4.0, "FAULT", Some(Desirability::Bad)),
        ];
        let zones = build_discrete_zones(&conversions, &palette());

        assert_eq!(
            zones,
            vec![
                ColorZone { value: Some(-0.05), color: None },
                ColorZone { value: Some(0.05), color: Some("green".into()) },
                ColorZone { value: Some(1.95), color: None },
                ColorZone { value: Some(2.05), color: Some("yellow".into()) },
                ColorZone { value: Some(3.95), color: None },
                ColorZone { value: Some(4.05), color: Some("red".into()) },
                ColorZone::default(),
            ]
        );

        let bounds: Vec<f64> = zones.iter().filter_map(|z| z.value).collect();
        assert!(bounds.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_discrete_zones_without_recognized_entries() {
        let conversions = vec![StateConversion::new(1.0, "IDLE", None)];
        assert_eq!(build_discrete_zones(&conversions, &palette()), vec![ColorZone::default()]);
    }

    #[test]
    fn test_limit_bands() {
        let t = Thresholds {
            red_low: -5.0,
            red_high: 5.0,
            yellow_low: -1.0,
            yellow_high: 1.0,
        };
        let palette = BandPalette {
            warn: "amber".into(),
            bad: "crimson".into(),
        };
        let bands = build_limit_bands(&t, &palette);

        assert_eq!(bands.len(), 4);
        assert_eq!((bands[0].from, bands[0].to), (Some(-5.0), Some(-1.0)));
        assert_eq!(bands[1].limit_type, LimitType::Warn);
        assert_eq!((bands[2].from, bands[2].to), (None, Some(-5.0)));
        assert_eq!((bands[3].from, bands[3].to, bands[3].color.as_str()), (Some(5.0), None, "crimson"));
    }
}
