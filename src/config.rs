use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::MealType;
use crate::planner::constants::*;

/// Deviation bounds of the meal traffic light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AmpelThresholds {
    pub green: f64,
    pub yellow: f64,
}

impl Default for AmpelThresholds {
    fn default() -> Self {
        Self {
            green: AMPEL_GREEN_THRESHOLD,
            yellow: AMPEL_YELLOW_THRESHOLD,
        }
    }
}

/// Per-person calorie targets per meal plus the traffic-light bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AmpelConfig {
    pub lunch_target_kcal: f64,
    pub dinner_target_kcal: f64,
    pub thresholds: AmpelThresholds,
}

impl Default for AmpelConfig {
    fn default() -> Self {
        Self {
            lunch_target_kcal: LUNCH_TARGET_KCAL,
            dinner_target_kcal: DINNER_TARGET_KCAL,
            thresholds: AmpelThresholds::default(),
        }
    }
}

impl AmpelConfig {
    pub fn target_for(&self, meal: MealType) -> f64 {
        match meal {
            MealType::Lunch => self.lunch_target_kcal,
            MealType::Dinner => self.dinner_target_kcal,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let t = self.thresholds;
        if !(t.green >= 0.0 && t.green <= t.yellow) {
            return Err(MenuError::InvalidInput(format!(
                "ampel thresholds must satisfy 0 <= green <= yellow (got {} / {})",
                t.green, t.yellow
            )));
        }
        if self.lunch_target_kcal < 0.0 || self.dinner_target_kcal < 0.0 {
            return Err(MenuError::InvalidInput(
                "meal targets must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Daily nutrition and food-group goals per person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyTargets {
    pub kcal_min: f64,
    pub kcal_max: f64,
    pub protein_min_g: f64,
    pub protein_max_g: f64,
    pub fat_share_max: f64,
    pub veg_fruit: u32,
    pub starch: u32,
    pub protein_dishes: u32,
    pub dairy: u32,
    pub whole_grain: u32,
}

impl Default for DailyTargets {
    fn default() -> Self {
        Self {
            kcal_min: DAILY_KCAL_MIN,
            kcal_max: DAILY_KCAL_MAX,
            protein_min_g: DAILY_PROTEIN_MIN_G,
            protein_max_g: DAILY_PROTEIN_MAX_G,
            fat_share_max: DAILY_FAT_SHARE_MAX,
            veg_fruit: DAILY_VEG_FRUIT_GOAL,
            starch: DAILY_STARCH_GOAL,
            protein_dishes: DAILY_PROTEIN_DISH_GOAL,
            dairy: DAILY_DAIRY_GOAL,
            whole_grain: DAILY_WHOLE_GRAIN_GOAL,
        }
    }
}

/// Diner estimates for the weekly hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HitEstimates {
    pub lunch_diners_per_day: f64,
    pub dinner_diners_per_day: f64,
}

impl Default for HitEstimates {
    fn default() -> Self {
        Self {
            lunch_diners_per_day: HIT_LUNCH_DINERS_PER_DAY,
            dinner_diners_per_day: HIT_DINNER_DINERS_PER_DAY,
        }
    }
}

/// Group portions relative to the base portion, for records that omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupPortionRatios {
    pub seniors: f64,
    pub children: f64,
}

impl Default for GroupPortionRatios {
    fn default() -> Self {
        Self {
            seniors: SENIOR_PORTION_RATIO,
            children: CHILD_PORTION_RATIO,
        }
    }
}

/// All runtime-tunable planner settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PlannerConfig {
    pub ampel: AmpelConfig,
    pub daily: DailyTargets,
    pub weekly_hits: HitEstimates,
    pub group_portions: GroupPortionRatios,
    pub default_diners_per_day: Option<u32>,
}

impl PlannerConfig {
    /// Load a config file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&content)?;
        config.ampel.validate()?;
        Ok(config)
    }

    pub fn diners_per_day(&self) -> u32 {
        self.default_diners_per_day.unwrap_or(DEFAULT_DINERS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_constants() {
        let config = PlannerConfig::default();
        assert_eq!(config.ampel.thresholds.green, AMPEL_GREEN_THRESHOLD);
        assert_eq!(config.ampel.thresholds.yellow, AMPEL_YELLOW_THRESHOLD);
        assert_eq!(config.ampel.target_for(MealType::Lunch), LUNCH_TARGET_KCAL);
        assert_eq!(config.diners_per_day(), DEFAULT_DINERS_PER_DAY);
    }

    fn load_str(json: &str) -> Result<PlannerConfig> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        PlannerConfig::load(file.path())
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config =
            load_str(r#"{"ampel": {"lunchTargetKcal": 900}, "defaultDinersPerDay": 80}"#).unwrap();
        assert_eq!(config.ampel.lunch_target_kcal, 900.0);
        assert_eq!(config.ampel.dinner_target_kcal, DINNER_TARGET_KCAL);
        assert_eq!(config.daily, DailyTargets::default());
        assert_eq!(config.diners_per_day(), 80);
    }

    #[test]
    fn test_unknown_keys_fail_load() {
        for json in [
            r#"{"ampel": {"lunch_target_kcal": 900}}"#,
            r#"{"ampel": {"thresholds": {"green": 0.1, "yelow": 0.2}}}"#,
            r#"{"daily": {"proteinMaxG": 80, "kcalMaximum": 2100}}"#,
            r#"{"dinersPerDay": 80}"#,
        ] {
            assert!(
                matches!(load_str(json), Err(MenuError::Json(_))),
                "accepted: {json}"
            );
        }
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = AmpelConfig {
            thresholds: AmpelThresholds {
                green: 0.3,
                yellow: 0.1,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
